//! Project and format-version model.
//!
//! # Invariants
//! - `FormatVersion` ordering follows schema age (`Bcf20 < Bcf21 < Bcf30`).
//! - A `Project` always has a non-empty name; the sentinel is
//!   [`UNKNOWN_PROJECT_NAME`].

use serde::{Deserialize, Serialize};

/// Name used when no project name can be resolved.
pub const UNKNOWN_PROJECT_NAME: &str = "Unknown Project";

/// Supported schema generations, oldest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatVersion {
    /// `ProjectExtension` layout without an extension schema.
    Bcf20,
    /// `ProjectExtension` layout with an extension schema.
    Bcf21,
    /// `ProjectInfo` layout, plural container elements, server ids.
    Bcf30,
}

impl FormatVersion {
    /// Ordinal generation (0, 1 or 2).
    pub fn generation(self) -> u8 {
        match self {
            Self::Bcf20 => 0,
            Self::Bcf21 => 1,
            Self::Bcf30 => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Bcf20 => "2.0",
            Self::Bcf21 => "2.1",
            Self::Bcf30 => "3.0",
        }
    }

    /// Whether this generation uses the `ProjectInfo` project layout.
    pub fn uses_project_info(self) -> bool {
        matches!(self, Self::Bcf30)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    /// Empty when the container does not declare one.
    pub identifier: String,
    pub format_version: FormatVersion,
    pub has_extension_schema: bool,
}

impl Project {
    /// Creates a project whose name falls back to the sentinel when empty.
    pub fn new(
        name: impl Into<String>,
        identifier: impl Into<String>,
        format_version: FormatVersion,
        has_extension_schema: bool,
    ) -> Self {
        let name = name.into();
        let name = if name.trim().is_empty() {
            UNKNOWN_PROJECT_NAME.to_string()
        } else {
            name.trim().to_string()
        };
        Self {
            name,
            identifier: identifier.into().trim().to_string(),
            format_version,
            has_extension_schema,
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.name == UNKNOWN_PROJECT_NAME
    }
}
