//! Container access layer.
//!
//! # Responsibility
//! - Open a zip container from bytes and hold its entries in memory.
//! - Resolve entries by normalized path and discover topic folders.
//!
//! # Invariants
//! - Entry paths use `/` separators and never start with `/`.
//! - Directory entries are never listed.
//! - A loaded archive is read-only and can be shared across threads.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod reader;

pub(crate) use reader::file_name;
pub use reader::{is_topic_folder_name, ContainerArchive, DEFAULT_MAX_ENTRY_BYTES};

/// Mandatory version descriptor at the container root.
pub const VERSION_ENTRY: &str = "bcf.version";
/// Project document at the container root.
pub const PROJECT_ENTRY: &str = "project.bcfp";
/// Documents manifest, newest generation only.
pub const DOCUMENTS_ENTRY: &str = "documents.xml";
/// Extension vocabulary in XML form.
pub const EXTENSIONS_XML_ENTRY: &str = "extensions.xml";
/// Extension vocabulary in XSD form.
pub const EXTENSIONS_XSD_ENTRY: &str = "extensions.xsd";
/// Primary per-topic document name.
pub const MARKUP_FILE: &str = "markup.bcf";
/// Secondary per-topic comment documents, tried in order.
pub const COMMENT_FILES: &[&str] = &["comments.xml", "comments.bcf"];
/// Suffix of per-viewpoint camera documents.
pub const VIEWPOINT_SUFFIX: &str = ".bcfv";

pub type ArchiveResult<T> = Result<T, ArchiveError>;

#[derive(Debug)]
pub enum ArchiveError {
    Zip(zip::result::ZipError),
    Io(std::io::Error),
    NotFound(String),
}

impl Display for ArchiveError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Zip(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "{err}"),
            Self::NotFound(path) => write!(f, "entry not found: {path}"),
        }
    }
}

impl Error for ArchiveError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Zip(err) => Some(err),
            Self::Io(err) => Some(err),
            Self::NotFound(_) => None,
        }
    }
}

impl From<zip::result::ZipError> for ArchiveError {
    fn from(value: zip::result::ZipError) -> Self {
        Self::Zip(value)
    }
}

impl From<std::io::Error> for ArchiveError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}
