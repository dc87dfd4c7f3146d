//! Topic and comment records.
//!
//! # Invariants
//! - `Topic::identifier` is the topic's folder GUID and is unique per archive.
//! - Comment identifiers are pairwise distinct within one topic.
//! - Text fields that could not be resolved are empty strings, never
//!   invented defaults.

use crate::model::project::FormatVersion;
use crate::model::viewpoint::Viewpoint;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Synthesized custom-field key to trimmed value.
pub type CustomFieldMap = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topic {
    pub identifier: String,
    pub format_version: FormatVersion,
    pub title: String,
    pub status: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub priority: String,
    pub description: String,
    pub stage: String,
    pub labels: Vec<String>,
    pub index: Option<i64>,
    pub creation_date: String,
    pub creation_author: String,
    pub modified_date: String,
    pub modified_author: String,
    pub due_date: String,
    pub assigned_to: String,
    /// Only read from newest-generation markup.
    pub server_assigned_id: String,
    /// At most one entry before the newest generation.
    pub reference_links: Vec<String>,
    /// Newest generation only.
    pub document_references: Vec<DocumentReference>,
    /// Newest generation only.
    pub header_files: Vec<HeaderFile>,
    pub related_topics: Vec<String>,
    pub bim_snippet: Option<BimSnippet>,
    pub comments: Vec<Comment>,
    pub viewpoints: Vec<Viewpoint>,
    pub custom_fields: CustomFieldMap,
}

impl Topic {
    /// Empty record for one topic folder; extractors fill the rest.
    pub fn new(identifier: impl Into<String>, format_version: FormatVersion) -> Self {
        Self {
            identifier: identifier.into(),
            format_version,
            title: String::new(),
            status: String::new(),
            kind: String::new(),
            priority: String::new(),
            description: String::new(),
            stage: String::new(),
            labels: Vec::new(),
            index: None,
            creation_date: String::new(),
            creation_author: String::new(),
            modified_date: String::new(),
            modified_author: String::new(),
            due_date: String::new(),
            assigned_to: String::new(),
            server_assigned_id: String::new(),
            reference_links: Vec::new(),
            document_references: Vec::new(),
            header_files: Vec::new(),
            related_topics: Vec::new(),
            bim_snippet: None,
            comments: Vec::new(),
            viewpoints: Vec::new(),
            custom_fields: CustomFieldMap::new(),
        }
    }

    pub fn comment(&self, identifier: &str) -> Option<&Comment> {
        self.comments.iter().find(|c| c.identifier == identifier)
    }

    pub fn viewpoint(&self, identifier: &str) -> Option<&Viewpoint> {
        self.viewpoints.iter().find(|v| v.identifier == identifier)
    }

    /// Comments sorted by their raw date text; extraction order is kept otherwise.
    pub fn comments_chronological(&self) -> Vec<&Comment> {
        let mut sorted: Vec<&Comment> = self.comments.iter().collect();
        sorted.sort_by(|a, b| a.date.cmp(&b.date));
        sorted
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub identifier: String,
    pub date: String,
    pub author: String,
    pub text: String,
    pub modified_date: String,
    pub modified_author: String,
    /// GUID of the viewpoint this comment points at, if any.
    pub viewpoint_guid: Option<String>,
    pub custom_fields: CustomFieldMap,
}

/// External or embedded document linked from a topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentReference {
    pub guid: String,
    pub document_guid: String,
    pub url: String,
    pub description: String,
}

/// Model file listed in a markup header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderFile {
    pub filename: String,
    pub date: String,
    pub reference: String,
    pub ifc_project: String,
    pub ifc_spatial_structure_element: String,
    pub is_external: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BimSnippet {
    pub snippet_type: String,
    pub is_external: bool,
    pub reference: String,
    pub reference_schema: String,
}
