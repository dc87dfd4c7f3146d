//! Archive-level aggregate returned by `parse`.

use crate::model::project::Project;
use crate::model::topic::{CustomFieldMap, Topic};
use crate::service::image_service::SnapshotSource;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Normalized view of one container.
///
/// Consumers read everything from here and never re-parse XML. Snapshot
/// bytes stay in the archive until [`BcfDocument::extract_images`] runs.
#[derive(Debug, Clone, Serialize)]
pub struct BcfDocument {
    pub filename: String,
    pub project: Project,
    pub topics: Vec<Topic>,
    pub custom_field_registry: CustomFieldRegistry,
    pub extensions: Option<ExtensionsDefinition>,
    pub documents: Vec<ManifestDocument>,
    #[serde(skip)]
    pub snapshots: SnapshotSource,
}

impl BcfDocument {
    pub fn topic(&self, identifier: &str) -> Option<&Topic> {
        self.topics.iter().find(|t| t.identifier == identifier)
    }

    /// Attaches snapshot images to every viewpoint that can be matched.
    ///
    /// Returns the number of images attached by this call.
    pub fn extract_images(&mut self) -> usize {
        self.snapshots.extract_images(&mut self.topics)
    }
}

/// Archive-wide index of custom field keys and how many records use them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomFieldRegistry {
    pub fields: BTreeMap<String, usize>,
}

impl CustomFieldRegistry {
    pub fn record(&mut self, fields: &CustomFieldMap) {
        for key in fields.keys() {
            *self.fields.entry(key.clone()).or_insert(0) += 1;
        }
    }

    /// Builds the registry from every topic and comment.
    pub fn from_topics(topics: &[Topic]) -> Self {
        let mut registry = Self::default();
        for topic in topics {
            registry.record(&topic.custom_fields);
            for comment in &topic.comments {
                registry.record(&comment.custom_fields);
            }
        }
        registry
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn usage(&self, key: &str) -> usize {
        self.fields.get(key).copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Vocabulary declared by the container's extensions file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionsDefinition {
    pub topic_types: Vec<String>,
    pub topic_statuses: Vec<String>,
    pub priorities: Vec<String>,
    pub topic_labels: Vec<String>,
    pub users: Vec<String>,
    pub snippet_types: Vec<String>,
    pub stages: Vec<String>,
}

impl ExtensionsDefinition {
    pub fn is_empty(&self) -> bool {
        self.topic_types.is_empty()
            && self.topic_statuses.is_empty()
            && self.priorities.is_empty()
            && self.topic_labels.is_empty()
            && self.users.is_empty()
            && self.snippet_types.is_empty()
            && self.stages.is_empty()
    }
}

/// Entry of the `documents.xml` manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestDocument {
    pub guid: String,
    pub filename: String,
    pub description: String,
}
