//! `documents.xml` manifest parsing.

use crate::archive::{ContainerArchive, DOCUMENTS_ENTRY};
use crate::model::document::ManifestDocument;
use crate::xml::{child_text, first_attribute, has_name, parse_document};
use log::warn;

/// Lists documents declared by the manifest; empty when absent or unreadable.
pub fn parse_manifest(archive: &ContainerArchive) -> Vec<ManifestDocument> {
    let Some(text) = archive.read_optional_text(DOCUMENTS_ENTRY) else {
        return Vec::new();
    };
    let doc = match parse_document(&text) {
        Ok(doc) => doc,
        Err(err) => {
            warn!(
                "event=manifest_parse module=parse status=skipped error={}",
                err
            );
            return Vec::new();
        }
    };

    doc.descendants()
        .filter(|node| has_name(*node, "Document"))
        .map(|node| ManifestDocument {
            guid: first_attribute(node, &["Guid", "Id"]).unwrap_or_default(),
            filename: child_text(node, "Filename").unwrap_or_default(),
            description: child_text(node, "Description").unwrap_or_default(),
        })
        .collect()
}
