//! Per-folder topic extraction.
//!
//! # Responsibility
//! - Locate and parse a topic folder's markup document.
//! - Resolve aliased topic fields and read structured topic children.
//! - Delegate comments and viewpoints to their extractors.
//!
//! # Invariants
//! - The topic identifier is always the folder GUID.
//! - Failures are returned per folder and never affect other topics.
//! - Older generations carry at most one reference link and no document
//!   references or header files.

use crate::archive::{ContainerArchive, MARKUP_FILE};
use crate::error::{TopicError, TopicResult};
use crate::model::project::FormatVersion;
use crate::model::topic::{BimSnippet, DocumentReference, HeaderFile, Topic};
use crate::parse::comments::merge_comments;
use crate::parse::viewpoint::extract_viewpoints;
use crate::xml::alias::resolve_topic_field;
use crate::xml::custom_fields::{scan_document_anomalies, scan_scope};
use crate::xml::fields::{Scope, TopicField};
use crate::xml::{
    attribute_text, child_element, child_elements, child_text, element_text, first_attribute,
    has_name, parse_bool, parse_document,
};
use log::debug;
use roxmltree::{Document, Node};

/// Extracts the topic stored in `folder`.
pub fn extract_topic(
    archive: &ContainerArchive,
    folder: &str,
    version: FormatVersion,
) -> TopicResult<Topic> {
    let path = format!("{folder}/{MARKUP_FILE}");
    let Some(text) = archive.read_optional_text(&path) else {
        return Err(TopicError::MissingMarkup(folder.to_string()));
    };
    let doc = parse_document(&text).map_err(|message| TopicError::MalformedDocument {
        path: path.clone(),
        message,
    })?;
    let node = topic_node(&doc).ok_or_else(|| TopicError::MissingTopicElement(path.clone()))?;

    let mut topic = Topic::new(folder, version);
    if let Some(declared) = first_attribute(node, &["Guid", "Id"]) {
        if !declared.eq_ignore_ascii_case(folder) {
            debug!(
                "event=topic_extract module=parse status=guid_mismatch folder={} declared={}",
                folder, declared
            );
        }
    }

    read_scalar_fields(&mut topic, node, version);
    topic.labels = read_labels(node);
    topic.reference_links = read_repeated(node, "ReferenceLinks", "ReferenceLink");
    topic.related_topics = read_related_topics(node);
    if version == FormatVersion::Bcf30 {
        topic.document_references = read_document_references(node);
        topic.header_files = read_header_files(doc.root_element());
    } else if topic.reference_links.len() > 1 {
        debug!(
            "event=topic_extract module=parse status=truncated topic={} reference_links={}",
            folder,
            topic.reference_links.len()
        );
        topic.reference_links.truncate(1);
    }
    topic.bim_snippet = child_element(node, "BimSnippet").map(read_bim_snippet);

    topic.custom_fields = scan_scope(node, Scope::Topic);
    for (key, value) in scan_document_anomalies(&doc) {
        topic.custom_fields.entry(key).or_insert(value);
    }

    topic.comments = merge_comments(archive, folder, &doc)?;
    topic.viewpoints = extract_viewpoints(archive, folder, &doc)?;
    Ok(topic)
}

/// The root's `Topic` child, else the first `Topic` with element content.
fn topic_node<'a, 'input>(doc: &'a Document<'input>) -> Option<Node<'a, 'input>> {
    let root = doc.root_element();
    if has_name(root, "Topic") {
        return Some(root);
    }
    child_element(root, "Topic").or_else(|| {
        root.descendants().find(|node| {
            has_name(*node, "Topic") && node.children().any(|child| child.is_element())
        })
    })
}

fn read_scalar_fields(topic: &mut Topic, node: Node<'_, '_>, version: FormatVersion) {
    topic.title = resolve_topic_field(node, TopicField::Title);
    topic.status = resolve_topic_field(node, TopicField::Status);
    topic.kind = resolve_topic_field(node, TopicField::Type);
    topic.priority = resolve_topic_field(node, TopicField::Priority);
    topic.description = resolve_topic_field(node, TopicField::Description);
    topic.stage = resolve_topic_field(node, TopicField::Stage);
    topic.creation_date = resolve_topic_field(node, TopicField::CreationDate);
    topic.creation_author = resolve_topic_field(node, TopicField::CreationAuthor);
    topic.modified_date = resolve_topic_field(node, TopicField::ModifiedDate);
    topic.modified_author = resolve_topic_field(node, TopicField::ModifiedAuthor);
    topic.due_date = resolve_topic_field(node, TopicField::DueDate);
    topic.assigned_to = resolve_topic_field(node, TopicField::AssignedTo);
    topic.index = resolve_topic_field(node, TopicField::Index).parse::<i64>().ok();
    if version == FormatVersion::Bcf30 {
        topic.server_assigned_id = resolve_topic_field(node, TopicField::ServerAssignedId);
    }
}

/// Labels as repeated `Labels` elements or a `Labels > Label` list.
fn read_labels(node: Node<'_, '_>) -> Vec<String> {
    let mut labels = Vec::new();
    for container in child_elements(node, "Labels") {
        let nested: Vec<String> = child_elements(container, "Label")
            .filter_map(element_text)
            .collect();
        if nested.is_empty() {
            labels.extend(element_text(container));
        } else {
            labels.extend(nested);
        }
    }
    labels
}

/// Text of direct `item` children plus `container > item` children.
fn read_repeated(node: Node<'_, '_>, container: &str, item: &str) -> Vec<String> {
    let mut values: Vec<String> = child_elements(node, item).filter_map(element_text).collect();
    for list in child_elements(node, container) {
        values.extend(child_elements(list, item).filter_map(element_text));
    }
    values
}

fn read_related_topics(node: Node<'_, '_>) -> Vec<String> {
    let mut related: Vec<String> = child_elements(node, "RelatedTopic")
        .filter_map(|item| attribute_text(item, "Guid"))
        .collect();
    for list in child_elements(node, "RelatedTopics") {
        related.extend(
            child_elements(list, "RelatedTopic").filter_map(|item| attribute_text(item, "Guid")),
        );
    }
    related
}

fn read_document_references(node: Node<'_, '_>) -> Vec<DocumentReference> {
    let mut items: Vec<Node<'_, '_>> = child_elements(node, "DocumentReference").collect();
    for list in child_elements(node, "DocumentReferences") {
        items.extend(child_elements(list, "DocumentReference"));
    }
    items
        .into_iter()
        .map(|item| DocumentReference {
            guid: first_attribute(item, &["Guid", "Id"]).unwrap_or_default(),
            document_guid: child_text(item, "DocumentGuid").unwrap_or_default(),
            url: child_text(item, "Url")
                .or_else(|| child_text(item, "ReferencedDocument"))
                .unwrap_or_default(),
            description: child_text(item, "Description").unwrap_or_default(),
        })
        .collect()
}

/// Header files from `Header > File` and `Header > Files > File`.
fn read_header_files(root: Node<'_, '_>) -> Vec<HeaderFile> {
    root.descendants()
        .filter(|node| has_name(*node, "Header"))
        .flat_map(|header| {
            let mut files: Vec<Node<'_, '_>> = child_elements(header, "File").collect();
            for list in child_elements(header, "Files") {
                files.extend(child_elements(list, "File"));
            }
            files
        })
        .map(|file| HeaderFile {
            filename: child_text(file, "Filename").unwrap_or_default(),
            date: child_text(file, "Date").unwrap_or_default(),
            reference: child_text(file, "Reference").unwrap_or_default(),
            ifc_project: attribute_text(file, "IfcProject").unwrap_or_default(),
            ifc_spatial_structure_element: attribute_text(file, "IfcSpatialStructureElement")
                .unwrap_or_default(),
            is_external: attribute_text(file, "isExternal")
                .and_then(|value| parse_bool(&value))
                .unwrap_or(true),
        })
        .collect()
}

fn read_bim_snippet(node: Node<'_, '_>) -> BimSnippet {
    BimSnippet {
        snippet_type: attribute_text(node, "SnippetType").unwrap_or_default(),
        is_external: attribute_text(node, "isExternal")
            .and_then(|value| parse_bool(&value))
            .unwrap_or(false),
        reference: child_text(node, "Reference").unwrap_or_default(),
        reference_schema: child_text(node, "ReferenceSchema").unwrap_or_default(),
    }
}
