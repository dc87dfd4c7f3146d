//! Custom and unknown field discovery.
//!
//! # Responsibility
//! - Flatten non-standard attributes and child elements of one scope element.
//! - Scan a whole document for vendor-namespaced or extension-like elements.
//!
//! # Invariants
//! - Only trimmed-non-empty values are emitted.
//! - Scanning never fails; a clean document yields an empty map.
//! - Repeated keys keep every value, joined with `"; "`.

use crate::model::topic::CustomFieldMap;
use crate::xml::fields::{is_standard_attribute, is_standard_element, Scope};
use crate::xml::deep_text;
use roxmltree::{Document, Node};

/// Namespaces every container may use without it being an anomaly.
const BASELINE_NAMESPACES: &[&str] = &[
    "http://www.w3.org/2001/XMLSchema",
    "http://www.w3.org/2001/XMLSchema-instance",
];

/// Tag-name fragments that mark vendor extension elements.
const VENDOR_MARKERS: &[&str] = &["CustomField", "Extension", "UserDefined", "Vendor"];

/// Attribute and child passes over one scope element.
pub fn scan_scope(node: Node<'_, '_>, scope: Scope) -> CustomFieldMap {
    let prefix = scope.key_prefix();
    let mut fields = CustomFieldMap::new();

    for attribute in node.attributes() {
        if attribute.namespace().is_some() || is_standard_attribute(scope, attribute.name()) {
            continue;
        }
        insert_field(
            &mut fields,
            format!("{prefix}_attr_{}", attribute.name()),
            attribute.value(),
        );
    }

    for child in node.children().filter(|child| child.is_element()) {
        let tag = child.tag_name().name();
        if is_standard_element(tag) {
            continue;
        }
        if let Some(text) = deep_text(child) {
            insert_field(&mut fields, format!("{prefix}_element_{tag}"), &text);
        }
        for attribute in child.attributes() {
            insert_field(
                &mut fields,
                format!("{prefix}_element_{tag}_attr_{}", attribute.name()),
                attribute.value(),
            );
        }
    }

    fields
}

/// Document-wide scan for namespaced and vendor-marked elements.
pub fn scan_document_anomalies(doc: &Document<'_>) -> CustomFieldMap {
    let mut fields = CustomFieldMap::new();

    for node in doc.descendants().filter(|node| node.is_element()) {
        let tag = node.tag_name();
        let Some(text) = deep_text(node) else {
            continue;
        };

        if let Some(namespace) = tag.namespace() {
            if !BASELINE_NAMESPACES.contains(&namespace) {
                insert_field(
                    &mut fields,
                    format!("namespace_{namespace}_{}", tag.name()),
                    &text,
                );
            }
        }

        if VENDOR_MARKERS
            .iter()
            .any(|marker| tag.name().contains(marker))
        {
            insert_field(&mut fields, format!("unknown_{}", tag.name()), &text);
        }
    }

    fields
}

fn insert_field(fields: &mut CustomFieldMap, key: String, value: &str) {
    let value = value.trim();
    if value.is_empty() {
        return;
    }
    fields
        .entry(key)
        .and_modify(|existing| {
            existing.push_str("; ");
            existing.push_str(value);
        })
        .or_insert_with(|| value.to_string());
}
