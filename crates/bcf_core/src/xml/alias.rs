//! Alias resolution for fields stored under legacy names.
//!
//! # Invariants
//! - The first alias with trimmed-non-empty content wins.
//! - A miss resolves to an empty string; no default is invented.

use crate::xml::fields::{comment_aliases, topic_aliases, AliasSet, CommentField, TopicField};
use crate::xml::{attribute_text, child_elements, element_text};
use roxmltree::Node;

/// Resolves one logical field against `scope`.
pub fn resolve_text(scope: Node<'_, '_>, aliases: &AliasSet) -> String {
    if aliases.attribute_first {
        if let Some(value) = aliases
            .names
            .iter()
            .find_map(|name| attribute_text(scope, name))
        {
            return value;
        }
    }

    aliases
        .names
        .iter()
        .find_map(|name| child_elements(scope, name).find_map(element_text))
        .unwrap_or_default()
}

pub fn resolve_topic_field(topic: Node<'_, '_>, field: TopicField) -> String {
    resolve_text(topic, &topic_aliases(field))
}

pub fn resolve_comment_field(comment: Node<'_, '_>, field: CommentField) -> String {
    resolve_text(comment, &comment_aliases(field))
}
