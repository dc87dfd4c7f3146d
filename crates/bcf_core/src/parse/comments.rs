//! Comment extraction and cross-document merging.
//!
//! # Responsibility
//! - Extract comments from the topic markup and from a sibling comments file.
//! - Deduplicate by identifier, primary document first.
//!
//! # Invariants
//! - Identifiers are pairwise distinct in the returned sequence.
//! - On collision the markup comment wins over the sibling-file comment.
//! - Output order is extraction order, not chronological.

use crate::archive::{ContainerArchive, COMMENT_FILES};
use crate::error::{TopicError, TopicResult};
use crate::model::topic::Comment;
use crate::xml::alias::resolve_comment_field;
use crate::xml::custom_fields::scan_scope;
use crate::xml::fields::{CommentField, Scope};
use crate::xml::{attribute_text, child_element, first_attribute, parse_document};
use log::{debug, info};
use roxmltree::{Document, Node};
use std::collections::HashSet;

/// Tag names authoring tools use for a comment record.
const COMMENT_TAGS: &[&str] = &["Comment", "TopicComment", "MarkupComment"];
const COMMENT_ID_ATTRIBUTES: &[&str] = &["Guid", "Id"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CommentSource {
    Markup,
    Sibling,
}

/// Accumulates comments while enforcing identifier uniqueness.
struct CommentMerger<'t> {
    topic_id: &'t str,
    seen: HashSet<String>,
    comments: Vec<Comment>,
    skipped: usize,
}

impl<'t> CommentMerger<'t> {
    fn new(topic_id: &'t str) -> Self {
        Self {
            topic_id,
            seen: HashSet::new(),
            comments: Vec::new(),
            skipped: 0,
        }
    }

    fn collect(&mut self, doc: &Document<'_>, source: CommentSource) {
        for node in doc.descendants().filter(|node| is_comment_record(*node)) {
            let mut comment = read_comment(node);
            if comment.identifier.is_empty() {
                comment.identifier =
                    format!("comment-{}-{}", self.topic_id, self.comments.len() + 1);
                debug!(
                    "event=comment_extract module=parse status=fallback topic={} synthesized_id={}",
                    self.topic_id, comment.identifier
                );
            }
            if !self.seen.insert(comment.identifier.clone()) {
                self.skipped += 1;
                debug!(
                    "event=comment_merge module=parse status=duplicate topic={} comment={} source={:?}",
                    self.topic_id, comment.identifier, source
                );
                continue;
            }
            self.comments.push(comment);
        }
    }

    fn finish(self) -> Vec<Comment> {
        if self.skipped > 0 {
            info!(
                "event=comment_merge module=parse status=ok topic={} kept={} dropped_duplicates={}",
                self.topic_id,
                self.comments.len(),
                self.skipped
            );
        }
        self.comments
    }
}

/// Merges markup comments with comments from the topic's sibling file.
pub fn merge_comments(
    archive: &ContainerArchive,
    folder: &str,
    markup: &Document<'_>,
) -> TopicResult<Vec<Comment>> {
    let mut merger = CommentMerger::new(folder);
    merger.collect(markup, CommentSource::Markup);

    for file in COMMENT_FILES {
        let path = format!("{folder}/{file}");
        let Some(text) = archive.read_optional_text(&path) else {
            continue;
        };
        let doc = parse_document(&text)
            .map_err(|message| TopicError::MalformedDocument { path, message })?;
        merger.collect(&doc, CommentSource::Sibling);
    }

    Ok(merger.finish())
}

/// A comment-tagged element that is a record, not the text child of one.
fn is_comment_record(node: Node<'_, '_>) -> bool {
    if !node.is_element() || !COMMENT_TAGS.contains(&node.tag_name().name()) {
        return false;
    }
    first_attribute(node, COMMENT_ID_ATTRIBUTES).is_some()
        || node.children().any(|child| child.is_element())
}

fn read_comment(node: Node<'_, '_>) -> Comment {
    Comment {
        identifier: first_attribute(node, COMMENT_ID_ATTRIBUTES).unwrap_or_default(),
        date: resolve_comment_field(node, CommentField::Date),
        author: resolve_comment_field(node, CommentField::Author),
        text: resolve_comment_field(node, CommentField::Text),
        modified_date: resolve_comment_field(node, CommentField::ModifiedDate),
        modified_author: resolve_comment_field(node, CommentField::ModifiedAuthor),
        viewpoint_guid: child_element(node, "Viewpoint")
            .and_then(|viewpoint| attribute_text(viewpoint, "Guid")),
        custom_fields: scan_scope(node, Scope::Comment),
    }
}

#[cfg(test)]
mod tests {
    use super::merge_comments;
    use crate::archive::ContainerArchive;
    use crate::xml::parse_document;

    const FOLDER: &str = "0a1b2c3d-1111-4222-8333-444455556666";

    #[test]
    fn nested_text_element_is_not_a_second_comment() {
        let markup = parse_document(
            r#"<Markup><Topic Guid="t"/><Comment Guid="c1"><Date>2024</Date><Author>a</Author><Comment>text</Comment><Viewpoint Guid="v1"/></Comment></Markup>"#,
        )
        .unwrap();
        let comments = merge_comments(&ContainerArchive::default(), FOLDER, &markup).unwrap();
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].identifier, "c1");
        assert_eq!(comments[0].text, "text");
        assert_eq!(comments[0].viewpoint_guid.as_deref(), Some("v1"));
        assert!(comments[0].custom_fields.is_empty());
    }

    #[test]
    fn sibling_duplicates_are_dropped_and_new_ones_appended() {
        let markup = parse_document(
            r#"<Markup><Comment Guid="c1"><Comment>primary</Comment></Comment></Markup>"#,
        )
        .unwrap();
        let archive = ContainerArchive::from_entries(vec![(
            format!("{FOLDER}/comments.xml"),
            br#"<Comments>
                 <Comment Guid="c1"><Comment>secondary</Comment></Comment>
                 <TopicComment Id="c2"><Text>extra</Text></TopicComment>
               </Comments>"#
                .to_vec(),
        )]);

        let comments = merge_comments(&archive, FOLDER, &markup).unwrap();
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].text, "primary");
        assert_eq!(comments[1].identifier, "c2");
        assert_eq!(comments[1].text, "extra");
    }

    #[test]
    fn comment_without_identifier_gets_synthesized_one() {
        let markup =
            parse_document("<Markup><Comment><Author>x</Author></Comment></Markup>").unwrap();
        let comments = merge_comments(&ContainerArchive::default(), FOLDER, &markup).unwrap();
        assert_eq!(comments[0].identifier, format!("comment-{FOLDER}-1"));
    }

    #[test]
    fn malformed_sibling_file_is_a_topic_error() {
        let markup = parse_document("<Markup/>").unwrap();
        let archive = ContainerArchive::from_entries(vec![(
            format!("{FOLDER}/comments.bcf"),
            b"<Comments><Comment>".to_vec(),
        )]);
        assert!(merge_comments(&archive, FOLDER, &markup).is_err());
    }
}
