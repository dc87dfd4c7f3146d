//! Standard field table shared by alias resolution and custom field scanning.
//!
//! # Invariants
//! - Every alias listed here is also a standard name, so an aliased value is
//!   never reported a second time as a custom field.
//! - Alias order is priority order.

use once_cell::sync::Lazy;
use std::collections::BTreeSet;

/// Record kind a field belongs to; also the prefix of custom field keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    Topic,
    Comment,
}

impl Scope {
    pub fn key_prefix(self) -> &'static str {
        match self {
            Self::Topic => "topic",
            Self::Comment => "comment",
        }
    }
}

/// Ordered alias names for one logical field.
#[derive(Debug, Clone, Copy)]
pub struct AliasSet {
    pub names: &'static [&'static str],
    /// Try every name as an attribute before trying child elements.
    pub attribute_first: bool,
}

impl AliasSet {
    const fn elements(names: &'static [&'static str]) -> Self {
        Self {
            names,
            attribute_first: false,
        }
    }

    const fn attributes_then_elements(names: &'static [&'static str]) -> Self {
        Self {
            names,
            attribute_first: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopicField {
    Title,
    Status,
    Type,
    Priority,
    Description,
    Stage,
    Index,
    CreationDate,
    CreationAuthor,
    ModifiedDate,
    ModifiedAuthor,
    DueDate,
    AssignedTo,
    ServerAssignedId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentField {
    Date,
    Author,
    Text,
    ModifiedDate,
    ModifiedAuthor,
}

pub fn topic_aliases(field: TopicField) -> AliasSet {
    match field {
        TopicField::Title => AliasSet::elements(&["Title", "Subject", "Name"]),
        TopicField::Status => {
            AliasSet::attributes_then_elements(&["TopicStatus", "Status", "State"])
        }
        TopicField::Type => AliasSet::attributes_then_elements(&["TopicType", "Type", "Category"]),
        TopicField::Priority => AliasSet::elements(&["Priority", "Severity"]),
        TopicField::Description => AliasSet::elements(&["Description", "Details"]),
        TopicField::Stage => AliasSet::elements(&["Stage", "Phase"]),
        TopicField::Index => AliasSet::elements(&["Index"]),
        TopicField::CreationDate => AliasSet::elements(&["CreationDate", "CreatedDate"]),
        TopicField::CreationAuthor => {
            AliasSet::elements(&["CreationAuthor", "CreatedBy", "Author"])
        }
        TopicField::ModifiedDate => AliasSet::elements(&["ModifiedDate", "ModificationDate"]),
        TopicField::ModifiedAuthor => {
            AliasSet::elements(&["ModifiedAuthor", "ModifiedBy", "ModificationAuthor"])
        }
        TopicField::DueDate => AliasSet::elements(&["DueDate", "Deadline"]),
        TopicField::AssignedTo => AliasSet::elements(&["AssignedTo", "Assignee", "AssignedUser"]),
        TopicField::ServerAssignedId => AliasSet::attributes_then_elements(&["ServerAssignedId"]),
    }
}

pub fn comment_aliases(field: CommentField) -> AliasSet {
    match field {
        CommentField::Date => AliasSet::elements(&["Date", "CreationDate", "CreatedDate"]),
        CommentField::Author => AliasSet::elements(&["Author", "CreationAuthor", "CreatedBy"]),
        CommentField::Text => AliasSet::elements(&["Comment", "Text", "Body", "Content"]),
        CommentField::ModifiedDate => AliasSet::elements(&["ModifiedDate", "ModificationDate"]),
        CommentField::ModifiedAuthor => {
            AliasSet::elements(&["ModifiedAuthor", "ModifiedBy", "ModificationAuthor"])
        }
    }
}

const TOPIC_FIELDS: &[TopicField] = &[
    TopicField::Title,
    TopicField::Status,
    TopicField::Type,
    TopicField::Priority,
    TopicField::Description,
    TopicField::Stage,
    TopicField::Index,
    TopicField::CreationDate,
    TopicField::CreationAuthor,
    TopicField::ModifiedDate,
    TopicField::ModifiedAuthor,
    TopicField::DueDate,
    TopicField::AssignedTo,
    TopicField::ServerAssignedId,
];

const COMMENT_FIELDS: &[CommentField] = &[
    CommentField::Date,
    CommentField::Author,
    CommentField::Text,
    CommentField::ModifiedDate,
    CommentField::ModifiedAuthor,
];

/// Structural elements read by dedicated extractors rather than aliases.
const STRUCTURAL_ELEMENTS: &[&str] = &[
    "Header",
    "ReferenceLink",
    "ReferenceLinks",
    "Labels",
    "Label",
    "BimSnippet",
    "DocumentReference",
    "DocumentReferences",
    "RelatedTopic",
    "RelatedTopics",
    "Comments",
    "Comment",
    "TopicComment",
    "MarkupComment",
    "Viewpoints",
    "ViewPoint",
    "Viewpoint",
    "Topic",
];

const TOPIC_ATTRIBUTES: &[&str] = &["Guid", "Id"];
const COMMENT_ATTRIBUTES: &[&str] = &["Guid", "Id"];

static STANDARD_ELEMENTS: Lazy<BTreeSet<&'static str>> = Lazy::new(|| {
    let mut names: BTreeSet<&'static str> = STRUCTURAL_ELEMENTS.iter().copied().collect();
    for field in TOPIC_FIELDS {
        names.extend(topic_aliases(*field).names.iter().copied());
    }
    for field in COMMENT_FIELDS {
        names.extend(comment_aliases(*field).names.iter().copied());
    }
    names
});

static STANDARD_TOPIC_ATTRIBUTES: Lazy<BTreeSet<&'static str>> = Lazy::new(|| {
    let mut names: BTreeSet<&'static str> = TOPIC_ATTRIBUTES.iter().copied().collect();
    for field in TOPIC_FIELDS {
        let aliases = topic_aliases(*field);
        if aliases.attribute_first {
            names.extend(aliases.names.iter().copied());
        }
    }
    names
});

static STANDARD_COMMENT_ATTRIBUTES: Lazy<BTreeSet<&'static str>> =
    Lazy::new(|| COMMENT_ATTRIBUTES.iter().copied().collect());

/// Whether `name` is a known topic or comment element.
///
/// The element allow-list is the union over both scopes; comments embedded in
/// a topic and topics referenced from a comment share one vocabulary.
pub fn is_standard_element(name: &str) -> bool {
    STANDARD_ELEMENTS.contains(name)
}

pub fn is_standard_attribute(scope: Scope, name: &str) -> bool {
    match scope {
        Scope::Topic => STANDARD_TOPIC_ATTRIBUTES.contains(name),
        Scope::Comment => STANDARD_COMMENT_ATTRIBUTES.contains(name),
    }
}
