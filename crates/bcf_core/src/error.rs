//! Public and per-topic error types.
//!
//! # Responsibility
//! - Define the single fatal error surfaced by `parse`.
//! - Define the per-topic failure that isolation catches and logs.
//!
//! # Invariants
//! - Only `ParseError` crosses the public `parse` boundary.
//! - `TopicError` never aborts a whole-archive parse.

use crate::archive::ArchiveError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ParseResult<T> = Result<T, ParseError>;

/// Fatal, parse-aborting failure.
#[derive(Debug)]
pub enum ParseError {
    /// Input bytes are not a readable zip container.
    InvalidContainer(ArchiveError),
    /// The mandatory `bcf.version` entry is absent.
    MissingVersionDescriptor,
}

impl ParseError {
    /// Stable machine-readable code used in log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidContainer(_) => "invalid_container",
            Self::MissingVersionDescriptor => "missing_version_descriptor",
        }
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidContainer(err) => write!(f, "not a valid BCF container: {err}"),
            Self::MissingVersionDescriptor => {
                write!(f, "not a valid BCF container: missing `bcf.version` entry")
            }
        }
    }
}

impl Error for ParseError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidContainer(err) => Some(err),
            Self::MissingVersionDescriptor => None,
        }
    }
}

impl From<ArchiveError> for ParseError {
    fn from(value: ArchiveError) -> Self {
        Self::InvalidContainer(value)
    }
}

pub(crate) type TopicResult<T> = Result<T, TopicError>;

/// Failure while extracting one topic folder.
#[derive(Debug)]
pub enum TopicError {
    /// The topic folder has no markup document.
    MissingMarkup(String),
    /// One of the topic's documents is not well-formed XML.
    MalformedDocument { path: String, message: String },
    /// The markup document has no `Topic` element.
    MissingTopicElement(String),
    Archive(ArchiveError),
}

impl Display for TopicError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingMarkup(folder) => write!(f, "topic folder `{folder}` has no markup"),
            Self::MalformedDocument { path, message } => {
                write!(f, "malformed document `{path}`: {message}")
            }
            Self::MissingTopicElement(path) => write!(f, "no Topic element in `{path}`"),
            Self::Archive(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TopicError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Archive(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ArchiveError> for TopicError {
    fn from(value: ArchiveError) -> Self {
        Self::Archive(value)
    }
}
