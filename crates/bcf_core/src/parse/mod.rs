//! XML document parsers, one per container document kind.
//!
//! # Responsibility
//! - Detect the schema generation and build the project record.
//! - Extract topics with their comments and viewpoints.
//! - Read the optional extension vocabulary and documents manifest.
//!
//! # Invariants
//! - Parsers only read from a loaded `ContainerArchive`.
//! - Only topic extraction reports failures; everything else degrades to
//!   defaults with a log line.

pub mod comments;
pub mod extensions;
pub mod format;
pub mod manifest;
pub mod project;
pub mod topic;
pub mod viewpoint;
