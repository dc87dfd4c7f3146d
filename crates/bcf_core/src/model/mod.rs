//! Normalized domain model produced by a parse.
//!
//! # Responsibility
//! - Define plain, immutable records for projects, topics, comments and
//!   viewpoints.
//! - Keep every value needed downstream in a named field; no record holds a
//!   handle into parsed XML.
//!
//! # Invariants
//! - Records are created during one parse pass and not mutated afterwards,
//!   except snapshot attachment on `Viewpoint::image`.

pub mod document;
pub mod project;
pub mod topic;
pub mod viewpoint;
