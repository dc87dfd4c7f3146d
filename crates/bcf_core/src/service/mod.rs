//! Use-case services on top of the parsers.
//!
//! # Responsibility
//! - Orchestrate container loading and document parsers into `parse`.
//! - Own the deferred snapshot-matching capability.

pub mod image_service;
pub mod parse_service;
