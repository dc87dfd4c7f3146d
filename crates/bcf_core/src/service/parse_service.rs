//! Archive parse use-case.
//!
//! # Responsibility
//! - Run the full pipeline from container bytes to a `BcfDocument`.
//! - Isolate per-topic failures so one bad folder never fails the parse.
//!
//! # Invariants
//! - Only a missing version descriptor or unreadable container is fatal.
//! - Topics appear in ascending folder-name order.
//! - Snapshot images are attached only when requested.

use crate::archive::{ContainerArchive, DEFAULT_MAX_ENTRY_BYTES, VERSION_ENTRY};
use crate::error::{ParseError, ParseResult};
use crate::model::document::{BcfDocument, CustomFieldRegistry};
use crate::parse::extensions::parse_extensions;
use crate::parse::format::{detect_format, read_declared_version};
use crate::parse::manifest::parse_manifest;
use crate::parse::project::parse_project;
use crate::parse::topic::extract_topic;
use crate::service::image_service::SnapshotSource;
use log::{error, info, warn};
use std::sync::Arc;
use std::time::Instant;

/// Knobs for one parse call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Attach snapshot images before returning.
    pub eager_images: bool,
    /// Entries larger than this are skipped while loading the container.
    pub max_entry_bytes: u64,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            eager_images: false,
            max_entry_bytes: DEFAULT_MAX_ENTRY_BYTES,
        }
    }
}

/// Parses a container with default options.
pub fn parse(bytes: &[u8], filename: &str) -> ParseResult<BcfDocument> {
    parse_with_options(bytes, filename, &ParseOptions::default())
}

pub fn parse_with_options(
    bytes: &[u8],
    filename: &str,
    options: &ParseOptions,
) -> ParseResult<BcfDocument> {
    let started_at = Instant::now();

    let archive = ContainerArchive::open(bytes, options.max_entry_bytes)
        .map_err(|err| log_fatal(filename, ParseError::from(err)))?;

    let Some(descriptor) = archive.read_optional_text(VERSION_ENTRY) else {
        return Err(log_fatal(filename, ParseError::MissingVersionDescriptor));
    };

    let detection = detect_format(&archive, read_declared_version(&descriptor));
    let version = detection.version;
    let project = parse_project(&archive, &detection);
    let extensions = parse_extensions(&archive);
    let documents = parse_manifest(&archive);

    let folders = archive.topic_folders();
    let mut topics = Vec::with_capacity(folders.len());
    let mut skipped = 0usize;
    for folder in &folders {
        match extract_topic(&archive, folder, version) {
            Ok(topic) => topics.push(topic),
            Err(err) => {
                skipped += 1;
                warn!(
                    "event=topic_extract module=service status=skipped topic={} error={}",
                    folder, err
                );
            }
        }
    }

    let custom_field_registry = CustomFieldRegistry::from_topics(&topics);
    let mut document = BcfDocument {
        filename: filename.to_string(),
        project,
        topics,
        custom_field_registry,
        extensions,
        documents,
        snapshots: SnapshotSource::new(Arc::new(archive)),
    };

    if options.eager_images {
        document.extract_images();
    }

    info!(
        "event=parse module=service status=ok file={} version={} topics={} skipped={} custom_keys={} duration_ms={}",
        filename,
        version.label(),
        document.topics.len(),
        skipped,
        document.custom_field_registry.fields.len(),
        started_at.elapsed().as_millis()
    );
    Ok(document)
}

fn log_fatal(filename: &str, err: ParseError) -> ParseError {
    error!(
        "event=parse module=service status=error file={} reason={} error={}",
        filename,
        err.code(),
        err
    );
    err
}
