//! Extraction and normalization core for BCF issue containers.
//!
//! `parse` turns the bytes of a `.bcf`/`.bcfzip` container into one
//! [`BcfDocument`], whatever schema generation or authoring-tool dialect
//! produced it. Snapshot images are attached later through
//! [`BcfDocument::extract_images`].

pub mod archive;
pub mod error;
pub mod logging;
pub mod model;
pub mod parse;
pub mod service;
pub mod xml;

pub use archive::{ArchiveError, ContainerArchive};
pub use error::{ParseError, ParseResult, TopicError};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::document::{BcfDocument, CustomFieldRegistry, ExtensionsDefinition, ManifestDocument};
pub use model::project::{FormatVersion, Project, UNKNOWN_PROJECT_NAME};
pub use model::topic::{BimSnippet, Comment, CustomFieldMap, DocumentReference, HeaderFile, Topic};
pub use model::viewpoint::{
    Camera, CameraPose, CameraType, ClippingPlane, SnapshotImage, Vec3, Viewpoint,
    ViewpointComponents,
};
pub use service::image_service::SnapshotSource;
pub use service::parse_service::{parse, parse_with_options, ParseOptions};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
