//! Schema generation detection.
//!
//! # Responsibility
//! - Interpret the declared version from `bcf.version`.
//! - Confirm or override it with structural evidence.
//!
//! # Invariants
//! - Detection never fails; every input resolves to a `FormatVersion`.
//! - A declared newest-generation version is only trusted after structural
//!   confirmation; otherwise it is demoted to `Bcf21` with a warning.
//! - Inconclusive input defaults to `Bcf21`.

use crate::archive::{
    ContainerArchive, DOCUMENTS_ENTRY, EXTENSIONS_XML_ENTRY, EXTENSIONS_XSD_ENTRY, MARKUP_FILE,
    PROJECT_ENTRY,
};
use crate::model::project::FormatVersion;
use crate::xml::{attribute_text, element_text, find_descendant, has_name, parse_document};
use log::{debug, info, warn};

/// Version identifier as declared by the version descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclaredVersion {
    /// Major component 3.
    Modern(String),
    /// Major component 1 or 2.
    Legacy(String),
    /// Missing, unparseable or unknown major component.
    Unrecognized(Option<String>),
}

impl DeclaredVersion {
    /// Classifies a raw version identifier such as `2.1` or `3.0`.
    pub fn classify(raw: Option<&str>) -> Self {
        let Some(raw) = raw.map(str::trim).filter(|value| !value.is_empty()) else {
            return Self::Unrecognized(None);
        };
        let major = raw
            .trim_start_matches(['v', 'V'])
            .split(['.', ' '])
            .next()
            .and_then(|part| part.parse::<u32>().ok());
        match major {
            Some(3) => Self::Modern(raw.to_string()),
            Some(1) | Some(2) => Self::Legacy(raw.to_string()),
            _ => Self::Unrecognized(Some(raw.to_string())),
        }
    }

    pub fn raw(&self) -> Option<&str> {
        match self {
            Self::Modern(raw) | Self::Legacy(raw) => Some(raw.as_str()),
            Self::Unrecognized(raw) => raw.as_deref(),
        }
    }
}

/// Shape of the project document's top-level layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectLayout {
    Missing,
    Unreadable,
    /// `ProjectInfo` only.
    Info,
    /// `ProjectExtension` only.
    Extension { has_extension_schema: bool },
    /// Both containers present.
    Ambiguous { has_extension_schema: bool },
    /// Neither container present.
    Unstructured,
}

impl ProjectLayout {
    pub fn has_extension_schema(self) -> bool {
        match self {
            Self::Extension {
                has_extension_schema,
            }
            | Self::Ambiguous {
                has_extension_schema,
            } => has_extension_schema,
            _ => false,
        }
    }
}

/// Evidence that decided the detected version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectionBasis {
    DocumentsManifest,
    ProjectInfoLayout,
    ProjectExtensionLayout,
    TopicMarkupMarkers,
    DeclaredVersion,
    ExtensionsFile,
    Default,
}

/// Outcome of newest-generation structural confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ModernEvidence {
    Confirmed(DetectionBasis),
    Refuted(DetectionBasis),
    Inconclusive,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatDetection {
    pub version: FormatVersion,
    pub declared: DeclaredVersion,
    pub layout: ProjectLayout,
    pub basis: DetectionBasis,
    /// Declared version disagreed with structure and was overridden.
    pub demoted: bool,
}

/// Reads the declared version identifier from descriptor text.
///
/// Tries the `VersionId` attribute of the root, then `DetailedVersion` text.
pub fn read_declared_version(descriptor: &str) -> DeclaredVersion {
    let doc = match parse_document(descriptor) {
        Ok(doc) => doc,
        Err(err) => {
            warn!(
                "event=format_detect module=parse status=fallback reason=descriptor_unreadable error={}",
                err
            );
            return DeclaredVersion::Unrecognized(None);
        }
    };
    let root = doc.root_element();
    let raw = attribute_text(root, "VersionId")
        .or_else(|| find_descendant(root, "DetailedVersion").and_then(element_text));
    DeclaredVersion::classify(raw.as_deref())
}

/// Inspects the project document layout.
pub fn inspect_project_layout(archive: &ContainerArchive) -> ProjectLayout {
    let Some(text) = archive.read_optional_text(PROJECT_ENTRY) else {
        return ProjectLayout::Missing;
    };
    let Ok(doc) = parse_document(&text) else {
        return ProjectLayout::Unreadable;
    };
    let root = doc.root_element();
    let info = find_descendant(root, "ProjectInfo");
    let extension = find_descendant(root, "ProjectExtension");
    let has_extension_schema =
        extension.is_some_and(|node| find_descendant(node, "ExtensionSchema").is_some());

    match (info.is_some(), extension.is_some()) {
        (true, false) => ProjectLayout::Info,
        (false, true) => ProjectLayout::Extension {
            has_extension_schema,
        },
        (true, true) => ProjectLayout::Ambiguous {
            has_extension_schema,
        },
        (false, false) => ProjectLayout::Unstructured,
    }
}

/// Resolves the schema generation of `archive`.
pub fn detect_format(archive: &ContainerArchive, declared: DeclaredVersion) -> FormatDetection {
    let layout = inspect_project_layout(archive);

    let (version, basis, demoted) = match &declared {
        DeclaredVersion::Modern(raw) => match modern_evidence(archive, layout) {
            ModernEvidence::Confirmed(basis) => (FormatVersion::Bcf30, basis, false),
            ModernEvidence::Refuted(basis) => {
                warn!(
                    "event=format_detect module=parse status=demoted declared={} resolved={} basis={:?}",
                    raw,
                    FormatVersion::Bcf21.label(),
                    basis
                );
                (FormatVersion::Bcf21, basis, true)
            }
            ModernEvidence::Inconclusive => {
                warn!(
                    "event=format_detect module=parse status=demoted declared={} resolved={} basis=unconfirmed",
                    raw,
                    FormatVersion::Bcf21.label()
                );
                (FormatVersion::Bcf21, DetectionBasis::Default, true)
            }
        },
        DeclaredVersion::Legacy(_) => {
            if layout.has_extension_schema() {
                (FormatVersion::Bcf21, DetectionBasis::DeclaredVersion, false)
            } else {
                (FormatVersion::Bcf20, DetectionBasis::DeclaredVersion, false)
            }
        }
        DeclaredVersion::Unrecognized(raw) => {
            debug!(
                "event=format_detect module=parse status=structural declared={}",
                raw.as_deref().unwrap_or("none")
            );
            let (version, basis) = structural_version(archive, layout);
            (version, basis, false)
        }
    };

    info!(
        "event=format_detect module=parse status=ok declared={} resolved={} basis={:?}",
        declared.raw().unwrap_or("none"),
        version.label(),
        basis
    );

    FormatDetection {
        version,
        declared,
        layout,
        basis,
        demoted,
    }
}

fn modern_evidence(archive: &ContainerArchive, layout: ProjectLayout) -> ModernEvidence {
    if archive.contains(DOCUMENTS_ENTRY) {
        return ModernEvidence::Confirmed(DetectionBasis::DocumentsManifest);
    }
    match layout {
        ProjectLayout::Info => return ModernEvidence::Confirmed(DetectionBasis::ProjectInfoLayout),
        ProjectLayout::Extension { .. } => {
            return ModernEvidence::Refuted(DetectionBasis::ProjectExtensionLayout)
        }
        ProjectLayout::Missing
        | ProjectLayout::Unreadable
        | ProjectLayout::Ambiguous { .. }
        | ProjectLayout::Unstructured => {}
    }
    if sample_topic_has_modern_markers(archive) {
        ModernEvidence::Confirmed(DetectionBasis::TopicMarkupMarkers)
    } else {
        ModernEvidence::Inconclusive
    }
}

fn structural_version(
    archive: &ContainerArchive,
    layout: ProjectLayout,
) -> (FormatVersion, DetectionBasis) {
    if let ModernEvidence::Confirmed(basis) = modern_evidence(archive, layout) {
        return (FormatVersion::Bcf30, basis);
    }
    match layout {
        ProjectLayout::Extension {
            has_extension_schema: true,
        }
        | ProjectLayout::Ambiguous {
            has_extension_schema: true,
        } => return (FormatVersion::Bcf21, DetectionBasis::ProjectExtensionLayout),
        ProjectLayout::Extension {
            has_extension_schema: false,
        }
        | ProjectLayout::Ambiguous {
            has_extension_schema: false,
        } => return (FormatVersion::Bcf20, DetectionBasis::ProjectExtensionLayout),
        ProjectLayout::Missing
        | ProjectLayout::Unreadable
        | ProjectLayout::Info
        | ProjectLayout::Unstructured => {}
    }
    if archive.contains(EXTENSIONS_XML_ENTRY) || archive.contains(EXTENSIONS_XSD_ENTRY) {
        return (FormatVersion::Bcf21, DetectionBasis::ExtensionsFile);
    }
    (FormatVersion::Bcf21, DetectionBasis::Default)
}

/// Samples the first readable topic markup for newest-generation markers.
fn sample_topic_has_modern_markers(archive: &ContainerArchive) -> bool {
    for folder in archive.topic_folders() {
        let path = format!("{folder}/{MARKUP_FILE}");
        let Some(text) = archive.read_optional_text(&path) else {
            continue;
        };
        let Ok(doc) = parse_document(&text) else {
            continue;
        };
        let root = doc.root_element();
        let server_id = find_descendant(root, "Topic")
            .is_some_and(|topic| attribute_text(topic, "ServerAssignedId").is_some());
        let reference_links = root
            .descendants()
            .filter(|node| has_name(*node, "ReferenceLink"))
            .count();
        return server_id || reference_links > 1;
    }
    false
}
