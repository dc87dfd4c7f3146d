//! Project document parsing.
//!
//! # Responsibility
//! - Resolve project name and identifier for both project layouts.
//! - Apply the shape fallback chain when the primary layout yields no name.
//!
//! # Invariants
//! - Never fails; an unresolvable name becomes the sentinel name.
//! - Newest-generation records are read from attributes only.

use crate::archive::{ContainerArchive, EXTENSIONS_XML_ENTRY, PROJECT_ENTRY};
use crate::model::project::{FormatVersion, Project};
use crate::parse::format::FormatDetection;
use crate::xml::{
    attribute_text, child_element, child_text, find_descendant, first_attribute, parse_document,
};
use log::{debug, warn};
use roxmltree::Node;

const LEGACY_ID_ATTRIBUTES: &[&str] = &["ProjectId", "ProjectGuid", "Id"];
const NAME_ELEMENTS: &[&str] = &["Name", "name"];
const NAME_ATTRIBUTES: &[&str] = &["Name", "name"];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct ProjectRecord {
    name: String,
    identifier: String,
}

/// Fallback shapes, tried in order when the primary name is empty.
#[derive(Debug, Clone, Copy)]
enum ProjectShape {
    ExtensionProject,
    BareProjectInfo,
    AnyProject,
}

const FALLBACK_SHAPES: &[ProjectShape] = &[
    ProjectShape::ExtensionProject,
    ProjectShape::BareProjectInfo,
    ProjectShape::AnyProject,
];

/// Builds the archive's project record.
pub fn parse_project(archive: &ContainerArchive, detection: &FormatDetection) -> Project {
    let version = detection.version;
    let has_extension_schema = detection.layout.has_extension_schema()
        || (version == FormatVersion::Bcf30 && archive.contains(EXTENSIONS_XML_ENTRY));

    let Some(text) = archive.read_optional_text(PROJECT_ENTRY) else {
        debug!("event=project_parse module=parse status=fallback reason=missing_project_document");
        return Project::new("", "", version, has_extension_schema);
    };
    let doc = match parse_document(&text) {
        Ok(doc) => doc,
        Err(err) => {
            warn!(
                "event=project_parse module=parse status=fallback reason=malformed error={}",
                err
            );
            return Project::new("", "", version, has_extension_schema);
        }
    };

    let root = doc.root_element();
    let primary = if version.uses_project_info() {
        read_project_info_attributes(root)
    } else {
        read_extension_project(root)
    };
    let mut record = primary.unwrap_or_default();

    if record.name.is_empty() {
        for shape in FALLBACK_SHAPES {
            let Some(candidate) = read_shape(root, *shape) else {
                continue;
            };
            if record.identifier.is_empty() {
                record.identifier = candidate.identifier.clone();
            }
            if !candidate.name.is_empty() {
                debug!(
                    "event=project_parse module=parse status=fallback shape={:?}",
                    shape
                );
                record.name = candidate.name;
                break;
            }
        }
    }

    Project::new(record.name, record.identifier, version, has_extension_schema)
}

/// `ProjectInfo > Project` with `Name` / `ProjectId` attributes.
fn read_project_info_attributes(root: Node<'_, '_>) -> Option<ProjectRecord> {
    let info = find_descendant(root, "ProjectInfo")?;
    let project = child_element(info, "Project")?;
    Some(ProjectRecord {
        name: attribute_text(project, "Name").unwrap_or_default(),
        identifier: attribute_text(project, "ProjectId").unwrap_or_default(),
    })
}

/// `ProjectExtension > Project`, tolerating tool-specific naming.
fn read_extension_project(root: Node<'_, '_>) -> Option<ProjectRecord> {
    let extension = find_descendant(root, "ProjectExtension")?;
    let project = child_element(extension, "Project")?;
    Some(read_tolerant_record(project))
}

fn read_shape(root: Node<'_, '_>, shape: ProjectShape) -> Option<ProjectRecord> {
    match shape {
        ProjectShape::ExtensionProject => read_extension_project(root),
        ProjectShape::BareProjectInfo => {
            let info = find_descendant(root, "ProjectInfo")?;
            let scope = child_element(info, "Project").unwrap_or(info);
            Some(read_tolerant_record(scope))
        }
        ProjectShape::AnyProject => find_descendant(root, "Project").map(read_tolerant_record),
    }
}

fn read_tolerant_record(project: Node<'_, '_>) -> ProjectRecord {
    let name = NAME_ELEMENTS
        .iter()
        .find_map(|name| child_text(project, name))
        .or_else(|| first_attribute(project, NAME_ATTRIBUTES))
        .unwrap_or_default();
    ProjectRecord {
        name,
        identifier: first_attribute(project, LEGACY_ID_ATTRIBUTES).unwrap_or_default(),
    }
}
