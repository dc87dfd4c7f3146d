//! Viewpoint discovery and camera extraction.
//!
//! # Responsibility
//! - Collect viewpoint references declared in topic markup.
//! - Discover `.bcfv` documents in the topic folder and bind them to
//!   declared viewpoints, creating undeclared ones as needed.
//! - Extract camera geometry, components and clipping planes.
//!
//! # Invariants
//! - A coordinate triple is set only when X, Y and Z all parse.
//! - A viewpoint without a camera element has `Camera::None`.
//! - Legacy position/target are derived through `Viewpoint::set_camera`.

use crate::archive::{file_name, is_topic_folder_name, ContainerArchive, VIEWPOINT_SUFFIX};
use crate::error::{TopicError, TopicResult};
use crate::model::viewpoint::{
    Camera, CameraPose, ClippingPlane, Vec3, Viewpoint, ViewpointComponents,
};
use crate::xml::{
    attribute_text, child_element, child_elements, child_text, find_descendant, first_attribute,
    has_name, parse_bool, parse_document, parse_f64,
};
use log::{debug, info};
use roxmltree::{Document, Node};

/// Identifier given to a folder's generic `viewpoint.bcfv`.
pub const DEFAULT_VIEWPOINT_ID: &str = "viewpoint";

const VIEWPOINT_ID_ATTRIBUTES: &[&str] = &["Guid", "Id", "ViewpointGuid"];
const VIEWPOINT_FILE_PREFIX: &str = "Viewpoint_";

/// Extracts every viewpoint of one topic.
pub fn extract_viewpoints(
    archive: &ContainerArchive,
    folder: &str,
    markup: &Document<'_>,
) -> TopicResult<Vec<Viewpoint>> {
    let mut viewpoints = declared_viewpoints(folder, markup);
    let declared_count = viewpoints.len();
    let mut bound = vec![false; viewpoints.len()];

    let mut files: Vec<&str> = archive
        .folder_entries(folder)
        .into_iter()
        .filter(|path| has_viewpoint_suffix(path))
        .collect();
    files.sort_unstable();

    for path in files {
        let name = file_name(path);
        let candidate = candidate_identifier(name);

        let slot = viewpoints
            .iter()
            .enumerate()
            .position(|(index, viewpoint)| {
                !bound.get(index).copied().unwrap_or(false)
                    && viewpoint
                        .source_file_name
                        .as_deref()
                        .is_some_and(|declared| file_name(declared).eq_ignore_ascii_case(name))
            })
            .or_else(|| {
                viewpoints.iter().enumerate().position(|(index, viewpoint)| {
                    !bound.get(index).copied().unwrap_or(false)
                        && viewpoint.identifier.eq_ignore_ascii_case(&candidate)
                })
            });

        let index = match slot {
            Some(index) => index,
            None => {
                debug!(
                    "event=viewpoint_extract module=parse status=discovered topic={} file={} id={}",
                    folder, name, candidate
                );
                let order = viewpoints.len();
                viewpoints.push(Viewpoint::new(candidate, order));
                bound.push(false);
                order
            }
        };
        bound[index] = true;

        let text = archive.read_text(path)?;
        let doc = parse_document(&text).map_err(|message| TopicError::MalformedDocument {
            path: path.to_string(),
            message,
        })?;

        let viewpoint = &mut viewpoints[index];
        if viewpoint.source_file_name.is_none() {
            viewpoint.source_file_name = Some(name.to_string());
        }
        apply_visualization(viewpoint, &doc);
    }

    if viewpoints.len() > declared_count {
        info!(
            "event=viewpoint_extract module=parse status=ok topic={} declared={} discovered={}",
            folder,
            declared_count,
            viewpoints.len() - declared_count
        );
    }
    Ok(viewpoints)
}

/// Structural pass over the markup's viewpoint references.
fn declared_viewpoints(folder: &str, markup: &Document<'_>) -> Vec<Viewpoint> {
    let mut viewpoints = Vec::new();
    for node in markup
        .descendants()
        .filter(|node| is_viewpoint_reference(*node))
    {
        let ordinal = viewpoints.len();
        let file = child_text(node, "Viewpoint");
        let identifier = first_attribute(node, VIEWPOINT_ID_ATTRIBUTES)
            .or_else(|| file.as_deref().map(file_stem).filter(|stem| !stem.is_empty()))
            .unwrap_or_else(|| {
                let synthesized = format!("viewpoint-{folder}-{}", ordinal + 1);
                debug!(
                    "event=viewpoint_extract module=parse status=fallback topic={} synthesized_id={}",
                    folder, synthesized
                );
                synthesized
            });

        let order_index = child_text(node, "Index")
            .and_then(|value| value.parse::<usize>().ok())
            .unwrap_or(ordinal);
        let mut viewpoint = Viewpoint::new(identifier, order_index);
        viewpoint.source_file_name = file;
        viewpoint.snapshot_reference = child_text(node, "Snapshot");
        viewpoints.push(viewpoint);
    }
    viewpoints
}

/// `ViewPoint` records, or legacy `Viewpoints` records that carry content.
fn is_viewpoint_reference(node: Node<'_, '_>) -> bool {
    if has_name(node, "ViewPoint") {
        return true;
    }
    has_name(node, "Viewpoints")
        && (first_attribute(node, VIEWPOINT_ID_ATTRIBUTES).is_some()
            || child_element(node, "Viewpoint").is_some()
            || child_element(node, "Snapshot").is_some())
}

fn has_viewpoint_suffix(path: &str) -> bool {
    path.to_ascii_lowercase().ends_with(VIEWPOINT_SUFFIX)
}

/// File name without leading path and without the `.bcfv` suffix.
fn file_stem(path: &str) -> String {
    let name = file_name(path);
    if has_viewpoint_suffix(name) {
        name[..name.len() - VIEWPOINT_SUFFIX.len()].to_string()
    } else {
        name.to_string()
    }
}

/// Maps a `.bcfv` file name to the identifier of the viewpoint it holds.
pub fn candidate_identifier(file: &str) -> String {
    let stem = file_stem(file);
    if let Some(rest) = stem.strip_prefix(VIEWPOINT_FILE_PREFIX) {
        if is_topic_folder_name(rest) {
            return rest.to_string();
        }
    }
    if is_topic_folder_name(&stem) {
        return stem;
    }
    if stem.eq_ignore_ascii_case(DEFAULT_VIEWPOINT_ID) {
        return DEFAULT_VIEWPOINT_ID.to_string();
    }
    stem
}

fn apply_visualization(viewpoint: &mut Viewpoint, doc: &Document<'_>) {
    let root = doc.root_element();
    viewpoint.set_camera(read_camera(root));
    viewpoint.components = read_components(root);
    viewpoint.clipping_planes = read_clipping_planes(root);
}

fn read_camera(root: Node<'_, '_>) -> Camera {
    if let Some(camera) = find_descendant(root, "PerspectiveCamera") {
        return Camera::Perspective {
            pose: read_pose(camera),
            field_of_view: child_text(camera, "FieldOfView").and_then(|v| parse_f64(&v)),
            aspect_ratio: child_text(camera, "AspectRatio").and_then(|v| parse_f64(&v)),
        };
    }
    if let Some(camera) = find_descendant(root, "OrthogonalCamera") {
        return Camera::Orthogonal {
            pose: read_pose(camera),
            view_to_world_scale: child_text(camera, "ViewToWorldScale")
                .and_then(|v| parse_f64(&v)),
            aspect_ratio: child_text(camera, "AspectRatio").and_then(|v| parse_f64(&v)),
        };
    }
    Camera::None
}

fn read_pose(camera: Node<'_, '_>) -> CameraPose {
    CameraPose {
        view_point: read_triple(camera, "CameraViewPoint"),
        direction: read_triple(camera, "CameraDirection"),
        up_vector: read_triple(camera, "CameraUpVector"),
    }
}

/// All-or-nothing X/Y/Z triple under `name`.
fn read_triple(parent: Node<'_, '_>, name: &str) -> Option<Vec3> {
    let node = child_element(parent, name)?;
    let axis = |axis: &str| child_text(node, axis).and_then(|value| parse_f64(&value));
    Some(Vec3::new(axis("X")?, axis("Y")?, axis("Z")?))
}

fn read_components(root: Node<'_, '_>) -> ViewpointComponents {
    let mut components = ViewpointComponents::default();
    let Some(container) = find_descendant(root, "Components") else {
        return components;
    };

    if let Some(selection) = child_element(container, "Selection") {
        components.selected = component_guids(selection);
    }
    if let Some(visibility) = child_element(container, "Visibility") {
        components.default_visibility =
            attribute_text(visibility, "DefaultVisibility").and_then(|v| parse_bool(&v));
        if let Some(exceptions) = child_element(visibility, "Exceptions") {
            components.visibility_exceptions = component_guids(exceptions);
        }
    }

    // Oldest layout: flags on each component directly under `Components`.
    for component in child_elements(container, "Component") {
        let Some(guid) = attribute_text(component, "IfcGuid") else {
            continue;
        };
        if attribute_text(component, "Selected").and_then(|v| parse_bool(&v)) == Some(true) {
            components.selected.push(guid.clone());
        }
        if attribute_text(component, "Visible").and_then(|v| parse_bool(&v)) == Some(false) {
            components.default_visibility.get_or_insert(true);
            components.visibility_exceptions.push(guid);
        }
    }

    components
}

fn component_guids(container: Node<'_, '_>) -> Vec<String> {
    child_elements(container, "Component")
        .filter_map(|component| attribute_text(component, "IfcGuid"))
        .collect()
}

fn read_clipping_planes(root: Node<'_, '_>) -> Vec<ClippingPlane> {
    let Some(container) = find_descendant(root, "ClippingPlanes") else {
        return Vec::new();
    };
    child_elements(container, "ClippingPlane")
        .filter_map(|plane| {
            Some(ClippingPlane {
                location: read_triple(plane, "Location")?,
                direction: read_triple(plane, "Direction")?,
            })
        })
        .collect()
}
