//! Viewpoint, camera and snapshot records.
//!
//! # Invariants
//! - A camera of type `None` carries no coordinates at all.
//! - Coordinate triples are complete or absent, never partial.
//! - Legacy position/target are derived from the camera by
//!   [`Viewpoint::set_camera`] and are not authoritative geometry.

use serde::{Deserialize, Serialize};

/// Distance along the view direction used for the legacy target point.
///
/// Presentation convenience only: the real camera has no target distance.
pub const NOMINAL_TARGET_DISTANCE: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn offset(self, direction: Vec3, distance: f64) -> Self {
        Self {
            x: self.x + direction.x * distance,
            y: self.y + direction.y * distance,
            z: self.z + direction.z * distance,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraType {
    Perspective,
    Orthogonal,
    None,
}

/// Position and orientation shared by both camera kinds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CameraPose {
    pub view_point: Option<Vec3>,
    pub direction: Option<Vec3>,
    pub up_vector: Option<Vec3>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "camera_type", rename_all = "snake_case")]
pub enum Camera {
    #[default]
    None,
    Perspective {
        pose: CameraPose,
        field_of_view: Option<f64>,
        aspect_ratio: Option<f64>,
    },
    Orthogonal {
        pose: CameraPose,
        view_to_world_scale: Option<f64>,
        aspect_ratio: Option<f64>,
    },
}

impl Camera {
    pub fn camera_type(&self) -> CameraType {
        match self {
            Self::None => CameraType::None,
            Self::Perspective { .. } => CameraType::Perspective,
            Self::Orthogonal { .. } => CameraType::Orthogonal,
        }
    }

    pub fn pose(&self) -> Option<&CameraPose> {
        match self {
            Self::None => None,
            Self::Perspective { pose, .. } | Self::Orthogonal { pose, .. } => Some(pose),
        }
    }

    pub fn view_point(&self) -> Option<Vec3> {
        self.pose().and_then(|pose| pose.view_point)
    }

    pub fn direction(&self) -> Option<Vec3> {
        self.pose().and_then(|pose| pose.direction)
    }

    pub fn up_vector(&self) -> Option<Vec3> {
        self.pose().and_then(|pose| pose.up_vector)
    }

    pub fn field_of_view(&self) -> Option<f64> {
        match self {
            Self::Perspective { field_of_view, .. } => *field_of_view,
            _ => None,
        }
    }

    pub fn view_to_world_scale(&self) -> Option<f64> {
        match self {
            Self::Orthogonal {
                view_to_world_scale,
                ..
            } => *view_to_world_scale,
            _ => None,
        }
    }
}

/// Component selection and visibility state of a viewpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewpointComponents {
    pub selected: Vec<String>,
    pub default_visibility: Option<bool>,
    pub visibility_exceptions: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClippingPlane {
    pub location: Vec3,
    pub direction: Vec3,
}

/// Raster snapshot attached to a viewpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotImage {
    pub file_name: String,
    pub mime_type: String,
    pub size: usize,
    #[serde(skip)]
    pub bytes: Vec<u8>,
}

impl SnapshotImage {
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            size: bytes.len(),
            bytes,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewpoint {
    pub identifier: String,
    /// Name of the `.bcfv` document, when declared or discovered.
    pub source_file_name: Option<String>,
    /// Snapshot file name as declared in markup.
    pub snapshot_reference: Option<String>,
    pub order_index: usize,
    pub camera: Camera,
    pub legacy_position: Option<Vec3>,
    pub legacy_target: Option<Vec3>,
    pub components: ViewpointComponents,
    pub clipping_planes: Vec<ClippingPlane>,
    pub image: Option<SnapshotImage>,
}

impl Viewpoint {
    pub fn new(identifier: impl Into<String>, order_index: usize) -> Self {
        Self {
            identifier: identifier.into(),
            source_file_name: None,
            snapshot_reference: None,
            order_index,
            camera: Camera::None,
            legacy_position: None,
            legacy_target: None,
            components: ViewpointComponents::default(),
            clipping_planes: Vec::new(),
            image: None,
        }
    }

    pub fn camera_type(&self) -> CameraType {
        self.camera.camera_type()
    }

    /// Stores the camera and re-derives the legacy position/target pair.
    pub fn set_camera(&mut self, camera: Camera) {
        self.camera = camera;
        self.legacy_position = camera.view_point();
        self.legacy_target = match (camera.view_point(), camera.direction()) {
            (Some(point), Some(direction)) => {
                Some(point.offset(direction, NOMINAL_TARGET_DISTANCE))
            }
            _ => None,
        };
    }

    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }
}
