//! Scene camera
//!
//! Look-at perspective camera used to project anchors into normalized device
//! coordinates for pointer selection. The host renders with the same
//! matrices.

use glam::{Mat4, Vec2, Vec3};

use crate::config::CameraConfig;

/// Perspective camera looking at a fixed target
#[derive(Debug, Clone)]
pub struct SceneCamera {
    /// Camera position
    eye: Vec3,
    /// Point the camera looks at
    target: Vec3,
    /// Aspect ratio (width/height) for projection
    aspect: f32,
    /// Vertical field of view in radians
    fov: f32,
    /// Near clipping plane
    near: f32,
    /// Far clipping plane
    far: f32,
}

impl SceneCamera {
    pub fn new(config: &CameraConfig) -> Self {
        Self {
            eye: Vec3::from_array(config.eye),
            target: Vec3::from_array(config.target),
            aspect: config.aspect,
            fov: config.fov_degrees.to_radians(),
            near: config.near,
            far: config.far,
        }
    }

    /// Get the view matrix
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, Vec3::Y)
    }

    /// Get the projection matrix
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
    }

    /// Get combined view-projection matrix
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Project a world point to normalized device coordinates.
    ///
    /// Returns `None` for points at or behind the camera plane.
    pub fn project_to_ndc(&self, point: Vec3) -> Option<Vec2> {
        let clip = self.view_projection_matrix() * point.extend(1.0);
        if clip.w <= f32::EPSILON {
            return None;
        }
        Some(Vec2::new(clip.x / clip.w, clip.y / clip.w))
    }

    pub fn eye_position(&self) -> Vec3 {
        self.eye
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    /// Update aspect ratio on resize
    pub fn set_aspect(&mut self, aspect: f32) {
        if aspect.is_finite() && aspect > 0.0 {
            self.aspect = aspect;
        }
    }
}

impl Default for SceneCamera {
    fn default() -> Self {
        Self::new(&CameraConfig::default())
    }
}
