//! Camera Module
//!
//! Perspective camera, viewport bookkeeping and pointer raycasting.
//! This module is window-system agnostic - it only deals with camera state and math.

pub mod raycast;
pub mod viewport;

pub use raycast::{Ray, ray_plane_intersect, raycast_to_plane};
pub use viewport::Viewport;

use glam::{Mat4, Vec2, Vec3};

use crate::config::CameraConfig;

/// Perspective look-at camera.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    /// Eye position in world space.
    pub position: Vec3,
    /// Point the camera looks at.
    pub target: Vec3,
    /// World up direction.
    pub up: Vec3,
    /// Vertical field of view (radians).
    pub fov_y: f32,
    /// Width / height of the viewport.
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::from_config(&CameraConfig::default(), 16.0 / 9.0)
    }
}

impl Camera {
    /// Build a camera from its configuration and the viewport aspect ratio.
    pub fn from_config(config: &CameraConfig, aspect: f32) -> Self {
        Self {
            position: config.position,
            target: config.target,
            up: Vec3::Y,
            fov_y: config.fov_y_degrees.to_radians(),
            aspect: if aspect.is_finite() && aspect > 0.0 { aspect } else { 1.0 },
            near: config.near,
            far: config.far,
        }
    }

    /// Update the aspect ratio after a resize. Degenerate ratios are ignored.
    pub fn set_aspect(&mut self, aspect: f32) {
        if aspect.is_finite() && aspect > 0.0 {
            self.aspect = aspect;
        }
    }

    /// Right-handed view matrix.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    /// Right-handed perspective projection with a 0..1 depth range (wgpu convention).
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }

    /// Combined projection * view.
    pub fn view_proj(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Unit vector from the eye towards the target.
    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize_or_zero()
    }

    /// Unproject a normalized-device coordinate (x right, y up, both in -1..1)
    /// into a world-space ray starting at the eye.
    pub fn ray_from_ndc(&self, ndc: Vec2) -> Ray {
        let inverse = self.view_proj().inverse();
        let far_point = inverse.project_point3(Vec3::new(ndc.x, ndc.y, 1.0));
        Ray::new(self.position, far_point - self.position)
    }

    /// Unproject a pixel coordinate (origin top-left) through the viewport.
    pub fn ray_from_pixel(&self, viewport: &Viewport, x: f32, y: f32) -> Ray {
        self.ray_from_ndc(viewport.pixel_to_ndc(x, y))
    }
}
