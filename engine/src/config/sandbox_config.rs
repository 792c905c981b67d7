//! Sandbox Configuration
//!
//! World, spawn, camera and window parameters for the free-form sandbox.
//! `Default` reproduces the values the sandbox page shipped with.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Dynamics-world parameters.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WorldConfig {
    /// Downward gravitational acceleration (m/s²).
    pub gravity: f32,
    /// Largest wall-clock delta a single frame may integrate (seconds).
    pub max_frame_dt: f32,
    /// Nominal logical step, used when no wall-clock delta is known (seconds).
    pub nominal_step: f32,
    /// Constraint solver iterations per step.
    pub solver_iterations: usize,
    /// Friction of the static ground plane.
    pub ground_friction: f32,
    /// Restitution of the static ground plane.
    pub ground_restitution: f32,
    /// Height of the horizontal plane the drag anchor slides on.
    pub drag_plane_height: f32,
    /// Smallest mass a dynamic body may have (kg).
    pub mass_epsilon: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            gravity: 9.82,
            max_frame_dt: 0.033,
            nominal_step: 1.0 / 60.0,
            solver_iterations: 10,
            ground_friction: 0.4,
            ground_restitution: 0.2,
            drag_plane_height: 0.0,
            mass_epsilon: 1.0e-4,
        }
    }
}

/// Defaults applied to bodies created through the command surface.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BodyDefaults {
    /// Full extents of a box when no size is given (meters).
    pub box_size: Vec3,
    /// Sphere radius when none is given (meters).
    pub sphere_radius: f32,
    /// Spawn position when none is given.
    pub spawn_position: Vec3,
    /// Mass when none is given (kg).
    pub mass: f32,
    /// Box color (0xRRGGBB).
    pub box_color: u32,
    /// Sphere color (0xRRGGBB).
    pub sphere_color: u32,
    /// Surface friction of created bodies.
    pub friction: f32,
    /// Restitution of boxes.
    pub box_restitution: f32,
    /// Restitution of spheres.
    pub sphere_restitution: f32,
    /// Emissive tint applied to selected meshes (0xRRGGBB).
    pub selection_emissive: u32,
}

impl Default for BodyDefaults {
    fn default() -> Self {
        Self {
            box_size: Vec3::ONE,
            sphere_radius: 0.5,
            spawn_position: Vec3::new(0.0, 2.0, 0.0),
            mass: 1.0,
            box_color: 0x4f79ff,
            sphere_color: 0xf0b429,
            friction: 0.4,
            box_restitution: 0.2,
            sphere_restitution: 0.5,
            selection_emissive: 0x223366,
        }
    }
}

/// Perspective camera placement.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    /// Eye position in world space.
    pub position: Vec3,
    /// Point the camera looks at.
    pub target: Vec3,
    /// Vertical field of view in degrees.
    pub fov_y_degrees: f32,
    /// Near clip distance.
    pub near: f32,
    /// Far clip distance.
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: Vec3::new(10.0, 8.0, 14.0),
            target: Vec3::new(0.0, 1.0, 0.0),
            fov_y_degrees: 60.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

/// Window and scene appearance.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    /// Initial window width in pixels.
    pub width: u32,
    /// Initial window height in pixels.
    pub height: u32,
    /// Cap presentation to the display refresh.
    pub vsync: bool,
    /// Clear color (0xRRGGBB).
    pub background: u32,
    /// Edge length of the square ground mesh (meters).
    pub ground_size: f32,
    /// Ground color (0xRRGGBB).
    pub ground_color: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            vsync: true,
            background: 0x0b0b0b,
            ground_size: 60.0,
            ground_color: 0x1b1f24,
        }
    }
}

/// Complete sandbox configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SandboxConfig {
    pub world: WorldConfig,
    pub bodies: BodyDefaults,
    pub camera: CameraConfig,
    pub render: RenderConfig,
}

impl SandboxConfig {
    /// Load from a JSON file; absent fields keep their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        super::load_json(path)
    }

    /// Parse from a JSON string; absent fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_sandbox_page() {
        let config = SandboxConfig::default();
        assert_eq!(config.world.gravity, 9.82);
        assert_eq!(config.world.max_frame_dt, 0.033);
        assert_eq!(config.bodies.spawn_position, Vec3::new(0.0, 2.0, 0.0));
        assert_eq!(config.bodies.sphere_radius, 0.5);
        assert_eq!(config.camera.fov_y_degrees, 60.0);
    }

    #[test]
    fn test_partial_json_overrides_only_named_fields() {
        let config =
            SandboxConfig::from_json_str(r#"{ "world": { "gravity": 1.62 }, "render": { "vsync": false } }"#)
                .unwrap();
        assert_eq!(config.world.gravity, 1.62);
        assert_eq!(config.world.solver_iterations, 10);
        assert!(!config.render.vsync);
        assert_eq!(config.render.width, 1280);
        assert_eq!(config.bodies, BodyDefaults::default());
    }

    #[test]
    fn test_vec3_fields_parse_from_arrays() {
        let config =
            SandboxConfig::from_json_str(r#"{ "bodies": { "spawn_position": [1.0, 5.0, -2.0] } }"#).unwrap();
        assert_eq!(config.bodies.spawn_position, Vec3::new(1.0, 5.0, -2.0));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = SandboxConfig::load(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
