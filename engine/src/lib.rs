//! Physics Lab Engine Library
//!
//! Interactive rigid-body sandbox and fixed-topology lab demonstrations.
//! Bodies live in a rapier-backed dynamics world and are mirrored into a
//! visual scene; pointer input picks, drags and selects them, and a frame
//! loop steps the world with a clamped delta before each render.
//!
//! # Modules
//!
//! - [`sandbox`] - body registry, picking, drag sessions, selection, frame loop and the command surface
//! - [`labs`] - pendulum, inclined plane and projectile demonstrations, quiz grading
//! - [`physics`] - dynamics world facade, ray intersection, closed-form ballistics
//! - [`scene`] - meshes, materials and the handle-indexed scene
//! - [`camera`] - perspective camera, viewport and raycasting
//! - [`input`] - platform-agnostic pointer events
//! - [`render`] - wgpu mesh renderer for the desktop front-ends
//! - [`config`] - defaults and JSON overrides
//! - [`error`] - error types
//!
//! # Example
//!
//! ```ignore
//! use glam::Vec3;
//! use physics_lab_engine::sandbox::{NullRenderer, Sandbox, SpawnOptions};
//!
//! let mut sandbox = Sandbox::default();
//! let a = sandbox.add_box(None, SpawnOptions::default());
//! let b = sandbox.add_sphere(None, SpawnOptions::at(Vec3::new(3.0, 2.0, 0.0)));
//! sandbox.add_distance_constraint(a, b, None);
//!
//! sandbox.set_selected(&[a]);
//! sandbox.apply_impulse(&sandbox.get_selected(), Vec3::new(0.0, 5.0, 0.0));
//! sandbox.frame(1.0 / 60.0, &mut NullRenderer);
//! ```

pub mod camera;
pub mod config;
pub mod error;
pub mod input;
pub mod labs;
pub mod physics;
pub mod render;
pub mod sandbox;
pub mod scene;

pub use camera::{Camera, Ray, Viewport};
pub use config::{LabConfig, SandboxConfig};
pub use error::{ConfigError, RegistryError, RenderError};
pub use input::{MouseButton, PointerEvent};
pub use labs::{Lab, LabKind};
pub use sandbox::{BodyId, FrameOutcome, FrameRenderer, Sandbox, SpawnOptions};
