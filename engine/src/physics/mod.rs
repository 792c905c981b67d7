//! Physics module
//!
//! Rigid-body dynamics for the sandbox and the labs. Contacts, joints and
//! integration are delegated to rapier3d through [`DynamicsWorld`]; the rest
//! of the crate only ever sees glam types and opaque handles.
//!
//! # Unit System
//!
//! **1 unit = 1 meter** (SI units throughout)
//!
//! - Distances in meters
//! - Velocities in m/s
//! - Accelerations in m/s²
//! - Mass in kg
//!
//! # Submodules
//!
//! - [`types`] - glam <-> nalgebra conversions used at the rapier boundary
//! - [`world`] - the dynamics world facade (bodies, joints, stepping)
//! - [`ballistics`] - closed-form projectile references for the labs
//! - [`collision`] - analytic ray vs box/sphere tests used for picking

pub mod ballistics;
pub mod collision;
pub mod types;
pub mod world;

pub use ballistics::{LaunchParams, launch_velocity};
pub use collision::{RayHit, ray_aabb_intersect, ray_obb_intersect, ray_sphere_intersect};
pub use world::{BodyDesc, BodyHandle, ColliderShape, DynamicsWorld, JointHandle, Motion};
