//! Meshes: geometry, material and pose.

use glam::{Mat4, Quat, Vec3};

use super::Material;

/// Shape of a mesh in its local frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Geometry {
    /// Axis-aligned box of full extents `size`, centered on the origin.
    Box { size: Vec3 },
    /// Sphere centered on the origin.
    Sphere { radius: f32 },
    /// Horizontal rectangle in the XZ plane, facing +Y.
    Plane { width: f32, depth: f32 },
    /// Thin rod between two world-space points (pendulum string, markers).
    /// The mesh pose is ignored for segments.
    Segment { from: Vec3, to: Vec3, thickness: f32 },
}

/// A drawable object.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub geometry: Geometry,
    pub material: Material,
    pub position: Vec3,
    pub rotation: Quat,
    pub visible: bool,
}

impl Mesh {
    pub fn new(geometry: Geometry, material: Material) -> Self {
        Self {
            geometry,
            material,
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            visible: true,
        }
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    /// Copy a simulated pose onto the mesh.
    pub fn set_pose(&mut self, position: Vec3, rotation: Quat) {
        self.position = position;
        self.rotation = rotation;
    }

    /// Local-to-world transform.
    pub fn transform(&self) -> Mat4 {
        match self.geometry {
            Geometry::Segment { .. } => Mat4::IDENTITY,
            _ => Mat4::from_rotation_translation(self.rotation, self.position),
        }
    }
}
