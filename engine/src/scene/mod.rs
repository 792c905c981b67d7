//! Scene Module
//!
//! The visual half of every object: a handle-indexed set of meshes with
//! geometry, material and pose. The scene never decides when an object
//! lives or dies - the body registry (or a lab) adds and removes meshes,
//! and the renderer only reads.

pub mod material;
pub mod mesh;

pub use material::{Material, rgb_to_linear};
pub use mesh::{Geometry, Mesh};

use std::collections::BTreeMap;
use std::fmt;

/// Stable key of a mesh in a [`Scene`]. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MeshHandle(u32);

impl MeshHandle {
    pub fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for MeshHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "mesh#{}", self.0)
    }
}

/// All meshes currently drawn, in insertion order.
#[derive(Debug, Clone)]
pub struct Scene {
    meshes: BTreeMap<MeshHandle, Mesh>,
    next_handle: u32,
    /// Handles removed since the renderer last drained them.
    released: Vec<MeshHandle>,
    /// Clear color (0xRRGGBB).
    pub background: u32,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(0x0b0b0b)
    }
}

impl Scene {
    pub fn new(background: u32) -> Self {
        Self {
            meshes: BTreeMap::new(),
            next_handle: 1,
            released: Vec::new(),
            background,
        }
    }

    /// Insert a mesh and return its handle.
    pub fn add(&mut self, mesh: Mesh) -> MeshHandle {
        let handle = MeshHandle(self.next_handle);
        self.next_handle += 1;
        self.meshes.insert(handle, mesh);
        handle
    }

    /// Remove a mesh, releasing its material. Unknown handles return `None`.
    pub fn remove(&mut self, handle: MeshHandle) -> Option<Mesh> {
        let mut mesh = self.meshes.remove(&handle)?;
        mesh.material.dispose();
        self.released.push(handle);
        Some(mesh)
    }

    pub fn get(&self, handle: MeshHandle) -> Option<&Mesh> {
        self.meshes.get(&handle)
    }

    pub fn get_mut(&mut self, handle: MeshHandle) -> Option<&mut Mesh> {
        self.meshes.get_mut(&handle)
    }

    pub fn contains(&self, handle: MeshHandle) -> bool {
        self.meshes.contains_key(&handle)
    }

    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    /// Iterate meshes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (MeshHandle, &Mesh)> {
        self.meshes.iter().map(|(handle, mesh)| (*handle, mesh))
    }

    /// Handles removed since the last call. Renderers drop cached GPU data for these.
    pub fn take_released(&mut self) -> Vec<MeshHandle> {
        std::mem::take(&mut self.released)
    }

    /// Remove and dispose every mesh (teardown).
    pub fn dispose_all(&mut self) {
        let handles: Vec<MeshHandle> = self.meshes.keys().copied().collect();
        for handle in handles {
            self.remove(handle);
        }
    }
}
