//! Render Module
//!
//! wgpu rendering for the desktop front-ends. The core never depends on it:
//! simulations draw through the [`FrameRenderer`](crate::sandbox::FrameRenderer)
//! trait, which [`MeshRenderer`] implements on top of a [`GpuContext`].

pub mod geometry;
pub mod gpu_context;
pub mod mesh_pass;

pub use geometry::{LocalVertex, MeshVertex, tessellate};
pub use gpu_context::{DEPTH_FORMAT, GpuContext, GpuContextConfig};
pub use mesh_pass::{MeshRenderer, MeshUniforms};

/// WGSL source of the mesh pipeline.
pub const MESH_SHADER_SOURCE: &str = include_str!("../../../shaders/mesh.wgsl");
