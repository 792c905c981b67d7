//! CPU tessellation of scene geometry into triangle lists.
//!
//! Everything is emitted as a non-indexed list with counter-clockwise front
//! faces and outward normals, in the mesh's local frame (world frame for
//! segments).

use std::f32::consts::{PI, TAU};

use glam::{Quat, Vec3};

use crate::scene::Geometry;

const SPHERE_STACKS: u32 = 12;
const SPHERE_SLICES: u32 = 24;

/// Vertex for mesh rendering (position, normal, color)
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 4],
}

impl MeshVertex {
    pub const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x4];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<MeshVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Untransformed, uncolored vertex.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LocalVertex {
    pub position: Vec3,
    pub normal: Vec3,
}

/// Triangulate a geometry.
pub fn tessellate(geometry: &Geometry) -> Vec<LocalVertex> {
    match *geometry {
        Geometry::Box { size } => box_triangles(size * 0.5, Vec3::ZERO, Quat::IDENTITY),
        Geometry::Sphere { radius } => sphere_triangles(radius),
        Geometry::Plane { width, depth } => plane_triangles(width * 0.5, depth * 0.5),
        Geometry::Segment { from, to, thickness } => segment_triangles(from, to, thickness),
    }
}

fn quad(out: &mut Vec<LocalVertex>, corners: [Vec3; 4], normal: Vec3) {
    for i in [0, 1, 2, 0, 2, 3] {
        out.push(LocalVertex { position: corners[i], normal });
    }
}

fn box_triangles(half: Vec3, center: Vec3, rotation: Quat) -> Vec<LocalVertex> {
    // (normal, u, v) with u × v = normal
    const FACES: [(Vec3, Vec3, Vec3); 6] = [
        (Vec3::X, Vec3::Y, Vec3::Z),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::Z, Vec3::X),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::Y, Vec3::X),
    ];
    let mut out = Vec::with_capacity(36);
    for (n, u, v) in FACES {
        let corners = [(-u - v), (u - v), (u + v), (-u + v)]
            .map(|c| center + rotation * ((n + c) * half));
        quad(&mut out, corners, rotation * n);
    }
    out
}

fn sphere_triangles(radius: f32) -> Vec<LocalVertex> {
    let point = |stack: u32, slice: u32| {
        let phi = PI * stack as f32 / SPHERE_STACKS as f32;
        let theta = TAU * slice as f32 / SPHERE_SLICES as f32;
        Vec3::new(phi.sin() * theta.cos(), phi.cos(), phi.sin() * theta.sin())
    };
    let mut out = Vec::new();
    let mut push = |n: Vec3| out.push(LocalVertex { position: n * radius, normal: n });
    for i in 0..SPHERE_STACKS {
        for j in 0..SPHERE_SLICES {
            let a = point(i, j);
            let b = point(i + 1, j);
            let c = point(i + 1, j + 1);
            let d = point(i, j + 1);
            if i + 1 < SPHERE_STACKS {
                push(a);
                push(c);
                push(b);
            }
            if i > 0 {
                push(a);
                push(d);
                push(c);
            }
        }
    }
    out
}

fn plane_triangles(half_width: f32, half_depth: f32) -> Vec<LocalVertex> {
    let u = Vec3::new(0.0, 0.0, half_depth);
    let v = Vec3::new(half_width, 0.0, 0.0);
    let mut out = Vec::with_capacity(6);
    quad(&mut out, [-u - v, u - v, u + v, -u + v], Vec3::Y);
    out
}

fn segment_triangles(from: Vec3, to: Vec3, thickness: f32) -> Vec<LocalVertex> {
    let axis = to - from;
    let length = axis.length();
    if length < 1e-6 {
        return Vec::new();
    }
    let rotation = Quat::from_rotation_arc(Vec3::Y, axis / length);
    let half = Vec3::new(thickness * 0.5, length * 0.5, thickness * 0.5);
    box_triangles(half, (from + to) * 0.5, rotation)
}
