//! Mesh Render Pass
//!
//! Draws a [`Scene`] through a [`Camera`] with one lit, depth-tested pipeline.
//! Meshes are tessellated once per geometry and cached by handle; every frame
//! the cached triangles are transformed on the CPU into a single dynamic
//! vertex buffer. Scenes here hold tens of bodies, not thousands.

use std::collections::HashMap;

use glam::{Mat4, Vec3};
use tracing::{debug, warn};

use super::MESH_SHADER_SOURCE;
use super::geometry::{LocalVertex, MeshVertex, tessellate};
use super::gpu_context::GpuContext;
use crate::camera::Camera;
use crate::sandbox::FrameRenderer;
use crate::scene::{Geometry, MeshHandle, Scene, rgb_to_linear};

const INITIAL_VERTEX_CAPACITY: usize = 4096;

/// Uniform data for mesh rendering
#[repr(C)]
#[derive(Clone, Copy, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub camera_pos: [f32; 3],
    pub ambient: f32,
    pub light_dir: [f32; 3],
    pub _pad: f32,
}

impl Default for MeshUniforms {
    fn default() -> Self {
        Self {
            view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            camera_pos: [0.0; 3],
            ambient: 0.25,
            light_dir: Vec3::new(0.4, 1.0, 0.3).normalize().to_array(),
            _pad: 0.0,
        }
    }
}

struct CachedMesh {
    geometry: Geometry,
    vertices: Vec<LocalVertex>,
}

/// GPU renderer for scenes.
pub struct MeshRenderer {
    gpu: GpuContext,
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
    uniform_buffer: wgpu::Buffer,
    uniforms: MeshUniforms,
    vertex_buffer: wgpu::Buffer,
    vertex_capacity: usize,
    cache: HashMap<MeshHandle, CachedMesh>,
    staging: Vec<MeshVertex>,
}

impl MeshRenderer {
    pub fn new(gpu: GpuContext) -> Self {
        let uniforms = MeshUniforms::default();
        let uniform_buffer = gpu.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Mesh Uniform Buffer"),
            size: std::mem::size_of::<MeshUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group_layout = gpu.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Mesh Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let bind_group = gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Mesh Bind Group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline = gpu.create_mesh_pipeline("Mesh", MESH_SHADER_SOURCE, &bind_group_layout, MeshVertex::layout());
        let vertex_buffer = Self::create_vertex_buffer(&gpu.device, INITIAL_VERTEX_CAPACITY);

        Self {
            gpu,
            pipeline,
            bind_group,
            uniform_buffer,
            uniforms,
            vertex_buffer,
            vertex_capacity: INITIAL_VERTEX_CAPACITY,
            cache: HashMap::new(),
            staging: Vec::new(),
        }
    }

    fn create_vertex_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Mesh Vertex Buffer"),
            size: (capacity * std::mem::size_of::<MeshVertex>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    pub fn gpu(&self) -> &GpuContext {
        &self.gpu
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.gpu.resize(width, height);
    }

    /// Forget every cached tessellation (switching to a different scene).
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Transform every visible mesh into `staging`.
    fn build_vertices(&mut self, scene: &Scene) {
        self.staging.clear();
        for (handle, mesh) in scene.iter() {
            if !mesh.visible || mesh.material.is_disposed() {
                continue;
            }
            let cached = self.cache.entry(handle).or_insert_with(|| CachedMesh {
                geometry: mesh.geometry,
                vertices: tessellate(&mesh.geometry),
            });
            if cached.geometry != mesh.geometry {
                cached.geometry = mesh.geometry;
                cached.vertices = tessellate(&mesh.geometry);
            }

            let transform = mesh.transform();
            let color = mesh.material.shaded_rgba();
            self.staging.extend(cached.vertices.iter().map(|v| MeshVertex {
                position: transform.transform_point3(v.position).to_array(),
                normal: transform.transform_vector3(v.normal).normalize_or_zero().to_array(),
                color,
            }));
        }
    }

    fn draw(&mut self, scene: &Scene, camera: &Camera) -> Result<(), wgpu::SurfaceError> {
        let output = match self.gpu.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.gpu.reconfigure();
                return Ok(());
            }
            Err(err) => return Err(err),
        };
        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());

        self.build_vertices(scene);
        if self.staging.len() > self.vertex_capacity {
            self.vertex_capacity = self.staging.len().next_power_of_two();
            self.vertex_buffer = Self::create_vertex_buffer(&self.gpu.device, self.vertex_capacity);
            debug!("mesh vertex buffer grown to {} vertices", self.vertex_capacity);
        }
        if !self.staging.is_empty() {
            self.gpu
                .queue
                .write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(&self.staging));
        }

        self.uniforms.view_proj = camera.view_proj().to_cols_array_2d();
        self.uniforms.camera_pos = camera.position.to_array();
        self.gpu
            .queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&self.uniforms));

        let [r, g, b] = rgb_to_linear(scene.background);
        let mut encoder = self.gpu.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Mesh Encoder"),
        });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Mesh Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    depth_slice: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: r as f64,
                            g: g as f64,
                            b: b as f64,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.gpu.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            if !self.staging.is_empty() {
                pass.set_pipeline(&self.pipeline);
                pass.set_bind_group(0, &self.bind_group, &[]);
                pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
                pass.draw(0..self.staging.len() as u32, 0..1);
            }
        }

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}

impl FrameRenderer for MeshRenderer {
    fn render(&mut self, scene: &Scene, camera: &Camera) {
        if let Err(err) = self.draw(scene, camera) {
            warn!("frame skipped: {}", err);
        }
    }

    fn release(&mut self, handles: &[MeshHandle]) {
        for handle in handles {
            self.cache.remove(handle);
        }
    }
}
