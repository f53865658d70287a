//! Mesh upload: vertex/index buffer creation from CPU meshes.
//!
//! Every drawable in the scene shares one vertex format (position + normal),
//! so a single [`vertex_layout`] feeds all three pipelines and layout drift
//! between them is impossible.

use std::mem;

use ember_geometry::{Mesh, Vertex};
use wgpu::{VertexAttribute, VertexBufferLayout, VertexFormat, VertexStepMode};

/// Vertex attributes for the shared position + normal format.
const VERTEX_ATTRIBUTES: [VertexAttribute; 2] = [
    VertexAttribute {
        format: VertexFormat::Float32x3,
        offset: 0,
        shader_location: 0,
    },
    VertexAttribute {
        format: VertexFormat::Float32x3,
        offset: 12,
        shader_location: 1,
    },
];

/// The vertex buffer layout used by every scene pipeline.
pub fn vertex_layout() -> VertexBufferLayout<'static> {
    VertexBufferLayout {
        array_stride: mem::size_of::<Vertex>() as u64,
        step_mode: VertexStepMode::Vertex,
        attributes: &VERTEX_ATTRIBUTES,
    }
}

// Stride and offsets must track ember_geometry::Vertex.
static_assertions::const_assert_eq!(mem::size_of::<Vertex>(), 24);
const _: () = assert!(VERTEX_ATTRIBUTES[1].offset == 12);

/// GPU-resident vertex and index buffers for one mesh.
pub struct MeshBuffer {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
}

impl MeshBuffer {
    /// Bind buffers and issue the indexed draw call.
    pub fn draw(&self, render_pass: &mut wgpu::RenderPass) {
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        render_pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

/// Creates GPU buffers from CPU meshes.
pub struct BufferAllocator<'a> {
    device: &'a wgpu::Device,
}

impl<'a> BufferAllocator<'a> {
    pub fn new(device: &'a wgpu::Device) -> Self {
        Self { device }
    }

    /// Upload a CPU mesh. Called at scene load and again after every
    /// tessellation rebuild; the old buffers are dropped with the old
    /// [`MeshBuffer`].
    pub fn upload(&self, label: &str, mesh: &Mesh) -> MeshBuffer {
        use wgpu::util::DeviceExt;

        let vertex_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{label}-vertices")),
                contents: bytemuck::cast_slice(&mesh.vertices),
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            });

        let index_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{label}-indices")),
                contents: bytemuck::cast_slice(&mesh.indices),
                usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
            });

        MeshBuffer {
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as u32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_geometry::Icosphere;
    use glam::Vec3;

    fn create_test_device() -> Option<(wgpu::Device, wgpu::Queue)> {
        pollster::block_on(async {
            let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
                backends: wgpu::Backends::all(),
                ..Default::default()
            });
            let adapter = instance
                .request_adapter(&wgpu::RequestAdapterOptions::default())
                .await
                .ok()?;
            adapter
                .request_device(&wgpu::DeviceDescriptor::default())
                .await
                .ok()
        })
    }

    #[test]
    fn test_layout_stride_matches_vertex_struct() {
        let layout = vertex_layout();
        assert_eq!(layout.array_stride, 24);
        assert_eq!(layout.attributes.len(), 2);
    }

    #[test]
    fn test_layout_locations_are_sequential() {
        for (i, attr) in vertex_layout().attributes.iter().enumerate() {
            assert_eq!(attr.shader_location, i as u32);
        }
    }

    #[test]
    fn test_upload_counts_indices() {
        let Some((device, _queue)) = create_test_device() else {
            // Headless CI without a GPU adapter.
            return;
        };
        let sphere = Icosphere::build(Vec3::ZERO, 1.0, 1).unwrap();
        let allocator = BufferAllocator::new(&device);
        let buffer = allocator.upload("test-sphere", &sphere.mesh);
        assert_eq!(buffer.index_count, sphere.mesh.indices.len() as u32);
        assert_eq!(buffer.index_count, 80 * 3);
    }
}
