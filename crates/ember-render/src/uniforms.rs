//! Per-drawable uniform data shared by all three scene pipelines.

use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use std::num::NonZeroU64;

/// Uniform block uploaded once per drawable per frame.
///
/// All three shaders consume the same layout; the `param` slot carries the
/// eye angle for the body and the fire speed for the fire, and is unused by
/// the background.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct SceneUniform {
    /// Combined view-projection matrix, column-major.
    pub view_proj: [[f32; 4]; 4],
    /// Material color as normalized RGBA.
    pub color: [f32; 4],
    /// Scene time in ticks since the last full load.
    pub time: f32,
    /// Material parameter: eye angle (radians) or fire speed.
    pub param: f32,
    /// Pad to a 16-byte boundary for WGSL uniform layout.
    pub _padding: [f32; 2],
}

// WGSL std140-style layout: mat4 (64) + vec4 (16) + 4 scalars (16).
static_assertions::const_assert_eq!(std::mem::size_of::<SceneUniform>(), 96);

impl SceneUniform {
    pub fn new(view_proj: Mat4, color: [f32; 4], time: f32, param: f32) -> Self {
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            color,
            time,
            param,
            _padding: [0.0; 2],
        }
    }
}

impl Default for SceneUniform {
    fn default() -> Self {
        Self::new(Mat4::IDENTITY, [1.0, 1.0, 1.0, 1.0], 0.0, 0.0)
    }
}

/// The bind group layout every scene pipeline uses: one [`SceneUniform`]
/// buffer at `@group(0) @binding(0)`, visible to both shader stages.
pub fn scene_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("scene-uniform-layout"),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: NonZeroU64::new(std::mem::size_of::<SceneUniform>() as u64),
            },
            count: None,
        }],
    })
}

/// A [`SceneUniform`] buffer paired with its bind group. One per drawable;
/// rewritten every frame.
pub struct UniformBinding {
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
}

impl UniformBinding {
    pub fn new(device: &wgpu::Device, layout: &wgpu::BindGroupLayout, label: &str) -> Self {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: std::mem::size_of::<SceneUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });
        Self { buffer, bind_group }
    }

    /// Upload new uniform contents.
    pub fn write(&self, queue: &wgpu::Queue, uniform: &SceneUniform) {
        queue.write_buffer(&self.buffer, 0, bytemuck::bytes_of(uniform));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_size_and_alignment() {
        assert_eq!(std::mem::size_of::<SceneUniform>(), 96);
        assert_eq!(std::mem::size_of::<SceneUniform>() % 16, 0);
    }

    #[test]
    fn test_new_stores_matrix_column_major() {
        let m = Mat4::from_translation(glam::Vec3::new(1.0, 2.0, 3.0));
        let uniform = SceneUniform::new(m, [0.0; 4], 0.0, 0.0);
        // Translation lives in the fourth column.
        assert_eq!(uniform.view_proj[3][0], 1.0);
        assert_eq!(uniform.view_proj[3][1], 2.0);
        assert_eq!(uniform.view_proj[3][2], 3.0);
    }

    #[test]
    fn test_default_is_identity_white() {
        let uniform = SceneUniform::default();
        assert_eq!(uniform.view_proj[0][0], 1.0);
        assert_eq!(uniform.color, [1.0, 1.0, 1.0, 1.0]);
        assert_eq!(uniform.time, 0.0);
    }

    #[test]
    fn test_pod_cast_round_trip() {
        let uniform = SceneUniform::new(Mat4::IDENTITY, [0.5, 0.25, 1.0, 1.0], 42.0, 0.7);
        let bytes: &[u8] = bytemuck::bytes_of(&uniform);
        assert_eq!(bytes.len(), 96);
        let back: &SceneUniform = bytemuck::from_bytes(bytes);
        assert_eq!(back.time, 42.0);
        assert_eq!(back.param, 0.7);
    }

    #[test]
    fn test_binding_creation() {
        let device = pollster::block_on(async {
            let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
                backends: wgpu::Backends::all(),
                ..Default::default()
            });
            let adapter = instance
                .request_adapter(&wgpu::RequestAdapterOptions::default())
                .await
                .ok()?;
            let (device, _queue) = adapter
                .request_device(&wgpu::DeviceDescriptor::default())
                .await
                .ok()?;
            Some(device)
        });
        let Some(device) = device else {
            // Headless CI without a GPU adapter.
            return;
        };
        let layout = scene_bind_group_layout(&device);
        let binding = UniformBinding::new(&device, &layout, "test-binding");
        assert_eq!(binding.buffer.size(), 96);
    }
}
