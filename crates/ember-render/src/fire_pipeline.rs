//! Fire pipeline: the animated translucent shell around the body.
//!
//! Drawn last with alpha blending. Depth testing stays on so the body
//! occludes the far side of the shell, but depth writes are off so the
//! translucent fragments never block each other.

use crate::buffer::{MeshBuffer, vertex_layout};
use crate::depth::DepthBuffer;
use crate::uniforms::scene_bind_group_layout;

/// Pipeline for the translucent fire shell.
pub struct FirePipeline {
    pub pipeline: wgpu::RenderPipeline,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

impl FirePipeline {
    pub fn new(device: &wgpu::Device, surface_format: wgpu::TextureFormat) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("fire-shader"),
            source: wgpu::ShaderSource::Wgsl(FIRE_SHADER_SOURCE.into()),
        });

        let bind_group_layout = scene_bind_group_layout(device);

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("fire-pipeline-layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let depth_stencil = wgpu::DepthStencilState {
            format: DepthBuffer::FORMAT,
            depth_write_enabled: false,
            depth_compare: DepthBuffer::COMPARE_FUNCTION, // reverse-Z
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        };

        // Standard source-over alpha blending.
        let blend = wgpu::BlendState {
            color: wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::SrcAlpha,
                dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
                operation: wgpu::BlendOperation::Add,
            },
            alpha: wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::One,
                dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
                operation: wgpu::BlendOperation::Add,
            },
        };

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("fire-pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[vertex_layout()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                unclipped_depth: false,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
            },
            depth_stencil: Some(depth_stencil),
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(blend),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            multiview_mask: None,
            cache: None,
        });

        Self {
            pipeline,
            bind_group_layout,
        }
    }

    /// Draw the fire shell.
    pub fn draw<'a>(
        &self,
        render_pass: &mut wgpu::RenderPass<'a>,
        bind_group: &'a wgpu::BindGroup,
        mesh: &'a MeshBuffer,
    ) {
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, bind_group, &[]);
        mesh.draw(render_pass);
    }
}

/// WGSL source for the fire. The vertex stage displaces each vertex along
/// its normal by layered sines of position and phase, where the phase is
/// `time * param` (param carries the fire speed). The fragment stage fades
/// alpha toward the silhouette so the shell reads as a flame envelope
/// rather than a hard sphere.
pub const FIRE_SHADER_SOURCE: &str = r#"
struct SceneUniform {
    view_proj: mat4x4<f32>,
    color: vec4<f32>,
    time: f32,
    param: f32,
    _pad: vec2<f32>,
};

@group(0) @binding(0)
var<uniform> scene: SceneUniform;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) normal: vec3<f32>,
    @location(1) flicker: f32,
};

fn turbulence(p: vec3<f32>, phase: f32) -> f32 {
    var value = 0.0;
    value += 0.5 * sin(4.0 * p.x + phase) * sin(4.0 * p.y + 0.7 * phase);
    value += 0.25 * sin(9.0 * p.y - 1.3 * phase) * sin(7.0 * p.z + phase);
    value += 0.125 * sin(15.0 * p.z + 2.1 * phase) * sin(13.0 * p.x - phase);
    return value;
}

@vertex
fn vs_main(in: VertexInput) -> VertexOutput {
    // Ticks are small integers; scale down so one speed unit reads as a
    // gentle flicker rate rather than strobing.
    let phase = scene.time * scene.param * 0.02;
    let wobble = turbulence(in.position, phase);
    let displaced = in.position + in.normal * wobble * 0.12;

    var out: VertexOutput;
    out.clip_position = scene.view_proj * vec4<f32>(displaced, 1.0);
    out.normal = in.normal;
    out.flicker = wobble;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let n = normalize(in.normal);
    // Camera looks down -Z; fade where the surface turns away.
    let facing = clamp(n.z, 0.0, 1.0);
    let alpha = (0.25 + 0.55 * facing) * (0.8 + 0.2 * in.flicker);
    let glow = scene.color.rgb * (1.0 + 0.3 * in.flicker);
    return vec4<f32>(glow, clamp(alpha, 0.0, 1.0));
}
"#;

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_device() -> Option<wgpu::Device> {
        pollster::block_on(async {
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
        })
    }

    #[test]
    fn test_pipeline_creation_succeeds() {
        let Some(device) = create_test_device() else {
            // Headless CI without a GPU adapter.
            return;
        };
        let _pipeline = FirePipeline::new(&device, wgpu::TextureFormat::Bgra8UnormSrgb);
    }

    #[test]
    fn test_shader_has_entry_points() {
        assert!(FIRE_SHADER_SOURCE.contains("fn vs_main"));
        assert!(FIRE_SHADER_SOURCE.contains("fn fs_main"));
    }

    #[test]
    fn test_shader_displaces_along_normal() {
        assert!(FIRE_SHADER_SOURCE.contains("in.normal * wobble"));
    }
}
