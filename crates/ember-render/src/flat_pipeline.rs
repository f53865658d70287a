//! Background pipeline: a fullscreen flat-colored quad.
//!
//! Drawn first in the frame with depth testing disabled, so the spheres
//! always render on top regardless of quad placement.

use crate::buffer::{MeshBuffer, vertex_layout};
use crate::depth::DepthBuffer;
use crate::uniforms::scene_bind_group_layout;

/// Pipeline for the flat background quad.
pub struct FlatPipeline {
    pub pipeline: wgpu::RenderPipeline,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

impl FlatPipeline {
    pub fn new(device: &wgpu::Device, surface_format: wgpu::TextureFormat) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("flat-shader"),
            source: wgpu::ShaderSource::Wgsl(FLAT_SHADER_SOURCE.into()),
        });

        let bind_group_layout = scene_bind_group_layout(device);

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("flat-pipeline-layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        // Depth attachment present but neither tested nor written: the quad
        // must never occlude the spheres drawn after it.
        let depth_stencil = wgpu::DepthStencilState {
            format: DepthBuffer::FORMAT,
            depth_write_enabled: false,
            depth_compare: wgpu::CompareFunction::Always,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        };

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("flat-pipeline"),
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
                cull_mode: None,
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
                    blend: None, // opaque
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

    /// Draw the background quad.
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

/// WGSL source for the background. The quad corners are already in clip
/// space, so the vertex stage passes positions through untransformed and
/// the fragment stage shades a subtle vertical gradient of the clear color.
pub const FLAT_SHADER_SOURCE: &str = r#"
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
    @location(0) uv: vec2<f32>,
};

@vertex
fn vs_main(in: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    out.clip_position = vec4<f32>(in.position.xy, 0.0, 1.0);
    out.uv = in.position.xy * 0.5 + vec2<f32>(0.5, 0.5);
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    // Darken toward the bottom of the frame.
    let shade = mix(0.55, 1.0, in.uv.y);
    return vec4<f32>(scene.color.rgb * shade, 1.0);
}
"#;
