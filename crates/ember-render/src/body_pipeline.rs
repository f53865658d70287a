//! Body pipeline: the opaque lambert-shaded sphere with eye spots.
//!
//! Drawn after the background with depth testing and writing enabled, so
//! the translucent fire pass can test against it.

use crate::buffer::{MeshBuffer, vertex_layout};
use crate::depth::DepthBuffer;
use crate::uniforms::scene_bind_group_layout;

/// Pipeline for the opaque body sphere.
pub struct BodyPipeline {
    pub pipeline: wgpu::RenderPipeline,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

impl BodyPipeline {
    pub fn new(device: &wgpu::Device, surface_format: wgpu::TextureFormat) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("body-shader"),
            source: wgpu::ShaderSource::Wgsl(BODY_SHADER_SOURCE.into()),
        });

        let bind_group_layout = scene_bind_group_layout(device);

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("body-pipeline-layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let depth_stencil = wgpu::DepthStencilState {
            format: DepthBuffer::FORMAT,
            depth_write_enabled: true,
            depth_compare: DepthBuffer::COMPARE_FUNCTION, // reverse-Z
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        };

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("body-pipeline"),
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

    /// Draw the body sphere.
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

/// WGSL source for the body. Lambert shading with a fixed key light, plus
/// two dark eye spots placed on the front hemisphere; `param` carries the
/// eye angle and swings both spots around the vertical axis.
pub const BODY_SHADER_SOURCE: &str = r#"
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
};

@vertex
fn vs_main(in: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    out.clip_position = scene.view_proj * vec4<f32>(in.position, 1.0);
    out.normal = in.normal;
    return out;
}

const LIGHT_DIR: vec3<f32> = vec3<f32>(0.4082, 0.8165, 0.4082);
const EYE_SPREAD: f32 = 0.35;
const EYE_TILT: f32 = 0.25;
const EYE_RADIUS: f32 = 0.985;

fn eye_direction(side: f32, angle: f32) -> vec3<f32> {
    let yaw = angle + side * EYE_SPREAD;
    return normalize(vec3<f32>(sin(yaw), EYE_TILT, cos(yaw)));
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let n = normalize(in.normal);
    let lambert = max(dot(n, LIGHT_DIR), 0.0);
    var shaded = scene.color.rgb * (0.25 + 0.75 * lambert);

    // Eye spots: darken where the normal points near an eye direction.
    let left = dot(n, eye_direction(-1.0, scene.param));
    let right = dot(n, eye_direction(1.0, scene.param));
    let eye = max(
        smoothstep(EYE_RADIUS, EYE_RADIUS + 0.005, left),
        smoothstep(EYE_RADIUS, EYE_RADIUS + 0.005, right),
    );
    shaded = mix(shaded, vec3<f32>(0.02, 0.02, 0.02), eye);

    return vec4<f32>(shaded, 1.0);
}
"#;
