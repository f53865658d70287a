//! wgpu rendering for the Ember scene: GPU context, mesh upload, depth
//! buffer, camera, render pass helpers, and the three material pipelines
//! (flat background, lambert body, fire).

pub mod body_pipeline;
pub mod buffer;
pub mod camera;
pub mod depth;
pub mod fire_pipeline;
pub mod flat_pipeline;
pub mod gpu;
pub mod pass;
pub mod uniforms;

pub use body_pipeline::{BODY_SHADER_SOURCE, BodyPipeline};
pub use buffer::{BufferAllocator, MeshBuffer, vertex_layout};
pub use camera::Camera;
pub use depth::DepthBuffer;
pub use fire_pipeline::{FIRE_SHADER_SOURCE, FirePipeline};
pub use flat_pipeline::{FLAT_SHADER_SOURCE, FlatPipeline};
pub use gpu::{RenderContext, RenderContextError, SurfaceError, init_render_context_blocking};
pub use pass::{CLEAR_COLOR, FrameEncoder, RenderPassBuilder};
pub use uniforms::{SceneUniform, UniformBinding, scene_bind_group_layout};
