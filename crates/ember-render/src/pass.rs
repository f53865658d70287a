//! Render pass abstraction for reducing wgpu boilerplate.
//!
//! Provides [`RenderPassBuilder`] for declarative render pass configuration
//! and [`FrameEncoder`] for managing per-frame command encoding lifecycle.

use std::sync::Arc;

/// Deep blue clear color behind the background quad. Visible only when the
/// background pipeline is missing, which makes that failure obvious.
pub const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.071,
    g: 0.188,
    b: 0.298,
    a: 1.0,
};

/// Configuration for the depth stencil attachment.
#[derive(Debug)]
pub struct DepthAttachmentConfig {
    pub view: wgpu::TextureView,
    pub clear_value: f32,
}

/// Builder for configuring render pass descriptors with a fluent API.
#[derive(Debug)]
pub struct RenderPassBuilder {
    clear_color: wgpu::Color,
    depth_attachment: Option<DepthAttachmentConfig>,
    label: Option<&'static str>,
}

impl Default for RenderPassBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderPassBuilder {
    /// Create a new render pass builder with the scene clear color.
    pub fn new() -> Self {
        Self {
            clear_color: CLEAR_COLOR,
            depth_attachment: None,
            label: None,
        }
    }

    /// Set the clear color for the color attachment.
    pub fn clear_color(mut self, color: wgpu::Color) -> Self {
        self.clear_color = color;
        self
    }

    /// Set up the depth stencil attachment with a clear value. 0.0 is the
    /// far plane under reverse-Z.
    pub fn depth(mut self, view: wgpu::TextureView, clear_value: f32) -> Self {
        self.depth_attachment = Some(DepthAttachmentConfig { view, clear_value });
        self
    }

    /// Set debug label for the render pass.
    pub fn label(mut self, label: &'static str) -> Self {
        self.label = Some(label);
        self
    }

    /// Internal helper to create the render pass with the given view.
    /// This avoids lifetime issues by directly creating the render pass.
    fn create_render_pass<'encoder>(
        &self,
        encoder: &'encoder mut wgpu::CommandEncoder,
        color_view: &'encoder wgpu::TextureView,
    ) -> wgpu::RenderPass<'encoder> {
        let color_attachment = wgpu::RenderPassColorAttachment {
            view: color_view,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(self.clear_color),
                store: wgpu::StoreOp::Store,
            },
            depth_slice: None,
        };

        let depth_stencil_attachment =
            self.depth_attachment
                .as_ref()
                .map(|depth| wgpu::RenderPassDepthStencilAttachment {
                    view: &depth.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(depth.clear_value),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                });

        let descriptor = wgpu::RenderPassDescriptor {
            label: self.label,
            color_attachments: &[Some(color_attachment)],
            depth_stencil_attachment,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        };

        encoder.begin_render_pass(&descriptor)
    }
}

/// Manages per-frame command encoding lifecycle with automatic submission.
pub struct FrameEncoder {
    encoder: Option<wgpu::CommandEncoder>,
    queue: Arc<wgpu::Queue>,
    surface_texture: Option<wgpu::SurfaceTexture>,
    surface_view: Option<wgpu::TextureView>,
    submitted: bool,
}

impl FrameEncoder {
    /// Create a new frame encoder for the given device, queue, and surface texture.
    pub fn new(
        device: &wgpu::Device,
        queue: Arc<wgpu::Queue>,
        surface_texture: wgpu::SurfaceTexture,
    ) -> Self {
        let encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("frame-encoder"),
        });

        let surface_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        Self {
            encoder: Some(encoder),
            queue,
            surface_texture: Some(surface_texture),
            surface_view: Some(surface_view),
            submitted: false,
        }
    }

    /// Begin a render pass using the provided builder configuration.
    ///
    /// # Panics
    ///
    /// Panics if called after [`FrameEncoder::submit`]; `submit` consumes
    /// self, so this can only happen through unsafe aliasing.
    pub fn begin_render_pass<'a>(
        &'a mut self,
        builder: &'a RenderPassBuilder,
    ) -> wgpu::RenderPass<'a> {
        let view = self
            .surface_view
            .as_ref()
            .expect("FrameEncoder already submitted");

        builder.create_render_pass(
            self.encoder
                .as_mut()
                .expect("FrameEncoder already submitted"),
            view,
        )
    }

    /// Returns a reference to the queue.
    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Submit the command buffer to the queue and present the surface texture.
    /// Consumes self to prevent double-submission.
    pub fn submit(mut self) {
        if self.submitted {
            return;
        }

        if let (Some(encoder), Some(surface_texture)) =
            (self.encoder.take(), self.surface_texture.take())
        {
            let command_buffer = encoder.finish();
            self.queue.submit([command_buffer]);
            surface_texture.present();
            self.submitted = true;
        }
    }
}

impl Drop for FrameEncoder {
    fn drop(&mut self) {
        if !self.submitted
            && let (Some(encoder), Some(surface_texture)) =
                (self.encoder.take(), self.surface_texture.take())
        {
            log::warn!("FrameEncoder dropped without explicit submit() - auto-submitting");
            let command_buffer = encoder.finish();
            self.queue.submit([command_buffer]);
            surface_texture.present();
            self.submitted = true;
        }
    }
}
