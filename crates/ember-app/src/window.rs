//! Window creation, event handling, and the per-frame render driver.
//!
//! [`AppState`] implements winit's [`ApplicationHandler`]: `resumed` brings
//! up the GPU, the scene, and the control server; `RedrawRequested` runs one
//! frame and immediately requests the next, so the loop is paced by vsync.

use std::sync::{Arc, Mutex};

use tracing::{error, info, warn};
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{Window, WindowAttributes, WindowId};

use ember_config::{Config, SceneConfig};
use ember_debug::{ControlServer, ControlState};
use ember_geometry::{triangle_count_for_level, vertex_count_for_level};
use ember_render::{
    BodyPipeline, BufferAllocator, Camera, DepthBuffer, FirePipeline, FlatPipeline, FrameEncoder,
    MeshBuffer, RenderContext, RenderPassBuilder, SceneUniform, SurfaceError, UniformBinding,
    init_render_context_blocking,
};
use ember_scene::{ParameterState, Scene, ScenePreset};

use crate::frame_stats::FrameStats;

/// Background material color: the clear color, shaded by the gradient in
/// the flat shader.
const BACKGROUND_COLOR: [f32; 4] = [0.071, 0.188, 0.298, 1.0];

/// Returns [`WindowAttributes`] based on the given configuration.
pub fn window_attributes_from_config(config: &Config) -> WindowAttributes {
    WindowAttributes::default()
        .with_title(config.window.title.clone())
        .with_inner_size(winit::dpi::LogicalSize::new(
            config.window.width as f64,
            config.window.height as f64,
        ))
}

/// Resolve a preset name from config or the control API. Unknown names fall
/// back to the default preset.
pub fn preset_from_name(name: &str) -> ScenePreset {
    match name.to_ascii_lowercase().as_str() {
        "classic" => ScenePreset::Classic,
        "fireball" => ScenePreset::Fireball,
        other => {
            warn!(preset = other, "unknown preset name, using fireball");
            ScenePreset::Fireball
        }
    }
}

/// Build the live parameter record from the config's scene section, passing
/// every value through its clamped setter.
pub fn params_from_scene_config(scene: &SceneConfig) -> ParameterState {
    let mut params = ParameterState::preset(preset_from_name(&scene.preset));
    params.set_tessellation(scene.tessellation);
    params.body_color = scene.body_color;
    params.fire_color = scene.fire_color;
    params.set_eye_angle(scene.eye_angle);
    params.set_fire_speed(scene.fire_speed);
    params
}

/// Application state: window, GPU resources, the CPU scene, and the control
/// surface shared with the HTTP server.
pub struct AppState {
    pub window: Option<Arc<Window>>,
    pub gpu: Option<RenderContext>,
    pub config: Config,
    pub camera: Camera,
    pub scene: Option<Scene>,
    pub params: ParameterState,
    pub preset: ScenePreset,
    pub depth_buffer: Option<DepthBuffer>,
    pub flat_pipeline: Option<FlatPipeline>,
    pub body_pipeline: Option<BodyPipeline>,
    pub fire_pipeline: Option<FirePipeline>,
    pub background_mesh: Option<MeshBuffer>,
    pub body_mesh: Option<MeshBuffer>,
    pub fire_mesh: Option<MeshBuffer>,
    pub background_binding: Option<UniformBinding>,
    pub body_binding: Option<UniformBinding>,
    pub fire_binding: Option<UniformBinding>,
    pub control_server: Option<ControlServer>,
    pub control_state: Arc<Mutex<ControlState>>,
    pub stats: FrameStats,
}

impl AppState {
    /// Creates a new `AppState` from a [`Config`].
    pub fn with_config(config: Config) -> Self {
        let preset = preset_from_name(&config.scene.preset);
        let params = params_from_scene_config(&config.scene);

        Self {
            window: None,
            gpu: None,
            config,
            camera: Camera::default(),
            scene: None,
            params,
            preset,
            depth_buffer: None,
            flat_pipeline: None,
            body_pipeline: None,
            fire_pipeline: None,
            background_mesh: None,
            body_mesh: None,
            fire_mesh: None,
            background_binding: None,
            body_binding: None,
            fire_binding: None,
            control_server: None,
            control_state: Arc::new(Mutex::new(ControlState::default())),
            stats: FrameStats::new(),
        }
    }

    /// Create depth buffer, pipelines, and uniform bindings, then upload the
    /// scene meshes. Requires the GPU context and scene to be present.
    fn initialize_rendering(&mut self) {
        let Some(gpu) = self.gpu.as_ref() else { return };

        let width = gpu.surface_config.width;
        let height = gpu.surface_config.height;
        let depth_buffer = DepthBuffer::new(&gpu.device, width, height);

        let flat_pipeline = FlatPipeline::new(&gpu.device, gpu.surface_format);
        let body_pipeline = BodyPipeline::new(&gpu.device, gpu.surface_format);
        let fire_pipeline = FirePipeline::new(&gpu.device, gpu.surface_format);

        self.background_binding = Some(UniformBinding::new(
            &gpu.device,
            &flat_pipeline.bind_group_layout,
            "background-uniform",
        ));
        self.body_binding = Some(UniformBinding::new(
            &gpu.device,
            &body_pipeline.bind_group_layout,
            "body-uniform",
        ));
        self.fire_binding = Some(UniformBinding::new(
            &gpu.device,
            &fire_pipeline.bind_group_layout,
            "fire-uniform",
        ));

        self.camera.set_aspect_ratio(width as f32, height as f32);

        self.depth_buffer = Some(depth_buffer);
        self.flat_pipeline = Some(flat_pipeline);
        self.body_pipeline = Some(body_pipeline);
        self.fire_pipeline = Some(fire_pipeline);

        self.upload_scene_meshes();
        info!("rendering initialized: three pipelines, reverse-Z depth");
    }

    /// (Re-)upload every drawable's vertex and index buffers. Called at load
    /// and again whenever a tick reports a rebuild.
    fn upload_scene_meshes(&mut self) {
        let (Some(gpu), Some(scene)) = (self.gpu.as_ref(), self.scene.as_ref()) else {
            return;
        };
        let allocator = BufferAllocator::new(&gpu.device);
        self.background_mesh = Some(allocator.upload("background", &scene.background));
        self.body_mesh = Some(allocator.upload("body", &scene.body.mesh));
        self.fire_mesh = Some(allocator.upload("fire", &scene.fire.mesh));
    }

    /// Rebuild the scene from the live parameters. The current slider values
    /// are kept; only switching to a different preset adopts that preset's
    /// defaults. Restoring defaults in place is `reset_scene`'s job.
    fn load_scene(&mut self, preset: Option<ScenePreset>) {
        if let Some(preset) = preset
            && preset != self.preset
        {
            self.preset = preset;
            self.params = ParameterState::preset(preset);
        }
        match Scene::load(&self.params, self.preset) {
            Ok(scene) => {
                self.scene = Some(scene);
                self.upload_scene_meshes();
            }
            Err(e) => error!("scene load failed: {e}"),
        }
    }

    /// Apply pending control-surface edits and commands. Returns true when a
    /// quit was requested.
    fn drain_control(&mut self) -> bool {
        let state = self.control_state.clone();

        let (load, load_preset, reset) = {
            let Ok(mut guard) = state.lock() else {
                return false;
            };
            if guard.quit_requested {
                return true;
            }
            if std::mem::take(&mut guard.params_dirty) {
                self.params = guard.params;
            }
            (
                std::mem::take(&mut guard.load_requested),
                guard.load_preset.take(),
                std::mem::take(&mut guard.reset_requested),
            )
        };

        if load {
            info!(preset = ?load_preset, "control: load scene");
            self.load_scene(load_preset);
        } else if reset {
            info!("control: reset scene");
            if let Some(scene) = &mut self.scene {
                if let Err(e) = scene.reset(&mut self.params) {
                    error!("scene reset failed: {e}");
                }
            }
            self.upload_scene_meshes();
        }

        // Publish the authoritative parameter values back, so GET /params
        // reflects clamping and resets.
        if let Ok(mut guard) = state.lock() {
            guard.params = self.params;
        }
        false
    }

    /// Push frame metrics into the shared control state.
    fn publish_metrics(&self) {
        let Ok(mut state) = self.control_state.lock() else {
            return;
        };
        state.frame_count = self.stats.frame_count();
        state.frame_time_ms = self.stats.frame_time_ms();
        state.fps = self.stats.fps();
        state.uptime_seconds = self.stats.uptime_seconds();
        if let Some(scene) = &self.scene {
            state.scene_time = scene.time();
            let level = scene.previous_tessellation();
            state.vertex_count = vertex_count_for_level(level) as u32;
            state.triangle_count = triangle_count_for_level(level) as u32;
        }
        if let Some(gpu) = &self.gpu {
            state.window_width = gpu.surface_config.width;
            state.window_height = gpu.surface_config.height;
        }
    }

    /// Handle a window resize: camera aspect, surface, and depth buffer
    /// stay in lockstep before the next frame is drawn.
    fn resize(&mut self, width: u32, height: u32) {
        self.camera.set_aspect_ratio(width as f32, height as f32);
        if let Some(gpu) = &mut self.gpu {
            gpu.resize(width, height);
        }
        if let (Some(depth_buffer), Some(gpu)) = (&mut self.depth_buffer, &self.gpu) {
            depth_buffer.resize(&gpu.device, width.max(1), height.max(1));
        }
        info!("window resized to {}x{}", width, height);
    }

    /// Run one frame: drain control edits, tick the scene, re-upload on
    /// rebuild, write uniforms, and draw background, body, fire in order.
    fn render_frame(&mut self, event_loop: &ActiveEventLoop) {
        if self.drain_control() {
            info!("quit requested via control API");
            event_loop.exit();
            return;
        }

        self.camera.update();

        let rebuilt = match &mut self.scene {
            Some(scene) => scene.tick(&self.params).rebuilt,
            None => return,
        };
        if rebuilt {
            self.upload_scene_meshes();
        }

        let Some(gpu) = self.gpu.as_ref() else { return };
        let (Some(depth_buffer), Some(flat), Some(body), Some(fire)) = (
            self.depth_buffer.as_ref(),
            self.flat_pipeline.as_ref(),
            self.body_pipeline.as_ref(),
            self.fire_pipeline.as_ref(),
        ) else {
            return;
        };
        let (Some(background_mesh), Some(body_mesh), Some(fire_mesh)) = (
            self.background_mesh.as_ref(),
            self.body_mesh.as_ref(),
            self.fire_mesh.as_ref(),
        ) else {
            return;
        };
        let (Some(background_binding), Some(body_binding), Some(fire_binding)) = (
            self.background_binding.as_ref(),
            self.body_binding.as_ref(),
            self.fire_binding.as_ref(),
        ) else {
            return;
        };
        let Some(scene) = self.scene.as_ref() else { return };

        let time = scene.time() as f32;
        let view_proj = self.camera.view_projection_matrix();
        background_binding.write(
            &gpu.queue,
            &SceneUniform::new(view_proj, BACKGROUND_COLOR, time, 0.0),
        );
        body_binding.write(
            &gpu.queue,
            &SceneUniform::new(
                view_proj,
                self.params.body_color_rgba(),
                time,
                self.params.eye_angle,
            ),
        );
        fire_binding.write(
            &gpu.queue,
            &SceneUniform::new(
                view_proj,
                self.params.fire_color_rgba(),
                time,
                self.params.fire_speed,
            ),
        );

        let surface_texture = match gpu.get_current_texture() {
            Ok(texture) => texture,
            Err(SurfaceError::Timeout) => {
                // Skip this frame and try again.
                warn!("surface acquisition timed out, skipping frame");
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
                return;
            }
            Err(e) => {
                error!("surface unusable: {e}");
                event_loop.exit();
                return;
            }
        };

        let mut frame = FrameEncoder::new(&gpu.device, Arc::new(gpu.queue.clone()), surface_texture);
        let pass_builder = RenderPassBuilder::new()
            .label("scene-pass")
            .depth(depth_buffer.view.clone(), DepthBuffer::CLEAR_VALUE);
        {
            let mut pass = frame.begin_render_pass(&pass_builder);
            // Fixed draw order: background first (no depth test), opaque
            // body, then the blended fire shell.
            flat.draw(&mut pass, &background_binding.bind_group, background_mesh);
            body.draw(&mut pass, &body_binding.bind_group, body_mesh);
            fire.draw(&mut pass, &fire_binding.bind_group, fire_mesh);
        }
        frame.submit();

        self.stats.tick();
        self.publish_metrics();

        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = window_attributes_from_config(&self.config);
        let window = match event_loop.create_window(attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                error!("window creation failed: {e}");
                event_loop.exit();
                return;
            }
        };

        match init_render_context_blocking(window.clone()) {
            Ok(ctx) => self.gpu = Some(ctx),
            Err(e) => {
                error!("GPU initialization failed: {e}");
                event_loop.exit();
                return;
            }
        }

        match Scene::load(&self.params, self.preset) {
            Ok(scene) => self.scene = Some(scene),
            Err(e) => {
                error!("initial scene load failed: {e}");
                event_loop.exit();
                return;
            }
        }

        self.initialize_rendering();

        if self.config.debug.control_server {
            if let Ok(mut guard) = self.control_state.lock() {
                guard.params = self.params;
            }
            let mut server = ControlServer::new(self.config.debug.control_port);
            match server.start(self.control_state.clone()) {
                Ok(()) => {
                    info!("control API started on port {}", server.actual_port());
                    self.control_server = Some(server);
                }
                Err(e) => warn!("failed to start control server: {e}"),
            }
        }

        window.request_redraw();
        self.window = Some(window);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                info!("close requested, shutting down");
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                self.resize(new_size.width, new_size.height);
            }
            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(window) = &self.window {
                    let inner = window.inner_size();
                    self.resize(inner.width, inner.height);
                }
            }
            WindowEvent::RedrawRequested => {
                self.render_frame(event_loop);
            }
            _ => {}
        }
    }
}

/// Creates an event loop and runs the application with the given config.
///
/// This function blocks until the window is closed.
pub fn run_with_config(config: Config) {
    let event_loop = EventLoop::new().expect("Failed to create event loop");
    let mut app = AppState::with_config(config);
    event_loop.run_app(&mut app).expect("Event loop failed");
}
