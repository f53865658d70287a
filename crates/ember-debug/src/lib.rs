//! HTTP control surface for the running scene.
//!
//! Exposes the live scene parameters over a small JSON API so external
//! tools can observe frame metrics and drive the sliders while the render
//! loop runs. The server owns nothing; it mutates shared [`ControlState`]
//! and the render loop picks the changes up at the top of the next tick.

pub mod server;

pub use server::{ControlServer, ControlServerError};

use ember_scene::{ParameterState, ScenePreset};
use serde::Deserialize;

/// State shared between the render loop and the control server.
///
/// Metrics flow loop -> server; parameter edits and commands flow
/// server -> loop, picked up once per tick.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct ControlState {
    pub frame_count: u64,
    pub frame_time_ms: f64,
    pub fps: f64,
    /// Scene clock value at the last completed tick.
    pub scene_time: u64,
    /// Vertex count of one sphere at the current tessellation.
    pub vertex_count: u32,
    /// Triangle count of one sphere at the current tessellation.
    pub triangle_count: u32,
    pub window_width: u32,
    pub window_height: u32,
    pub uptime_seconds: f64,
    /// The live slider values. The server writes these through the clamped
    /// setters; the loop copies them out when `params_dirty` is set.
    pub params: ParameterState,
    #[serde(skip)]
    pub params_dirty: bool,
    /// Set by the `load_scene` command; consumed by the loop.
    #[serde(skip)]
    pub load_requested: bool,
    /// Preset named by the `load_scene` command, when it gave one. The loop
    /// keeps the live parameters unless this switches presets.
    #[serde(skip)]
    pub load_preset: Option<ScenePreset>,
    /// Set by the `reset_scene` command; consumed by the loop.
    #[serde(skip)]
    pub reset_requested: bool,
    pub quit_requested: bool,
}

/// Partial parameter update from a `POST /params` body. Absent fields are
/// left untouched; present fields go through the clamped setters.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ParamPatch {
    pub tessellation: Option<u32>,
    pub body_color: Option<[u8; 3]>,
    pub fire_color: Option<[u8; 3]>,
    pub eye_angle: Option<f32>,
    pub fire_speed: Option<f32>,
}

impl ParamPatch {
    /// Apply the present fields to `params`, clamping each to its domain.
    pub fn apply(&self, params: &mut ParameterState) {
        if let Some(level) = self.tessellation {
            params.set_tessellation(level);
        }
        if let Some(color) = self.body_color {
            params.body_color = color;
        }
        if let Some(color) = self.fire_color {
            params.fire_color = color;
        }
        if let Some(angle) = self.eye_angle {
            params.set_eye_angle(angle);
        }
        if let Some(speed) = self.fire_speed {
            params.set_fire_speed(speed);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tessellation.is_none()
            && self.body_color.is_none()
            && self.fire_color.is_none()
            && self.eye_angle.is_none()
            && self.fire_speed.is_none()
    }
}
