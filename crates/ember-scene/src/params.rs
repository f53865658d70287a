//! The live, externally-mutable scene parameters.

use serde::{Deserialize, Serialize};

/// Tessellation slider domain: 0..=8 subdivision rounds.
pub const TESSELLATION_MAX: u32 = 8;
/// Fire speed slider domain.
pub const FIRE_SPEED_MIN: f32 = 1.0;
pub const FIRE_SPEED_MAX: f32 = 6.0;

/// Which set of defaults a scene starts from.
///
/// The two presets correspond to the two program variants this scene has
/// shipped as; they share one code path and differ only in defaults.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScenePreset {
    /// The full fireball scene: dark body, magenta fire.
    #[default]
    Fireball,
    /// The simpler variant's defaults: red body and fire, neutral angles.
    Classic,
}

/// Live scene configuration, mutated by the control surface between ticks
/// and read by the frame driver.
///
/// The frame driver never writes these fields; it keeps its own cached
/// previous-tessellation snapshot to detect cross-tick mutation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParameterState {
    /// Subdivision level for both icospheres, 0..=8.
    pub tessellation: u32,
    /// Body material color as RGB bytes.
    pub body_color: [u8; 3],
    /// Fire material color as RGB bytes.
    pub fire_color: [u8; 3],
    /// Angular position of the body's eyes, radians in [-π, π].
    pub eye_angle: f32,
    /// Fire animation speed multiplier, [1, 6].
    pub fire_speed: f32,
}

impl Default for ParameterState {
    fn default() -> Self {
        Self::preset(ScenePreset::Fireball)
    }
}

impl ParameterState {
    /// Documented defaults for the given preset.
    pub fn preset(preset: ScenePreset) -> Self {
        match preset {
            ScenePreset::Fireball => Self {
                tessellation: 5,
                body_color: [35, 20, 46],
                fire_color: [206, 0, 255],
                eye_angle: 0.7,
                fire_speed: 2.0,
            },
            ScenePreset::Classic => Self {
                tessellation: 5,
                body_color: [190, 30, 30],
                fire_color: [230, 80, 30],
                eye_angle: 0.0,
                fire_speed: 2.0,
            },
        }
    }

    /// Restore the defaults of `preset`, keeping nothing.
    pub fn reset(&mut self, preset: ScenePreset) {
        *self = Self::preset(preset);
    }

    /// Set the tessellation level, clamped to the slider domain.
    pub fn set_tessellation(&mut self, level: u32) {
        self.tessellation = level.min(TESSELLATION_MAX);
    }

    /// Set the eye angle, clamped to [-π, π].
    pub fn set_eye_angle(&mut self, angle: f32) {
        self.eye_angle = angle.clamp(-std::f32::consts::PI, std::f32::consts::PI);
    }

    /// Set the fire speed, clamped to [1, 6].
    pub fn set_fire_speed(&mut self, speed: f32) {
        self.fire_speed = speed.clamp(FIRE_SPEED_MIN, FIRE_SPEED_MAX);
    }

    /// Byte color channels normalized to [0, 1] with full alpha, ready for a
    /// material color uniform.
    pub fn body_color_rgba(&self) -> [f32; 4] {
        rgba_from_bytes(self.body_color)
    }

    /// See [`body_color_rgba`](Self::body_color_rgba).
    pub fn fire_color_rgba(&self) -> [f32; 4] {
        rgba_from_bytes(self.fire_color)
    }
}

fn rgba_from_bytes([r, g, b]: [u8; 3]) -> [f32; 4] {
    [
        f32::from(r) / 255.0,
        f32::from(g) / 255.0,
        f32::from(b) / 255.0,
        1.0,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_fireball_defaults() {
        let p = ParameterState::default();
        assert_eq!(p.tessellation, 5);
        assert_eq!(p.body_color, [35, 20, 46]);
        assert_eq!(p.fire_color, [206, 0, 255]);
        assert!((p.eye_angle - 0.7).abs() < f32::EPSILON);
        assert!((p.fire_speed - 2.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_presets_differ_only_in_defaults() {
        let classic = ParameterState::preset(ScenePreset::Classic);
        assert_eq!(classic.tessellation, 5);
        assert_ne!(classic.body_color, ParameterState::default().body_color);
    }

    #[test]
    fn test_tessellation_clamped_to_slider_domain() {
        let mut p = ParameterState::default();
        p.set_tessellation(12);
        assert_eq!(p.tessellation, TESSELLATION_MAX);
        p.set_tessellation(0);
        assert_eq!(p.tessellation, 0);
    }

    #[test]
    fn test_eye_angle_clamped() {
        let mut p = ParameterState::default();
        p.set_eye_angle(10.0);
        assert!((p.eye_angle - PI).abs() < 1e-6);
        p.set_eye_angle(-10.0);
        assert!((p.eye_angle + PI).abs() < 1e-6);
    }

    #[test]
    fn test_fire_speed_clamped() {
        let mut p = ParameterState::default();
        p.set_fire_speed(0.0);
        assert_eq!(p.fire_speed, FIRE_SPEED_MIN);
        p.set_fire_speed(100.0);
        assert_eq!(p.fire_speed, FIRE_SPEED_MAX);
    }

    #[test]
    fn test_color_normalization() {
        let p = ParameterState {
            fire_color: [255, 0, 51],
            ..ParameterState::default()
        };
        let rgba = p.fire_color_rgba();
        assert_eq!(rgba[0], 1.0);
        assert_eq!(rgba[1], 0.0);
        assert!((rgba[2] - 0.2).abs() < 1e-6);
        assert_eq!(rgba[3], 1.0);
    }

    #[test]
    fn test_reset_restores_preset_defaults() {
        let mut p = ParameterState::default();
        p.set_tessellation(2);
        p.body_color = [0, 0, 0];
        p.reset(ScenePreset::Fireball);
        assert_eq!(p, ParameterState::default());
    }
}
