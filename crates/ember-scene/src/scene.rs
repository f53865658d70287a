//! Drawable slots and the per-tick reconcile protocol.

use glam::Vec3;
use tracing::{info, warn};

use ember_geometry::{GeometryError, Icosphere, Mesh, background_quad};

use crate::clock::FrameClock;
use crate::params::{ParameterState, ScenePreset};

/// Fire sphere placement: unit sphere at the origin.
const FIRE_CENTER: Vec3 = Vec3::ZERO;
/// Body sphere placement: unit sphere nudged up so it pokes out of the fire.
const BODY_CENTER: Vec3 = Vec3::new(0.0, 0.09, 0.0);
const SPHERE_RADIUS: f32 = 1.0;

/// What a tick decided, for the frame driver.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameUpdate {
    /// Clock value after this tick's increment.
    pub time: u64,
    /// True when the icospheres were rebuilt and GPU buffers must be
    /// re-uploaded.
    pub rebuilt: bool,
}

/// The CPU side of the scene: both icospheres, the background quad, the
/// frame clock, and the cached tessellation snapshot used to detect
/// cross-tick parameter mutation.
pub struct Scene {
    pub fire: Icosphere,
    pub body: Icosphere,
    pub background: Mesh,
    clock: FrameClock,
    previous_tessellation: u32,
    preset: ScenePreset,
}

impl Scene {
    /// Build every drawable at the current tessellation and zero the clock.
    pub fn load(params: &ParameterState, preset: ScenePreset) -> Result<Self, GeometryError> {
        let level = params.tessellation;
        let fire = Icosphere::build(FIRE_CENTER, SPHERE_RADIUS, level)?;
        let body = Icosphere::build(BODY_CENTER, SPHERE_RADIUS, level)?;
        info!(level, "scene loaded");
        Ok(Self {
            fire,
            body,
            background: background_quad(Vec3::ZERO),
            clock: FrameClock::new(),
            previous_tessellation: level,
            preset,
        })
    }

    /// One tick of the reconcile protocol: advance the clock, then rebuild
    /// both icospheres if the tessellation changed since the last tick.
    ///
    /// A rebuild failure leaves the affected drawable and the cached level
    /// untouched; the tick still completes and whatever drawables are valid
    /// get drawn.
    pub fn tick(&mut self, params: &ParameterState) -> FrameUpdate {
        let time = self.clock.advance();

        let mut rebuilt = false;
        if params.tessellation != self.previous_tessellation {
            rebuilt = self.rebuild_spheres(params.tessellation);
        }

        FrameUpdate { time, rebuilt }
    }

    /// Restore the preset defaults into `params` and reload everything,
    /// synchronously on the calling thread.
    pub fn reset(&mut self, params: &mut ParameterState) -> Result<(), GeometryError> {
        params.reset(self.preset);
        *self = Self::load(params, self.preset)?;
        Ok(())
    }

    /// Wholesale replacement of both tessellation-dependent drawables.
    /// Returns true when both rebuilds succeeded.
    fn rebuild_spheres(&mut self, level: u32) -> bool {
        match (
            Icosphere::build(FIRE_CENTER, SPHERE_RADIUS, level),
            Icosphere::build(BODY_CENTER, SPHERE_RADIUS, level),
        ) {
            (Ok(fire), Ok(body)) => {
                self.fire = fire;
                self.body = body;
                self.previous_tessellation = level;
                info!(level, "icospheres rebuilt");
                true
            }
            (Err(e), _) | (_, Err(e)) => {
                warn!(level, error = %e, "icosphere rebuild failed; keeping previous meshes");
                false
            }
        }
    }

    /// Clock value of the last completed tick.
    pub fn time(&self) -> u64 {
        self.clock.time()
    }

    /// The tessellation level the current meshes were built at.
    pub fn previous_tessellation(&self) -> u32 {
        self.previous_tessellation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene_with(params: &ParameterState) -> Scene {
        Scene::load(params, ScenePreset::Fireball).unwrap()
    }

    #[test]
    fn test_load_builds_all_drawables_at_requested_level() {
        let params = ParameterState {
            tessellation: 2,
            ..ParameterState::default()
        };
        let scene = scene_with(&params);
        assert_eq!(scene.fire.level, 2);
        assert_eq!(scene.body.level, 2);
        assert_eq!(scene.background.triangle_count(), 2);
        assert_eq!(scene.time(), 0);
    }

    #[test]
    fn test_clock_counts_ticks() {
        let params = ParameterState::default();
        let mut scene = scene_with(&params);
        for n in 1..=10 {
            let update = scene.tick(&params);
            assert_eq!(update.time, n);
        }
        assert_eq!(scene.time(), 10);
    }

    #[test]
    fn test_unchanged_tessellation_never_rebuilds() {
        let params = ParameterState::default();
        let mut scene = scene_with(&params);
        for _ in 0..5 {
            assert!(!scene.tick(&params).rebuilt);
        }
    }

    #[test]
    fn test_tessellation_change_rebuilds_exactly_once() {
        let mut params = ParameterState::default();
        assert_eq!(params.tessellation, 5);
        let mut scene = scene_with(&params);

        params.set_tessellation(3);
        let update = scene.tick(&params);
        assert!(update.rebuilt);
        assert_eq!(scene.fire.level, 3);
        assert_eq!(scene.body.level, 3);
        assert_eq!(scene.previous_tessellation(), 3);

        // Subsequent ticks with the same value are quiescent.
        assert!(!scene.tick(&params).rebuilt);
        assert!(!scene.tick(&params).rebuilt);
    }

    #[test]
    fn test_rebuild_does_not_disturb_clock() {
        let mut params = ParameterState::default();
        let mut scene = scene_with(&params);
        scene.tick(&params);
        params.set_tessellation(1);
        let update = scene.tick(&params);
        assert_eq!(update.time, 2);
    }

    #[test]
    fn test_failed_rebuild_keeps_meshes_level_and_clock() {
        use ember_geometry::MAX_SUBDIVISIONS;

        let mut params = ParameterState::default();
        let mut scene = scene_with(&params);
        scene.tick(&params);

        // Bypass the clamped setter; the build itself must reject the level.
        params.tessellation = MAX_SUBDIVISIONS + 1;
        let update = scene.tick(&params);

        assert!(!update.rebuilt);
        assert_eq!(update.time, 2);
        assert_eq!(scene.fire.level, 5);
        assert_eq!(scene.body.level, 5);
        assert_eq!(scene.previous_tessellation(), 5);
    }

    #[test]
    fn test_reset_restores_defaults_and_zeroes_clock() {
        let mut params = ParameterState::default();
        let mut scene = scene_with(&params);
        for _ in 0..4 {
            scene.tick(&params);
        }
        params.set_tessellation(1);
        params.body_color = [1, 2, 3];
        scene.tick(&params);

        scene.reset(&mut params).unwrap();
        assert_eq!(params, ParameterState::default());
        assert_eq!(scene.time(), 0);
        assert_eq!(scene.fire.level, params.tessellation);
        assert_eq!(scene.previous_tessellation(), params.tessellation);
    }

    #[test]
    fn test_spheres_share_level_but_not_center() {
        let params = ParameterState::default();
        let scene = scene_with(&params);
        assert_eq!(scene.fire.center, FIRE_CENTER);
        assert_eq!(scene.body.center, BODY_CENTER);
    }
}
