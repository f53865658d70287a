//! Scene state for the Ember renderer.
//!
//! Owns the live parameter record mutated by the control surface, the
//! monotonic frame clock, and the drawable slots, together with the per-tick
//! reconcile protocol that detects tessellation changes and rebuilds the
//! icospheres. Everything here is CPU-only and deterministic.

pub mod clock;
pub mod params;
pub mod scene;

pub use clock::FrameClock;
pub use params::{ParameterState, ScenePreset};
pub use scene::{FrameUpdate, Scene};
