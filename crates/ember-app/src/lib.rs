//! Application shell: window lifecycle, frame pacing, and wiring between
//! the scene, the renderer, and the control API.

pub mod frame_stats;
pub mod window;

pub use frame_stats::FrameStats;
pub use window::{AppState, run_with_config, window_attributes_from_config};
