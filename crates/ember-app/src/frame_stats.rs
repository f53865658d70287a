//! Per-frame timing metrics published to the control surface.

use std::time::Instant;

/// Wall-clock frame statistics. The fps readout is an exponential moving
/// average so a single slow frame does not make the number jump around.
pub struct FrameStats {
    start_time: Instant,
    last_frame: Instant,
    frame_count: u64,
    fps: f64,
    frame_time_ms: f64,
}

impl FrameStats {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start_time: now,
            last_frame: now,
            frame_count: 0,
            fps: 0.0,
            frame_time_ms: 0.0,
        }
    }

    /// Record the completion of a frame, measuring against the previous call.
    pub fn tick(&mut self) {
        let now = Instant::now();
        let dt = now.duration_since(self.last_frame).as_secs_f64();
        self.last_frame = now;
        self.record(dt);
    }

    /// Fold an explicit frame duration into the running averages.
    fn record(&mut self, dt_seconds: f64) {
        self.frame_time_ms = dt_seconds * 1000.0;
        if dt_seconds > 0.0 {
            let instantaneous = 1.0 / dt_seconds;
            self.fps = if self.frame_count == 0 {
                instantaneous
            } else {
                0.9 * self.fps + 0.1 * instantaneous
            };
        }
        self.frame_count += 1;
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn fps(&self) -> f64 {
        self.fps
    }

    pub fn frame_time_ms(&self) -> f64 {
        self.frame_time_ms
    }

    pub fn uptime_seconds(&self) -> f64 {
        self.start_time.elapsed().as_secs_f64()
    }
}

impl Default for FrameStats {
    fn default() -> Self {
        Self::new()
    }
}
