//! The frame clock driving every time-dependent uniform.

/// A monotonically increasing tick counter.
///
/// Incremented exactly once per frame-driver tick and shared read-only by
/// every material's time uniform. Zeroed only by a full scene load.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameClock {
    time: u64,
}

impl FrameClock {
    /// A clock at time zero.
    pub fn new() -> Self {
        Self { time: 0 }
    }

    /// Advance by one tick and return the new time.
    pub fn advance(&mut self) -> u64 {
        self.time += 1;
        self.time
    }

    /// Current tick count.
    pub fn time(&self) -> u64 {
        self.time
    }

    /// Zero the clock. Only a full scene load calls this.
    pub fn reset(&mut self) {
        self.time = 0;
    }
}
