use std::time::Duration;

/// Tracks simulation time: a monotonic tick counter and the total time advanced.
#[derive(Debug, Clone, Default)]
pub struct SimClock {
    tick: u64,
    elapsed: Duration,
}

impl SimClock {
    /// Create a clock at tick 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the clock by one tick of length `delta`. Returns the new tick number.
    pub fn advance(&mut self, delta: Duration) -> u64 {
        self.tick += 1;
        self.elapsed += delta;
        self.tick
    }

    /// Return the current tick number.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Total simulated time since the clock started.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }
}
