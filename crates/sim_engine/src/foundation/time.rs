//! Time management utilities

/// Fixed-step simulation clock
///
/// Time only moves when [`SimClock::advance`] is called, so a paused
/// simulation simply stops advancing and resumes with no time debt.
#[derive(Debug, Clone)]
pub struct SimClock {
    tick: u64,
    tick_rate: f32,
    delta_time: f32,
}

impl SimClock {
    /// Create a clock stepping at `tick_rate` ticks per second
    ///
    /// Non-positive or non-finite rates fall back to 60 Hz.
    pub fn new(tick_rate: f32) -> Self {
        let tick_rate = if tick_rate.is_finite() && tick_rate > 0.0 {
            tick_rate
        } else {
            log::warn!("Invalid tick rate {tick_rate}, using 60 Hz");
            60.0
        };
        Self {
            tick: 0,
            tick_rate,
            delta_time: 1.0 / tick_rate,
        }
    }

    /// Advance the clock by one tick and return the new tick number
    pub fn advance(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }

    /// Current tick number
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Seconds per tick
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Ticks per second
    pub fn tick_rate(&self) -> f32 {
        self.tick_rate
    }

    /// Simulated seconds since the clock started
    pub fn elapsed(&self) -> f32 {
        self.tick as f32 * self.delta_time
    }

    /// Number of whole ticks covering `seconds` (rounded up, at least one)
    pub fn seconds_to_ticks(&self, seconds: f32) -> u64 {
        if !seconds.is_finite() || seconds <= 0.0 {
            return 1;
        }
        // Guard against 0.5 * 60.0 landing a hair above 30.0
        let ticks = (seconds * self.tick_rate - 1e-4).ceil();
        (ticks as u64).max(1)
    }

    /// Tick number `seconds` from now
    ///
    /// Saturates at `u64::MAX` for delays too long to represent.
    pub fn ticks_after(&self, seconds: f32) -> u64 {
        self.tick.saturating_add(self.seconds_to_ticks(seconds))
    }
}

impl Default for SimClock {
    fn default() -> Self {
        Self::new(60.0)
    }
}
