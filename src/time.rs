//! Fixed-rate timers driven by wall-clock timestamps (accumulator pattern).
//!
//! `draw_web()` calls at ~60fps with variable delta. A `FixedTimer` turns
//! that into a whole number of firings at a fixed period, so the simulation
//! stays deterministic and testable without a real clock.

pub struct FixedTimer {
    /// Milliseconds between firings (e.g. 100ms = 10 ticks/sec).
    period_ms: f64,
    /// Largest frame delta accepted in one update.
    max_delta_ms: f64,
    /// Accumulated milliseconds not yet consumed as firings.
    accumulator: f64,
    /// Timestamp of the last update (ms), None if first frame.
    last_timestamp: Option<f64>,
    /// Total firings since creation.
    pub total_fired: u64,
    stopped: bool,
}

impl FixedTimer {
    pub fn new(period_ms: f64, max_delta_ms: f64) -> Self {
        Self {
            period_ms: period_ms.max(1.0),
            max_delta_ms: max_delta_ms.max(0.0),
            accumulator: 0.0,
            last_timestamp: None,
            total_fired: 0,
            stopped: false,
        }
    }

    /// Feed a wall-clock timestamp (from `performance.now()` or similar).
    /// Returns how many times the timer fires this frame.
    pub fn update(&mut self, now_ms: f64) -> u32 {
        if self.stopped {
            return 0;
        }
        let delta = match self.last_timestamp {
            // Clamp to avoid spiral-of-death if the tab was backgrounded.
            Some(prev) => (now_ms - prev).clamp(0.0, self.max_delta_ms),
            None => 0.0,
        };
        self.last_timestamp = Some(now_ms);

        self.accumulator += delta;
        let fired = (self.accumulator / self.period_ms) as u32;
        self.accumulator -= fired as f64 * self.period_ms;
        self.total_fired += fired as u64;
        fired
    }

    /// Cancel the timer. Later updates never fire.
    pub fn stop(&mut self) {
        self.stopped = true;
        self.accumulator = 0.0;
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }
}
