//! Tick rate measurement
//!
//! Tracks when a periodic callback fires and reports its effective rate over
//! a sliding window, so the capture throttle and render loop can be checked
//! against their targets.

use std::collections::VecDeque;
use std::time::Instant;

/// Sliding-window tick rate counter
#[derive(Debug, Clone)]
pub struct TickRate {
    /// Recent tick timestamps, oldest first
    ticks: VecDeque<Instant>,
    /// Maximum timestamps to keep
    max_samples: usize,
    /// Total ticks recorded
    total: u64,
}

impl Default for TickRate {
    fn default() -> Self {
        Self::new(120)
    }
}

impl TickRate {
    /// Create a counter that keeps the last `max_samples` ticks
    pub fn new(max_samples: usize) -> Self {
        let max_samples = max_samples.max(2);
        Self {
            ticks: VecDeque::with_capacity(max_samples),
            max_samples,
            total: 0,
        }
    }

    /// Record a tick at `now`
    pub fn record(&mut self, now: Instant) {
        self.ticks.push_back(now);
        if self.ticks.len() > self.max_samples {
            self.ticks.pop_front();
        }
        self.total += 1;
    }

    /// Ticks per second over the window (0 until two ticks are recorded)
    pub fn rate(&self) -> f64 {
        let (Some(first), Some(last)) = (self.ticks.front(), self.ticks.back()) else {
            return 0.0;
        };
        let span = last.duration_since(*first).as_secs_f64();
        if span <= 0.0 {
            return 0.0;
        }
        (self.ticks.len() - 1) as f64 / span
    }

    /// Total ticks recorded since creation
    pub fn total(&self) -> u64 {
        self.total
    }
}
