// RouteWatch - core/state.rs
//
// Process-wide tracking state: the save counter and the timing baseline.
// Owned by the classifier; nothing else mutates it.

use std::time::{Duration, Instant};

/// Monotonic time source.
pub trait Clock {
    fn now(&self) -> Instant;
}

/// `Instant::now()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MonotonicClock;

impl Clock for MonotonicClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Iteration counter and timestamp baseline.
#[derive(Debug, Clone)]
pub struct ProcessState {
    iterations: u64,
    baseline: Instant,
}

impl ProcessState {
    /// Fresh state: zero iterations, baseline at `now`.
    pub fn new(now: Instant) -> Self {
        Self {
            iterations: 0,
            baseline: now,
        }
    }

    /// Saves recognised so far.
    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    /// Instant of the most recent route start or save.
    pub fn baseline(&self) -> Instant {
        self.baseline
    }

    /// Route started: restart timing without touching the counter.
    pub fn mark_route_start(&mut self, now: Instant) {
        self.baseline = now;
    }

    /// Save recognised: bump the counter, measure since the baseline, then
    /// move the baseline to `now`.
    ///
    /// Returns the new count and the elapsed time. The subtraction saturates,
    /// so a clock reading older than the baseline reports zero.
    pub fn record_save(&mut self, now: Instant) -> (u64, Duration) {
        self.iterations += 1;
        let elapsed = now.saturating_duration_since(self.baseline);
        self.baseline = now;
        (self.iterations, elapsed)
    }
}
