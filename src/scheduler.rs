//! Recompute throttling.
//!
//! Path queries against the oracle are geometry work and comparatively
//! expensive, so they are not issued on every display refresh. The
//! [`RecomputeScheduler`] accumulates frame deltas and releases exactly one
//! query each time the accumulator crosses the recompute interval. The
//! remaining-distance readout, being pure arithmetic over the last known
//! polyline, refreshes every tick regardless.

use crate::config::SchedulerConfig;

/// Fixed-interval throttle for oracle queries.
#[derive(Debug, Clone)]
pub struct RecomputeScheduler {
    /// Seconds between released queries.
    interval_s: f32,

    /// Accumulated wall-clock time since the last released query.
    elapsed: f32,
}

impl RecomputeScheduler {
    /// Create a scheduler with the configured recompute interval.
    pub fn new(config: &SchedulerConfig) -> Self {
        Self {
            interval_s: config.recompute_interval_s,
            elapsed: 0.0,
        }
    }

    /// Advance by one frame delta.
    ///
    /// Returns `true` when one oracle query should be issued now. The
    /// interval is subtracted rather than the accumulator cleared, so time
    /// beyond the threshold carries over to the next cycle.
    pub fn tick(&mut self, delta_s: f32) -> bool {
        self.elapsed += delta_s;
        if self.elapsed > self.interval_s {
            self.elapsed -= self.interval_s;
            return true;
        }
        false
    }

    /// Drop any accumulated time (on destination change or stop).
    pub fn reset(&mut self) {
        self.elapsed = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scheduler(interval_s: f32) -> RecomputeScheduler {
        RecomputeScheduler::new(&SchedulerConfig {
            recompute_interval_s: interval_s,
        })
    }

    #[test]
    fn test_fires_after_interval() {
        let mut s = scheduler(0.1);

        assert!(!s.tick(0.04));
        assert!(!s.tick(0.04));
        assert!(s.tick(0.04)); // 0.12 accumulated
        assert!(!s.tick(0.04)); // 0.06 carried over
    }

    #[test]
    fn test_fires_once_per_tick() {
        let mut s = scheduler(0.1);

        // a long frame releases a single query, remainder carries over
        assert!(s.tick(0.35));
        assert!(s.tick(0.0));
        assert!(s.tick(0.0));
        assert!(!s.tick(0.0)); // debt drained
    }

    #[test]
    fn test_reset_clears_accumulator() {
        let mut s = scheduler(0.1);
        s.tick(0.09);
        s.reset();
        assert!(!s.tick(0.09));
        assert!(s.tick(0.02));
    }
}
