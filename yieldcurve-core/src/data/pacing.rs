//! Inter-request pacing.
//!
//! The exchange throttles clients that hit detail pages back to back, so a
//! refresh run pauses a random interval between instruments. Tests inject
//! `NoPacing`.

use rand::Rng;
use std::time::Duration;

/// Pause policy applied between consecutive fetches.
pub trait Pacer {
    fn pause(&self);
}

/// Sleeps a uniformly random duration in `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RandomPacer {
    min: Duration,
    max: Duration,
}

impl RandomPacer {
    /// Bounds are swapped if given in the wrong order.
    pub fn new(min: Duration, max: Duration) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    pub fn from_millis(min_ms: u64, max_ms: u64) -> Self {
        Self::new(Duration::from_millis(min_ms), Duration::from_millis(max_ms))
    }

    /// Draw the next delay.
    pub fn next_delay(&self) -> Duration {
        if self.min == self.max {
            return self.min;
        }
        let lo = u64::try_from(self.min.as_nanos()).unwrap_or(u64::MAX);
        let hi = u64::try_from(self.max.as_nanos()).unwrap_or(u64::MAX);
        Duration::from_nanos(rand::thread_rng().gen_range(lo..=hi))
    }
}

impl Default for RandomPacer {
    fn default() -> Self {
        Self::from_millis(300, 700)
    }
}

impl Pacer for RandomPacer {
    fn pause(&self) {
        let delay = self.next_delay();
        tracing::trace!(delay_ms = delay.as_millis() as u64, "pacing");
        std::thread::sleep(delay);
    }
}

/// Never sleeps.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPacing;

impl Pacer for NoPacing {
    fn pause(&self) {}
}
