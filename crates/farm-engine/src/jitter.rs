//! Injected random delay between claim and restart
//!
//! The pause before restarting a cycle is an anti-automation-detection
//! measure, not a correctness requirement. It sits behind a trait so tests
//! can pin it to a known value.

use std::time::Duration;

use rand::RngExt;

/// Bounds of the claim → restart pause, in whole seconds.
const JITTER_RANGE_SECS: (u64, u64) = (1, 10);

/// Source of the delay between a claim and the following start.
pub trait JitterSource: Send + Sync {
    fn restart_delay(&self) -> Duration;
}

/// Production source: uniform whole seconds in [1, 10] from the thread RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRngJitter;

impl JitterSource for ThreadRngJitter {
    fn restart_delay(&self) -> Duration {
        let (lo, hi) = JITTER_RANGE_SECS;
        Duration::from_secs(rand::rng().random_range(lo..=hi))
    }
}

/// Deterministic source for tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedJitter(pub Duration);

impl JitterSource for FixedJitter {
    fn restart_delay(&self) -> Duration {
        self.0
    }
}
