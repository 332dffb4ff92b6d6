//! Randomized pacing between navigations
//!
//! Every navigation against the target surface is preceded by a delay drawn
//! uniformly from a bounded range. With a single control thread this is the
//! whole rate-limiting story; a parallel design would need a shared limiter
//! across workers instead.

use rand::Rng;
use std::time::Duration;

/// Uniform random delay in `[min, max]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacer {
    min: Duration,
    max: Duration,
}

impl Pacer {
    /// Create a pacer; bounds are swapped if given in the wrong order
    #[must_use]
    pub fn new(min: Duration, max: Duration) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    #[must_use]
    pub fn from_millis((min, max): (u64, u64)) -> Self {
        Self::new(Duration::from_millis(min), Duration::from_millis(max))
    }

    /// A pacer that never sleeps
    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            min: Duration::ZERO,
            max: Duration::ZERO,
        }
    }

    /// Draw the next delay
    #[must_use]
    pub fn next_delay(&self) -> Duration {
        if self.min == self.max {
            return self.min;
        }
        let millis = rand::rng().random_range(self.min.as_millis()..=self.max.as_millis());
        Duration::from_millis(u64::try_from(millis).unwrap_or(u64::MAX))
    }

    /// Sleep for a freshly drawn delay
    pub async fn pause(&self) {
        let delay = self.next_delay();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}
