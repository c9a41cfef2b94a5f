//! Jitter sources
//!
//! Jitter spreads out retries of independent callers that failed at the
//! same moment. Samples are whole milliseconds in `0..=ceiling`.

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;

/// Source of the random delay added to each backoff
pub trait Jitter: Send + Sync {
    /// Sample a delay in `0..=ceiling`
    fn sample(&self, ceiling: Duration) -> Duration;
}

/// Thread-local RNG jitter (default)
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomJitter;

impl Jitter for RandomJitter {
    fn sample(&self, ceiling: Duration) -> Duration {
        sample_with(&mut rand::rng(), ceiling)
    }
}

/// Reproducible jitter from a fixed seed
///
/// Sequences sharing one `SeededJitter` draw from the same stream, so the
/// exact per-call values depend on interleaving; the bound still holds.
#[derive(Debug)]
pub struct SeededJitter {
    rng: Mutex<StdRng>,
}

impl SeededJitter {
    /// Create from a seed
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Jitter for SeededJitter {
    fn sample(&self, ceiling: Duration) -> Duration {
        sample_with(&mut *self.rng.lock(), ceiling)
    }
}

/// No jitter at all
#[derive(Debug, Clone, Copy, Default)]
pub struct NoJitter;

impl Jitter for NoJitter {
    fn sample(&self, _ceiling: Duration) -> Duration {
        Duration::ZERO
    }
}

fn sample_with<R: Rng>(rng: &mut R, ceiling: Duration) -> Duration {
    // Truncating to whole milliseconds keeps the sample at or below the ceiling.
    let ceiling_ms = u64::try_from(ceiling.as_millis()).unwrap_or(u64::MAX);
    if ceiling_ms == 0 {
        return Duration::ZERO;
    }
    Duration::from_millis(rng.random_range(0..=ceiling_ms))
}
