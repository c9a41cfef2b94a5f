//! Retry policy and its configuration
//!
//! [`RetryPolicy`] is immutable once built and always valid:
//! `max_attempts >= 1` and `max_delay >= initial_delay`.
//! [`RetryPolicyConfig`] is the raw, millisecond-based form read from TOML.

use crate::error::PolicyError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default number of attempts
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
/// Default delay before the second attempt
pub const DEFAULT_INITIAL_DELAY: Duration = Duration::from_millis(1000);
/// Default cap on the exponential backoff
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_millis(30_000);
/// Default upper bound of the random jitter
pub const DEFAULT_JITTER_CEILING: Duration = Duration::from_millis(1000);

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Validated retry policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RetryPolicyConfig", into = "RetryPolicyConfig")]
pub struct RetryPolicy {
    max_attempts: u32,
    initial_delay: Duration,
    max_delay: Duration,
    jitter_ceiling: Duration,
}

impl RetryPolicy {
    /// Create a policy with the default jitter ceiling
    ///
    /// # Errors
    /// Returns [`PolicyError::ZeroAttempts`] if `max_attempts` is zero and
    /// [`PolicyError::DelayOrder`] if `max_delay < initial_delay`.
    pub fn new(
        max_attempts: u32,
        initial_delay: Duration,
        max_delay: Duration,
    ) -> Result<Self, PolicyError> {
        if max_attempts == 0 {
            return Err(PolicyError::ZeroAttempts);
        }
        if max_delay < initial_delay {
            return Err(PolicyError::DelayOrder {
                initial_ms: millis(initial_delay),
                max_ms: millis(max_delay),
            });
        }
        Ok(Self {
            max_attempts,
            initial_delay,
            max_delay,
            jitter_ceiling: DEFAULT_JITTER_CEILING,
        })
    }

    /// With a different jitter ceiling (zero disables jitter)
    #[inline]
    #[must_use]
    pub fn with_jitter_ceiling(mut self, ceiling: Duration) -> Self {
        self.jitter_ceiling = ceiling;
        self
    }

    /// Maximum number of attempts, at least 1
    #[inline]
    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Backoff before the second attempt
    #[inline]
    #[must_use]
    pub fn initial_delay(&self) -> Duration {
        self.initial_delay
    }

    /// Cap on the exponential backoff
    #[inline]
    #[must_use]
    pub fn max_delay(&self) -> Duration {
        self.max_delay
    }

    /// Inclusive upper bound of the random jitter
    #[inline]
    #[must_use]
    pub fn jitter_ceiling(&self) -> Duration {
        self.jitter_ceiling
    }

    /// Deterministic backoff after the failed `attempt` (1-based):
    /// `min(initial_delay * 2^(attempt - 1), max_delay)`.
    ///
    /// Saturates at `max_delay` instead of overflowing.
    #[must_use]
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        if self.initial_delay.is_zero() {
            return Duration::ZERO;
        }
        let exponent = attempt.saturating_sub(1);
        let initial = self.initial_delay.as_nanos();
        // Shifts this large exceed any Duration, so the cap applies.
        if exponent >= initial.leading_zeros() {
            return self.max_delay;
        }
        let scaled = initial << exponent;
        if scaled >= self.max_delay.as_nanos() {
            return self.max_delay;
        }
        // Below max_delay, so the whole seconds fit in u64.
        let secs = u64::try_from(scaled / NANOS_PER_SEC).unwrap_or(u64::MAX);
        let nanos = u32::try_from(scaled % NANOS_PER_SEC).unwrap_or(0);
        Duration::new(secs, nanos)
    }

    /// Parse and validate a policy from TOML text
    ///
    /// # Errors
    /// Returns [`PolicyError::Parse`] for malformed TOML or unknown keys, and
    /// the validation errors of [`RetryPolicy::new`].
    pub fn from_toml_str(text: &str) -> Result<Self, PolicyError> {
        RetryPolicyConfig::from_toml_str(text)?.try_into()
    }

    /// Load and validate a policy from a TOML file
    ///
    /// # Errors
    /// Returns [`PolicyError::Io`] if the file cannot be read, otherwise as
    /// [`RetryPolicy::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PolicyError> {
        RetryPolicyConfig::load(path)?.try_into()
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            initial_delay: DEFAULT_INITIAL_DELAY,
            max_delay: DEFAULT_MAX_DELAY,
            jitter_ceiling: DEFAULT_JITTER_CEILING,
        }
    }
}

/// Raw policy values as written in a config file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RetryPolicyConfig {
    /// Maximum number of attempts
    pub max_attempts: u32,
    /// Backoff before the second attempt, in milliseconds
    pub initial_delay_ms: u64,
    /// Cap on the exponential backoff, in milliseconds
    pub max_delay_ms: u64,
    /// Inclusive upper bound of the random jitter, in milliseconds
    #[serde(default = "default_jitter_ceiling_ms")]
    pub jitter_ceiling_ms: u64,
}

fn default_jitter_ceiling_ms() -> u64 {
    millis(DEFAULT_JITTER_CEILING)
}

impl RetryPolicyConfig {
    /// Parse raw values from TOML text without validating them
    ///
    /// # Errors
    /// Returns [`PolicyError::Parse`] for malformed TOML or unknown keys.
    pub fn from_toml_str(text: &str) -> Result<Self, PolicyError> {
        Ok(toml::from_str(text)?)
    }

    /// Read raw values from a TOML file without validating them
    ///
    /// # Errors
    /// Returns [`PolicyError::Io`] or [`PolicyError::Parse`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PolicyError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| PolicyError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "loaded retry policy config");
        Self::from_toml_str(&text)
    }
}

impl Default for RetryPolicyConfig {
    fn default() -> Self {
        RetryPolicy::default().into()
    }
}

impl TryFrom<RetryPolicyConfig> for RetryPolicy {
    type Error = PolicyError;

    fn try_from(config: RetryPolicyConfig) -> Result<Self, Self::Error> {
        Ok(Self::new(
            config.max_attempts,
            Duration::from_millis(config.initial_delay_ms),
            Duration::from_millis(config.max_delay_ms),
        )?
        .with_jitter_ceiling(Duration::from_millis(config.jitter_ceiling_ms)))
    }
}

impl From<RetryPolicy> for RetryPolicyConfig {
    fn from(policy: RetryPolicy) -> Self {
        Self {
            max_attempts: policy.max_attempts,
            initial_delay_ms: millis(policy.initial_delay),
            max_delay_ms: millis(policy.max_delay),
            jitter_ceiling_ms: millis(policy.jitter_ceiling),
        }
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn policy(initial_ms: u64, max_ms: u64) -> RetryPolicy {
        RetryPolicy::new(
            5,
            Duration::from_millis(initial_ms),
            Duration::from_millis(max_ms),
        )
        .unwrap()
    }

    #[test]
    fn rejects_zero_attempts() {
        let err = RetryPolicy::new(0, Duration::ZERO, Duration::ZERO).unwrap_err();
        assert!(matches!(err, PolicyError::ZeroAttempts));
    }

    #[test]
    fn rejects_max_below_initial() {
        let err = RetryPolicy::new(3, Duration::from_millis(200), Duration::from_millis(100))
            .unwrap_err();
        assert!(matches!(
            err,
            PolicyError::DelayOrder {
                initial_ms: 200,
                max_ms: 100
            }
        ));
    }

    #[test]
    fn equal_delays_are_valid() {
        let p = policy(250, 250);
        assert_eq!(p.backoff_delay(1), Duration::from_millis(250));
        assert_eq!(p.backoff_delay(4), Duration::from_millis(250));
    }

    #[test]
    fn backoff_doubles_then_caps() {
        let p = policy(100, 1000);
        let delays: Vec<u64> = (1..=6)
            .map(|attempt| millis(p.backoff_delay(attempt)))
            .collect();
        assert_eq!(delays, vec![100, 200, 400, 800, 1000, 1000]);
    }

    #[test]
    fn backoff_saturates_for_huge_attempts() {
        let p = policy(1, 60_000);
        assert_eq!(p.backoff_delay(40), Duration::from_millis(60_000));
        assert_eq!(p.backoff_delay(u32::MAX), Duration::from_millis(60_000));
    }

    #[test]
    fn zero_initial_delay_never_waits() {
        let p = policy(0, 5000);
        assert_eq!(p.backoff_delay(10), Duration::ZERO);
    }

    #[test]
    fn zero_initial_delay_stays_zero_past_u32_exponents() {
        let p = policy(0, 5000);
        assert_eq!(p.backoff_delay(33), Duration::ZERO);
        assert_eq!(p.backoff_delay(u32::MAX), Duration::ZERO);
    }

    #[test]
    fn tiny_initial_delay_uses_exact_product_beyond_u32_factor() {
        let p = RetryPolicy::new(40, Duration::from_nanos(1), Duration::from_secs(3600)).unwrap();
        assert_eq!(p.backoff_delay(33), Duration::from_nanos(1 << 32));
        assert_eq!(p.backoff_delay(34), Duration::from_nanos(1 << 33));
        assert_eq!(p.backoff_delay(u32::MAX), Duration::from_secs(3600));
    }

    #[test]
    fn product_with_sub_second_part_is_exact() {
        let p = policy(150, 10_000);
        assert_eq!(p.backoff_delay(4), Duration::from_millis(1200));
    }

    #[test]
    fn default_policy_values() {
        let p = RetryPolicy::default();
        assert_eq!(p.max_attempts(), 3);
        assert_eq!(p.initial_delay(), Duration::from_secs(1));
        assert_eq!(p.max_delay(), Duration::from_secs(30));
        assert_eq!(p.jitter_ceiling(), Duration::from_secs(1));
    }

    #[test]
    fn parses_toml_with_default_jitter() {
        let p = RetryPolicy::from_toml_str(
            "max_attempts = 4\ninitial_delay_ms = 50\nmax_delay_ms = 400\n",
        )
        .unwrap();
        assert_eq!(p.max_attempts(), 4);
        assert_eq!(p.initial_delay(), Duration::from_millis(50));
        assert_eq!(p.max_delay(), Duration::from_millis(400));
        assert_eq!(p.jitter_ceiling(), DEFAULT_JITTER_CEILING);
    }

    #[test]
    fn toml_validation_errors_are_precise() {
        let err = RetryPolicy::from_toml_str(
            "max_attempts = 0\ninitial_delay_ms = 50\nmax_delay_ms = 400\n",
        )
        .unwrap_err();
        assert!(matches!(err, PolicyError::ZeroAttempts));
    }

    #[test]
    fn toml_rejects_unknown_keys() {
        let err = RetryPolicy::from_toml_str(
            "max_attempts = 2\ninitial_delay_ms = 1\nmax_delay_ms = 2\ncircuit_breaker = true\n",
        )
        .unwrap_err();
        assert!(matches!(err, PolicyError::Parse(_)));
    }

    #[test]
    fn config_round_trips_through_policy() {
        let p = policy(10, 20).with_jitter_ceiling(Duration::ZERO);
        let config = RetryPolicyConfig::from(p);
        assert_eq!(config.jitter_ceiling_ms, 0);
        assert_eq!(RetryPolicy::try_from(config).unwrap(), p);
    }
}
