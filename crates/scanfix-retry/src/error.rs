//! Error types for retry sequences
//!
//! - [`RetryError`]: how a retry sequence ended without a value
//! - [`PolicyError`]: invalid policy values or unreadable config

use std::path::PathBuf;

/// Terminal failure of a retry sequence.
///
/// Every variant records how many attempts were made. The wrapped
/// operation's own error is carried unchanged.
#[derive(Debug, thiserror::Error)]
pub enum RetryError<E> {
    /// All attempts failed
    #[error("retry exhausted after {attempts} attempt(s): {last_error}")]
    Exhausted {
        /// Error returned by the final attempt
        last_error: E,
        /// Attempts made (equals the policy's `max_attempts`)
        attempts: u32,
    },

    /// The retry predicate refused to retry this error
    #[error("non-retryable failure on attempt {attempts}: {error}")]
    Rejected {
        /// The error that stopped the sequence
        error: E,
        /// Attempts made, including the rejected one
        attempts: u32,
    },

    /// The sequence was abandoned by its caller
    #[error("retry cancelled after {attempts} attempt(s)")]
    Cancelled {
        /// Error of the last completed attempt, if any failed
        last_error: Option<E>,
        /// Attempts started before cancellation
        attempts: u32,
    },
}

impl<E> RetryError<E> {
    /// Number of attempts made before the sequence ended
    #[inline]
    #[must_use]
    pub fn attempts(&self) -> u32 {
        match self {
            Self::Exhausted { attempts, .. }
            | Self::Rejected { attempts, .. }
            | Self::Cancelled { attempts, .. } => *attempts,
        }
    }

    /// Check if every attempt was used up
    #[inline]
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::Exhausted { .. })
    }

    /// Check if the sequence was cancelled
    #[inline]
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }

    /// Borrow the underlying operation error, if one was recorded
    #[must_use]
    pub fn inner(&self) -> Option<&E> {
        match self {
            Self::Exhausted { last_error, .. } => Some(last_error),
            Self::Rejected { error, .. } => Some(error),
            Self::Cancelled { last_error, .. } => last_error.as_ref(),
        }
    }

    /// Take the underlying operation error, if one was recorded
    #[must_use]
    pub fn into_inner(self) -> Option<E> {
        match self {
            Self::Exhausted { last_error, .. } => Some(last_error),
            Self::Rejected { error, .. } => Some(error),
            Self::Cancelled { last_error, .. } => last_error,
        }
    }
}

/// Retry policy errors
#[derive(Debug, thiserror::Error)]
pub enum PolicyError {
    /// `max_attempts` was zero
    #[error("max_attempts must be at least 1")]
    ZeroAttempts,

    /// `max_delay` smaller than `initial_delay`
    #[error("max_delay ({max_ms}ms) must not be less than initial_delay ({initial_ms}ms)")]
    DelayOrder {
        /// Configured initial delay in milliseconds
        initial_ms: u64,
        /// Configured maximum delay in milliseconds
        max_ms: u64,
    },

    /// Config file could not be read
    #[error("failed to read policy file {}: {source}", path.display())]
    Io {
        /// Path that was read
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Config text is not valid TOML for a policy
    #[error("invalid policy config: {0}")]
    Parse(#[from] toml::de::Error),
}
