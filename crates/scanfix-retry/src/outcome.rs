//! Result of one retry sequence

use crate::error::RetryError;

/// How a retry sequence ended
#[derive(Debug)]
pub enum CallOutcome<T, E> {
    /// An attempt succeeded; no further attempts were made
    Success {
        /// Value returned by the successful attempt
        value: T,
        /// Attempts made, including the successful one
        attempts: u32,
    },
    /// No attempt succeeded
    Failure(RetryError<E>),
}

impl<T, E> CallOutcome<T, E> {
    /// Attempts made, whichever way the sequence ended
    #[inline]
    #[must_use]
    pub fn attempts(&self) -> u32 {
        match self {
            Self::Success { attempts, .. } => *attempts,
            Self::Failure(err) => err.attempts(),
        }
    }

    /// Check for success
    #[inline]
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Borrow the value on success
    #[must_use]
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Success { value, .. } => Some(value),
            Self::Failure(_) => None,
        }
    }

    /// Borrow the error on failure
    #[must_use]
    pub fn error(&self) -> Option<&RetryError<E>> {
        match self {
            Self::Success { .. } => None,
            Self::Failure(err) => Some(err),
        }
    }

    /// Convert into a `Result`, dropping the success attempt count
    ///
    /// # Errors
    /// Returns the [`RetryError`] of a failed sequence.
    pub fn into_result(self) -> Result<T, RetryError<E>> {
        match self {
            Self::Success { value, .. } => Ok(value),
            Self::Failure(err) => Err(err),
        }
    }

    /// Transform the success value
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> CallOutcome<U, E> {
        match self {
            Self::Success { value, attempts } => CallOutcome::Success {
                value: f(value),
                attempts,
            },
            Self::Failure(err) => CallOutcome::Failure(err),
        }
    }
}

impl<T, E> From<CallOutcome<T, E>> for Result<T, RetryError<E>> {
    fn from(outcome: CallOutcome<T, E>) -> Self {
        outcome.into_result()
    }
}
