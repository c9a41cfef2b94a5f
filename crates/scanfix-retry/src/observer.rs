//! Per-attempt and per-wait events
//!
//! Every event is logged through `tracing`; registered [`RetryObserver`]s
//! receive the same events for metrics or assertions.

use std::time::Duration;

/// Something that happened inside one retry sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryEvent {
    /// An attempt is about to run
    AttemptStarted {
        /// 1-based attempt number
        attempt: u32,
    },
    /// An attempt returned an error
    AttemptFailed {
        /// 1-based attempt number
        attempt: u32,
        /// Rendered error
        error: String,
        /// Whether the retry predicate accepted the error
        retryable: bool,
    },
    /// A wait was scheduled after a failed attempt
    BackoffScheduled {
        /// Attempt that just failed
        attempt: u32,
        /// Deterministic backoff part
        backoff: Duration,
        /// Random jitter part
        jitter: Duration,
    },
    /// An attempt succeeded
    Succeeded {
        /// Attempts made, including the successful one
        attempts: u32,
    },
    /// All attempts failed
    GaveUp {
        /// Attempts made
        attempts: u32,
    },
    /// The caller abandoned the sequence
    Cancelled {
        /// Attempts started
        attempts: u32,
    },
}

impl RetryEvent {
    /// Total wait of a scheduled backoff
    #[must_use]
    pub fn wait(&self) -> Option<Duration> {
        match self {
            Self::BackoffScheduled {
                backoff, jitter, ..
            } => Some(backoff.saturating_add(*jitter)),
            _ => None,
        }
    }

    pub(crate) fn log(&self) {
        match self {
            Self::AttemptStarted { attempt } => {
                tracing::debug!(attempt, "starting attempt");
            }
            Self::AttemptFailed {
                attempt,
                error,
                retryable,
            } => {
                tracing::warn!(attempt, retryable, %error, "attempt failed");
            }
            Self::BackoffScheduled {
                attempt,
                backoff,
                jitter,
            } => {
                tracing::debug!(attempt, ?backoff, ?jitter, "backing off before retry");
            }
            Self::Succeeded { attempts } if *attempts > 1 => {
                tracing::info!(attempts, "succeeded after retry");
            }
            Self::Succeeded { attempts } => {
                tracing::debug!(attempts, "succeeded");
            }
            Self::GaveUp { attempts } => {
                tracing::error!(attempts, "retry attempts exhausted");
            }
            Self::Cancelled { attempts } => {
                tracing::info!(attempts, "retry sequence cancelled");
            }
        }
    }
}

/// Receives events from every sequence run by a caller
pub trait RetryObserver: Send + Sync {
    /// Handle one event
    fn observe(&self, event: &RetryEvent);
}

impl<F> RetryObserver for F
where
    F: Fn(&RetryEvent) + Send + Sync,
{
    fn observe(&self, event: &RetryEvent) {
        self(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn wait_sums_backoff_and_jitter() {
        let event = RetryEvent::BackoffScheduled {
            attempt: 1,
            backoff: Duration::from_millis(100),
            jitter: Duration::from_millis(7),
        };
        assert_eq!(event.wait(), Some(Duration::from_millis(107)));
        assert_eq!(RetryEvent::GaveUp { attempts: 3 }.wait(), None);
    }

    #[test]
    fn closures_are_observers() {
        let seen = AtomicU32::new(0);
        let observer = |_: &RetryEvent| {
            seen.fetch_add(1, Ordering::SeqCst);
        };
        observer.observe(&RetryEvent::AttemptStarted { attempt: 1 });
        observer.observe(&RetryEvent::Succeeded { attempts: 1 });
        assert_eq!(seen.load(Ordering::SeqCst), 2);
    }
}
