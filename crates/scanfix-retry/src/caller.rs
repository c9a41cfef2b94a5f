//! Retrying caller
//!
//! Drives one operation through a [`RetryPolicy`]. The caller itself is
//! immutable: each [`RetryingCaller::call`] keeps its attempt counter and
//! last error on its own stack, so concurrent calls share nothing but
//! configuration.
//!
//! # Sequence
//!
//! ```text
//! attempt 1 ──fail──► wait backoff(1)+jitter ──► attempt 2 ──fail──► ... ──► attempt N ──fail──► Exhausted
//!     │                                              │
//!     └──ok──► Success { attempts: 1 }               └──ok──► Success { attempts: 2 }
//! ```

use crate::error::RetryError;
use crate::jitter::{Jitter, RandomJitter};
use crate::observer::{RetryEvent, RetryObserver};
use crate::outcome::CallOutcome;
use crate::policy::RetryPolicy;
use crate::sleeper::{Sleeper, TokioSleeper};
use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

type RetryPredicate<E> = Arc<dyn Fn(&E) -> bool + Send + Sync>;

/// Executes operations with bounded retry, exponential backoff and jitter
pub struct RetryingCaller<E> {
    policy: RetryPolicy,
    jitter: Arc<dyn Jitter>,
    sleeper: Arc<dyn Sleeper>,
    observers: Vec<Arc<dyn RetryObserver>>,
    should_retry: RetryPredicate<E>,
}

impl<E: 'static> RetryingCaller<E> {
    /// Create a caller that retries every error, with random jitter and
    /// timer-backed waits
    #[must_use]
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            policy,
            jitter: Arc::new(RandomJitter),
            sleeper: Arc::new(TokioSleeper),
            observers: Vec::new(),
            should_retry: Arc::new(|_: &E| true),
        }
    }

    /// With a different jitter source
    #[must_use]
    pub fn with_jitter(mut self, jitter: impl Jitter + 'static) -> Self {
        self.jitter = Arc::new(jitter);
        self
    }

    /// With a different way of waiting
    #[must_use]
    pub fn with_sleeper(mut self, sleeper: impl Sleeper + 'static) -> Self {
        self.sleeper = Arc::new(sleeper);
        self
    }

    /// Register an observer; observers are notified in registration order
    #[must_use]
    pub fn with_observer(mut self, observer: impl RetryObserver + 'static) -> Self {
        self.observers.push(Arc::new(observer));
        self
    }

    /// Register a shared observer
    #[must_use]
    pub fn with_shared_observer(mut self, observer: Arc<dyn RetryObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Only retry errors accepted by `predicate`; others end the sequence
    /// with [`RetryError::Rejected`]
    #[must_use]
    pub fn retry_if<P>(mut self, predicate: P) -> Self
    where
        P: Fn(&E) -> bool + Send + Sync + 'static,
    {
        self.should_retry = Arc::new(predicate);
        self
    }
}

impl<E> RetryingCaller<E>
where
    E: Display,
{
    /// The policy driving this caller
    #[inline]
    #[must_use]
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Run `operation` until it succeeds, is rejected, or attempts run out.
    ///
    /// Dropping the returned future abandons the sequence at whatever
    /// point it was suspended.
    pub async fn call<T, F, Fut>(&self, operation: F) -> CallOutcome<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        self.run(operation, None).await
    }

    /// Like [`RetryingCaller::call`], but stops with
    /// [`RetryError::Cancelled`] as soon as `token` is cancelled, whether
    /// an attempt is in flight or a backoff is pending.
    pub async fn call_until_cancelled<T, F, Fut>(
        &self,
        operation: F,
        token: &CancellationToken,
    ) -> CallOutcome<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        self.run(operation, Some(token)).await
    }

    async fn run<T, F, Fut>(
        &self,
        mut operation: F,
        cancel: Option<&CancellationToken>,
    ) -> CallOutcome<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let max_attempts = self.policy.max_attempts();
        let mut last_error: Option<E> = None;
        let mut attempt: u32 = 1;

        loop {
            if cancel.is_some_and(CancellationToken::is_cancelled) {
                return self.cancelled(attempt - 1, last_error);
            }

            self.emit(&RetryEvent::AttemptStarted { attempt });
            let Some(result) = until_cancelled(operation(), cancel).await else {
                return self.cancelled(attempt, last_error);
            };

            let error = match result {
                Ok(value) => {
                    self.emit(&RetryEvent::Succeeded { attempts: attempt });
                    return CallOutcome::Success {
                        value,
                        attempts: attempt,
                    };
                }
                Err(error) => error,
            };

            let retryable = (self.should_retry)(&error);
            self.emit(&RetryEvent::AttemptFailed {
                attempt,
                error: error.to_string(),
                retryable,
            });

            if !retryable {
                return CallOutcome::Failure(RetryError::Rejected {
                    error,
                    attempts: attempt,
                });
            }
            if attempt >= max_attempts {
                self.emit(&RetryEvent::GaveUp { attempts: attempt });
                return CallOutcome::Failure(RetryError::Exhausted {
                    last_error: error,
                    attempts: attempt,
                });
            }

            let backoff = self.policy.backoff_delay(attempt);
            let jitter = self.jitter.sample(self.policy.jitter_ceiling());
            self.emit(&RetryEvent::BackoffScheduled {
                attempt,
                backoff,
                jitter,
            });
            last_error = Some(error);

            let wait = self.sleeper.sleep(backoff.saturating_add(jitter));
            if until_cancelled(wait, cancel).await.is_none() {
                return self.cancelled(attempt, last_error);
            }
            attempt += 1;
        }
    }

    fn cancelled<T>(&self, attempts: u32, last_error: Option<E>) -> CallOutcome<T, E> {
        self.emit(&RetryEvent::Cancelled { attempts });
        CallOutcome::Failure(RetryError::Cancelled {
            last_error,
            attempts,
        })
    }

    fn emit(&self, event: &RetryEvent) {
        event.log();
        for observer in &self.observers {
            observer.observe(event);
        }
    }
}

impl<E> Clone for RetryingCaller<E> {
    fn clone(&self) -> Self {
        Self {
            policy: self.policy,
            jitter: Arc::clone(&self.jitter),
            sleeper: Arc::clone(&self.sleeper),
            observers: self.observers.clone(),
            should_retry: Arc::clone(&self.should_retry),
        }
    }
}

impl<E> std::fmt::Debug for RetryingCaller<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetryingCaller")
            .field("policy", &self.policy)
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}

async fn until_cancelled<F: Future>(
    future: F,
    cancel: Option<&CancellationToken>,
) -> Option<F::Output> {
    match cancel {
        Some(token) => tokio::select! {
            biased;
            () = token.cancelled() => None,
            output = future => Some(output),
        },
        None => Some(future.await),
    }
}
