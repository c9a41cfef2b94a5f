//! Backoff wait seam

use std::time::Duration;

/// Waits out a backoff delay.
///
/// Implementations must suspend the current task only; other retry
/// sequences keep running while one waits.
#[async_trait::async_trait]
pub trait Sleeper: Send + Sync {
    /// Wait for `delay`
    async fn sleep(&self, delay: Duration);
}

/// Timer-backed sleeper (default)
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait::async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, delay: Duration) {
        tokio::time::sleep(delay).await;
    }
}

#[async_trait::async_trait]
impl<S: Sleeper + ?Sized> Sleeper for std::sync::Arc<S> {
    async fn sleep(&self, delay: Duration) {
        (**self).sleep(delay).await;
    }
}
