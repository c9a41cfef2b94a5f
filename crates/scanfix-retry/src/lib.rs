//! scanfix retry - bounded retry for async operations
//!
//! Wraps a caller-supplied operation with:
//! - A bounded number of attempts ([`RetryPolicy::max_attempts`])
//! - Exponential backoff capped at [`RetryPolicy::max_delay`]
//! - Random jitter bounded by [`RetryPolicy::jitter_ceiling`]
//!
//! Every call is independent: the caller holds only immutable configuration,
//! so one [`RetryingCaller`] can drive any number of concurrent sequences.
//! Attempts and waits are reported through `tracing` and any registered
//! [`RetryObserver`].
//!
//! # Example
//!
//! ```rust,ignore
//! use scanfix_retry::{RetryPolicy, RetryingCaller};
//! use std::time::Duration;
//!
//! let policy = RetryPolicy::new(3, Duration::from_millis(100), Duration::from_secs(2))?;
//! let caller = RetryingCaller::new(policy);
//!
//! let outcome = caller.call(|| fetch_remote()).await;
//! println!("finished after {} attempts", outcome.attempts());
//! let value = outcome.into_result()?;
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

// Core modules
pub mod caller;
pub mod error;
pub mod jitter;
pub mod observer;
pub mod outcome;
pub mod policy;
pub mod sleeper;

// Re-exports for convenience
pub use caller::RetryingCaller;
pub use error::{PolicyError, RetryError};
pub use jitter::{Jitter, NoJitter, RandomJitter, SeededJitter};
pub use observer::{RetryEvent, RetryObserver};
pub use outcome::CallOutcome;
pub use policy::{RetryPolicy, RetryPolicyConfig};
pub use sleeper::{Sleeper, TokioSleeper};

/// Re-exported so callers can build cancellation tokens without a direct dependency
pub use tokio_util::sync::CancellationToken;

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for driving retries
    pub use crate::{CallOutcome, RetryError, RetryPolicy, RetryingCaller};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
