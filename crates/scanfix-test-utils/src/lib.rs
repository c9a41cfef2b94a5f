//! Testing utilities for scanfix workspace
//!
//! Shared fixtures for exercising retry sequences without real waits.

#![allow(missing_docs)]

use futures::future::{ready, Ready};
use parking_lot::Mutex;
use scanfix_retry::{RetryEvent, RetryObserver, Sleeper};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Once};
use std::time::Duration;

/// Error produced by [`FlakyOperation`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("simulated failure on call {call}")]
pub struct SimulatedFailure {
    pub call: u32,
}

/// Operation that fails a fixed number of times, then succeeds with its
/// 1-based call number
#[derive(Debug)]
pub struct FlakyOperation {
    failures: u32,
    calls: AtomicU32,
}

impl FlakyOperation {
    pub fn failing(times: u32) -> Arc<Self> {
        Arc::new(Self {
            failures: times,
            calls: AtomicU32::new(0),
        })
    }

    pub fn always_failing() -> Arc<Self> {
        Self::failing(u32::MAX)
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    /// Count the call and resolve immediately
    pub fn invoke(&self) -> Ready<Result<u32, SimulatedFailure>> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if call <= self.failures {
            ready(Err(SimulatedFailure { call }))
        } else {
            ready(Ok(call))
        }
    }
}

/// Observer that keeps every event it sees
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<RetryEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<RetryEvent> {
        self.events.lock().clone()
    }

    pub fn attempts_started(&self) -> usize {
        self.events
            .lock()
            .iter()
            .filter(|e| matches!(e, RetryEvent::AttemptStarted { .. }))
            .count()
    }

    pub fn waits(&self) -> Vec<Duration> {
        self.events.lock().iter().filter_map(RetryEvent::wait).collect()
    }
}

impl RetryObserver for RecordingObserver {
    fn observe(&self, event: &RetryEvent) {
        self.events.lock().push(event.clone());
    }
}

/// Sleeper that records requested waits and returns at once
#[derive(Debug, Default)]
pub struct RecordingSleeper {
    waits: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn waits(&self) -> Vec<Duration> {
        self.waits.lock().clone()
    }
}

#[async_trait::async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, delay: Duration) {
        self.waits.lock().push(delay);
    }
}

static TRACING: Once = Once::new();

/// Install a test-friendly tracing subscriber once per process
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
            )
            .with_test_writer()
            .try_init();
    });
}
