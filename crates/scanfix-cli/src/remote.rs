//! Simulated remote call used by the `flaky` subcommand

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

/// Failure returned by [`SimulatedRemote::call`]
#[derive(Debug, thiserror::Error)]
#[error("remote call {call} failed: service unavailable")]
pub(crate) struct RemoteError {
    call: u32,
}

/// Remote endpoint that is unavailable for its first `fail_times` calls
#[derive(Debug)]
pub(crate) struct SimulatedRemote {
    fail_times: u32,
    latency: Duration,
    calls: AtomicU32,
}

impl SimulatedRemote {
    pub(crate) fn new(fail_times: u32, latency: Duration) -> Self {
        Self {
            fail_times,
            latency,
            calls: AtomicU32::new(0),
        }
    }

    pub(crate) fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) async fn call(&self) -> Result<String, RemoteError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        tokio::time::sleep(self.latency).await;
        if call <= self.fail_times {
            return Err(RemoteError { call });
        }
        Ok(format!("response from call {call}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fails_then_recovers() {
        let remote = SimulatedRemote::new(2, Duration::ZERO);
        assert!(remote.call().await.is_err());
        assert_eq!(
            remote.call().await.unwrap_err().to_string(),
            "remote call 2 failed: service unavailable"
        );
        assert_eq!(remote.call().await.unwrap(), "response from call 3");
        assert_eq!(remote.calls(), 3);
    }
}
