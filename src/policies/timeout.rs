//! Timeout policy bounding a single attempt.
//!
//! Races the attempt against a timer and the caller's cancellation token. The
//! loser is dropped (pessimistic strategy: the in-flight future is abandoned on
//! expiry). Cancellation wins over the timer so a shutting-down caller is
//! reported as cancelled, not timed out.

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::weather::FetchError;

#[derive(Debug, Clone, Copy)]
pub struct TimeoutPolicy {
    /// Maximum duration of one attempt.
    pub duration: Duration,
}

impl Default for TimeoutPolicy {
    fn default() -> Self {
        Self {
            duration: Duration::from_secs(10),
        }
    }
}

impl TimeoutPolicy {
    pub fn new(duration: Duration) -> Self {
        Self { duration }
    }

    /// Runs `attempt` bounded by this policy's duration.
    ///
    /// Returns [`FetchError::Timeout`] on expiry and [`FetchError::Cancelled`]
    /// if the token fires first.
    pub async fn bound<T, F>(&self, cancel: &CancellationToken, attempt: F) -> Result<T, FetchError>
    where
        F: Future<Output = Result<T, FetchError>>,
    {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(FetchError::Cancelled),
            outcome = tokio::time::timeout(self.duration, attempt) => match outcome {
                Ok(result) => result,
                Err(_) => Err(FetchError::Timeout { after: self.duration }),
            },
        }
    }
}
