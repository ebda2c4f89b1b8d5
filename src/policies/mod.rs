//! Composable fault-handling policies around the outbound HTTP call.
//!
//! [`PolicyStack`] nests the three layers as retry (outer) wrapping circuit
//! breaker (middle) wrapping timeout (inner): each attempt is individually
//! time-bounded, and breaker state is shared across the retries of one logical
//! call. All layers observe the caller's cancellation token — a cancellation
//! aborts backoff sleeps and in-flight attempts immediately.

pub mod breaker;
pub mod retry;
pub mod timeout;

pub use breaker::{BreakerState, CircuitBreaker};
pub use retry::RetryPolicy;
pub use timeout::TimeoutPolicy;

use std::future::Future;

use tokio_util::sync::CancellationToken;

use crate::weather::FetchError;

pub struct PolicyStack {
    pub retry: RetryPolicy,
    pub breaker: CircuitBreaker,
    pub timeout: TimeoutPolicy,
}

impl PolicyStack {
    pub fn new(retry: RetryPolicy, breaker: CircuitBreaker, timeout: TimeoutPolicy) -> Self {
        Self {
            retry,
            breaker,
            timeout,
        }
    }

    /// Executes `attempt` through the full stack.
    ///
    /// Transient faults (network errors, 5xx, 408, 429, attempt timeouts) are
    /// retried with backoff up to the retry policy's limit and counted by the
    /// breaker. Non-transient faults, circuit-open failures, and cancellation
    /// return immediately.
    pub async fn execute<T, F, Fut>(
        &self,
        cancel: &CancellationToken,
        mut attempt: F,
    ) -> Result<T, FetchError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, FetchError>>,
    {
        let mut retries: u32 = 0;
        loop {
            if cancel.is_cancelled() {
                return Err(FetchError::Cancelled);
            }

            let outcome = match self.breaker.try_acquire() {
                Ok(()) => {
                    let outcome = self.timeout.bound(cancel, attempt()).await;
                    match &outcome {
                        Ok(_) => self.breaker.record_success(),
                        Err(FetchError::Cancelled) => self.breaker.record_cancelled(),
                        Err(fault) if fault.is_transient() => self.breaker.record_failure(fault),
                        // Non-transient outcomes are not handled faults; they
                        // reset the consecutive counter like a success.
                        Err(_) => self.breaker.record_success(),
                    }
                    outcome
                }
                Err(open) => Err(open),
            };

            match outcome {
                Ok(value) => return Ok(value),
                Err(fault @ (FetchError::Cancelled | FetchError::CircuitOpen)) => {
                    return Err(fault);
                }
                Err(fault) if fault.is_transient() && retries < self.retry.max_retries => {
                    retries += 1;
                    let delay = self.retry.delay_for(retries);
                    self.retry.notify(retries, delay, &fault);
                    tokio::select! {
                        _ = cancel.cancelled() => return Err(FetchError::Cancelled),
                        _ = tokio::time::sleep(delay) => {}
                    }
                }
                Err(fault) => return Err(fault),
            }
        }
    }

    /// Like [`PolicyStack::execute`], but a final timeout fault yields the
    /// fallback value instead of propagating.
    pub async fn execute_with_fallback<T, F, Fut>(
        &self,
        cancel: &CancellationToken,
        attempt: F,
        fallback: impl FnOnce() -> T,
    ) -> Result<T, FetchError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, FetchError>>,
    {
        match self.execute(cancel, attempt).await {
            Err(FetchError::Timeout { .. }) => Ok(fallback()),
            other => other,
        }
    }
}
