//! Circuit breaker state machine.
//!
//! Transitions:
//! - `Closed → Open` after `threshold` consecutive handled failures;
//! - `Open → HalfOpen` once the break duration has elapsed (one trial call);
//! - `HalfOpen → Closed` when the trial succeeds (counter reset);
//! - `HalfOpen → Open` when the trial fails, or when it is abandoned by
//!   cancellation (the original expiry is kept, so a later caller may run
//!   the trial instead).
//!
//! While open, [`CircuitBreaker::try_acquire`] fails fast with
//! [`FetchError::CircuitOpen`] and no network call is made. Success and
//! non-transient outcomes reset the consecutive-failure counter; cancellation
//! outside a trial records nothing. State is guarded by a mutex so call
//! outcomes are applied atomically; one breaker instance is bound to one
//! client.
//!
//! Break expiry is measured with [`tokio::time::Instant`], which follows the
//! paused test clock.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::time::Instant;

use crate::weather::FetchError;

/// Invoked when the circuit opens: `(causing fault, break duration)`.
pub type BreakObserver = Arc<dyn Fn(&FetchError, Duration) + Send + Sync>;
/// Invoked when the circuit closes again after a successful trial.
pub type ResetObserver = Arc<dyn Fn() + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakerState {
    /// Requests flow; consecutive handled failures are counted.
    Closed,
    /// Requests are short-circuited until the break duration elapses.
    Open,
    /// One trial request is allowed; its outcome decides the next state.
    HalfOpen,
}

struct Inner {
    state: BreakerState,
    consecutive_failures: u32,
    opened_at: Option<Instant>,
}

pub struct CircuitBreaker {
    /// Consecutive handled failures allowed before the circuit opens.
    threshold: u32,
    /// How long the circuit stays open before allowing a trial call.
    break_duration: Duration,
    inner: Mutex<Inner>,
    on_break: Option<BreakObserver>,
    on_reset: Option<ResetObserver>,
}

impl CircuitBreaker {
    pub fn new(threshold: u32, break_duration: Duration) -> Self {
        Self {
            threshold: threshold.max(1),
            break_duration,
            inner: Mutex::new(Inner {
                state: BreakerState::Closed,
                consecutive_failures: 0,
                opened_at: None,
            }),
            on_break: None,
            on_reset: None,
        }
    }

    /// 5 consecutive failures, 30s break.
    pub fn with_defaults() -> Self {
        Self::new(5, Duration::from_secs(30))
    }

    pub fn on_break(mut self, observer: BreakObserver) -> Self {
        self.on_break = Some(observer);
        self
    }

    pub fn on_reset(mut self, observer: ResetObserver) -> Self {
        self.on_reset = Some(observer);
        self
    }

    /// Checks whether a call may proceed.
    ///
    /// Promotes `Open` to `HalfOpen` once the break duration has elapsed; while
    /// the half-open trial is in flight, further callers fail fast.
    pub fn try_acquire(&self) -> Result<(), FetchError> {
        let mut inner = self.inner.lock().expect("breaker lock poisoned");
        match inner.state {
            BreakerState::Closed => Ok(()),
            BreakerState::HalfOpen => Err(FetchError::CircuitOpen),
            BreakerState::Open => {
                let expired = inner
                    .opened_at
                    .is_some_and(|at| at.elapsed() >= self.break_duration);
                if expired {
                    inner.state = BreakerState::HalfOpen;
                    Ok(())
                } else {
                    Err(FetchError::CircuitOpen)
                }
            }
        }
    }

    /// Records a successful (or non-handled) outcome: resets the failure
    /// counter and closes the circuit if a half-open trial just succeeded.
    pub fn record_success(&self) {
        let closed = {
            let mut inner = self.inner.lock().expect("breaker lock poisoned");
            inner.consecutive_failures = 0;
            let was_trial = inner.state != BreakerState::Closed;
            inner.state = BreakerState::Closed;
            inner.opened_at = None;
            was_trial
        };
        if closed && let Some(observer) = &self.on_reset {
            observer();
        }
    }

    /// Records a handled failure; may open (or re-open) the circuit.
    pub fn record_failure(&self, fault: &FetchError) {
        let broke = {
            let mut inner = self.inner.lock().expect("breaker lock poisoned");
            match inner.state {
                BreakerState::HalfOpen => {
                    // Trial failed: straight back to open.
                    inner.state = BreakerState::Open;
                    inner.opened_at = Some(Instant::now());
                    true
                }
                BreakerState::Closed => {
                    inner.consecutive_failures += 1;
                    if inner.consecutive_failures >= self.threshold {
                        inner.state = BreakerState::Open;
                        inner.opened_at = Some(Instant::now());
                        true
                    } else {
                        false
                    }
                }
                BreakerState::Open => false,
            }
        };
        if broke && let Some(observer) = &self.on_break {
            observer(fault, self.break_duration);
        }
    }

    /// Records a call abandoned by cancellation. A half-open trial rolls back
    /// to open with its original expiry, leaving the trial to the next caller
    /// instead of wedging the breaker on an outcome that never arrives. Other
    /// states are untouched.
    pub fn record_cancelled(&self) {
        let mut inner = self.inner.lock().expect("breaker lock poisoned");
        if inner.state == BreakerState::HalfOpen {
            inner.state = BreakerState::Open;
        }
    }

    /// Current state snapshot (does not promote `Open` to `HalfOpen`).
    pub fn state(&self) -> BreakerState {
        self.inner.lock().expect("breaker lock poisoned").state
    }
}

impl std::fmt::Debug for CircuitBreaker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CircuitBreaker")
            .field("threshold", &self.threshold)
            .field("break_duration", &self.break_duration)
            .field("state", &self.state())
            .finish()
    }
}
