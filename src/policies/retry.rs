//! Retry policy with exponential backoff.
//!
//! The delay for retry attempt `n` (1-indexed) is `base_delay × factor^n`,
//! clamped to [`RetryPolicy::max_delay`]. With the defaults (base 1s, factor 2)
//! that is the classic 2s, 4s, 8s schedule. The base delay is derived purely
//! from the attempt number, so delays are monotonically non-decreasing.
//!
//! Each retry invokes an optional observer callback carrying the attempt
//! number, the computed delay, and the fault that caused it, so callers can log
//! without the policy knowing about logging.

use std::sync::Arc;
use std::time::Duration;

use crate::weather::FetchError;

/// Observer invoked before each backoff sleep: `(attempt, delay, fault)`.
pub type RetryObserver = Arc<dyn Fn(u32, Duration, &FetchError) + Send + Sync>;

#[derive(Clone)]
pub struct RetryPolicy {
    /// Maximum number of retries after the initial attempt.
    pub max_retries: u32,
    /// Base delay multiplied by `factor^attempt`.
    pub base_delay: Duration,
    /// Multiplicative growth factor (`>= 1.0` for non-decreasing delays).
    pub factor: f64,
    /// Cap applied to computed delays.
    pub max_delay: Duration,
    on_retry: Option<RetryObserver>,
}

impl Default for RetryPolicy {
    /// 3 retries, 1s base, factor 2, capped at 60s.
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_secs(1),
            factor: 2.0,
            max_delay: Duration::from_secs(60),
            on_retry: None,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
            ..Self::default()
        }
    }

    /// Registers an observer invoked once per retry.
    pub fn with_observer(mut self, observer: RetryObserver) -> Self {
        self.on_retry = Some(observer);
        self
    }

    /// Computes the backoff delay for the given retry attempt (1-indexed).
    ///
    /// Non-finite or overflowing results clamp to `max_delay`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exp = attempt.min(i32::MAX as u32) as i32;
        let secs = self.base_delay.as_secs_f64() * self.factor.powi(exp);
        let max_secs = self.max_delay.as_secs_f64();

        if !secs.is_finite() || secs < 0.0 || secs > max_secs {
            self.max_delay
        } else {
            Duration::from_secs_f64(secs)
        }
    }

    pub(crate) fn notify(&self, attempt: u32, delay: Duration, fault: &FetchError) {
        if let Some(observer) = &self.on_retry {
            observer(attempt, delay, fault);
        }
    }
}

impl std::fmt::Debug for RetryPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("max_retries", &self.max_retries)
            .field("base_delay", &self.base_delay)
            .field("factor", &self.factor)
            .field("max_delay", &self.max_delay)
            .field("on_retry", &self.on_retry.is_some())
            .finish()
    }
}
