//! Error types for the weather fetch pipeline.
//!
//! [`FetchError`] is the tagged union the fetcher raises instead of leaking raw
//! `reqwest`/`serde_json` errors. The resilience policy stack consults
//! [`FetchError::is_transient`] to decide what to retry and what the circuit
//! breaker counts as a handled failure.

use std::time::Duration;

use thiserror::Error;

/// Failures that can occur while fetching a weather forecast.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The API does not know the requested location (HTTP 404). Never retried.
    #[error("location not found: {location}")]
    NotFound { location: String },

    /// Non-transient HTTP failure (4xx other than 408/429). Never retried.
    #[error("weather API returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// Transient failure: network-level error, 5xx, 408 or 429.
    /// `status` is `None` when the request never produced a response.
    #[error("transient failure (status {status:?}): {detail}")]
    Transient { status: Option<u16>, detail: String },

    /// A single attempt exceeded the timeout policy's bound.
    #[error("attempt timed out after {after:?}")]
    Timeout { after: Duration },

    /// The circuit breaker is open; the call was short-circuited without
    /// touching the network.
    #[error("circuit open; failing fast")]
    CircuitOpen,

    /// The response body could not be deserialized into the expected shape.
    #[error("malformed weather payload: {0}")]
    Parse(#[from] serde_json::Error),

    /// The payload deserialized but is missing data required to report a forecast.
    #[error("incomplete weather payload: {0}")]
    Incomplete(String),

    /// The operation was aborted by the caller's cancellation token.
    #[error("cancelled")]
    Cancelled,
}

impl FetchError {
    /// Whether the retry policy may handle this failure and the circuit breaker
    /// counts it. Timeouts raised by the timeout policy are deliberately included.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            FetchError::Transient { .. } | FetchError::Timeout { .. }
        )
    }
}
