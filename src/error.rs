use thiserror::Error;

use crate::weather::FetchError;

/// Top-level application error.
///
/// Everything that can escape the work unit is one of these variants so the
/// lifecycle supervisor can classify it into an exit code without inspecting
/// runtime types.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(String),

    /// The run was cancelled by a cooperative shutdown signal.
    #[error("cancelled")]
    Cancelled,

    #[error("weather fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl AppError {
    /// Whether this error represents cooperative cancellation rather than a failure.
    pub fn is_cancellation(&self) -> bool {
        matches!(
            self,
            AppError::Cancelled | AppError::Fetch(FetchError::Cancelled)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let err = AppError::Config("location not specified".into());
        assert_eq!(err.to_string(), "config error: location not specified");
    }

    #[test]
    fn cancellation_is_recognized_through_fetch_layer() {
        assert!(AppError::Cancelled.is_cancellation());
        assert!(AppError::Fetch(FetchError::Cancelled).is_cancellation());
        assert!(!AppError::Config("x".into()).is_cancellation());
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<AppError>();
    }
}
