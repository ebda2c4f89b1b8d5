//! Process exit codes and the mapping from error taxonomy to exit status.
//!
//! The exit code is the only channel by which the invoking shell or orchestrator
//! learns the outcome of a run, so the mapping from [`AppError`] must be total:
//! every reachable error maps to exactly one code.

use std::fmt;

use crate::error::AppError;
use crate::weather::FetchError;

/// Closed set of exit codes this application can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// The work unit completed without being cancelled or failing.
    Success,
    /// The run was cancelled by a cooperative shutdown signal.
    Cancelled,
    /// An unclassified error escaped the work unit.
    UnhandledException,
    /// The work unit was never launched (startup aborted before readiness).
    Aborted,
    /// Configuration or argument validation failed.
    InvalidArgument,
    /// The weather payload could not be parsed into the expected shape.
    InvalidJson,
}

impl ExitCode {
    /// The integer status reported to the operating system.
    pub fn code(self) -> i32 {
        match self {
            ExitCode::Success => 0,
            ExitCode::Cancelled => 1,
            ExitCode::UnhandledException => 2,
            ExitCode::Aborted => 3,
            ExitCode::InvalidArgument => 4,
            ExitCode::InvalidJson => 5,
        }
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitCode::Success => write!(f, "Success"),
            ExitCode::Cancelled => write!(f, "Cancelled"),
            ExitCode::UnhandledException => write!(f, "UnhandledException"),
            ExitCode::Aborted => write!(f, "Aborted"),
            ExitCode::InvalidArgument => write!(f, "InvalidArgument"),
            ExitCode::InvalidJson => write!(f, "InvalidJson"),
        }
    }
}

impl From<&AppError> for ExitCode {
    /// Classifies an error escaping the work unit into an exit code.
    ///
    /// Cancellation is not an error: it maps to [`ExitCode::Cancelled`] whether
    /// it surfaced from the work unit directly or through the fetch layer.
    fn from(err: &AppError) -> Self {
        match err {
            AppError::Cancelled => ExitCode::Cancelled,
            AppError::Config(_) => ExitCode::InvalidArgument,
            AppError::Toml(_) => ExitCode::InvalidArgument,
            AppError::Io(_) => ExitCode::UnhandledException,
            AppError::Fetch(fetch) => match fetch {
                FetchError::Cancelled => ExitCode::Cancelled,
                FetchError::Parse(_) | FetchError::Incomplete(_) => ExitCode::InvalidJson,
                _ => ExitCode::UnhandledException,
            },
        }
    }
}
