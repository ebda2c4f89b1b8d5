//! Lifecycle supervisor: owns the process's start/stop contract.
//!
//! The host signals readiness exactly once via [`Supervisor::on_host_ready`],
//! which launches the work unit on the runtime under a child cancellation
//! token and retains the join handle. [`Supervisor::on_stop_requested`]
//! requests cancellation if the unit is still running (or the caller's own
//! token is already cancelled — a forced shutdown), awaits the handle, and
//! records the exit code exactly once.
//!
//! State machine: `NotStarted → Running → Completed(code)`, with the direct
//! `NotStarted → Completed(Aborted)` edge when startup was cancelled before
//! the unit ever launched. `Completed` is terminal; stopping again returns the
//! recorded code without re-invoking anything.
//!
//! Errors escaping the work unit never propagate to the host: they are caught
//! here, logged exactly once (cancellation at info level — it is not an
//! error), and mapped to an exit code. When the unit settles, the supervisor
//! cancels its `done` token, the host-level "begin shutdown" signal, so the
//! process exits promptly instead of idling.

use std::future::Future;
use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::error::AppError;
use crate::exit::ExitCode;

/// The single unit of application work executed once per process run.
///
/// Implementations must observe `cancel` at every suspend point and propagate
/// cancellation (as [`AppError::Cancelled`] or an error that classifies as
/// cancellation) rather than swallow it.
pub trait Work: Send + Sync + 'static {
    fn run(
        &self,
        args: Vec<String>,
        cancel: CancellationToken,
    ) -> impl Future<Output = Result<ExitCode, AppError>> + Send;
}

/// Where the work unit is in its once-per-process lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    NotStarted,
    Running,
    Completed(ExitCode),
}

pub struct Supervisor<W: Work> {
    work: Arc<W>,
    /// Cancellation scope for the work unit; child of the host's startup token.
    cancel: CancellationToken,
    /// Cancelled when the work unit settles — tells the host to begin shutdown.
    done: CancellationToken,
    state: RunState,
    handle: Option<JoinHandle<ExitCode>>,
}

impl<W: Work> Supervisor<W> {
    /// Creates a supervisor whose cancellation scope is linked to `startup`:
    /// if startup is aborted before readiness, the work unit never launches.
    pub fn new(work: W, startup: &CancellationToken) -> Self {
        Self {
            work: Arc::new(work),
            cancel: startup.child_token(),
            done: CancellationToken::new(),
            state: RunState::NotStarted,
            handle: None,
        }
    }

    /// The host-level "begin shutdown" signal, cancelled when the work unit
    /// settles.
    pub fn done(&self) -> &CancellationToken {
        &self.done
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Invoked exactly once when the host has finished starting up.
    ///
    /// Captures `args` and launches the work unit asynchronously; the handle
    /// is retained and consumed by [`Supervisor::on_stop_requested`]. A second
    /// call is a no-op, as is a call after startup was already cancelled.
    pub fn on_host_ready(&mut self, args: Vec<String>) {
        if self.state != RunState::NotStarted {
            return;
        }
        if self.cancel.is_cancelled() {
            info!("startup aborted before readiness; work unit not launched");
            return;
        }

        info!(?args, "application started");

        let work = Arc::clone(&self.work);
        let cancel = self.cancel.clone();
        let done = self.done.clone();
        self.handle = Some(tokio::spawn(async move {
            let code = match work.run(args, cancel).await {
                Ok(code) => code,
                Err(err) => classify(&err),
            };
            // One unit of work per process: tell the host to shut down.
            done.cancel();
            code
        }));
        self.state = RunState::Running;
    }

    /// Invoked by the host to begin shutdown. `caller` already being cancelled
    /// marks the shutdown as forced: the work unit is cancelled even if it
    /// looks finished.
    ///
    /// Awaits the work unit's completion and records its exit code; recording
    /// happens exactly once, and later calls return the recorded code.
    pub async fn on_stop_requested(&mut self, caller: &CancellationToken) -> ExitCode {
        if let RunState::Completed(code) = self.state {
            return code;
        }

        let code = match self.handle.take() {
            // The work unit never launched.
            None => ExitCode::Aborted,
            Some(handle) => {
                if !handle.is_finished() || caller.is_cancelled() {
                    self.cancel.cancel();
                }
                match handle.await {
                    Ok(code) => code,
                    Err(join_err) if join_err.is_cancelled() => ExitCode::Cancelled,
                    Err(join_err) => {
                        error!(%join_err, "work unit task failed to join");
                        ExitCode::UnhandledException
                    }
                }
            }
        };

        self.state = RunState::Completed(code);
        code
    }
}

/// Classifies an error escaping the work unit and logs it exactly once.
fn classify(err: &AppError) -> ExitCode {
    let code = ExitCode::from(err);
    if err.is_cancellation() {
        // Shutdown in progress; this is expected, not an error.
        info!("work unit cancelled");
    } else {
        error!(error = %err, %code, "work unit failed");
    }
    code
}
