mod cli;
mod config;
mod error;
mod exit;
mod notify;
mod policies;
mod signals;
mod supervisor;
mod temperature;
mod weather;
mod worker;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use cli::Cli;
use config::AppConfig;
use exit::ExitCode;
use supervisor::Supervisor;
use worker::ForecastWorker;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let code = run(cli).await;
    info!(%code, exit_code = code.code(), "application exiting");
    std::process::exit(code.code());
}

async fn run(cli: Cli) -> ExitCode {
    // Fail fast on bad configuration, before anything is launched.
    let config = match AppConfig::load(&cli) {
        Ok(config) => config,
        Err(err) => {
            error!(error = %err, "invalid configuration");
            return ExitCode::from(&err);
        }
    };

    let startup = CancellationToken::new();
    let mut supervisor = Supervisor::new(ForecastWorker::new(config), &startup);

    // Host is ready: launch the single unit of work.
    supervisor.on_host_ready(std::env::args().collect());

    // Wait for the work unit to settle or for an OS shutdown signal,
    // whichever comes first.
    tokio::select! {
        _ = supervisor.done().cancelled() => {}
        _ = signals::wait_for_shutdown_signal() => {
            info!("shutdown signal received");
        }
    }

    // A second signal makes the shutdown forced.
    let caller = CancellationToken::new();
    let forced = caller.clone();
    tokio::spawn(async move {
        if signals::wait_for_shutdown_signal().await.is_ok() {
            info!("second shutdown signal; forcing cancellation");
            forced.cancel();
        }
    });

    supervisor.on_stop_requested(&caller).await
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "skycast=debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
