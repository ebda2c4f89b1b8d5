//! The work unit: one forecast fetch-and-report per process run.

use std::future::Future;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::config::AppConfig;
use crate::error::AppError;
use crate::exit::ExitCode;
use crate::notify;
use crate::supervisor::Work;
use crate::weather::{FetchError, WeatherClient};

/// Fetches the configured location's forecast and reports it.
///
/// Catches nothing: fetch and processing errors propagate to the lifecycle
/// supervisor, which classifies them. Either the forecast is fully fetched and
/// reported, or no output is produced.
pub struct ForecastWorker {
    config: AppConfig,
    client: WeatherClient,
}

impl ForecastWorker {
    pub fn new(config: AppConfig) -> Self {
        let client = WeatherClient::from_config(&config);
        Self { config, client }
    }

    /// For tests: inject a client pointed at a different endpoint.
    #[cfg(test)]
    fn with_client(config: AppConfig, client: WeatherClient) -> Self {
        Self { config, client }
    }
}

impl Work for ForecastWorker {
    fn run(
        &self,
        args: Vec<String>,
        cancel: CancellationToken,
    ) -> impl Future<Output = Result<ExitCode, AppError>> + Send {
        async move {
            debug!(?args, location = %self.config.location, "work unit starting");

            if cancel.is_cancelled() {
                return Err(AppError::Cancelled);
            }

            let forecast = self
                .client
                .fetch(&self.config.location, &cancel)
                .await
                .map_err(|err| match err {
                    FetchError::Cancelled => AppError::Cancelled,
                    other => AppError::Fetch(other),
                })?;

            match forecast {
                Some(forecast) => notify::report_forecast(&forecast, self.config.units),
                None => notify::report_unavailable(&self.config.location),
            }
            Ok(ExitCode::Success)
        }
    }
}
