//! HTTP client for the OpenWeather current-weather endpoint.
//!
//! One GET per attempt through the [`PolicyStack`]; transient statuses (5xx,
//! 408, 429) and network-level errors are classified inside the attempt so the
//! stack can retry them, while non-transient statuses pass through and are
//! turned into typed errors here. The API key never appears in logs.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use reqwest::header::ACCEPT;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::policies::{CircuitBreaker, PolicyStack, RetryPolicy, TimeoutPolicy};

use super::error::FetchError;
use super::types::WeatherResponse;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

pub struct WeatherClient {
    http: Client,
    base_url: String,
    api_key: String,
    policies: PolicyStack,
    fallback_on_timeout: bool,
}

impl WeatherClient {
    /// Creates a client with an explicit base URL and policy stack (useful for
    /// pointing at a test server).
    pub fn new(api_key: String, base_url: String, policies: PolicyStack) -> Self {
        // The transport owns the connection pool; build it once and reuse it.
        let http = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .expect("failed to build HTTP client");
        Self {
            http,
            base_url,
            api_key,
            policies,
            fallback_on_timeout: false,
        }
    }

    /// Reports "no forecast" instead of an error when the final attempt
    /// times out.
    pub fn with_timeout_fallback(mut self, enabled: bool) -> Self {
        self.fallback_on_timeout = enabled;
        self
    }

    /// Creates a client from application configuration with the policy
    /// observers wired to the log.
    pub fn from_config(config: &AppConfig) -> Self {
        let retry = RetryPolicy::new(
            config.retries,
            Duration::from_millis(config.base_delay_ms),
        )
        .with_observer(Arc::new(|attempt, delay, fault| {
            warn!(attempt, ?delay, %fault, "retrying weather fetch");
        }));

        let breaker = CircuitBreaker::new(
            config.breaker_threshold,
            Duration::from_secs(config.break_secs),
        )
        .on_break(Arc::new(|fault, duration| {
            warn!(%fault, ?duration, "circuit opened");
        }))
        .on_reset(Arc::new(|| {
            info!("circuit closed");
        }));

        let timeout = TimeoutPolicy::new(Duration::from_secs(config.timeout_secs));

        Self::new(
            config.api_key.clone(),
            config.base_url.clone(),
            PolicyStack::new(retry, breaker, timeout),
        )
        .with_timeout_fallback(config.fallback_on_timeout)
    }

    /// Fetches the current weather for `location`.
    ///
    /// Raises [`FetchError::NotFound`] for 404, [`FetchError::Status`] for
    /// other non-success statuses, and [`FetchError::Parse`] /
    /// [`FetchError::Incomplete`] for unusable payloads. Returns `Ok(None)`
    /// when the final attempt timed out and the timeout fallback is enabled.
    pub async fn fetch(
        &self,
        location: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<WeatherResponse>, FetchError> {
        let url = format!("{}?q={}&appid={}", self.base_url, location, self.api_key);
        debug!(url = %redact(&url, &self.api_key), "requesting forecast");

        let attempt = || {
            let http = self.http.clone();
            let url = url.clone();
            let api_key = self.api_key.clone();
            async move {
                let response = http
                    .get(&url)
                    .header(ACCEPT, "application/json")
                    .send()
                    .await
                    .map_err(|err| FetchError::Transient {
                        status: None,
                        // Transport error text echoes the request URL,
                        // key included.
                        detail: redact(&err.to_string(), &api_key),
                    })?;

                let status = response.status().as_u16();
                let body = response.text().await.unwrap_or_default();
                if is_transient_status(status) {
                    Err(FetchError::Transient {
                        status: Some(status),
                        detail: body,
                    })
                } else {
                    Ok(Some((status, body)))
                }
            }
        };

        let outcome = if self.fallback_on_timeout {
            self.policies
                .execute_with_fallback(cancel, attempt, || None)
                .await?
        } else {
            self.policies.execute(cancel, attempt).await?
        };
        let Some((status, body)) = outcome else {
            warn!(location, "attempts timed out; falling back to no forecast");
            return Ok(None);
        };

        if status == 404 {
            return Err(FetchError::NotFound {
                location: location.to_string(),
            });
        }
        if !(200..300).contains(&status) {
            return Err(FetchError::Status { status, body });
        }

        let forecast: WeatherResponse = serde_json::from_str(&body)?;
        if forecast.weather.is_empty() {
            return Err(FetchError::Incomplete(
                "no weather conditions in payload".into(),
            ));
        }
        Ok(Some(forecast))
    }
}

/// Transient per the retry policy: 5xx, request timeout, and rate limiting.
fn is_transient_status(status: u16) -> bool {
    status == 408 || status == 429 || (500..=599).contains(&status)
}

/// Replaces the API key in a URL with a placeholder for logging.
fn redact(url: &str, api_key: &str) -> String {
    if api_key.is_empty() {
        url.to_string()
    } else {
        url.replace(api_key, "***")
    }
}
