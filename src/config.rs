//! Application configuration loaded from `skycast.toml`.
//!
//! Values absent from the file fall back to sensible defaults. The
//! `OPENWEATHER_API_KEY` environment variable takes precedence over the file,
//! and command-line flags take precedence over both. Required values are
//! validated eagerly so a bad configuration fails the run before any work is
//! launched.

use std::path::Path;

use serde::Deserialize;

use crate::cli::Cli;
use crate::error::AppError;
use crate::temperature::TemperatureUnit;

pub const DEFAULT_CONFIG_PATH: &str = "skycast.toml";

/// Top-level configuration for a single run.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// OpenWeather API key. Required.
    #[serde(default)]
    pub api_key: String,

    /// Endpoint for the current-weather API.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Location to fetch the forecast for. Required.
    #[serde(default)]
    pub location: String,

    /// Temperature unit used in the report.
    #[serde(default = "default_units")]
    pub units: TemperatureUnit,

    /// Maximum retry attempts for transient failures.
    #[serde(default = "default_retries")]
    pub retries: u32,

    /// Base delay in milliseconds for exponential backoff.
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,

    /// Consecutive failures before the circuit opens.
    #[serde(default = "default_breaker_threshold")]
    pub breaker_threshold: u32,

    /// Seconds the circuit stays open after breaking.
    #[serde(default = "default_break_secs")]
    pub break_secs: u64,

    /// Per-attempt HTTP timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Report "forecast unavailable" instead of failing when the final
    /// attempt times out.
    #[serde(default)]
    pub fallback_on_timeout: bool,
}

fn default_base_url() -> String {
    "https://api.openweathermap.org/data/2.5/weather".to_string()
}

fn default_units() -> TemperatureUnit {
    TemperatureUnit::Celsius
}

fn default_retries() -> u32 {
    3
}

fn default_base_delay_ms() -> u64 {
    1000
}

fn default_breaker_threshold() -> u32 {
    5
}

fn default_break_secs() -> u64 {
    30
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
            location: String::new(),
            units: default_units(),
            retries: default_retries(),
            base_delay_ms: default_base_delay_ms(),
            breaker_threshold: default_breaker_threshold(),
            break_secs: default_break_secs(),
            timeout_secs: default_timeout_secs(),
            fallback_on_timeout: false,
        }
    }
}

impl AppConfig {
    /// Loads configuration for this run: file, then environment, then CLI.
    /// Validates before returning.
    pub fn load(cli: &Cli) -> Result<Self, AppError> {
        let path = cli
            .config
            .clone()
            .unwrap_or_else(|| DEFAULT_CONFIG_PATH.into());
        let mut config = Self::load_path(&path)?;

        // Environment variable takes precedence over the file for the API key.
        if let Ok(key) = std::env::var("OPENWEATHER_API_KEY")
            && !key.is_empty()
        {
            config.api_key = key;
        }

        config.apply_cli(cli);
        config.validate()?;
        Ok(config)
    }

    /// Reads the file at `path`, or returns defaults if it does not exist.
    pub fn load_path(path: &Path) -> Result<Self, AppError> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            Ok(toml::from_str::<AppConfig>(&contents)?)
        } else {
            Ok(Self::default())
        }
    }

    /// Applies command-line overrides on top of file/env values.
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(location) = &cli.location {
            self.location = location.clone();
        }
        if let Some(units) = cli.units {
            self.units = units;
        }
        if let Some(retries) = cli.retries {
            self.retries = retries;
        }
        if let Some(threshold) = cli.breaker_threshold {
            self.breaker_threshold = threshold;
        }
        if let Some(break_secs) = cli.break_secs {
            self.break_secs = break_secs;
        }
        if let Some(timeout_secs) = cli.timeout_secs {
            self.timeout_secs = timeout_secs;
        }
        if cli.fallback_on_timeout {
            self.fallback_on_timeout = true;
        }
    }

    /// Fails fast on missing or nonsensical required values.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.api_key.is_empty() {
            return Err(AppError::Config(
                "api_key not specified (set it in skycast.toml or OPENWEATHER_API_KEY)".into(),
            ));
        }
        if self.location.is_empty() {
            return Err(AppError::Config(
                "location not specified (pass it as an argument or set it in skycast.toml)".into(),
            ));
        }
        if self.base_url.is_empty() {
            return Err(AppError::Config("base_url must not be empty".into()));
        }
        if self.timeout_secs == 0 {
            return Err(AppError::Config("timeout_secs must be at least 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;

    #[test]
    fn default_config_values() {
        let config = AppConfig::default();
        assert!(config.api_key.is_empty());
        assert_eq!(
            config.base_url,
            "https://api.openweathermap.org/data/2.5/weather"
        );
        assert_eq!(config.units, TemperatureUnit::Celsius);
        assert_eq!(config.retries, 3);
        assert_eq!(config.base_delay_ms, 1000);
        assert_eq!(config.breaker_threshold, 5);
        assert_eq!(config.break_secs, 30);
        assert_eq!(config.timeout_secs, 10);
        assert!(!config.fallback_on_timeout);
    }

    #[test]
    fn deserialize_partial_toml() {
        let toml_str = r#"
            api_key = "ow-test-123"
            location = "London"
            retries = 5
            units = "kelvin"
        "#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.api_key, "ow-test-123");
        assert_eq!(config.location, "London");
        assert_eq!(config.retries, 5);
        assert_eq!(config.units, TemperatureUnit::Kelvin);
        assert_eq!(config.breaker_threshold, 5);
    }

    #[test]
    fn load_path_reads_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("skycast.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "api_key = \"from-file\"\nlocation = \"Porto\"").unwrap();

        let config = AppConfig::load_path(&path).unwrap();
        assert_eq!(config.api_key, "from-file");
        assert_eq!(config.location, "Porto");
    }

    #[test]
    fn load_path_missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_path(&dir.path().join("absent.toml")).unwrap();
        assert!(config.api_key.is_empty());
        assert_eq!(config.retries, 3);
    }

    #[test]
    fn load_path_rejects_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("skycast.toml");
        std::fs::write(&path, "api_key = [not toml").unwrap();
        assert!(matches!(
            AppConfig::load_path(&path),
            Err(AppError::Toml(_))
        ));
    }

    #[test]
    fn cli_overrides_file_values() {
        let mut config = AppConfig {
            api_key: "key".into(),
            location: "London".into(),
            ..AppConfig::default()
        };
        let cli = Cli::parse_from(["skycast", "--units", "kelvin", "--retries", "7", "Lisbon"]);
        config.apply_cli(&cli);
        assert_eq!(config.location, "Lisbon");
        assert_eq!(config.units, TemperatureUnit::Kelvin);
        assert_eq!(config.retries, 7);
        // Untouched values survive.
        assert_eq!(config.breaker_threshold, 5);
    }

    #[test]
    fn timeout_fallback_from_file_or_flag() {
        let config: AppConfig = toml::from_str("fallback_on_timeout = true").unwrap();
        assert!(config.fallback_on_timeout);

        let mut config = AppConfig::default();
        let cli = Cli::parse_from(["skycast", "--fallback-on-timeout"]);
        config.apply_cli(&cli);
        assert!(config.fallback_on_timeout);
    }

    #[test]
    fn validate_requires_api_key_and_location() {
        let config = AppConfig::default();
        assert!(matches!(config.validate(), Err(AppError::Config(_))));

        let config = AppConfig {
            api_key: "key".into(),
            ..AppConfig::default()
        };
        assert!(matches!(config.validate(), Err(AppError::Config(_))));

        let config = AppConfig {
            api_key: "key".into(),
            location: "London".into(),
            ..AppConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_zero_timeout() {
        let config = AppConfig {
            api_key: "key".into(),
            location: "London".into(),
            timeout_secs: 0,
            ..AppConfig::default()
        };
        assert!(matches!(config.validate(), Err(AppError::Config(_))));
    }
}
