//! Command-line interface, built on clap.
//!
//! One run per invocation: the location is positional, everything else
//! overrides the corresponding `skycast.toml` value.

use std::path::PathBuf;

use clap::Parser;

use crate::temperature::TemperatureUnit;

/// skycast — fetch and report the current weather for a location.
#[derive(Debug, Parser)]
#[command(name = "skycast", version, about)]
pub struct Cli {
    /// Location to fetch the forecast for (overrides the config file).
    pub location: Option<String>,

    /// Path to the configuration file.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Temperature unit for the report.
    #[arg(long)]
    pub units: Option<TemperatureUnit>,

    /// Maximum retry attempts for transient HTTP failures.
    #[arg(long)]
    pub retries: Option<u32>,

    /// Consecutive failures before the circuit breaker opens.
    #[arg(long)]
    pub breaker_threshold: Option<u32>,

    /// Seconds the circuit stays open after breaking.
    #[arg(long)]
    pub break_secs: Option<u64>,

    /// Per-attempt HTTP timeout in seconds.
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Report "forecast unavailable" instead of failing when the final
    /// attempt times out.
    #[arg(long, default_value_t = false)]
    pub fallback_on_timeout: bool,

    /// Enable verbose (debug) output.
    #[arg(long, short, default_value_t = false)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_parses_positional_location() {
        let cli = Cli::parse_from(["skycast", "London"]);
        assert_eq!(cli.location.unwrap(), "London");
        assert!(!cli.verbose);
    }

    #[test]
    fn cli_parses_override_flags() {
        let cli = Cli::parse_from([
            "skycast",
            "--units",
            "fahrenheit",
            "--retries",
            "5",
            "--timeout-secs",
            "20",
            "--fallback-on-timeout",
            "--verbose",
            "Lisbon",
        ]);
        assert_eq!(cli.location.unwrap(), "Lisbon");
        assert!(matches!(cli.units, Some(TemperatureUnit::Fahrenheit)));
        assert_eq!(cli.retries, Some(5));
        assert_eq!(cli.timeout_secs, Some(20));
        assert!(cli.fallback_on_timeout);
        assert!(cli.verbose);
    }

    #[test]
    fn cli_parses_breaker_flags() {
        let cli = Cli::parse_from(["skycast", "--breaker-threshold", "2", "--break-secs", "60"]);
        assert_eq!(cli.breaker_threshold, Some(2));
        assert_eq!(cli.break_secs, Some(60));
        assert!(cli.location.is_none());
    }

    #[test]
    fn cli_verify() {
        Cli::command().debug_assert();
    }
}
