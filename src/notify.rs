//! Renders a fetched forecast to the user.
//!
//! One structured log entry plus a plain stdout report. This is the only place
//! that prints; the work unit either gets here with a complete response (or an
//! explicit timeout fallback) or produces no output at all.

use chrono::{DateTime, FixedOffset};
use tracing::{info, warn};

use crate::temperature::{self, TemperatureUnit};
use crate::weather::WeatherResponse;

/// Reports the forecast in the requested temperature unit.
pub fn report_forecast(forecast: &WeatherResponse, unit: TemperatureUnit) {
    let main = &forecast.main;
    let from = TemperatureUnit::Kelvin;
    let temp = temperature::convert(main.temp, from, unit);
    let feels_like = temperature::convert(main.feels_like, from, unit);
    let temp_min = temperature::convert(main.temp_min, from, unit);
    let temp_max = temperature::convert(main.temp_max, from, unit);

    let description = forecast
        .weather
        .first()
        .map(|w| w.description.as_str())
        .unwrap_or("unknown conditions");
    let country = forecast
        .sys
        .as_ref()
        .and_then(|sys| sys.country.as_deref())
        .unwrap_or("");
    let sym = unit.symbol();

    info!(
        city = %forecast.name,
        country,
        temperature = temp,
        feels_like,
        unit = %unit,
        description,
        "weather forecast"
    );

    if country.is_empty() {
        println!(
            "Weather for {}: {temp:.0}{sym} (feels like {feels_like:.0}{sym}), \
             min {temp_min:.0}{sym} / max {temp_max:.0}{sym}, {description}",
            forecast.name
        );
    } else {
        println!(
            "Weather for {}, {country}: {temp:.0}{sym} (feels like {feels_like:.0}{sym}), \
             min {temp_min:.0}{sym} / max {temp_max:.0}{sym}, {description}",
            forecast.name
        );
    }
    println!(
        "Humidity {}%, pressure {} hPa",
        main.humidity, main.pressure
    );

    if let Some(sys) = &forecast.sys
        && let (Some(sunrise), Some(sunset)) = (
            format_local(sys.sunrise, forecast.timezone),
            format_local(sys.sunset, forecast.timezone),
        )
    {
        println!("Sunrise {sunrise}, sunset {sunset} (local time)");
    }
}

/// Reports that no forecast could be fetched before the deadline.
pub fn report_unavailable(location: &str) {
    warn!(location, "no forecast before the deadline");
    println!("Weather for {location} is currently unavailable (request timed out).");
}

/// Formats a unix timestamp in the location's UTC offset as HH:MM.
fn format_local(timestamp: i64, offset_secs: i32) -> Option<String> {
    let offset = FixedOffset::east_opt(offset_secs)?;
    let local = DateTime::from_timestamp(timestamp, 0)?.with_timezone(&offset);
    Some(local.format("%H:%M").to_string())
}
