use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Temperature units the forecast can be reported in.
///
/// The API delivers Kelvin; conversion goes through Celsius as the
/// intermediate step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    Celsius,
    Fahrenheit,
    Kelvin,
}

impl TemperatureUnit {
    /// Short symbol used in the rendered forecast.
    pub fn symbol(self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "ºC",
            TemperatureUnit::Fahrenheit => "ºF",
            TemperatureUnit::Kelvin => "K",
        }
    }
}

impl fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemperatureUnit::Celsius => write!(f, "Celsius"),
            TemperatureUnit::Fahrenheit => write!(f, "Fahrenheit"),
            TemperatureUnit::Kelvin => write!(f, "Kelvin"),
        }
    }
}

/// Converts a temperature value between units.
pub fn convert(value: f64, from: TemperatureUnit, to: TemperatureUnit) -> f64 {
    if from == to {
        return value;
    }

    let celsius = match from {
        TemperatureUnit::Celsius => value,
        TemperatureUnit::Fahrenheit => (value - 32.0) * 5.0 / 9.0,
        TemperatureUnit::Kelvin => value - 273.15,
    };

    match to {
        TemperatureUnit::Celsius => celsius,
        TemperatureUnit::Fahrenheit => celsius * 9.0 / 5.0 + 32.0,
        TemperatureUnit::Kelvin => celsius + 273.15,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn identity_conversion() {
        assert!(close(
            convert(284.19, TemperatureUnit::Kelvin, TemperatureUnit::Kelvin),
            284.19
        ));
    }

    #[test]
    fn kelvin_to_celsius() {
        assert!(close(
            convert(273.15, TemperatureUnit::Kelvin, TemperatureUnit::Celsius),
            0.0
        ));
        assert!(close(
            convert(284.19, TemperatureUnit::Kelvin, TemperatureUnit::Celsius),
            11.04
        ));
    }

    #[test]
    fn kelvin_to_fahrenheit() {
        assert!(close(
            convert(273.15, TemperatureUnit::Kelvin, TemperatureUnit::Fahrenheit),
            32.0
        ));
    }

    #[test]
    fn fahrenheit_to_celsius_roundtrip() {
        let c = convert(98.6, TemperatureUnit::Fahrenheit, TemperatureUnit::Celsius);
        assert!(close(c, 37.0));
        let f = convert(c, TemperatureUnit::Celsius, TemperatureUnit::Fahrenheit);
        assert!(close(f, 98.6));
    }

    #[test]
    fn symbols() {
        assert_eq!(TemperatureUnit::Celsius.symbol(), "ºC");
        assert_eq!(TemperatureUnit::Fahrenheit.symbol(), "ºF");
        assert_eq!(TemperatureUnit::Kelvin.symbol(), "K");
    }

    #[test]
    fn deserializes_lowercase_config_value() {
        let unit: TemperatureUnit = serde_json::from_str(r#""fahrenheit""#).unwrap();
        assert_eq!(unit, TemperatureUnit::Fahrenheit);
    }
}
