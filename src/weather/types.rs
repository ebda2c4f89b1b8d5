//! Data models for the OpenWeather current-weather API response.
//!
//! Field names follow the wire format of the `/data/2.5/weather` endpoint;
//! `serde(rename)` covers the places where the JSON name is not valid Rust.
//! `main`, `weather` and `name` are required — a payload without them cannot be
//! reported and fails deserialization, which the fetcher surfaces as a parse
//! error rather than a panic or a silent default.

use serde::{Deserialize, Serialize};

/// Deserialized forecast for a single location. Immutable after construction;
/// owned by the fetcher until handed to the work unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherResponse {
    #[serde(default)]
    pub coord: Option<Coordinates>,
    /// Observed conditions. Required by the API but may arrive empty.
    pub weather: Vec<WeatherCondition>,
    /// Temperature and atmospheric metrics. Temperatures are in Kelvin.
    pub main: MainMetrics,
    #[serde(default)]
    pub visibility: Option<i64>,
    #[serde(default)]
    pub wind: Option<Wind>,
    #[serde(default)]
    pub clouds: Option<Clouds>,
    /// Observation time, unix seconds UTC.
    #[serde(default)]
    pub dt: i64,
    #[serde(default)]
    pub sys: Option<Sys>,
    /// Offset from UTC in seconds for the location.
    #[serde(default)]
    pub timezone: i32,
    #[serde(default)]
    pub id: i64,
    /// Resolved location name.
    pub name: String,
    #[serde(default)]
    pub cod: i64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Coordinates {
    pub lon: f64,
    pub lat: f64,
}

/// One entry of the conditions list ("Clouds", "Rain", ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherCondition {
    pub id: i64,
    pub main: String,
    pub description: String,
    pub icon: String,
}

/// Main temperature and atmosphere block. All temperatures in Kelvin.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MainMetrics {
    pub temp: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub pressure: i64,
    pub humidity: i64,
    #[serde(default)]
    pub sea_level: Option<i64>,
    #[serde(default, rename = "grnd_level")]
    pub ground_level: Option<i64>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Wind {
    pub speed: f64,
    #[serde(default)]
    pub deg: i64,
    #[serde(default)]
    pub gust: Option<f64>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Clouds {
    pub all: i64,
}

/// Country and sun times. Sunrise/sunset are unix seconds UTC.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sys {
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub sunrise: i64,
    #[serde(default)]
    pub sunset: i64,
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// A realistic London payload used across fetcher and worker tests.
    pub(crate) const LONDON_JSON: &str = r#"{
        "coord": {"lon": -0.1257, "lat": 51.5085},
        "weather": [{"id": 804, "main": "Clouds", "description": "overcast clouds", "icon": "04d"}],
        "base": "stations",
        "main": {"temp": 284.19, "feels_like": 283.52, "temp_min": 282.93, "temp_max": 285.38,
                 "pressure": 1012, "humidity": 82, "sea_level": 1012, "grnd_level": 1008},
        "visibility": 10000,
        "wind": {"speed": 4.12, "deg": 250, "gust": 7.2},
        "clouds": {"all": 100},
        "dt": 1700050000,
        "sys": {"country": "GB", "sunrise": 1700032210, "sunset": 1700064438},
        "timezone": 0,
        "id": 2643743,
        "name": "London",
        "cod": 200
    }"#;

    #[test]
    fn deserializes_full_api_payload() {
        let resp: WeatherResponse = serde_json::from_str(LONDON_JSON).unwrap();
        assert_eq!(resp.name, "London");
        assert_eq!(resp.weather[0].description, "overcast clouds");
        assert!((resp.main.temp - 284.19).abs() < f64::EPSILON);
        assert_eq!(resp.main.ground_level, Some(1008));
        assert_eq!(resp.sys.unwrap().country.as_deref(), Some("GB"));
        assert_eq!(resp.timezone, 0);
    }

    #[test]
    fn optional_blocks_may_be_absent() {
        let json = r#"{
            "weather": [{"id": 800, "main": "Clear", "description": "clear sky", "icon": "01d"}],
            "main": {"temp": 290.0, "feels_like": 289.0, "temp_min": 288.0, "temp_max": 292.0,
                     "pressure": 1015, "humidity": 50},
            "name": "Testville"
        }"#;
        let resp: WeatherResponse = serde_json::from_str(json).unwrap();
        assert!(resp.coord.is_none());
        assert!(resp.wind.is_none());
        assert!(resp.sys.is_none());
        assert_eq!(resp.main.sea_level, None);
    }

    #[test]
    fn null_main_fails_deserialization() {
        let json = r#"{"weather": [], "main": null, "name": "X"}"#;
        assert!(serde_json::from_str::<WeatherResponse>(json).is_err());
    }

    #[test]
    fn missing_name_fails_deserialization() {
        let json = r#"{
            "weather": [],
            "main": {"temp": 290.0, "feels_like": 289.0, "temp_min": 288.0, "temp_max": 292.0,
                     "pressure": 1015, "humidity": 50}
        }"#;
        assert!(serde_json::from_str::<WeatherResponse>(json).is_err());
    }
}
