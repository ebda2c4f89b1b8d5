pub mod client;
pub mod error;
pub mod types;

pub use client::WeatherClient;
pub use error::FetchError;
pub use types::{Clouds, Coordinates, MainMetrics, Sys, WeatherCondition, WeatherResponse, Wind};
