//! Forecast API response types.

use serde::Deserialize;

/// Subset of the `/v1/forecast?current_weather=true` response.
#[derive(Debug, Deserialize)]
pub struct ForecastResponse {
    pub current_weather: CurrentWeather,
}

/// The `current_weather` block.
#[derive(Debug, Deserialize)]
pub struct CurrentWeather {
    /// Air temperature at 2 m, degrees Celsius.
    pub temperature: f64,
}
