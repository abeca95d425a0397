//! Open-Meteo current weather client.
//!
//! The refresh service only depends on the [`TemperatureSource`] trait, so
//! tests can substitute a deterministic source for the HTTP client.

mod client;
pub mod types;

use std::future::Future;

use skycast_core::Coordinates;

pub use client::WeatherClient;

/// Something that can report the current temperature at a location.
///
/// Every failure (transport, status, decode) is reported as `None`; callers
/// never see an error.
pub trait TemperatureSource: Send + Sync {
    /// Current air temperature in degrees Celsius, if available.
    fn fetch_temperature(
        &self,
        coordinates: Coordinates,
    ) -> impl Future<Output = Option<f64>> + Send;
}
