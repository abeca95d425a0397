//! HTTP client for the forecast endpoint.

use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::{debug, instrument, warn};
use url::Url;

use skycast_core::Coordinates;

use super::TemperatureSource;
use super::types::ForecastResponse;
use crate::config::WeatherConfig;

/// Why a fetch produced no value. Logged, never returned to callers.
#[derive(Debug, Error)]
enum FetchError {
    #[error("forecast request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("forecast request timed out")]
    Timeout,

    #[error("forecast API returned {0}")]
    Status(StatusCode),

    #[error("forecast response could not be decoded: {0}")]
    Decode(#[source] reqwest::Error),

    #[error("forecast temperature is not a finite number")]
    NonFinite,
}

impl FetchError {
    fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Request(err)
        }
    }
}

/// Open-Meteo forecast client.
///
/// One GET per call, no retries. The underlying `reqwest::Client` carries the
/// configured timeout, so a stalled upstream cannot hold up a refresh.
#[derive(Debug, Clone)]
pub struct WeatherClient {
    client: Client,
    base_url: Url,
}

impl WeatherClient {
    /// Create a new forecast client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built (TLS backend
    /// initialization failure).
    pub fn new(config: &WeatherConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("skycast/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    fn forecast_url(&self, coordinates: Coordinates) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("latitude", &coordinates.latitude().to_string())
            .append_pair("longitude", &coordinates.longitude().to_string())
            .append_pair("current_weather", "true");
        url
    }

    async fn try_fetch(&self, coordinates: Coordinates) -> Result<f64, FetchError> {
        let response = self
            .client
            .get(self.forecast_url(coordinates))
            .send()
            .await
            .map_err(FetchError::from_transport)?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::Status(status));
        }

        let body: ForecastResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout
            } else {
                FetchError::Decode(e)
            }
        })?;

        let temperature = body.current_weather.temperature;
        if !temperature.is_finite() {
            return Err(FetchError::NonFinite);
        }

        Ok(temperature)
    }
}

impl TemperatureSource for WeatherClient {
    #[instrument(
        skip_all,
        fields(lat = coordinates.latitude(), lon = coordinates.longitude())
    )]
    async fn fetch_temperature(&self, coordinates: Coordinates) -> Option<f64> {
        match self.try_fetch(coordinates).await {
            Ok(temperature) => {
                debug!(temperature, "Fetched current temperature");
                Some(temperature)
            }
            Err(e) => {
                warn!(error = %e, "Current weather unavailable");
                None
            }
        }
    }
}
