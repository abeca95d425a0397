//! Configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional:
//! - `DATABASE_URL` - `SQLite` connection string (default: `sqlite://cities.db`)
//! - `SKYCAST_HOST` - Bind address (default: 127.0.0.1)
//! - `SKYCAST_PORT` - Listen port (default: 8000)
//! - `WEATHER_API_URL` - Forecast endpoint (default: Open-Meteo `/v1/forecast`)
//! - `WEATHER_TIMEOUT_SECS` - Per-request timeout for forecast calls (default: 10)
//! - `REFRESH_CONCURRENCY` - Forecast calls in flight during a refresh (default: 4)
//! - `DEFAULT_CITIES_PATH` - Seed dataset (default: `crates/web/data/europe.csv`)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag

use std::net::{IpAddr, SocketAddr};
use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Default store location, relative to the working directory.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://cities.db";

/// Open-Meteo forecast endpoint.
pub const DEFAULT_WEATHER_API_URL: &str = "https://api.open-meteo.com/v1/forecast";

/// Bundled seed dataset, relative to the workspace root.
pub const DEFAULT_CITIES_PATH: &str = "crates/web/data/europe.csv";

const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_REFRESH_CONCURRENCY: usize = 4;

const TIMEOUT_SECS_RANGE: RangeInclusive<u64> = 1..=60;
const CONCURRENCY_RANGE: RangeInclusive<usize> = 1..=32;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// `SQLite` database connection URL
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Forecast provider settings
    pub weather: WeatherConfig,
    /// Seed dataset for the default-city table
    pub default_cities_path: PathBuf,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag
    pub sentry_environment: Option<String>,
}

/// Forecast provider and refresh settings.
#[derive(Debug, Clone)]
pub struct WeatherConfig {
    /// Forecast endpoint; coordinates are appended as query parameters
    pub base_url: Url,
    /// Timeout applied to every forecast request
    pub timeout: Duration,
    /// Upper bound on forecast requests in flight during one refresh
    pub refresh_concurrency: usize,
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load a `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = SecretString::from(
            lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
        );
        let host = parse_or_default(&lookup, "SKYCAST_HOST", IpAddr::from([127, 0, 0, 1]))?;
        let port = parse_or_default(&lookup, "SKYCAST_PORT", 8000_u16)?;

        let weather = WeatherConfig::from_lookup(&lookup)?;

        let default_cities_path = lookup("DEFAULT_CITIES_PATH")
            .map_or_else(|| PathBuf::from(DEFAULT_CITIES_PATH), PathBuf::from);

        Ok(Self {
            database_url,
            host,
            port,
            weather,
            default_cities_path,
            sentry_dsn: non_empty(lookup("SENTRY_DSN")),
            sentry_environment: non_empty(lookup("SENTRY_ENVIRONMENT")),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl WeatherConfig {
    fn from_lookup<F>(lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = parse_http_url(
            "WEATHER_API_URL",
            lookup("WEATHER_API_URL")
                .as_deref()
                .unwrap_or(DEFAULT_WEATHER_API_URL),
        )?;

        let timeout_secs = parse_in_range(
            lookup,
            "WEATHER_TIMEOUT_SECS",
            DEFAULT_TIMEOUT_SECS,
            &TIMEOUT_SECS_RANGE,
        )?;

        let refresh_concurrency = parse_in_range(
            lookup,
            "REFRESH_CONCURRENCY",
            DEFAULT_REFRESH_CONCURRENCY,
            &CONCURRENCY_RANGE,
        )?;

        Ok(Self {
            base_url,
            timeout: Duration::from_secs(timeout_secs),
            refresh_concurrency,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse a variable, falling back to `default` when unset.
fn parse_or_default<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
        None => Ok(default),
    }
}

/// Parse a numeric variable and check it against an inclusive range.
fn parse_in_range<F, T>(
    lookup: &F,
    key: &str,
    default: T,
    range: &RangeInclusive<T>,
) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + PartialOrd + std::fmt::Display,
    T::Err: std::fmt::Display,
{
    let value = parse_or_default(lookup, key, default)?;
    if !range.contains(&value) {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!(
                "must be between {} and {} (got {value})",
                range.start(),
                range.end()
            ),
        ));
    }
    Ok(value)
}

/// Parse a URL and require an http(s) scheme.
fn parse_http_url(key: &str, raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim())
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme '{other}'"),
        )),
    }
}

/// Treat empty strings the same as unset variables.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
