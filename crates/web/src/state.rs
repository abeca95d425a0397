//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::config::AppConfig;
use crate::services::RefreshService;
use crate::weather::WeatherClient;

/// Error creating application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("failed to build weather client: {0}")]
    WeatherClient(#[from] reqwest::Error),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the database pool and the refresh service.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    pool: SqlitePool,
    refresh: RefreshService<WeatherClient>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Application configuration (weather client settings)
    /// * `pool` - `SQLite` connection pool
    ///
    /// # Errors
    ///
    /// Returns an error if the weather HTTP client cannot be built.
    pub fn new(config: &AppConfig, pool: SqlitePool) -> Result<Self, StateError> {
        let client = WeatherClient::new(&config.weather)?;
        let refresh = RefreshService::new(client, config.weather.refresh_concurrency);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                pool,
                refresh,
            }),
        })
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.inner.pool
    }

    /// Get a reference to the refresh service.
    #[must_use]
    pub fn refresh(&self) -> &RefreshService<WeatherClient> {
        &self.inner.refresh
    }
}
