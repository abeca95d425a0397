//! Command implementations.

pub mod cities;
pub mod migrate;
pub mod refresh;
pub mod seed;

use sqlx::SqlitePool;
use thiserror::Error;

use skycast_web::config::{AppConfig, ConfigError};
use skycast_web::db::{self, RepositoryError};

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("Failed to build weather client: {0}")]
    WeatherClient(String),
}

/// Load configuration and open a migrated pool.
async fn connect() -> Result<(AppConfig, SqlitePool), CommandError> {
    let config = AppConfig::from_env()?;
    let pool = open(&config).await?;
    Ok((config, pool))
}

/// Open the pool and apply pending migrations, so every command works
/// against a fresh database file.
async fn open(config: &AppConfig) -> Result<SqlitePool, CommandError> {
    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&config.database_url).await?;

    tracing::info!("Running migrations...");
    db::run_migrations(&pool).await?;
    Ok(pool)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use skycast_web::db::{DefaultCityRepository, TrackedCityRepository};

    use super::*;

    #[tokio::test]
    async fn test_open_prepares_fresh_database() {
        let config = AppConfig::from_lookup(|key| {
            (key == "DATABASE_URL").then(|| "sqlite::memory:".to_string())
        })
        .unwrap();

        let pool = open(&config).await.unwrap();

        assert!(TrackedCityRepository::new(&pool).list().await.unwrap().is_empty());
        assert_eq!(
            TrackedCityRepository::new(&pool)
                .reset_to_defaults()
                .await
                .unwrap(),
            0
        );
        assert_eq!(DefaultCityRepository::new(&pool).count().await.unwrap(), 0);
    }
}
