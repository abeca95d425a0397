//! Startup sequence run before the server accepts requests.

use sqlx::SqlitePool;
use sqlx::migrate::MigrateError;
use thiserror::Error;
use tracing::info;

use crate::config::AppConfig;
use crate::db::{self, RepositoryError};
use crate::services::seed::{SeedOutcome, ensure_defaults_seeded};

/// Failure during startup. Aborts the process.
#[derive(Debug, Error)]
pub enum InitError {
    #[error("migration failed: {0}")]
    Migrate(#[from] MigrateError),
    #[error("seeding failed: {0}")]
    Repository(#[from] RepositoryError),
}

/// Apply migrations, then seed the default-city table if it is empty.
///
/// Call once, before binding the listener.
///
/// # Errors
///
/// Returns `InitError` if migrations fail or the store rejects the seed
/// inserts. A missing or invalid dataset is not an error.
pub async fn initialize(pool: &SqlitePool, config: &AppConfig) -> Result<SeedOutcome, InitError> {
    db::run_migrations(pool).await?;
    info!("Database migrations applied");

    let outcome = ensure_defaults_seeded(pool, &config.default_cities_path).await?;
    Ok(outcome)
}
