//! Seed the default city table from a dataset file.

use std::path::PathBuf;

use skycast_web::services::{SeedOutcome, ensure_defaults_seeded};

use super::{CommandError, connect};

/// Seed default cities.
///
/// `file` overrides `DEFAULT_CITIES_PATH`.
pub async fn run(file: Option<PathBuf>) -> Result<(), CommandError> {
    let (config, pool) = connect().await?;

    let source = file.unwrap_or(config.default_cities_path);
    let outcome = ensure_defaults_seeded(&pool, &source).await?;

    match outcome {
        SeedOutcome::AlreadySeeded { existing } => {
            tracing::info!(existing, "Default cities already present, nothing to do");
        }
        SeedOutcome::SourceMissing { path, reason } | SeedOutcome::SourceInvalid { path, reason } => {
            tracing::warn!(path = %path.display(), %reason, "Dataset not used");
        }
        SeedOutcome::Seeded { inserted, skipped } => {
            tracing::info!(inserted, skipped, "Seeding complete!");
        }
    }

    pool.close().await;
    Ok(())
}
