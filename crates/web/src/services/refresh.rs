//! Weather refresh for every tracked city.
//!
//! A refresh takes one snapshot of the tracked list, fetches each city's
//! temperature with bounded fan-out, and writes every successful reading in
//! a single transaction. Cities whose fetch fails keep their previous
//! reading. Refreshes are serialized; a second caller waits for the first to
//! commit.

use futures::{StreamExt, future, stream};
use sqlx::SqlitePool;
use tokio::sync::Mutex;
use tracing::{info, instrument};

use skycast_core::{Coordinates, TrackedCityId};

use crate::db::{RepositoryError, TrackedCityRepository};
use crate::models::WeatherReading;
use crate::weather::TemperatureSource;

/// Outcome of one refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RefreshSummary {
    /// Cities in the snapshot.
    pub attempted: usize,
    /// Rows that received a new reading.
    pub updated: u64,
    /// Cities whose fetch produced no value.
    pub unavailable: usize,
}

/// Runs refreshes against a [`TemperatureSource`].
#[derive(Debug)]
pub struct RefreshService<W> {
    source: W,
    concurrency: usize,
    lock: Mutex<()>,
}

impl<W: TemperatureSource> RefreshService<W> {
    /// Create a refresh service issuing at most `concurrency` fetches at once.
    #[must_use]
    pub fn new(source: W, concurrency: usize) -> Self {
        Self {
            source,
            concurrency: concurrency.max(1),
            lock: Mutex::new(()),
        }
    }

    /// The temperature source used for fetches.
    #[must_use]
    pub const fn source(&self) -> &W {
        &self.source
    }

    /// Fetch current weather for every tracked city and store the results.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the snapshot read or the final commit
    /// fails. Nothing is written in that case. Failed fetches are not errors.
    #[instrument(skip(self, pool))]
    pub async fn refresh_all(&self, pool: &SqlitePool) -> Result<RefreshSummary, RepositoryError> {
        let _guard = self.lock.lock().await;

        let repo = TrackedCityRepository::new(pool);
        let targets: Vec<(TrackedCityId, Coordinates)> = repo
            .list()
            .await?
            .into_iter()
            .map(|city| (city.id, city.coordinates))
            .collect();

        if targets.is_empty() {
            info!("No tracked cities to refresh");
            return Ok(RefreshSummary::default());
        }

        let attempted = targets.len();
        let source = &self.source;

        let readings: Vec<(TrackedCityId, WeatherReading)> = stream::iter(targets)
            .map(move |(id, coordinates)| async move {
                source
                    .fetch_temperature(coordinates)
                    .await
                    .map(|temperature| (id, WeatherReading::now(temperature)))
            })
            .buffer_unordered(self.concurrency)
            .filter_map(future::ready)
            .collect()
            .await;

        let unavailable = attempted - readings.len();
        let updated = repo.apply_readings(&readings).await?;

        let summary = RefreshSummary {
            attempted,
            updated,
            unavailable,
        };
        info!(
            attempted = summary.attempted,
            updated = summary.updated,
            unavailable = summary.unavailable,
            "Refresh complete"
        );

        Ok(summary)
    }
}
