//! Tracked city repository.
//!
//! Runtime-checked queries against the `tracked_city` table. Multi-row writes
//! (reset, applying refresh readings) run inside a single transaction so a
//! failure never leaves a partially written list behind.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::{debug, instrument};

use skycast_core::{CityName, Coordinates, TrackedCityId};

use super::RepositoryError;
use crate::models::{NewCity, TrackedCity, WeatherReading};

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct TrackedCityRow {
    id: TrackedCityId,
    name: String,
    latitude: f64,
    longitude: f64,
    temperature: Option<f64>,
    updated_at: Option<DateTime<Utc>>,
}

impl TryFrom<TrackedCityRow> for TrackedCity {
    type Error = RepositoryError;

    fn try_from(row: TrackedCityRow) -> Result<Self, Self::Error> {
        let name = CityName::parse(&row.name).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid name for city {}: {e}", row.id))
        })?;
        let coordinates = Coordinates::new(row.latitude, row.longitude).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid coordinates for city {}: {e}", row.id))
        })?;
        let weather = match (row.temperature, row.updated_at) {
            (Some(temperature), Some(updated_at)) => Some(WeatherReading {
                temperature,
                updated_at,
            }),
            (None, None) => None,
            _ => {
                return Err(RepositoryError::DataCorruption(format!(
                    "city {} has a temperature without a timestamp or vice versa",
                    row.id
                )));
            }
        };

        Ok(Self {
            id: row.id,
            name,
            coordinates,
            weather,
        })
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for tracked city database operations.
pub struct TrackedCityRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> TrackedCityRepository<'a> {
    /// Create a new tracked city repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List all tracked cities in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored row is invalid.
    pub async fn list(&self) -> Result<Vec<TrackedCity>, RepositoryError> {
        let rows = sqlx::query_as::<_, TrackedCityRow>(
            r"
            SELECT id, name, latitude, longitude, temperature, updated_at
            FROM tracked_city
            ORDER BY id
            ",
        )
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TrackedCity::try_from).collect()
    }

    /// Get a tracked city by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored row is invalid.
    pub async fn get(&self, id: TrackedCityId) -> Result<Option<TrackedCity>, RepositoryError> {
        let row = sqlx::query_as::<_, TrackedCityRow>(
            r"
            SELECT id, name, latitude, longitude, temperature, updated_at
            FROM tracked_city
            WHERE id = ?
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(TrackedCity::try_from).transpose()
    }

    /// Start tracking a city. The new row has no reading.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    #[instrument(skip(self, city), fields(name = %city.name))]
    pub async fn create(&self, city: &NewCity) -> Result<TrackedCity, RepositoryError> {
        let row = sqlx::query_as::<_, TrackedCityRow>(
            r"
            INSERT INTO tracked_city (name, latitude, longitude)
            VALUES (?, ?, ?)
            RETURNING id, name, latitude, longitude, temperature, updated_at
            ",
        )
        .bind(city.name.as_str())
        .bind(city.coordinates.latitude())
        .bind(city.coordinates.longitude())
        .fetch_one(self.pool)
        .await?;

        TrackedCity::try_from(row)
    }

    /// Stop tracking a city.
    ///
    /// Returns `false` when no city has this ID; that is not an error.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: TrackedCityId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM tracked_city WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Replace every tracked city with a copy of the default cities.
    ///
    /// Delete and copy run in one transaction. Returns the number of cities
    /// now tracked.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if either statement or the commit
    /// fails; the previous list is left intact in that case.
    #[instrument(skip(self))]
    pub async fn reset_to_defaults(&self) -> Result<u64, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let removed = sqlx::query("DELETE FROM tracked_city")
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let created = sqlx::query(
            r"
            INSERT INTO tracked_city (name, latitude, longitude)
            SELECT name, latitude, longitude
            FROM default_city
            ORDER BY id
            ",
        )
        .execute(&mut *tx)
        .await?
        .rows_affected();

        tx.commit().await?;

        debug!(removed, created, "Tracked cities reset to defaults");
        Ok(created)
    }

    /// Write a batch of readings in one transaction.
    ///
    /// IDs that no longer exist are skipped. Returns the number of rows
    /// updated.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any update or the commit fails;
    /// none of the readings are kept in that case.
    #[instrument(skip(self, readings), fields(count = readings.len()))]
    pub async fn apply_readings(
        &self,
        readings: &[(TrackedCityId, WeatherReading)],
    ) -> Result<u64, RepositoryError> {
        if readings.is_empty() {
            return Ok(0);
        }

        let mut tx = self.pool.begin().await?;
        let mut updated = 0;

        for (id, reading) in readings {
            updated += sqlx::query(
                r"
                UPDATE tracked_city
                SET temperature = ?, updated_at = ?
                WHERE id = ?
                ",
            )
            .bind(reading.temperature)
            .bind(reading.updated_at)
            .bind(*id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        }

        tx.commit().await?;
        Ok(updated)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::db::{DefaultCityRepository, test_pool};

    fn city(name: &str, lat: f64, lon: f64) -> NewCity {
        NewCity::parse(name, lat, lon).unwrap()
    }

    fn names(cities: &[TrackedCity]) -> Vec<&str> {
        cities.iter().map(|c| c.name.as_str()).collect()
    }

    #[tokio::test]
    async fn test_create_then_list() {
        let pool = test_pool().await;
        let repo = TrackedCityRepository::new(&pool);

        let created = repo.create(&city("Lyon", 45.76, 4.84)).await.unwrap();
        let cities = repo.list().await.unwrap();

        assert_eq!(cities.len(), 1);
        assert_eq!(cities[0], created);
        assert_eq!(created.name.as_str(), "Lyon");
        assert!(created.weather.is_none());
    }

    #[tokio::test]
    async fn test_list_is_insertion_ordered() {
        let pool = test_pool().await;
        let repo = TrackedCityRepository::new(&pool);

        repo.create(&city("Oslo", 59.91, 10.75)).await.unwrap();
        repo.create(&city("Bergen", 60.39, 5.32)).await.unwrap();
        repo.create(&city("Aarhus", 56.16, 10.2)).await.unwrap();

        let cities = repo.list().await.unwrap();
        assert_eq!(names(&cities), vec!["Oslo", "Bergen", "Aarhus"]);
    }

    #[tokio::test]
    async fn test_delete_existing_and_missing() {
        let pool = test_pool().await;
        let repo = TrackedCityRepository::new(&pool);

        let lyon = repo.create(&city("Lyon", 45.76, 4.84)).await.unwrap();
        let before = repo.list().await.unwrap();

        assert!(!repo.delete(TrackedCityId::new(9999)).await.unwrap());
        assert_eq!(repo.list().await.unwrap(), before);

        assert!(repo.delete(lyon.id).await.unwrap());
        assert!(repo.list().await.unwrap().is_empty());
        assert!(repo.get(lyon.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_ids_are_not_reused() {
        let pool = test_pool().await;
        let repo = TrackedCityRepository::new(&pool);

        let first = repo.create(&city("Lyon", 45.76, 4.84)).await.unwrap();
        repo.delete(first.id).await.unwrap();
        let second = repo.create(&city("Lyon", 45.76, 4.84)).await.unwrap();

        assert!(second.id > first.id);
    }

    #[tokio::test]
    async fn test_reset_to_defaults_is_idempotent() {
        let pool = test_pool().await;
        let defaults = DefaultCityRepository::new(&pool);
        let repo = TrackedCityRepository::new(&pool);

        defaults
            .bulk_insert(&[city("London", 51.5, -0.13), city("Paris", 48.86, 2.35)])
            .await
            .unwrap();
        repo.create(&city("Lyon", 45.76, 4.84)).await.unwrap();

        assert_eq!(repo.reset_to_defaults().await.unwrap(), 2);
        let first: Vec<_> = repo
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|c| (c.name, c.coordinates, c.weather))
            .collect();

        assert_eq!(repo.reset_to_defaults().await.unwrap(), 2);
        let second: Vec<_> = repo
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|c| (c.name, c.coordinates, c.weather))
            .collect();

        assert_eq!(first, second);
        assert_eq!(first[0].0.as_str(), "London");
        assert_eq!(first[1].0.as_str(), "Paris");
        assert!(first.iter().all(|(_, _, weather)| weather.is_none()));
    }

    #[tokio::test]
    async fn test_reset_with_no_defaults_empties_list() {
        let pool = test_pool().await;
        let repo = TrackedCityRepository::new(&pool);

        repo.create(&city("Lyon", 45.76, 4.84)).await.unwrap();
        assert_eq!(repo.reset_to_defaults().await.unwrap(), 0);
        assert!(repo.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_apply_readings_updates_only_listed_rows() {
        let pool = test_pool().await;
        let repo = TrackedCityRepository::new(&pool);

        let lyon = repo.create(&city("Lyon", 45.76, 4.84)).await.unwrap();
        let nice = repo.create(&city("Nice", 43.7, 7.27)).await.unwrap();

        let at = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let reading = WeatherReading {
            temperature: 18.5,
            updated_at: at,
        };

        let updated = repo
            .apply_readings(&[(lyon.id, reading), (TrackedCityId::new(9999), reading)])
            .await
            .unwrap();
        assert_eq!(updated, 1);

        assert_eq!(repo.get(lyon.id).await.unwrap().unwrap().weather, Some(reading));
        assert_eq!(repo.get(nice.id).await.unwrap().unwrap().weather, None);
    }

    #[tokio::test]
    async fn test_apply_readings_empty_is_noop() {
        let pool = test_pool().await;
        let repo = TrackedCityRepository::new(&pool);
        assert_eq!(repo.apply_readings(&[]).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_half_written_reading_is_reported_as_corruption() {
        let pool = test_pool().await;
        let repo = TrackedCityRepository::new(&pool);
        repo.create(&city("Lyon", 45.76, 4.84)).await.unwrap();

        // The CHECK constraint refuses a lone temperature
        let result = sqlx::query("UPDATE tracked_city SET temperature = 1.0")
            .execute(&pool)
            .await;
        assert!(result.is_err());

        let row = TrackedCityRow {
            id: TrackedCityId::new(1),
            name: "Lyon".to_string(),
            latitude: 45.76,
            longitude: 4.84,
            temperature: Some(1.0),
            updated_at: None,
        };
        assert!(matches!(
            TrackedCity::try_from(row),
            Err(RepositoryError::DataCorruption(_))
        ));
    }

    async fn abort_when(pool: &SqlitePool, event: &str, name: &str) {
        sqlx::query(&format!(
            "CREATE TRIGGER fail_{event} BEFORE {event} ON tracked_city \
             WHEN NEW.name = '{name}' BEGIN SELECT RAISE(ABORT, 'rejected'); END"
        ))
        .execute(pool)
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_apply_readings_failure_keeps_every_reading_out() {
        let pool = test_pool().await;
        let repo = TrackedCityRepository::new(&pool);

        let lyon = repo.create(&city("Lyon", 45.76, 4.84)).await.unwrap();
        let nice = repo.create(&city("Nice", 43.7, 7.27)).await.unwrap();
        abort_when(&pool, "UPDATE", "Nice").await;

        let reading = WeatherReading {
            temperature: 18.5,
            updated_at: Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap(),
        };
        let result = repo
            .apply_readings(&[(lyon.id, reading), (nice.id, reading)])
            .await;

        assert!(matches!(result, Err(RepositoryError::Database(_))));
        assert!(repo.list().await.unwrap().iter().all(|c| c.weather.is_none()));
    }

    #[tokio::test]
    async fn test_reset_failure_leaves_previous_list() {
        let pool = test_pool().await;
        let repo = TrackedCityRepository::new(&pool);

        DefaultCityRepository::new(&pool)
            .bulk_insert(&[city("London", 51.5, -0.13), city("Rome", 41.9, 12.5)])
            .await
            .unwrap();
        repo.create(&city("Lyon", 45.76, 4.84)).await.unwrap();
        let before = repo.list().await.unwrap();
        abort_when(&pool, "INSERT", "Rome").await;

        let result = repo.reset_to_defaults().await;

        assert!(matches!(result, Err(RepositoryError::Database(_))));
        assert_eq!(repo.list().await.unwrap(), before);
    }
}
