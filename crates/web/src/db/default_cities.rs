//! Default city repository.
//!
//! Read-only reference data after seeding. The only write is
//! [`DefaultCityRepository::bulk_insert`], which refuses to touch a table
//! that already has rows.

use sqlx::SqlitePool;
use tracing::{info, instrument};

use skycast_core::{CityName, Coordinates, DefaultCityId};

use super::RepositoryError;
use crate::models::{DefaultCity, NewCity};

#[derive(Debug, sqlx::FromRow)]
struct DefaultCityRow {
    id: DefaultCityId,
    name: String,
    latitude: f64,
    longitude: f64,
}

impl TryFrom<DefaultCityRow> for DefaultCity {
    type Error = RepositoryError;

    fn try_from(row: DefaultCityRow) -> Result<Self, Self::Error> {
        let name = CityName::parse(&row.name).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid name for default city {}: {e}", row.id))
        })?;
        let coordinates = Coordinates::new(row.latitude, row.longitude).map_err(|e| {
            RepositoryError::DataCorruption(format!(
                "invalid coordinates for default city {}: {e}",
                row.id
            ))
        })?;

        Ok(Self {
            id: row.id,
            name,
            coordinates,
        })
    }
}

/// Repository for default city database operations.
pub struct DefaultCityRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> DefaultCityRepository<'a> {
    /// Create a new default city repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List all default cities in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored row is invalid.
    pub async fn list(&self) -> Result<Vec<DefaultCity>, RepositoryError> {
        let rows = sqlx::query_as::<_, DefaultCityRow>(
            "SELECT id, name, latitude, longitude FROM default_city ORDER BY id",
        )
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(DefaultCity::try_from).collect()
    }

    /// Count default cities.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM default_city")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }

    /// Insert seed rows, but only into an empty table.
    ///
    /// The emptiness check and the inserts share one transaction. Returns the
    /// number of rows inserted, which is 0 when the table was already seeded.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a statement or the commit fails;
    /// nothing is inserted in that case.
    #[instrument(skip(self, cities), fields(count = cities.len()))]
    pub async fn bulk_insert(&self, cities: &[NewCity]) -> Result<u64, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM default_city")
            .fetch_one(&mut *tx)
            .await?;
        if existing > 0 {
            info!(existing, "Default cities already present, skipping insert");
            return Ok(0);
        }

        let mut inserted = 0;
        for city in cities {
            inserted += sqlx::query(
                "INSERT INTO default_city (name, latitude, longitude) VALUES (?, ?, ?)",
            )
            .bind(city.name.as_str())
            .bind(city.coordinates.latitude())
            .bind(city.coordinates.longitude())
            .execute(&mut *tx)
            .await?
            .rows_affected();
        }

        tx.commit().await?;
        Ok(inserted)
    }
}
