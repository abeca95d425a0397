//! Tracked city commands.

use skycast_web::db::TrackedCityRepository;

use super::{CommandError, connect};

/// Log every tracked city with its last reading.
pub async fn list() -> Result<(), CommandError> {
    let (_, pool) = connect().await?;

    let cities = TrackedCityRepository::new(&pool).list().await?;
    if cities.is_empty() {
        tracing::info!("No tracked cities");
    }
    for city in &cities {
        match city.weather {
            Some(reading) => tracing::info!(
                id = %city.id,
                name = %city.name,
                coordinates = %city.coordinates,
                temperature = reading.temperature,
                updated_at = %reading.updated_at,
                "tracked city"
            ),
            None => tracing::info!(
                id = %city.id,
                name = %city.name,
                coordinates = %city.coordinates,
                "no reading yet"
            ),
        }
    }

    pool.close().await;
    Ok(())
}

/// Replace the tracked list with the default cities.
pub async fn reset() -> Result<(), CommandError> {
    let (_, pool) = connect().await?;

    let created = TrackedCityRepository::new(&pool).reset_to_defaults().await?;
    tracing::info!(created, "Tracked cities reset to defaults");

    pool.close().await;
    Ok(())
}
