//! One-shot weather refresh, suitable for cron.

use skycast_web::services::RefreshService;
use skycast_web::weather::WeatherClient;

use super::{CommandError, connect};

/// Refresh every tracked city once.
pub async fn run() -> Result<(), CommandError> {
    let (config, pool) = connect().await?;

    let client =
        WeatherClient::new(&config.weather).map_err(|e| CommandError::WeatherClient(e.to_string()))?;
    let service = RefreshService::new(client, config.weather.refresh_concurrency);

    let summary = service.refresh_all(&pool).await?;
    tracing::info!(
        attempted = summary.attempted,
        updated = summary.updated,
        unavailable = summary.unavailable,
        "Refresh finished"
    );

    pool.close().await;
    Ok(())
}
