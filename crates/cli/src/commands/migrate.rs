//! Database migration command.
//!
//! ```bash
//! skycast migrate
//! ```
//!
//! Migrations live in `crates/web/migrations/` and are embedded in the
//! binary. Every command applies them when it connects, and the server
//! applies them on startup.

use super::{CommandError, connect};

/// Apply pending migrations.
pub async fn run() -> Result<(), CommandError> {
    let (_, pool) = connect().await?;

    tracing::info!("Migrations complete!");
    pool.close().await;
    Ok(())
}
