//! Skycast CLI - Database and maintenance tools.
//!
//! # Usage
//!
//! ```bash
//! # Apply database migrations
//! skycast migrate
//!
//! # Seed default cities (no-op once seeded)
//! skycast seed --file crates/web/data/europe.csv
//!
//! # Refresh weather for every tracked city (cron friendly)
//! skycast refresh
//!
//! # Show or reset the tracked list
//! skycast cities list
//! skycast cities reset
//! ```
//!
//! All commands read the same environment as the server (`DATABASE_URL`,
//! `WEATHER_API_URL`, ...), with `.env` honored.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "skycast")]
#[command(author, version, about = "Skycast CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed the default city table if it is empty
    Seed {
        /// Dataset path (defaults to `DEFAULT_CITIES_PATH`)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Refresh weather for every tracked city
    Refresh,
    /// Manage tracked cities
    Cities {
        #[command(subcommand)]
        action: CitiesAction,
    },
}

#[derive(Subcommand)]
enum CitiesAction {
    /// List tracked cities with their last reading
    List,
    /// Replace the tracked list with the default cities
    Reset,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed { file } => commands::seed::run(file).await?,
        Commands::Refresh => commands::refresh::run().await?,
        Commands::Cities { action } => match action {
            CitiesAction::List => commands::cities::list().await?,
            CitiesAction::Reset => commands::cities::reset().await?,
        },
    }
    Ok(())
}
