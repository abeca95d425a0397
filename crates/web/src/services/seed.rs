//! Default city seeding from a bundled dataset.
//!
//! The dataset is a comma-delimited text file with a header row naming the
//! `name`, `latitude` and `longitude` columns (any order, extra columns
//! ignored):
//!
//! ```text
//! name,latitude,longitude
//! London,51.5074,-0.1278
//! Paris,48.8566,2.3522
//! ```
//!
//! Parsing follows the usual CSV rules: fields may be quoted, quoted fields
//! may contain commas, and `""` inside quotes stands for one quote. Header
//! names are matched case-insensitively. Blank lines and lines starting with
//! `#` are ignored.
//!
//! Seeding only happens while the `default_city` table is empty. A missing
//! or unusable dataset is logged and skipped so that startup can continue.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord, Trim};
use serde::Deserialize;
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::db::{DefaultCityRepository, RepositoryError};
use crate::models::NewCity;

/// What [`ensure_defaults_seeded`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedOutcome {
    /// The table already had rows; the dataset was not read.
    AlreadySeeded { existing: i64 },
    /// The dataset could not be read.
    SourceMissing { path: PathBuf, reason: String },
    /// The dataset was read but its header is unusable.
    SourceInvalid { path: PathBuf, reason: String },
    /// Rows were inserted. `skipped` counts lines that failed to parse.
    Seeded { inserted: u64, skipped: usize },
}

/// Dataset-level parse failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DatasetError {
    #[error("dataset has no header row")]
    MissingHeader,
    #[error("dataset header has no '{0}' column")]
    MissingColumn(&'static str),
    #[error("dataset header could not be read: {0}")]
    Malformed(String),
}

/// A data line that was not turned into a city.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedLine {
    /// 1-based line number in the source text.
    pub line: u64,
    pub reason: String,
}

/// Result of parsing a dataset.
#[derive(Debug, Default)]
pub struct ParsedDataset {
    pub cities: Vec<NewCity>,
    pub rejected: Vec<RejectedLine>,
}

const REQUIRED_COLUMNS: [&str; 3] = ["name", "latitude", "longitude"];

#[derive(Debug, Deserialize)]
struct DatasetRow {
    name: String,
    latitude: f64,
    longitude: f64,
}

fn describe(err: &csv::Error, headers: &StringRecord) -> String {
    match err.kind() {
        csv::ErrorKind::Deserialize { err: de, .. } => match de.field() {
            Some(index) => format!(
                "invalid {}: {}",
                usize::try_from(index)
                    .ok()
                    .and_then(|i| headers.get(i))
                    .unwrap_or("field"),
                de.kind()
            ),
            None => de.kind().to_string(),
        },
        _ => err.to_string(),
    }
}

fn parse_row(record: &StringRecord, headers: &StringRecord) -> Result<NewCity, String> {
    let row: DatasetRow = record
        .deserialize(Some(headers))
        .map_err(|e| describe(&e, headers))?;
    NewCity::parse(&row.name, row.latitude, row.longitude).map_err(|e| e.to_string())
}

/// Parse dataset text into validated cities.
///
/// Bad data lines are collected in [`ParsedDataset::rejected`] rather than
/// failing the whole dataset.
///
/// # Errors
///
/// Returns `DatasetError` if the header row is missing or lacks a required
/// column.
pub fn parse_dataset(content: &str) -> Result<ParsedDataset, DatasetError> {
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .comment(Some(b'#'))
        .flexible(true)
        .from_reader(content.trim_start_matches('\u{feff}').as_bytes());

    let headers: StringRecord = reader
        .headers()
        .map_err(|e| DatasetError::Malformed(e.to_string()))?
        .iter()
        .map(str::to_ascii_lowercase)
        .collect();
    if headers.iter().all(str::is_empty) {
        return Err(DatasetError::MissingHeader);
    }
    if let Some(column) = REQUIRED_COLUMNS
        .into_iter()
        .find(|column| !headers.iter().any(|h| h == *column))
    {
        return Err(DatasetError::MissingColumn(column));
    }

    let mut parsed = ParsedDataset::default();
    for result in reader.records() {
        let outcome = result
            .map_err(|e| (e.position().map(csv::Position::line), e.to_string()))
            .and_then(|record| {
                let line = record.position().map(csv::Position::line);
                if record.iter().all(str::is_empty) {
                    return Ok(None);
                }
                parse_row(&record, &headers)
                    .map(Some)
                    .map_err(|reason| (line, reason))
            });

        match outcome {
            Ok(Some(city)) => parsed.cities.push(city),
            Ok(None) => {}
            Err((line, reason)) => parsed.rejected.push(RejectedLine {
                line: line.unwrap_or_default(),
                reason,
            }),
        }
    }

    Ok(parsed)
}

/// Populate the default-city table from `source` if it is empty.
///
/// Safe to call on every startup: once the table has rows this returns
/// [`SeedOutcome::AlreadySeeded`] without reading the file.
///
/// # Errors
///
/// Returns `RepositoryError` only for store failures. Dataset problems are
/// reported through the returned [`SeedOutcome`].
#[instrument(skip_all, fields(source = %source.display()))]
pub async fn ensure_defaults_seeded(
    pool: &SqlitePool,
    source: &Path,
) -> Result<SeedOutcome, RepositoryError> {
    let repo = DefaultCityRepository::new(pool);

    let existing = repo.count().await?;
    if existing > 0 {
        info!(existing, "Default cities already seeded");
        return Ok(SeedOutcome::AlreadySeeded { existing });
    }

    let content = match tokio::fs::read_to_string(source).await {
        Ok(content) => content,
        Err(e) => {
            let reason = if e.kind() == ErrorKind::NotFound {
                "file not found".to_string()
            } else {
                e.to_string()
            };
            warn!(reason = %reason, "Default city dataset unavailable, skipping seeding");
            return Ok(SeedOutcome::SourceMissing {
                path: source.to_path_buf(),
                reason,
            });
        }
    };

    let parsed = match parse_dataset(&content) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!(error = %e, "Default city dataset is invalid, skipping seeding");
            return Ok(SeedOutcome::SourceInvalid {
                path: source.to_path_buf(),
                reason: e.to_string(),
            });
        }
    };

    for rejected in &parsed.rejected {
        warn!(line = rejected.line, reason = %rejected.reason, "Skipping dataset line");
    }

    let inserted = repo.bulk_insert(&parsed.cities).await?;
    info!(
        inserted,
        skipped = parsed.rejected.len(),
        "Default cities seeded"
    );

    Ok(SeedOutcome::Seeded {
        inserted,
        skipped: parsed.rejected.len(),
    })
}
