//! Application services built on the store and the weather client.

pub mod refresh;
pub mod seed;

pub use refresh::{RefreshService, RefreshSummary};
pub use seed::{SeedOutcome, ensure_defaults_seeded, parse_dataset};
