//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                    - Tracked city list
//! GET  /health              - Liveness check
//! GET  /health/ready        - Readiness check (database)
//!
//! # Cities (form posts, all answer 303 -> /)
//! POST /cities/add          - Track a new city
//! POST /cities/remove/{id}  - Stop tracking a city
//! POST /cities/reset        - Replace the list with the defaults
//! POST /cities/update       - Refresh weather for every city
//! ```

pub mod cities;
pub mod health;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the city routes router.
pub fn city_routes() -> Router<AppState> {
    Router::new()
        .route("/add", post(cities::add))
        .route("/remove/{id}", post(cities::remove))
        .route("/reset", post(cities::reset))
        .route("/update", post(cities::update))
}

/// Build the complete application router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cities::index))
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest("/cities", city_routes())
}
