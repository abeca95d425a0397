//! Skycast web library.
//!
//! Tracks a list of cities, refreshes their current temperature from the
//! Open-Meteo forecast API and serves the list over HTTP. Exposed as a
//! library so the CLI and the integration tests share the same code.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod bootstrap;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod weather;

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the application router with request tracing.
pub fn app(state: AppState) -> Router {
    routes::routes()
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
