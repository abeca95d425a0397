//! Integration test support for Skycast.
//!
//! Tests drive the full router in-process with `tower::ServiceExt::oneshot`
//! against an in-memory `SQLite` store and a `wiremock` forecast endpoint.
//!
//! ```bash
//! cargo test -p skycast-integration-tests
//! ```

#![allow(clippy::missing_panics_doc, clippy::expect_used)]

use std::collections::HashMap;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, Response, StatusCode, header};
use sqlx::SqlitePool;
use tower::ServiceExt;
use wiremock::MockServer;

use skycast_web::config::AppConfig;
use skycast_web::db::{self, DefaultCityRepository, TrackedCityRepository};
use skycast_web::models::{NewCity, TrackedCity};
use skycast_web::state::AppState;

/// Forecast path served by the mock upstream.
pub const FORECAST_PATH: &str = "/v1/forecast";

/// A running application wired to a fresh store and a mock upstream.
pub struct TestContext {
    pub app: Router,
    pub pool: SqlitePool,
    pub upstream: MockServer,
}

/// Response status, `Location` header and body text.
pub struct TestResponse {
    pub status: StatusCode,
    pub location: Option<String>,
    pub body: String,
}

impl TestContext {
    /// Build a context whose default-city table holds `defaults`.
    pub async fn with_defaults(defaults: &[(&str, f64, f64)]) -> Self {
        let upstream = MockServer::start().await;

        let vars = HashMap::from([
            ("DATABASE_URL", "sqlite::memory:".to_string()),
            ("WEATHER_API_URL", format!("{}{FORECAST_PATH}", upstream.uri())),
            ("WEATHER_TIMEOUT_SECS", "2".to_string()),
        ]);
        let config = AppConfig::from_lookup(|key| vars.get(key).cloned())
            .expect("test configuration is valid");

        let pool = db::create_pool(&config.database_url)
            .await
            .expect("in-memory pool");
        db::run_migrations(&pool).await.expect("migrations apply");

        let defaults: Vec<NewCity> = defaults
            .iter()
            .map(|(name, lat, lon)| NewCity::parse(name, *lat, *lon).expect("valid default"))
            .collect();
        DefaultCityRepository::new(&pool)
            .bulk_insert(&defaults)
            .await
            .expect("defaults inserted");

        let state = AppState::new(&config, pool.clone()).expect("state builds");

        Self {
            app: skycast_web::app(state),
            pool,
            upstream,
        }
    }

    /// Build a context with no default cities.
    pub async fn new() -> Self {
        Self::with_defaults(&[]).await
    }

    /// Issue a GET request.
    pub async fn get(&self, uri: &str) -> TestResponse {
        let request = Request::get(uri).body(Body::empty()).expect("request");
        self.send(request).await
    }

    /// Issue a form-encoded POST request.
    pub async fn post_form(&self, uri: &str, form: &str) -> TestResponse {
        let request = Request::post(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form.to_string()))
            .expect("request");
        self.send(request).await
    }

    /// Issue a POST request with an empty body.
    pub async fn post(&self, uri: &str) -> TestResponse {
        let request = Request::post(uri).body(Body::empty()).expect("request");
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        TestResponse::read(response).await
    }

    /// Current tracked list straight from the store.
    pub async fn tracked(&self) -> Vec<TrackedCity> {
        TrackedCityRepository::new(&self.pool)
            .list()
            .await
            .expect("list tracked cities")
    }
}

impl TestResponse {
    async fn read(response: Response<Body>) -> Self {
        let status = response.status();
        let location = response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");

        Self {
            status,
            location,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }

    /// Assert the response is the post-action redirect to the list.
    pub fn assert_redirect_home(&self) {
        assert_eq!(self.status, StatusCode::SEE_OTHER, "body: {}", self.body);
        assert_eq!(self.location.as_deref(), Some("/"));
    }
}
