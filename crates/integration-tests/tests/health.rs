//! Integration tests for the health endpoints.

use axum::http::StatusCode;

use skycast_integration_tests::TestContext;

#[tokio::test]
async fn test_health() {
    let ctx = TestContext::new().await;

    let response = ctx.get("/health").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, "ok");
}

#[tokio::test]
async fn test_readiness_with_open_pool() {
    let ctx = TestContext::new().await;
    assert_eq!(ctx.get("/health/ready").await.status, StatusCode::OK);
}

#[tokio::test]
async fn test_readiness_after_pool_closed() {
    let ctx = TestContext::new().await;
    ctx.pool.close().await;

    assert_eq!(
        ctx.get("/health/ready").await.status,
        StatusCode::SERVICE_UNAVAILABLE
    );
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let ctx = TestContext::new().await;
    assert_eq!(ctx.get("/nope").await.status, StatusCode::NOT_FOUND);
}
