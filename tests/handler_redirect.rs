mod common;

use axum::{Router, http::StatusCode, routing::get};
use axum_test::TestServer;
use cleanlink::api::handlers::redirect_handler;

#[tokio::test]
async fn test_redirect_success() {
    let pool = common::memory_pool().await;
    common::create_test_link(&pool, "abc123", "https://example.com/landing").await;

    let state = common::create_test_state(pool);
    let app = Router::new()
        .route("/{code}", get(redirect_handler))
        .with_state(state);

    let server = TestServer::new(app).unwrap();

    let response = server.get("/abc123").await;

    response.assert_status(StatusCode::FOUND);
    assert_eq!(response.header("location"), "https://example.com/landing");
}

#[tokio::test]
async fn test_redirect_not_found() {
    let pool = common::memory_pool().await;
    let state = common::create_test_state(pool);
    let app = Router::new()
        .route("/{code}", get(redirect_handler))
        .with_state(state);

    let server = TestServer::new(app).unwrap();

    let response = server.get("/nonexistent").await;

    response.assert_status_not_found();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "not_found");
    assert_eq!(json["error"]["details"]["code"], "nonexistent");
}

#[tokio::test]
async fn test_redirect_after_sweep() {
    let pool = common::memory_pool().await;
    common::create_aged_link(&pool, "gone01", "https://example.com/old", 45).await;

    let state = common::create_test_state(pool);
    state
        .link_service
        .store()
        .sweep_expired(30)
        .await
        .unwrap();

    let app = Router::new()
        .route("/{code}", get(redirect_handler))
        .with_state(state);

    let server = TestServer::new(app).unwrap();

    let response = server.get("/gone01").await;

    response.assert_status_not_found();
}

#[tokio::test]
async fn test_redirect_encodes_decoded_target() {
    let pool = common::memory_pool().await;
    common::create_test_link(&pool, "space1", "https://example.com/a b").await;

    let state = common::create_test_state(pool);
    let app = Router::new()
        .route("/{code}", get(redirect_handler))
        .with_state(state);

    let server = TestServer::new(app).unwrap();

    let response = server.get("/space1").await;

    response.assert_status(StatusCode::FOUND);
    assert_eq!(response.header("location"), "https://example.com/a%20b");
}
