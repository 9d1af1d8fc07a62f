//! Router configuration.
//!
//! # Route Structure
//!
//! - `GET /shorten?url=` - Create a short link
//! - `GET /health`       - Health check
//! - `GET /{code}`       - Short link redirect

use crate::api::handlers::{health_handler, redirect_handler, shorten_handler};
use crate::api::middleware::tracing;
use crate::state::AppState;
use axum::Router;
use axum::routing::get;

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/shorten", get(shorten_handler))
        .route("/health", get(health_handler))
        .route("/{code}", get(redirect_handler))
        .with_state(state)
        .layer(tracing::layer())
}
