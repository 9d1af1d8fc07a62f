//! Handler for link shortening endpoint.

use axum::extract::{Query, State};
use serde_json::json;
use tracing::info;

use crate::api::dto::shorten::ShortenQuery;
use crate::error::AppError;
use crate::state::AppState;

/// Shortens the URL given in the `url` query parameter.
///
/// # Endpoint
///
/// `GET /shorten?url=<raw url>`
///
/// # Response
///
/// `200 OK` with the short URL as plain text, e.g. `http://localhost/aB3xYz`.
///
/// # Errors
///
/// Returns 400 Bad Request if `url` is missing, empty, or not a URL.
/// Returns 500 Internal Server Error if the link cannot be stored.
pub async fn shorten_handler(
    State(state): State<AppState>,
    Query(query): Query<ShortenQuery>,
) -> Result<String, AppError> {
    let raw_url = query
        .url
        .filter(|url| !url.trim().is_empty())
        .ok_or_else(|| AppError::invalid_url("Missing 'url' parameter", json!({})))?;

    let link = state.link_service.shorten(&raw_url).await?;

    info!(code = %link.code, url = %link.canonical_url, "Short link created");

    Ok(link.short_url)
}
