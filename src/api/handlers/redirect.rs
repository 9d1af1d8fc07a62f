//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use tracing::debug;
use url::Url;

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its stored URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// Responds with `302 Found`. Unwrapped redirect targets are stored decoded,
/// so the `Location` value is re-serialized through the URL parser to keep it
/// a valid header.
///
/// # Errors
///
/// Returns 404 Not Found if the code is unknown or has been swept.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let url = state.link_service.resolve(&code).await?;

    debug!(%code, %url, "Redirecting");

    Ok((StatusCode::FOUND, [(header::LOCATION, location_value(url))]))
}

fn location_value(url: String) -> String {
    Url::parse(&url).map(String::from).unwrap_or(url)
}
