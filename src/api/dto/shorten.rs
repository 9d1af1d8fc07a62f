//! DTOs for link shortening endpoint.

use serde::Deserialize;

/// Query string of `GET /shorten`.
#[derive(Debug, Deserialize)]
pub struct ShortenQuery {
    /// The raw URL to shorten, in any of the shapes the canonicalizer accepts.
    pub url: Option<String>,
}
