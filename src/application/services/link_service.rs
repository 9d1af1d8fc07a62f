//! Link creation and resolution service.

use std::sync::Arc;

use serde_json::json;

use crate::application::services::LinkStore;
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::url_canonicalizer::Canonicalizer;

/// Result of a successful shortening request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortLink {
    pub code: String,
    pub canonical_url: String,
    pub short_url: String,
}

/// Service behind the create-link and resolve-link operations.
///
/// Canonicalizes raw input, hands the canonical URL to the [`LinkStore`], and
/// formats short URLs with the configured display domain.
pub struct LinkService<R: LinkRepository> {
    store: Arc<LinkStore<R>>,
    canonicalizer: Canonicalizer,
    short_domain: String,
}

impl<R: LinkRepository> LinkService<R> {
    /// Creates a new link service with the default redirect rules.
    pub fn new(store: Arc<LinkStore<R>>, short_domain: impl Into<String>) -> Self {
        Self {
            store,
            canonicalizer: Canonicalizer::default(),
            short_domain: short_domain.into(),
        }
    }

    /// Replaces the canonicalizer, e.g. to add redirect rules.
    pub fn with_canonicalizer(mut self, canonicalizer: Canonicalizer) -> Self {
        self.canonicalizer = canonicalizer;
        self
    }

    pub fn store(&self) -> &Arc<LinkStore<R>> {
        &self.store
    }

    /// Canonicalizes `raw_url` and stores it under a new short code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidUrl`] if the input cannot be canonicalized.
    /// Returns [`AppError::Storage`] if the link cannot be persisted.
    pub async fn shorten(&self, raw_url: &str) -> Result<ShortLink, AppError> {
        let canonical_url = self.canonicalizer.canonicalize(raw_url).map_err(|e| {
            AppError::invalid_url("Invalid URL", json!({ "reason": e.to_string() }))
        })?;

        let code = self.store.create(&canonical_url).await?;
        let short_url = self.short_url(&code);

        Ok(ShortLink {
            code,
            canonical_url,
            short_url,
        })
    }

    /// Returns the URL stored under `code`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link matches the code.
    /// Returns [`AppError::Storage`] on database errors.
    pub async fn resolve(&self, code: &str) -> Result<String, AppError> {
        self.store
            .resolve(code)
            .await?
            .ok_or_else(|| AppError::not_found("Short link not found", json!({ "code": code })))
    }

    /// Builds the public short URL for a code.
    pub fn short_url(&self, code: &str) -> String {
        format!("{}/{}", self.short_domain.trim_end_matches('/'), code)
    }
}
