//! Link store: code issuance, lookup, and retention.

use std::sync::Arc;

use chrono::{TimeDelta, Utc};
use serde_json::json;
use tracing::{debug, warn};

use crate::domain::entities::NewLink;
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::code_generator::generate_code;

/// Number of fresh codes tried before `create` gives up on collisions.
pub const MAX_CREATE_ATTEMPTS: usize = 5;

/// Owns the link collection.
///
/// Nothing outside the store reads or writes link rows. Links are never
/// updated; they are created once and removed only by [`LinkStore::sweep_expired`].
pub struct LinkStore<R: LinkRepository> {
    repository: Arc<R>,
    code_length: usize,
}

impl<R: LinkRepository> LinkStore<R> {
    /// Creates a store issuing codes of `code_length` characters.
    pub fn new(repository: Arc<R>, code_length: usize) -> Self {
        Self {
            repository,
            code_length,
        }
    }

    pub fn code_length(&self) -> usize {
        self.code_length
    }

    /// Stores `canonical_url` under a freshly generated code and returns the code.
    ///
    /// Repeated calls with the same URL issue distinct codes; there is no
    /// deduplication.
    ///
    /// # Code Generation
    ///
    /// A random code is inserted directly. On a unique-constraint violation a new
    /// code is drawn, up to [`MAX_CREATE_ATTEMPTS`] times.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] on database errors or when every attempt collided.
    pub async fn create(&self, canonical_url: &str) -> Result<String, AppError> {
        for attempt in 1..=MAX_CREATE_ATTEMPTS {
            let new_link = NewLink::new(generate_code(self.code_length), canonical_url);

            match self.repository.insert(new_link).await {
                Ok(link) => {
                    debug!(code = %link.code, attempt, "Link created");
                    return Ok(link.code);
                }
                Err(AppError::Conflict { .. }) => {
                    warn!(attempt, "Short code collision, regenerating");
                }
                Err(e) => return Err(e),
            }
        }

        Err(AppError::storage(
            "Failed to generate unique code",
            json!({ "reason": "Too many collisions", "attempts": MAX_CREATE_ATTEMPTS }),
        ))
    }

    /// Looks up the URL stored under `code`.
    ///
    /// Returns `Ok(None)` both for codes that never existed and for swept ones.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] on database errors.
    pub async fn resolve(&self, code: &str) -> Result<Option<String>, AppError> {
        Ok(self
            .repository
            .find_by_code(code)
            .await?
            .map(|link| link.url))
    }

    /// Deletes links created more than `retention_days` days ago.
    ///
    /// Returns the number of deleted links. A window reaching past the earliest
    /// representable time deletes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] on database errors. The caller decides
    /// whether to log or retry.
    pub async fn sweep_expired(&self, retention_days: u32) -> Result<u64, AppError> {
        let cutoff = TimeDelta::try_days(i64::from(retention_days))
            .and_then(|window| Utc::now().checked_sub_signed(window));

        match cutoff {
            Some(cutoff) => self.repository.delete_created_before(cutoff).await,
            None => {
                debug!(retention_days, "Retention window exceeds time range, nothing to sweep");
                Ok(0)
            }
        }
    }

    /// Counts stored links.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] on database errors.
    pub async fn count(&self) -> Result<i64, AppError> {
        self.repository.count().await
    }
}
