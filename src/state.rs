//! Shared request context.

use std::sync::Arc;

use crate::application::services::LinkService;
use crate::infrastructure::persistence::SqliteLinkRepository;

/// Context handed to every request handler.
///
/// Built once at startup and cloned per request; there are no global handles.
#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService<SqliteLinkRepository>>,
}

impl AppState {
    pub fn new(link_service: Arc<LinkService<SqliteLinkRepository>>) -> Self {
        Self { link_service }
    }
}
