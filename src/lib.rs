//! # cleanlink
//!
//! A small URL shortener that canonicalizes links before storing them.
//!
//! ## Architecture
//!
//! - **Utilities** ([`utils`]) - URL canonicalization and short code generation
//! - **Domain Layer** ([`domain`]) - The `Link` entity and repository trait
//! - **Application Layer** ([`application`]) - Link store, link service, retention sweeper
//! - **Infrastructure Layer** ([`infrastructure`]) - SQLite persistence
//! - **API Layer** ([`api`]) - Axum handlers for shorten, redirect, and health
//!
//! ## Canonicalization
//!
//! Submitted URLs are trimmed, unwrapped from `<...>`, percent-decoded until
//! stable, stripped of tracking parameters such as `utm_source` and `fbclid`,
//! and unwrapped from Google outbound redirect links. See
//! [`utils::url_canonicalizer`].
//!
//! ## Quick Start
//!
//! ```bash
//! export SHORT_DOMAIN="https://s.example.com"
//! cargo run
//!
//! curl 'http://localhost:8889/shorten?url=https://example.com/?utm_source=mail'
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;
pub mod telemetry;
pub mod utils;

pub mod config;
pub mod server;

pub mod routes;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{LinkService, LinkStore, ShortLink};
    pub use crate::domain::entities::{Link, NewLink};
    pub use crate::domain::repositories::LinkRepository;
    pub use crate::error::AppError;
    pub use crate::infrastructure::persistence::SqliteLinkRepository;
    pub use crate::state::AppState;
    pub use crate::utils::url_canonicalizer::{Canonicalizer, RedirectRule, canonicalize};
}
