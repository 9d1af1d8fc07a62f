//! Application layer: services and background tasks.
//!
//! - [`services::link_store::LinkStore`] - Code issuance, lookup, and retention
//! - [`services::link_service::LinkService`] - Canonicalize-then-store orchestration
//! - [`expiry_sweeper`] - Periodic retention sweep

pub mod expiry_sweeper;
pub mod services;
