//! Infrastructure layer for external integrations.
//!
//! Implements the interfaces defined by the domain layer.
//!
//! - [`persistence`] - SQLite repository implementation and pool setup

pub mod persistence;
