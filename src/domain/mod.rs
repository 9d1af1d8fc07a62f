//! Domain layer containing business entities and repository contracts.
//!
//! - [`entities`] - Core data structures
//! - [`repositories`] - Data access trait definitions
//!
//! The domain layer has no dependency on the HTTP layer; the persistence
//! implementations in [`crate::infrastructure`] depend on it, not the other way round.

pub mod entities;
pub mod repositories;
