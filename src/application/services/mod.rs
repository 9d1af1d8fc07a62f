//! Business logic services for the application layer.

pub mod link_service;
pub mod link_store;

pub use link_service::{LinkService, ShortLink};
pub use link_store::{LinkStore, MAX_CREATE_ATTEMPTS};
