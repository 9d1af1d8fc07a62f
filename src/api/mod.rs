//! HTTP layer over [`crate::application::services::LinkService`].
//!
//! Translates requests into service calls and maps [`crate::error::AppError`]
//! onto status codes.
//!
//! # Modules
//!
//! - [`dto`] - Request/response types
//! - [`handlers`] - HTTP request handlers
//! - [`middleware`] - Request tracing

pub mod dto;
pub mod handlers;
pub mod middleware;
