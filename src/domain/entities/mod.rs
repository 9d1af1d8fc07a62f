//! Core domain entities.
//!
//! - [`Link`] - A stored short code to URL mapping
//! - [`NewLink`] - Insert payload for a link

pub mod link;

pub use link::{Link, NewLink};
