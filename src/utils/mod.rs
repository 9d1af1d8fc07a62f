//! Utility functions for URL processing and code generation.
//!
//! - [`url_canonicalizer`] - URL cleanup, tracking-parameter removal, redirect unwrapping
//! - [`code_generator`] - Random short code generation

pub mod code_generator;
pub mod url_canonicalizer;
