//! Short code generation.
//!
//! Codes are drawn uniformly from a 62-character alphanumeric alphabet.

use rand::Rng;

/// Characters a short code may contain.
pub const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Code length used when none is configured.
pub const DEFAULT_CODE_LENGTH: usize = 6;

/// Generates a random short code of `length` characters.
///
/// Uniqueness is not checked here; the store retries on collision.
///
/// # Examples
///
/// ```ignore
/// let code = generate_code(6);
/// assert_eq!(code.len(), 6);
/// assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
/// ```
pub fn generate_code(length: usize) -> String {
    let mut rng = rand::rng();

    (0..length)
        .map(|_| {
            let idx = rng.random_range(0..ALPHABET.len());
            ALPHABET[idx] as char
        })
        .collect()
}

/// Returns true if `code` could have been produced by [`generate_code`].
pub fn is_well_formed(code: &str) -> bool {
    !code.is_empty() && code.bytes().all(|b| ALPHABET.contains(&b))
}
