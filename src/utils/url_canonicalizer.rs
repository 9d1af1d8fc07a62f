//! URL canonicalization for user-submitted links.
//!
//! Cleans up URLs pasted from mail clients and search result pages so that the
//! stored destination is the real target, without tracking noise or
//! redirect wrappers.

use percent_encoding::percent_decode_str;
use regex::Regex;
use std::sync::LazyLock;
use url::Url;

/// Query parameters dropped from every URL.
///
/// Matching is exact and case-sensitive.
pub const TRACKING_PARAMS: &[&str] = &[
    "utm_source",
    "utm_medium",
    "utm_campaign",
    "utm_term",
    "utm_content",
    "fbclid",
    "gclid",
    "mc_eid",
    "mc_cid",
    "trk",
    "msclkid",
    "dclid",
];

/// Maximum number of percent-decoding passes applied to raw input.
pub const MAX_DECODE_PASSES: usize = 8;

const GOOGLE_OUTBOUND_PATTERN: &str =
    r"https?://(www\.)?(l|out)\.google\.com/url\?.*?url=(?P<target>[^&]+)";

static DEFAULT_CANONICALIZER: LazyLock<Canonicalizer> = LazyLock::new(Canonicalizer::default);

/// Errors that can occur during URL canonicalization.
#[derive(Debug, thiserror::Error)]
pub enum CanonicalizeError {
    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("URL is still percent-encoded after {0} decoding passes")]
    DecodeLimitExceeded(usize),
}

/// Errors produced by [`query_unescape`].
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum UnescapeError {
    #[error("Invalid percent escape at byte {0}")]
    InvalidEscape(usize),

    #[error("Decoded bytes are not valid UTF-8")]
    InvalidUtf8,
}

/// A redirect-wrapper URL shape and the named capture holding the real destination.
///
/// The captured value is expected to be percent-encoded and is unescaped once
/// before being returned as the canonical URL.
#[derive(Debug, Clone)]
pub struct RedirectRule {
    pattern: Regex,
    field: String,
}

impl RedirectRule {
    /// Creates a rule from a regex and the name of the capture group to extract.
    ///
    /// # Errors
    ///
    /// Returns [`regex::Error`] if `pattern` is not a valid regular expression.
    pub fn new(pattern: &str, field: impl Into<String>) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
            field: field.into(),
        })
    }

    /// Google's `l.google.com` / `out.google.com` outbound link wrapper.
    pub fn google_outbound() -> Self {
        Self::new(GOOGLE_OUTBOUND_PATTERN, "target").expect("Invalid built-in redirect pattern")
    }

    /// Returns the still-encoded destination if `url` matches this rule.
    pub fn extract<'a>(&self, url: &'a str) -> Option<&'a str> {
        self.pattern
            .captures(url)?
            .name(&self.field)
            .map(|m| m.as_str())
    }
}

/// Turns raw user input into the canonical URL that gets stored.
///
/// # Canonicalization Steps
///
/// 1. **Delimiters**: Surrounding whitespace and one layer of `<`/`>` are removed
/// 2. **Decoding**: Percent-decoding is repeated until it stops changing the input
///    or hits an invalid escape, at most [`MAX_DECODE_PASSES`] times
/// 3. **Parsing**: The result must parse as an absolute URL
/// 4. **Tracking**: Parameters listed in [`TRACKING_PARAMS`] are removed; the rest
///    keep their order and values
/// 5. **Unwrapping**: If a [`RedirectRule`] matches, its decoded destination is
///    returned as-is
///
/// No network access is performed.
#[derive(Debug, Clone)]
pub struct Canonicalizer {
    rules: Vec<RedirectRule>,
}

impl Default for Canonicalizer {
    fn default() -> Self {
        Self::with_rules(vec![RedirectRule::google_outbound()])
    }
}

impl Canonicalizer {
    /// Creates a canonicalizer with a custom redirect rule set.
    ///
    /// Rules are tried in order; the first one whose destination decodes wins.
    pub fn with_rules(rules: Vec<RedirectRule>) -> Self {
        Self { rules }
    }

    /// Canonicalizes a raw URL string.
    ///
    /// # Errors
    ///
    /// Returns [`CanonicalizeError::InvalidFormat`] if the decoded input is not a URL.
    /// Returns [`CanonicalizeError::DecodeLimitExceeded`] if the input keeps
    /// decoding past [`MAX_DECODE_PASSES`].
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let canonicalizer = Canonicalizer::default();
    ///
    /// assert_eq!(
    ///     canonicalizer.canonicalize("  <http://example.com/a?utm_source=x&id=5>  ").unwrap(),
    ///     "http://example.com/a?id=5"
    /// );
    /// ```
    pub fn canonicalize(&self, raw: &str) -> Result<String, CanonicalizeError> {
        let decoded = decode_repeatedly(strip_delimiters(raw))?;

        let mut url =
            Url::parse(&decoded).map_err(|e| CanonicalizeError::InvalidFormat(e.to_string()))?;

        strip_tracking_params(&mut url);

        if let Some(target) = self.unwrap_redirect(url.as_str()) {
            return Ok(target);
        }

        Ok(url.into())
    }

    fn unwrap_redirect(&self, url: &str) -> Option<String> {
        self.rules
            .iter()
            .filter_map(|rule| rule.extract(url))
            .find_map(|encoded| query_unescape(encoded).ok())
    }
}

/// Canonicalizes `raw` with the default redirect rules.
///
/// See [`Canonicalizer::canonicalize`].
pub fn canonicalize(raw: &str) -> Result<String, CanonicalizeError> {
    DEFAULT_CANONICALIZER.canonicalize(raw)
}

/// Decodes a form-encoded string.
///
/// `+` becomes a space and every `%` must be followed by two hex digits.
///
/// # Errors
///
/// Returns [`UnescapeError::InvalidEscape`] for a malformed escape and
/// [`UnescapeError::InvalidUtf8`] if the decoded bytes are not UTF-8.
pub fn query_unescape(input: &str) -> Result<String, UnescapeError> {
    let bytes = input.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let well_formed = bytes
                .get(i + 1..i + 3)
                .is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit));
            if !well_formed {
                return Err(UnescapeError::InvalidEscape(i));
            }
            i += 3;
        } else {
            i += 1;
        }
    }

    let spaced = input.replace('+', " ");
    percent_decode_str(&spaced)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .map_err(|_| UnescapeError::InvalidUtf8)
}

fn strip_delimiters(raw: &str) -> &str {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_prefix('<').unwrap_or(trimmed);
    trimmed.strip_suffix('>').unwrap_or(trimmed)
}

/// Decodes until a pass makes no progress or fails.
fn decode_repeatedly(input: &str) -> Result<String, CanonicalizeError> {
    let mut current = input.to_owned();

    for _ in 0..MAX_DECODE_PASSES {
        match query_unescape(&current) {
            Ok(next) if next != current => current = next,
            _ => return Ok(current),
        }
    }

    match query_unescape(&current) {
        Ok(next) if next != current => Err(CanonicalizeError::DecodeLimitExceeded(
            MAX_DECODE_PASSES,
        )),
        _ => Ok(current),
    }
}

fn strip_tracking_params(url: &mut Url) {
    if url.query().is_none() {
        return;
    }

    let retained: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(name, _)| !TRACKING_PARAMS.contains(&name.as_ref()))
        .map(|(name, value)| (name.into_owned(), value.into_owned()))
        .collect();

    if retained.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut().clear().extend_pairs(&retained);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonicalize_strips_whitespace_and_brackets() {
        let result = canonicalize("  <http://example.com/a?utm_source=x&id=5>  ");
        assert!(result.is_ok());
        assert_eq!(result.unwrap(), "http://example.com/a?id=5");
    }

    #[test]
    fn test_canonicalize_unwraps_google_redirect() {
        let result =
            canonicalize("https://l.google.com/url?q=x&url=https%3A%2F%2Freal.example.com%2Fpage");
        assert!(result.is_ok());
        assert_eq!(result.unwrap(), "https://real.example.com/page");
    }

    #[test]
    fn test_canonicalize_unwraps_out_google_redirect() {
        let result = canonicalize("https://out.google.com/url?url=https%3A%2F%2Fexample.org%2F");
        assert_eq!(result.unwrap(), "https://example.org/");
    }

    #[test]
    fn test_canonicalize_unwrapped_target_keeps_tracking_params() {
        let result = canonicalize(
            "https://www.l.google.com/url?url=https%3A%2F%2Fexample.org%2F%3Futm_source%3Dnews",
        );
        assert_eq!(result.unwrap(), "https://example.org/?utm_source=news");
    }

    #[test]
    fn test_canonicalize_other_host_not_unwrapped() {
        let result = canonicalize("https://example.com/url?url=https%3A%2F%2Fother.com");
        assert_eq!(
            result.unwrap(),
            "https://example.com/url?url=https%3A%2F%2Fother.com"
        );
    }

    #[test]
    fn test_canonicalize_preserves_param_order() {
        let result =
            canonicalize("https://example.com/p?b=2&utm_medium=mail&a=1&fbclid=xyz&c=3");
        assert_eq!(result.unwrap(), "https://example.com/p?b=2&a=1&c=3");
    }

    #[test]
    fn test_canonicalize_removes_every_tracking_param() {
        let query = TRACKING_PARAMS
            .iter()
            .map(|name| format!("{name}=1"))
            .collect::<Vec<_>>()
            .join("&");
        let result = canonicalize(&format!("https://example.com/page?keep=yes&{query}"));
        assert_eq!(result.unwrap(), "https://example.com/page?keep=yes");
    }

    #[test]
    fn test_canonicalize_param_match_is_case_sensitive() {
        let result = canonicalize("https://example.com/?UTM_SOURCE=x&utm_source=y");
        assert_eq!(result.unwrap(), "https://example.com/?UTM_SOURCE=x");
    }

    #[test]
    fn test_canonicalize_drops_empty_query() {
        let result = canonicalize("https://example.com/page?utm_source=x&gclid=1");
        assert_eq!(result.unwrap(), "https://example.com/page");
    }

    #[test]
    fn test_canonicalize_keeps_fragment() {
        let result = canonicalize("https://example.com/page?trk=1#top");
        assert_eq!(result.unwrap(), "https://example.com/page#top");
    }

    #[test]
    fn test_canonicalize_double_encoded() {
        let result = canonicalize("http%253A%252F%252Fexample.com%252Fa%253Fid%253D5");
        assert_eq!(result.unwrap(), "http://example.com/a?id=5");
    }

    #[test]
    fn test_canonicalize_plus_decodes_to_space() {
        let result = canonicalize("http://example.com/search?q=a+b");
        assert_eq!(result.unwrap(), "http://example.com/search?q=a+b");
    }

    #[test]
    fn test_canonicalize_invalid_escape_stops_decoding() {
        let result = canonicalize("http://example.com/a?q=100%&id=5");
        assert!(result.is_ok());
        assert!(result.unwrap().contains("id=5"));
    }

    #[test]
    fn test_canonicalize_within_decode_limit() {
        let nested = format!("%{}41", "25".repeat(MAX_DECODE_PASSES - 1));
        let result = canonicalize(&format!("http://example.com/{nested}"));
        assert_eq!(result.unwrap(), "http://example.com/A");
    }

    #[test]
    fn test_canonicalize_decode_limit_exceeded() {
        let nested = format!("%{}41", "25".repeat(MAX_DECODE_PASSES + 1));
        let result = canonicalize(&format!("http://example.com/{nested}"));
        assert!(matches!(
            result.unwrap_err(),
            CanonicalizeError::DecodeLimitExceeded(MAX_DECODE_PASSES)
        ));
    }

    #[test]
    fn test_canonicalize_invalid_url() {
        let result = canonicalize("not a valid url");
        assert!(matches!(
            result.unwrap_err(),
            CanonicalizeError::InvalidFormat(_)
        ));
    }

    #[test]
    fn test_canonicalize_empty_string() {
        let result = canonicalize("   ");
        assert!(matches!(
            result.unwrap_err(),
            CanonicalizeError::InvalidFormat(_)
        ));
    }

    #[test]
    fn test_canonicalize_is_deterministic() {
        let input = "https://example.com/x?utm_campaign=spring&ref=home";
        assert_eq!(canonicalize(input).unwrap(), canonicalize(input).unwrap());
    }

    #[test]
    fn test_custom_redirect_rule() {
        let rule = RedirectRule::new(
            r"^https://safelinks\.example\.net/\?.*?target=(?P<dest>[^&]+)",
            "dest",
        )
        .unwrap();
        let canonicalizer = Canonicalizer::with_rules(vec![rule]);

        let result = canonicalizer.canonicalize(
            "https://safelinks.example.net/?target=https%3A%2F%2Fdest.example.com%2Fx&data=1",
        );
        assert_eq!(result.unwrap(), "https://dest.example.com/x");

        let google = canonicalizer
            .canonicalize("https://l.google.com/url?url=https%3A%2F%2Fexample.org%2F")
            .unwrap();
        assert!(google.starts_with("https://l.google.com/url"));
    }

    #[test]
    fn test_invalid_rule_pattern() {
        assert!(RedirectRule::new("(unclosed", "x").is_err());
    }

    #[test]
    fn test_unwrap_redirect_falls_through_on_bad_escape() {
        let canonicalizer = Canonicalizer::default();
        assert!(
            canonicalizer
                .unwrap_redirect("https://l.google.com/url?url=%zz")
                .is_none()
        );
    }

    #[test]
    fn test_query_unescape() {
        assert_eq!(query_unescape("a%20b+c").unwrap(), "a b c");
        assert_eq!(query_unescape("%C3%A9t%C3%A9").unwrap(), "été");
        assert_eq!(query_unescape("plain").unwrap(), "plain");
    }

    #[test]
    fn test_query_unescape_errors() {
        assert_eq!(
            query_unescape("%zz").unwrap_err(),
            UnescapeError::InvalidEscape(0)
        );
        assert_eq!(
            query_unescape("abc%4").unwrap_err(),
            UnescapeError::InvalidEscape(3)
        );
        assert_eq!(query_unescape("%FF").unwrap_err(), UnescapeError::InvalidUtf8);
    }
}
