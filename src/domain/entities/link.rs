//! Link entity representing a shortened URL mapping.

use chrono::{DateTime, Utc};

/// A stored mapping from a short code to a canonical URL.
///
/// Links are immutable once created; the only way they disappear is the
/// retention sweep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub code: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
}

impl Link {
    /// Creates a new Link instance.
    pub fn new(code: String, url: String, created_at: DateTime<Utc>) -> Self {
        Self {
            code,
            url,
            created_at,
        }
    }

    /// Returns true if the link was created strictly before `cutoff`.
    pub fn is_created_before(&self, cutoff: DateTime<Utc>) -> bool {
        self.created_at < cutoff
    }
}

/// Input data for creating a new link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLink {
    pub code: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
}

impl NewLink {
    /// Creates an insert payload stamped with the current UTC time.
    pub fn new(code: impl Into<String>, url: impl Into<String>) -> Self {
        Self::created_at(code, url, Utc::now())
    }

    /// Creates an insert payload with an explicit creation time.
    pub fn created_at(
        code: impl Into<String>,
        url: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            code: code.into(),
            url: url.into(),
            created_at,
        }
    }
}

impl From<NewLink> for Link {
    fn from(new_link: NewLink) -> Self {
        Link::new(new_link.code, new_link.url, new_link.created_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_new_link_is_stamped_now() {
        let before = Utc::now();
        let new_link = NewLink::new("abc123", "https://example.com/");
        let after = Utc::now();

        assert_eq!(new_link.code, "abc123");
        assert_eq!(new_link.url, "https://example.com/");
        assert!(new_link.created_at >= before && new_link.created_at <= after);
    }

    #[test]
    fn test_link_from_new_link() {
        let created_at = Utc::now() - Duration::days(3);
        let link: Link = NewLink::created_at("xyz789", "https://rust-lang.org/", created_at).into();

        assert_eq!(link.code, "xyz789");
        assert_eq!(link.url, "https://rust-lang.org/");
        assert_eq!(link.created_at, created_at);
    }

    #[test]
    fn test_link_is_created_before() {
        let now = Utc::now();
        let link = Link::new(
            "code".to_string(),
            "https://example.com/".to_string(),
            now - Duration::days(31),
        );

        assert!(link.is_created_before(now - Duration::days(30)));
        assert!(!link.is_created_before(now - Duration::days(32)));
    }
}
