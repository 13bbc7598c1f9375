use once_cell::sync::Lazy;
use regex::Regex;

use super::error::{StoreError, StoreResult};

/// Identifiers that collide with system-owned paths.
pub const RESERVED_IDS: &[&str] = &["dashboard", "list", ".html"];

/// Permissive URL shape check: an optional scheme, a domain-like token, a
/// 2-6 letter top-level label, and an optional path/query tail. Searched
/// unanchored, so a URL-shaped token anywhere in the string passes. This is
/// intentionally lax; callers rely on the wide acceptance set, so do not
/// swap in strict URL parsing.
static URL_SHAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(http(s)?://.)?(www\.)?[-a-zA-Z0-9@:%._+~#=]{2,256}\.[a-z]{2,6}\b([-a-zA-Z0-9@:%_+.~#?&/=]*)",
    )
    .expect("url shape pattern compiles")
});

/// A `/` followed by a word character, i.e. an embedded path segment.
static EMBEDDED_SEGMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/\w").expect("embedded segment pattern compiles"));

/// Checks identifier and URL shape. Pure predicate, no I/O. All violations
/// collapse into a single `BadRequest`; callers never need finer reasons.
pub fn validate(id: Option<&str>, original_link: &str) -> StoreResult<()> {
    if !URL_SHAPE.is_match(original_link) {
        return Err(StoreError::BadRequest);
    }

    if let Some(id) = id {
        if id.is_empty() || RESERVED_IDS.contains(&id) || EMBEDDED_SEGMENT.is_match(id) {
            return Err(StoreError::BadRequest);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_common_urls() {
        assert!(validate(None, "https://example.com").is_ok());
        assert!(validate(None, "http://example.com/path?query=1").is_ok());
        assert!(validate(None, "www.example.com").is_ok());
        // Scheme is optional on purpose.
        assert!(validate(None, "example.com/some/path").is_ok());
    }

    #[test]
    fn accepts_url_embedded_in_noise() {
        // The shape check is a search, not a full match.
        assert!(validate(None, "go to example.com now").is_ok());
    }

    #[test]
    fn rejects_non_urls() {
        assert!(validate(None, "not a url").is_err());
        assert!(validate(None, "javascript:alert(1)").is_err());
        assert!(validate(None, "").is_err());
    }

    #[test]
    fn rejects_reserved_ids() {
        for reserved in RESERVED_IDS {
            assert!(validate(Some(reserved), "https://example.com").is_err());
        }
    }

    #[test]
    fn rejects_ids_with_path_segments() {
        assert!(validate(Some("a/b"), "https://example.com").is_err());
        assert!(validate(Some("abc/1"), "https://example.com").is_err());
        // A trailing slash with nothing after it is not an embedded segment.
        assert!(validate(Some("abc/"), "https://example.com").is_ok());
    }

    #[test]
    fn rejects_empty_id() {
        assert!(validate(Some(""), "https://example.com").is_err());
    }

    #[test]
    fn accepts_ordinary_ids() {
        assert!(validate(Some("my-link"), "https://example.com").is_ok());
        assert!(validate(Some("abc1234"), "https://example.com").is_ok());
    }
}
