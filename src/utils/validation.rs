use crate::utils::error::{ContentError, Result};
use url::Url;

/// Largest page the entries API accepts.
pub const MAX_PAGE_SIZE: usize = 1000;
/// A summary limit must leave room for the `...` marker plus one character.
pub const MIN_SUMMARY_LIMIT: usize = 4;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field: &str, value: impl ToString, reason: impl Into<String>) -> ContentError {
    ContentError::InvalidConfigValueError {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// Absolute http(s) URL (API base, asset base, site origin).
pub fn validate_http_url(field: &str, value: &str) -> Result<()> {
    let url = Url::parse(value.trim())
        .map_err(|e| invalid(field, value, format!("not an absolute URL ({})", e)))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(invalid(
            field,
            value,
            format!("only http and https are fetched, got '{}'", scheme),
        )),
    }
}

/// A document location: an http(s) URL or a non-empty file path.
pub fn validate_location(field: &str, value: &str) -> Result<()> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(invalid(field, value, "location cannot be empty"));
    }
    if trimmed.contains("://") {
        return validate_http_url(field, trimmed);
    }
    if trimmed.contains('\0') {
        return Err(invalid(field, value, "path contains null bytes"));
    }
    Ok(())
}

/// Remote credentials (space id, delivery token).
pub fn validate_credential(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(
            field,
            value,
            "required when the remote source is enabled",
        ));
    }
    Ok(())
}

pub fn validate_page_size(field: &str, page_size: usize) -> Result<()> {
    if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
        return Err(invalid(
            field,
            page_size,
            format!("page size must be between 1 and {}", MAX_PAGE_SIZE),
        ));
    }
    Ok(())
}

pub fn validate_ttl_ms(field: &str, ttl_ms: i64) -> Result<()> {
    if ttl_ms <= 0 {
        return Err(invalid(field, ttl_ms, "cache TTL must be a positive number of milliseconds"));
    }
    Ok(())
}

pub fn validate_summary_limit(field: &str, limit: usize) -> Result<()> {
    if limit < MIN_SUMMARY_LIMIT {
        return Err(invalid(
            field,
            limit,
            format!(
                "summaries are cut to limit-3 characters plus '...', so at least {} is needed",
                MIN_SUMMARY_LIMIT
            ),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_http_url() {
        assert!(validate_http_url("remote.api_base", "https://cdn.contentful.com").is_ok());
        assert!(validate_http_url("cache.origin", "http://localhost:8080").is_ok());
        assert!(validate_http_url("remote.api_base", "").is_err());
        assert!(validate_http_url("remote.api_base", "cdn.contentful.com").is_err());
        assert!(validate_http_url("remote.api_base", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_location_accepts_paths_and_urls() {
        assert!(validate_location("sources.dataset", "content/site-content.json").is_ok());
        assert!(validate_location("sources.dataset", "https://example.com/site.json").is_ok());
        assert!(validate_location("sources.dataset", "  ").is_err());
        assert!(validate_location("sources.dataset", "file://site.json").is_err());
        assert!(validate_location("sources.dataset", "a\0b").is_err());
    }

    #[test]
    fn test_numeric_settings() {
        assert!(validate_page_size("remote.page_size", 100).is_ok());
        assert!(validate_page_size("remote.page_size", 0).is_err());
        assert!(validate_page_size("remote.page_size", MAX_PAGE_SIZE + 1).is_err());

        assert!(validate_ttl_ms("cache.ttl_ms", 1).is_ok());
        assert!(validate_ttl_ms("cache.ttl_ms", 0).is_err());
        assert!(validate_ttl_ms("cache.ttl_ms", -5).is_err());

        assert!(validate_summary_limit("summary.blog", 4).is_ok());
        let err = validate_summary_limit("summary.blog", 3).unwrap_err();
        assert!(err.to_string().contains("summary.blog"));
    }

    #[test]
    fn test_validate_credential() {
        assert!(validate_credential("remote_config.spaceId", "abc").is_ok());
        assert!(validate_credential("remote_config.spaceId", "   ").is_err());
    }
}
