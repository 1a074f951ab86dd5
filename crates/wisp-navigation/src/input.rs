//! Address normalisation
//!
//! Whatever is typed into the URL bar (or handed over by a new-window
//! request) is turned into something a content view can load:
//! 1. `http://` / `https://` (any case) → as is
//! 2. `about:`, `file:`, `data:` → as is
//! 3. anything else → `https://` prefixed

use url::Url;

use crate::error::NavigationError;
use crate::Result;

const PASSTHROUGH_SCHEMES: [&str; 3] = ["about:", "file:", "data:"];

/// Prefix `https://` unless the input already names a loadable scheme
pub fn format_url(input: &str) -> String {
    let input = input.trim();

    if has_http_scheme(input) || is_passthrough(input) {
        return input.to_string();
    }

    format!("https://{}", input)
}

/// [`format_url`], rejecting input no view could load
pub fn normalize_url(input: &str) -> Result<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(NavigationError::InvalidUrl("URL cannot be empty".to_string()));
    }

    let formatted = format_url(trimmed);
    match Url::parse(&formatted) {
        Ok(parsed)
            if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_some() =>
        {
            Ok(formatted)
        }
        _ => Err(NavigationError::InvalidUrl(trimmed.to_string())),
    }
}

fn has_http_scheme(input: &str) -> bool {
    starts_with_ignore_case(input, "http://") || starts_with_ignore_case(input, "https://")
}

fn is_passthrough(input: &str) -> bool {
    PASSTHROUGH_SCHEMES
        .iter()
        .any(|scheme| starts_with_ignore_case(input, scheme))
}

fn starts_with_ignore_case(input: &str, prefix: &str) -> bool {
    input
        .get(..prefix.len())
        .map(|head| head.eq_ignore_ascii_case(prefix))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bare_host() {
        assert_eq!(format_url("example.com"), "https://example.com");
        assert_eq!(format_url("  example.com/path  "), "https://example.com/path");
        assert_eq!(format_url("localhost:8080"), "https://localhost:8080");
    }

    #[test]
    fn test_format_keeps_scheme() {
        assert_eq!(format_url("http://example.com"), "http://example.com");
        assert_eq!(format_url("https://example.com"), "https://example.com");
        assert_eq!(format_url("HTTPS://Example.com"), "HTTPS://Example.com");
    }

    #[test]
    fn test_format_passthrough() {
        assert_eq!(format_url("about:blank"), "about:blank");
        assert_eq!(format_url("file:///tmp/index.html"), "file:///tmp/index.html");
        assert_eq!(format_url("data:text/plain,hi"), "data:text/plain,hi");
    }

    #[test]
    fn test_format_does_not_double_prefix_lookalikes() {
        // "httpbin.org" is a host, not a scheme
        assert_eq!(format_url("httpbin.org"), "https://httpbin.org");
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize_url("example.com").unwrap(), "https://example.com");
        assert_eq!(normalize_url("about:blank").unwrap(), "about:blank");
        assert_eq!(
            normalize_url("file:///tmp/index.html").unwrap(),
            "file:///tmp/index.html"
        );
    }

    #[test]
    fn test_normalize_rejects_garbage() {
        assert!(normalize_url("").is_err());
        assert!(normalize_url("   ").is_err());
        assert!(normalize_url("rust programming").is_err());
    }
}
