//! Content-script match patterns
//!
//! `<scheme>://<host>/<path>` where scheme may be `*` (http or https), host
//! may be `*` or start with `*.`, and path may contain `*` wildcards.
//! `<all_urls>` matches any http, https or file URL.

use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchPattern {
    raw: String,
    kind: PatternKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum PatternKind {
    AllUrls,
    Parts {
        scheme: String,
        host: String,
        path: String,
    },
}

impl MatchPattern {
    pub fn parse(raw: &str) -> Option<Self> {
        if raw == "<all_urls>" {
            return Some(Self {
                raw: raw.to_string(),
                kind: PatternKind::AllUrls,
            });
        }

        let (scheme, rest) = raw.split_once("://")?;
        if !matches!(scheme, "*" | "http" | "https" | "file") {
            return None;
        }

        let (host, path) = match rest.find('/') {
            Some(idx) => (&rest[..idx], &rest[idx..]),
            None => return None,
        };
        if host.contains('*') && host != "*" && !host.starts_with("*.") {
            return None;
        }

        Some(Self {
            raw: raw.to_string(),
            kind: PatternKind::Parts {
                scheme: scheme.to_string(),
                host: host.to_lowercase(),
                path: path.to_string(),
            },
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn matches(&self, url: &Url) -> bool {
        match &self.kind {
            PatternKind::AllUrls => matches!(url.scheme(), "http" | "https" | "file"),
            PatternKind::Parts { scheme, host, path } => {
                let scheme_ok = match scheme.as_str() {
                    "*" => matches!(url.scheme(), "http" | "https"),
                    s => s == url.scheme(),
                };
                if !scheme_ok {
                    return false;
                }

                let url_host = url.host_str().unwrap_or("").to_lowercase();
                let host_ok = if host == "*" {
                    true
                } else if let Some(suffix) = host.strip_prefix("*.") {
                    url_host == suffix || url_host.ends_with(&format!(".{}", suffix))
                } else {
                    url_host == *host
                };
                if !host_ok {
                    return false;
                }

                let mut target = url.path().to_string();
                if let Some(query) = url.query() {
                    target.push('?');
                    target.push_str(query);
                }
                glob_match(path, &target)
            }
        }
    }
}

/// `*` matches any run of characters, everything else literally
fn glob_match(pattern: &str, text: &str) -> bool {
    let mut segments = pattern.split('*');
    let first = segments.next().unwrap_or("");
    let Some(mut rest) = text.strip_prefix(first) else {
        return false;
    };

    let remaining: Vec<&str> = segments.collect();
    let Some((last, middle)) = remaining.split_last() else {
        // No wildcard at all
        return rest.is_empty();
    };

    for segment in middle {
        match rest.find(segment) {
            Some(idx) => rest = &rest[idx + segment.len()..],
            None => return false,
        }
    }

    rest.ends_with(last)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_all_urls() {
        let pattern = MatchPattern::parse("<all_urls>").unwrap();
        assert!(pattern.matches(&url("https://example.com/")));
        assert!(pattern.matches(&url("file:///tmp/a.html")));
        assert!(!pattern.matches(&url("about:blank")));
    }

    #[test]
    fn test_wildcard_scheme_and_subdomain() {
        let pattern = MatchPattern::parse("*://*.example.com/*").unwrap();
        assert!(pattern.matches(&url("https://example.com/")));
        assert!(pattern.matches(&url("http://docs.example.com/a/b?q=1")));
        assert!(!pattern.matches(&url("https://notexample.com/")));
        assert!(!pattern.matches(&url("file:///example.com/")));
    }

    #[test]
    fn test_path_glob() {
        let pattern = MatchPattern::parse("https://github.com/*/issues/*").unwrap();
        assert!(pattern.matches(&url("https://github.com/rust-lang/issues/1")));
        assert!(!pattern.matches(&url("https://github.com/rust-lang/pulls/1")));

        let exact = MatchPattern::parse("https://example.com/login").unwrap();
        assert!(exact.matches(&url("https://example.com/login")));
        assert!(!exact.matches(&url("https://example.com/login/2fa")));
    }

    #[test]
    fn test_rejects_malformed() {
        assert!(MatchPattern::parse("example.com").is_none());
        assert!(MatchPattern::parse("ftp://example.com/*").is_none());
        assert!(MatchPattern::parse("https://exa*mple.com/*").is_none());
        assert!(MatchPattern::parse("https://example.com").is_none());
    }
}
