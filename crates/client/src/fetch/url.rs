//! URL resolution and origin classification.
//!
//! Manifest entries and intercepted request URLs may be absolute or
//! path-relative to the application origin; everything downstream of the
//! router works with resolved absolute URLs.

/// Error type for URL resolution failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum UrlError {
    #[error("empty URL")]
    Empty,

    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

/// Resolve a raw URL string against the application origin.
///
/// Absolute http(s) URLs pass through untouched; anything else is joined
/// onto the origin the way a path-relative reference would be. Fragments
/// are dropped since they never reach the network.
pub fn resolve(origin: &url::Url, raw: &str) -> Result<url::Url, UrlError> {
    let trimmed = raw.trim();

    if trimmed.is_empty() {
        return Err(UrlError::Empty);
    }

    let mut resolved = match url::Url::parse(trimmed) {
        Ok(absolute) => absolute,
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            origin.join(trimmed).map_err(|e| UrlError::InvalidUrl(e.to_string()))?
        }
        Err(e) => return Err(UrlError::InvalidUrl(e.to_string())),
    };

    match resolved.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlError::UnsupportedScheme(scheme.to_string())),
    }

    resolved.set_fragment(None);

    Ok(resolved)
}

/// Whether a URL belongs to the application origin.
///
/// Compares scheme, host, and port; path and query never matter.
pub fn same_origin(origin: &url::Url, url: &url::Url) -> bool {
    origin.scheme() == url.scheme()
        && origin.host_str() == url.host_str()
        && origin.port_or_known_default() == url.port_or_known_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin() -> url::Url {
        url::Url::parse("https://app.example.com").unwrap()
    }

    #[test]
    fn test_resolve_relative_path() {
        let url = resolve(&origin(), "dashboard.html").unwrap();
        assert_eq!(url.as_str(), "https://app.example.com/dashboard.html");
    }

    #[test]
    fn test_resolve_nested_relative_path() {
        let url = resolve(&origin(), "assets/js/app.js").unwrap();
        assert_eq!(url.as_str(), "https://app.example.com/assets/js/app.js");
    }

    #[test]
    fn test_resolve_absolute_passes_through() {
        let url = resolve(&origin(), "https://fonts.example.com/roboto.woff2").unwrap();
        assert_eq!(url.as_str(), "https://fonts.example.com/roboto.woff2");
    }

    #[test]
    fn test_resolve_trims_whitespace() {
        let url = resolve(&origin(), "  main.css  ").unwrap();
        assert_eq!(url.as_str(), "https://app.example.com/main.css");
    }

    #[test]
    fn test_resolve_drops_fragment() {
        let url = resolve(&origin(), "index.html#pricing").unwrap();
        assert_eq!(url.fragment(), None);
        assert_eq!(url.path(), "/index.html");
    }

    #[test]
    fn test_resolve_empty() {
        let result = resolve(&origin(), "");
        assert!(matches!(result, Err(UrlError::Empty)));
    }

    #[test]
    fn test_resolve_unsupported_scheme() {
        let result = resolve(&origin(), "file:///etc/passwd");
        assert!(matches!(result, Err(UrlError::UnsupportedScheme(_))));
    }

    #[test]
    fn test_same_origin_matches() {
        let url = url::Url::parse("https://app.example.com/api/services").unwrap();
        assert!(same_origin(&origin(), &url));
    }

    #[test]
    fn test_same_origin_rejects_other_host() {
        let url = url::Url::parse("https://cdn.example.com/lib.js").unwrap();
        assert!(!same_origin(&origin(), &url));
    }

    #[test]
    fn test_same_origin_rejects_scheme_mismatch() {
        let url = url::Url::parse("http://app.example.com/index.html").unwrap();
        assert!(!same_origin(&origin(), &url));
    }

    #[test]
    fn test_same_origin_default_ports() {
        let explicit = url::Url::parse("https://app.example.com:443/index.html").unwrap();
        assert!(same_origin(&origin(), &explicit));
    }
}
