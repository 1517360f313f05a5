//! Request classification.
//!
//! Every intercepted request is classified once into an explicit strategy,
//! which is then threaded through to the executors; the fetch mechanics
//! never re-inspect the request. Precedence: method first, then origin,
//! then resource type.

use shltr_client::same_origin;
use url::Url;

use crate::events::{Destination, FetchRequest};

/// Response strategy for one intercepted request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Not intercepted at all (non-GET); the host proceeds untouched.
    Bypass,
    /// Cross-origin dynamic traffic: network only, never cached.
    NetworkOnly,
    /// Cross-origin vendor assets, versioned by URL: cache hit is final.
    CacheFirstStatic,
    /// Same-origin pages and assets: serve cached, refresh in background.
    StaleWhileRevalidate,
    /// Same-origin dynamic data: must try the network before the cache.
    NetworkFirst,
}

/// Classify a request by method, origin, and resource type.
///
/// `resolved` is the request URL already resolved against the app origin.
pub fn classify(origin: &Url, request: &FetchRequest, resolved: &Url) -> Strategy {
    if !request.method.eq_ignore_ascii_case("GET") {
        return Strategy::Bypass;
    }

    if !same_origin(origin, resolved) {
        return match request.destination {
            Destination::Script | Destination::Style | Destination::Font => Strategy::CacheFirstStatic,
            _ => Strategy::NetworkOnly,
        };
    }

    match request.destination {
        Destination::Document | Destination::Image | Destination::Style | Destination::Script => {
            Strategy::StaleWhileRevalidate
        }
        _ => Strategy::NetworkFirst,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin() -> Url {
        Url::parse("https://app.example.com").unwrap()
    }

    fn request(method: &str, url: &str, destination: Destination) -> (FetchRequest, Url) {
        let request = FetchRequest { method: method.to_string(), url: url.to_string(), destination };
        let resolved = shltr_client::resolve(&origin(), url).unwrap();
        (request, resolved)
    }

    #[test]
    fn test_non_get_bypasses() {
        let (req, resolved) = request("POST", "https://app.example.com/book-appointment", Destination::Other);
        assert_eq!(classify(&origin(), &req, &resolved), Strategy::Bypass);

        let (req, resolved) = request("PUT", "https://app.example.com/profile", Destination::Document);
        assert_eq!(classify(&origin(), &req, &resolved), Strategy::Bypass);
    }

    #[test]
    fn test_cross_origin_static_assets() {
        for destination in [Destination::Script, Destination::Style, Destination::Font] {
            let (req, resolved) = request("GET", "https://cdn.example.com/lib.js", destination);
            assert_eq!(classify(&origin(), &req, &resolved), Strategy::CacheFirstStatic);
        }
    }

    #[test]
    fn test_cross_origin_dynamic_is_network_only() {
        for destination in [Destination::Document, Destination::Image, Destination::Other] {
            let (req, resolved) = request("GET", "https://api.vendor.example.com/auth", destination);
            assert_eq!(classify(&origin(), &req, &resolved), Strategy::NetworkOnly);
        }
    }

    #[test]
    fn test_same_origin_pages_and_assets() {
        for destination in [Destination::Document, Destination::Image, Destination::Style, Destination::Script] {
            let (req, resolved) = request("GET", "dashboard.html", destination);
            assert_eq!(classify(&origin(), &req, &resolved), Strategy::StaleWhileRevalidate);
        }
    }

    #[test]
    fn test_same_origin_dynamic_is_network_first() {
        let (req, resolved) = request("GET", "/api/services", Destination::Other);
        assert_eq!(classify(&origin(), &req, &resolved), Strategy::NetworkFirst);

        // fonts are only special cross-origin
        let (req, resolved) = request("GET", "/fonts/app.woff2", Destination::Font);
        assert_eq!(classify(&origin(), &req, &resolved), Strategy::NetworkFirst);
    }

    #[test]
    fn test_method_case_insensitive() {
        let (req, resolved) = request("get", "index.html", Destination::Document);
        assert_eq!(classify(&origin(), &req, &resolved), Strategy::StaleWhileRevalidate);
    }
}
