//! Request-identity cache key generation.
//!
//! A request's identity is its method plus its full URL. Only GET requests
//! are ever stored, but the method is part of the key so the invariant is
//! structural rather than assumed.

use sha2::{Digest, Sha256};

/// Compute the cache key for a request.
pub fn compute_identity(method: &str, url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(method.to_ascii_uppercase().as_bytes());
    hasher.update(b"\n");
    hasher.update(url.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_stability() {
        let id1 = compute_identity("GET", "https://example.com/index.html");
        let id2 = compute_identity("GET", "https://example.com/index.html");
        assert_eq!(id1, id2);
    }

    #[test]
    fn test_identity_method_case_insensitive() {
        let id1 = compute_identity("get", "https://example.com/");
        let id2 = compute_identity("GET", "https://example.com/");
        assert_eq!(id1, id2);
    }

    #[test]
    fn test_identity_different_urls() {
        let id1 = compute_identity("GET", "https://example.com/a");
        let id2 = compute_identity("GET", "https://example.com/b");
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_identity_different_methods() {
        let get = compute_identity("GET", "https://example.com/");
        let post = compute_identity("POST", "https://example.com/");
        assert_ne!(get, post);
    }

    #[test]
    fn test_identity_format() {
        let id = compute_identity("GET", "https://example.com/");
        assert_eq!(id.len(), 64);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
