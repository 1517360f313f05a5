//! Stored response snapshots.
//!
//! A snapshot is an immutable byte-for-byte capture of a successful response
//! (status, headers, body) at the time of storage. Snapshots are only ever
//! replaced wholesale by a re-fetch and destroyed when their generation is
//! deleted.

use crate::Error;
use serde::{Deserialize, Serialize};

/// An immutable capture of a successful HTTP response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseSnapshot {
    /// The URL the response was fetched from.
    pub url: String,
    /// HTTP status code. Always in the 2xx range.
    pub status: u16,
    /// Content-Type header, if present.
    pub content_type: Option<String>,
    /// Full response headers as a JSON array of (name, value) pairs.
    pub headers_json: Option<String>,
    /// Response body bytes.
    pub body: Vec<u8>,
    /// RFC3339 timestamp of when the snapshot was taken.
    pub stored_at: String,
}

impl ResponseSnapshot {
    /// Capture a snapshot of a successful response.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotCacheable` for non-success statuses; failed or
    /// partial responses are never snapshotted.
    pub fn capture(
        url: impl Into<String>, status: u16, content_type: Option<String>, headers_json: Option<String>, body: Vec<u8>,
    ) -> Result<Self, Error> {
        if !(200..300).contains(&status) {
            return Err(Error::NotCacheable(format!("status {status}")));
        }

        Ok(Self {
            url: url.into(),
            status,
            content_type,
            headers_json,
            body,
            stored_at: chrono::Utc::now().to_rfc3339(),
        })
    }
}
