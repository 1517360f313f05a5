//! Unified error types for the shltr agent.
//!
//! Display strings carry a stable uppercase tag so host-side tooling can
//! match on failure classes without parsing free-form text.

use tokio_rusqlite::rusqlite;

/// Unified error types for the offline caching agent.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid URL.
    #[error("INVALID_URL: {0}")]
    InvalidUrl(String),

    /// Network-level fetch failure (connection refused, DNS, timeout).
    #[error("FETCH_FAILED: {0}")]
    FetchFailed(String),

    /// Fetch response too large.
    #[error("FETCH_TOO_LARGE: {0}")]
    FetchTooLarge(String),

    /// HTTP error response (non-success status).
    #[error("HTTP_ERROR: {0}")]
    HttpError(String),

    /// Precache install failed; the new generation is not ready.
    #[error("PRECACHE_FAILED: {0}")]
    PrecacheFailed(String),

    /// Attempt to store a non-success response snapshot.
    #[error("NOT_CACHEABLE: {0}")]
    NotCacheable(String),

    /// Database operation failed.
    #[error("CACHE_ERROR: {0}")]
    Database(tokio_rusqlite::Error),

    /// Migration failed to apply.
    #[error("CACHE_ERROR: migration failed: {0}")]
    MigrationFailed(String),
}

impl From<tokio_rusqlite::Error<Error>> for Error {
    fn from(err: tokio_rusqlite::Error<Error>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => e,
            tokio_rusqlite::Error::ConnectionClosed => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
            tokio_rusqlite::Error::Close(c) => Error::Database(tokio_rusqlite::Error::Close(c)),
            _ => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
        }
    }
}

impl From<tokio_rusqlite::Error<rusqlite::Error>> for Error {
    fn from(err: tokio_rusqlite::Error<rusqlite::Error>) -> Self {
        Error::Database(err)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Database(tokio_rusqlite::Error::Error(err))
    }
}
