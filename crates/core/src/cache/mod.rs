//! SQLite-backed cache of response snapshots, namespaced by generation.
//!
//! This module provides a persistent store mapping request identity to a
//! stored response snapshot, with async access via tokio-rusqlite. It
//! supports:
//!
//! - Generation-namespaced storage (one namespace per deployed version)
//! - Request-identity keys hashed with SHA-256
//! - Automatic schema migrations
//! - WAL mode for concurrent access
//! - Generation-wide deletion (no per-entry eviction)

pub mod connection;
pub mod identity;
pub mod migrations;
pub mod store;

pub use crate::Error;

pub use connection::CacheDb;
pub use identity::compute_identity;
pub use store::GenerationCache;
