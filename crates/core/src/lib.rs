//! Core types and shared functionality for the shltr offline agent.
//!
//! This crate provides:
//! - Generation-namespaced cache store with SQLite backend
//! - Response snapshot types
//! - Version (generation) management and the precache manifest
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;
pub mod manifest;
pub mod snapshot;
pub mod version;

pub use cache::{CacheDb, GenerationCache};
pub use config::AgentConfig;
pub use error::Error;
pub use manifest::Manifest;
pub use snapshot::ResponseSnapshot;
pub use version::{Generation, VersionManager};
