//! Cache generation identifiers and the version manager.
//!
//! A generation is an opaque version tag identifying one logical cache
//! namespace. Exactly one generation is current at any time; the tag is
//! bumped by the maintainer whenever the manifest or strategy changes, never
//! computed from content. Changing it requires redeploying the agent.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque version tag for one cache namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Generation(String);

impl Generation {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Owner of the current cache generation.
///
/// Holds the single configured tag for the process lifetime. There is no
/// runtime mutation; a deliberate manual cache-bust mechanism.
#[derive(Debug, Clone)]
pub struct VersionManager {
    current: Generation,
}

impl VersionManager {
    pub fn new(current: Generation) -> Self {
        Self { current }
    }

    /// The generation all reads and writes are scoped to.
    pub fn current_generation(&self) -> &Generation {
        &self.current
    }
}
