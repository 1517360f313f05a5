//! The precache manifest.
//!
//! An ordered list of URLs, mixing origin-relative paths and absolute
//! cross-origin URLs, fixed at deploy time. Whoever changes the
//! application's asset list must update this manifest and bump the
//! generation tag, or stale assets persist. Duplicates are harmless since
//! storage upserts are idempotent.

/// Ordered list of assets required for offline bootstrap.
#[derive(Debug, Clone, Default)]
pub struct Manifest {
    entries: Vec<String>,
}

impl Manifest {
    pub fn new(entries: Vec<String>) -> Self {
        Self { entries }
    }

    /// Entries in declaration order.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether the manifest lists the given URL verbatim.
    pub fn contains(&self, url: &str) -> bool {
        self.entries.iter().any(|e| e == url)
    }
}
