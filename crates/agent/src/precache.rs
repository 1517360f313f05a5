//! Precache loader.
//!
//! Runs once per install of a new generation: fetch every manifest URL and
//! write its snapshot into the generation's namespace. All-or-nothing — if
//! any entry fails, the install fails and the caller unwinds whatever was
//! written, so the agent never activates with a partially populated
//! precache.

use url::Url;

use shltr_client::{Fetcher, resolve};
use shltr_core::cache::compute_identity;
use shltr_core::{Error, GenerationCache, Manifest};

/// Fetch and store every manifest entry, in declaration order.
///
/// Returns the number of entries stored.
///
/// # Errors
///
/// Returns `Error::PrecacheFailed` naming the first entry that could not be
/// resolved, fetched, or stored. Entries written before the failure are the
/// caller's responsibility to unwind.
pub async fn run<F>(manifest: &Manifest, origin: &Url, cache: &GenerationCache, fetcher: &F) -> Result<u64, Error>
where
    F: Fetcher + ?Sized,
{
    for entry in manifest.entries() {
        let url = resolve(origin, entry).map_err(|e| Error::PrecacheFailed(format!("{entry}: {e}")))?;

        let response = fetcher
            .fetch(&url)
            .await
            .map_err(|e| Error::PrecacheFailed(format!("{entry}: {e}")))?;

        let snapshot = response
            .to_snapshot()
            .map_err(|e| Error::PrecacheFailed(format!("{entry}: {e}")))?;

        let identity = compute_identity("GET", url.as_str());
        cache
            .put(&identity, &snapshot)
            .await
            .map_err(|e| Error::PrecacheFailed(format!("{entry}: {e}")))?;

        tracing::debug!(entry = %entry, generation = %cache.generation(), "precached");
    }

    Ok(manifest.len() as u64)
}
