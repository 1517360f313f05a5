//! Strategy executors.
//!
//! Three fixed policies, chosen per request by the router:
//!
//! - cache-first-static for immutable cross-origin assets
//! - cache-first with background refresh (stale-while-revalidate) for
//!   same-origin pages and assets
//! - network-first with cache fallback for same-origin dynamic data
//!
//! Executors never surface an error to the requester: every failure path
//! degrades to a cached copy or a synthetic 503. Storage failures are
//! logged and treated as misses.

use std::sync::Arc;
use url::Url;

use shltr_client::{FetchResponse, Fetcher};
use shltr_core::GenerationCache;
use shltr_core::cache::compute_identity;

use crate::events::{Destination, FetchRequest};
use crate::response::{ServedResponse, ServedSource};
use crate::work::PendingWork;

/// Cache-first for cross-origin vendor assets, versioned by URL.
///
/// A hit is final; nothing refreshes it. A miss fetches once, caching on
/// success.
pub async fn cache_first_static<F>(cache: &GenerationCache, fetcher: &F, url: &Url) -> ServedResponse
where
    F: Fetcher + ?Sized,
{
    let identity = compute_identity("GET", url.as_str());

    match cache.get(&identity).await {
        Ok(Some(snapshot)) => {
            tracing::debug!(url = %url, "static cache hit");
            return ServedResponse::from_snapshot(snapshot, ServedSource::Cache);
        }
        Ok(None) => {}
        Err(e) => tracing::warn!(url = %url, error = %e, "cache read failed; treating as miss"),
    }

    match fetcher.fetch(url).await {
        Ok(response) => {
            store(cache, &identity, &response).await;
            ServedResponse::from_network(&response)
        }
        Err(e) => {
            tracing::debug!(url = %url, error = %e, "offline and uncached static asset");
            ServedResponse::offline_resource()
        }
    }
}

/// Cache-first with background refresh for same-origin pages and assets.
///
/// A hit is served immediately while a detached fetch refreshes the stored
/// copy for next time; refresh failures are swallowed. A miss fetches from
/// the network, falling back to the cached bootstrap page for document
/// requests when that fails too.
pub async fn stale_while_revalidate<F>(
    cache: &GenerationCache, fetcher: &Arc<F>, request: &FetchRequest, url: &Url, bootstrap: &Url, work: &PendingWork,
) -> ServedResponse
where
    F: Fetcher + 'static,
{
    let identity = compute_identity("GET", url.as_str());

    match cache.get(&identity).await {
        Ok(Some(snapshot)) => {
            tracing::debug!(url = %url, "cache hit; refreshing in background");

            let refresh_cache = cache.clone();
            let refresh_fetcher = Arc::clone(fetcher);
            let refresh_url = url.clone();
            let refresh_identity = identity.clone();
            work.extend(async move {
                match refresh_fetcher.fetch(&refresh_url).await {
                    Ok(response) => store(&refresh_cache, &refresh_identity, &response).await,
                    Err(e) => tracing::warn!(url = %refresh_url, error = %e, "background refresh failed"),
                }
            })
            .await;

            return ServedResponse::from_snapshot(snapshot, ServedSource::Cache);
        }
        Ok(None) => {}
        Err(e) => tracing::warn!(url = %url, error = %e, "cache read failed; treating as miss"),
    }

    match fetcher.fetch(url).await {
        Ok(response) => {
            store(cache, &identity, &response).await;
            ServedResponse::from_network(&response)
        }
        Err(e) => {
            tracing::debug!(url = %url, error = %e, "offline with no cached copy");

            if request.destination == Destination::Document {
                let bootstrap_identity = compute_identity("GET", bootstrap.as_str());
                if let Ok(Some(snapshot)) = cache.get(&bootstrap_identity).await {
                    tracing::debug!(url = %url, "serving bootstrap page as navigation fallback");
                    return ServedResponse::from_snapshot(snapshot, ServedSource::Fallback);
                }
            }

            ServedResponse::offline()
        }
    }
}

/// Network-first for same-origin dynamic data.
///
/// A successful network response is returned verbatim and never cached;
/// this path must stay fresh. On failure, a previously cached copy of the
/// identical request identity is served if one exists.
pub async fn network_first<F>(cache: &GenerationCache, fetcher: &F, url: &Url) -> ServedResponse
where
    F: Fetcher + ?Sized,
{
    match fetcher.fetch(url).await {
        Ok(response) => ServedResponse::from_network(&response),
        Err(e) => {
            tracing::debug!(url = %url, error = %e, "network failed; checking cache");

            let identity = compute_identity("GET", url.as_str());
            match cache.get(&identity).await {
                Ok(Some(snapshot)) => ServedResponse::from_snapshot(snapshot, ServedSource::Fallback),
                Ok(None) => ServedResponse::offline_reconnect(),
                Err(read_err) => {
                    tracing::warn!(url = %url, error = %read_err, "cache read failed");
                    ServedResponse::offline_reconnect()
                }
            }
        }
    }
}

/// Store a successful response, logging instead of failing.
///
/// A write that lands in a generation being deleted is silently lost; the
/// entry is a re-derivation of network state, so the loss is tolerated.
async fn store(cache: &GenerationCache, identity: &str, response: &FetchResponse) {
    match response.to_snapshot() {
        Ok(snapshot) => {
            if let Err(e) = cache.put(identity, &snapshot).await {
                tracing::warn!(url = %response.url, error = %e, "failed to store snapshot");
            }
        }
        Err(e) => tracing::warn!(url = %response.url, error = %e, "response not cacheable"),
    }
}
