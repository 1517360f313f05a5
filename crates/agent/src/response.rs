//! Responses served back to the host.
//!
//! A served response is either a stored snapshot, a fresh network response,
//! or a synthetic plain-text 503. Synthetic responses are the only error
//! page mechanism the agent has; no HTML is generated.

use serde::{Deserialize, Serialize};
use shltr_client::FetchResponse;
use shltr_core::ResponseSnapshot;

/// Fixed body for an uncached static asset while offline.
pub const OFFLINE_RESOURCE_BODY: &str = "Offline: Could not load resource";

/// Fixed body for an uncached same-origin asset while offline.
pub const OFFLINE_BODY: &str = "Offline";

/// Fixed body for dynamic requests with no network and no cached copy.
pub const OFFLINE_RECONNECT_BODY: &str = "Offline: Service unavailable. Reconnect for updates.";

/// Where a served response came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServedSource {
    /// Stored snapshot for the request's own identity.
    Cache,
    /// Fresh network response.
    Network,
    /// Stored snapshot for a different identity (bootstrap page, stale copy).
    Fallback,
    /// Synthetic 503 generated by the agent.
    Synthetic,
}

/// A response the agent produced for an intercepted request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServedResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
    pub source: ServedSource,
}

impl ServedResponse {
    /// Serve a stored snapshot.
    pub fn from_snapshot(snapshot: ResponseSnapshot, source: ServedSource) -> Self {
        Self { status: snapshot.status, content_type: snapshot.content_type, body: snapshot.body, source }
    }

    /// Serve a network response verbatim.
    pub fn from_network(response: &FetchResponse) -> Self {
        Self {
            status: response.status.as_u16(),
            content_type: response.content_type.clone(),
            body: response.bytes.to_vec(),
            source: ServedSource::Network,
        }
    }

    fn synthetic(body: &str) -> Self {
        Self {
            status: 503,
            content_type: Some("text/plain".to_string()),
            body: body.as_bytes().to_vec(),
            source: ServedSource::Synthetic,
        }
    }

    /// 503 for a cross-origin static asset that is neither cached nor reachable.
    pub fn offline_resource() -> Self {
        Self::synthetic(OFFLINE_RESOURCE_BODY)
    }

    /// 503 for a same-origin asset that is neither cached nor reachable.
    pub fn offline() -> Self {
        Self::synthetic(OFFLINE_BODY)
    }

    /// 503 for a dynamic request with no network and no cached copy.
    pub fn offline_reconnect() -> Self {
        Self::synthetic(OFFLINE_RECONNECT_BODY)
    }
}

/// Outcome of a fetch interception: a response, or a decline that lets the
/// host proceed with the network untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchReply {
    pub served: Option<ServedResponse>,
}

impl FetchReply {
    pub fn serve(response: ServedResponse) -> Self {
        Self { served: Some(response) }
    }

    pub fn decline() -> Self {
        Self { served: None }
    }
}
