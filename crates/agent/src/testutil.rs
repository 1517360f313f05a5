//! Scripted fetcher for strategy and lifecycle tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{StatusCode, header::HeaderMap};
use url::Url;

use shltr_client::{FetchResponse, Fetcher};
use shltr_core::Error;

#[derive(Clone)]
enum Outcome {
    Success { body: Vec<u8>, content_type: String },
    Status(u16),
}

#[derive(Default)]
struct MockInner {
    routes: Mutex<HashMap<String, Outcome>>,
    calls: Mutex<Vec<String>>,
}

/// A `Fetcher` that serves scripted outcomes and records calls.
///
/// Clones share state, so a test can keep a handle to a fetcher it has
/// moved into the agent. URLs without a scripted outcome behave as an
/// unreachable network.
#[derive(Clone, Default)]
pub struct MockFetcher {
    inner: Arc<MockInner>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a successful response for a URL.
    pub fn succeed(&self, url: &str, body: &[u8], content_type: &str) {
        self.inner.routes.lock().unwrap().insert(
            url.to_string(),
            Outcome::Success { body: body.to_vec(), content_type: content_type.to_string() },
        );
    }

    /// Script a non-success status for a URL.
    pub fn status(&self, url: &str, status: u16) {
        self.inner.routes.lock().unwrap().insert(url.to_string(), Outcome::Status(status));
    }

    /// Remove any scripted outcome, restoring unreachable-network behavior.
    pub fn go_offline(&self, url: &str) {
        self.inner.routes.lock().unwrap().remove(url);
    }

    /// Number of fetches issued for one URL.
    pub fn calls_for(&self, url: &str) -> usize {
        self.inner.calls.lock().unwrap().iter().filter(|c| c.as_str() == url).count()
    }

    /// Number of fetches issued in total.
    pub fn total_calls(&self) -> usize {
        self.inner.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    async fn fetch(&self, url: &Url) -> Result<FetchResponse, Error> {
        self.inner.calls.lock().unwrap().push(url.to_string());

        let outcome = self.inner.routes.lock().unwrap().get(url.as_str()).cloned();
        match outcome {
            Some(Outcome::Success { body, content_type }) => Ok(FetchResponse {
                url: url.clone(),
                final_url: url.clone(),
                status: StatusCode::OK,
                content_type: Some(content_type),
                bytes: Bytes::from(body),
                headers: HeaderMap::new(),
                fetch_ms: 1,
            }),
            Some(Outcome::Status(status)) => Err(Error::HttpError(format!("status {status}"))),
            None => Err(Error::FetchFailed("network unreachable".to_string())),
        }
    }
}
