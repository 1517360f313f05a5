//! The agent runtime.
//!
//! `ServiceAgent` wires the cache store, version manager, fetch client, and
//! lifecycle controller together and dispatches host events: lifecycle
//! events drive install/activate, fetch events are classified once and
//! handed to a strategy executor, push events produce notifications.

use std::sync::Arc;
use url::Url;

use shltr_client::{FetchClient, FetchConfig, Fetcher, resolve};
use shltr_core::{AgentConfig, CacheDb, Error, GenerationCache, Manifest, VersionManager};

use crate::events::{AgentReply, FetchRequest, HostEvent, NavigateReply};
use crate::lifecycle::LifecycleController;
use crate::notify;
use crate::response::FetchReply;
use crate::router::{self, Strategy};
use crate::strategy;
use crate::work::PendingWork;

/// One running offline agent, generic over its response source.
pub struct ServiceAgent<F: Fetcher> {
    config: AgentConfig,
    origin: Url,
    bootstrap: Url,
    notifications: Url,
    manifest: Manifest,
    db: CacheDb,
    versions: VersionManager,
    lifecycle: LifecycleController,
    fetcher: Arc<F>,
    work: PendingWork,
}

impl ServiceAgent<FetchClient> {
    /// Boot an agent from configuration: open the cache database and build
    /// the HTTP client.
    pub async fn new(config: AgentConfig) -> Result<Self, Error> {
        let db = CacheDb::open(&config.db_path).await?;

        let fetch_config = FetchConfig {
            user_agent: config.user_agent.clone(),
            max_bytes: config.max_bytes,
            timeout: config.timeout(),
            ..Default::default()
        };
        let fetcher = FetchClient::new(fetch_config)?;

        Self::with_fetcher(config, db, fetcher)
    }
}

impl<F: Fetcher + 'static> ServiceAgent<F> {
    /// Assemble an agent around an existing database and fetcher.
    pub fn with_fetcher(config: AgentConfig, db: CacheDb, fetcher: F) -> Result<Self, Error> {
        let origin = Url::parse(&config.origin).map_err(|e| Error::InvalidUrl(format!("origin: {e}")))?;
        let bootstrap =
            resolve(&origin, &config.bootstrap_url).map_err(|e| Error::InvalidUrl(format!("bootstrap_url: {e}")))?;
        let notifications = resolve(&origin, &config.notifications_url)
            .map_err(|e| Error::InvalidUrl(format!("notifications_url: {e}")))?;

        let versions = VersionManager::new(config.current_generation());
        let manifest = config.manifest();

        Ok(Self {
            config,
            origin,
            bootstrap,
            notifications,
            manifest,
            db,
            versions,
            lifecycle: LifecycleController::new(),
            fetcher: Arc::new(fetcher),
            work: PendingWork::new(),
        })
    }

    /// Handle one host event and produce the reply for it.
    pub async fn handle_event(&mut self, event: HostEvent) -> AgentReply {
        match event {
            HostEvent::Install => {
                let result = self
                    .lifecycle
                    .install(&self.db, &self.versions, &self.manifest, &self.origin, self.fetcher.as_ref())
                    .await;
                match result {
                    Ok(outcome) => AgentReply::Installed(outcome),
                    Err(e) => AgentReply::InstallFailed { error: e.to_string() },
                }
            }

            HostEvent::Activate => AgentReply::Activated(self.lifecycle.activate(&self.db, &self.versions).await),

            HostEvent::Fetch(request) => AgentReply::Fetch(self.handle_fetch(request).await),

            HostEvent::Push { data } => AgentReply::Notification(notify::for_push(&self.config, data)),

            HostEvent::NotificationClick { action } => {
                tracing::debug!(action = action.as_deref().unwrap_or("default"), "notification interaction");
                AgentReply::Navigate(NavigateReply { url: self.notifications.to_string() })
            }
        }
    }

    async fn handle_fetch(&self, request: FetchRequest) -> FetchReply {
        let resolved = match resolve(&self.origin, &request.url) {
            Ok(url) => url,
            Err(e) => {
                tracing::debug!(url = %request.url, error = %e, "declining unresolvable request");
                return FetchReply::decline();
            }
        };

        match router::classify(&self.origin, &request, &resolved) {
            Strategy::Bypass | Strategy::NetworkOnly => FetchReply::decline(),

            Strategy::CacheFirstStatic => {
                let cache = self.current_cache();
                FetchReply::serve(strategy::cache_first_static(&cache, self.fetcher.as_ref(), &resolved).await)
            }

            Strategy::StaleWhileRevalidate => {
                let cache = self.current_cache();
                FetchReply::serve(
                    strategy::stale_while_revalidate(
                        &cache,
                        &self.fetcher,
                        &request,
                        &resolved,
                        &self.bootstrap,
                        &self.work,
                    )
                    .await,
                )
            }

            Strategy::NetworkFirst => {
                let cache = self.current_cache();
                FetchReply::serve(strategy::network_first(&cache, self.fetcher.as_ref(), &resolved).await)
            }
        }
    }

    fn current_cache(&self) -> GenerationCache {
        self.db.handle(self.versions.current_generation().clone())
    }

    /// Wait for detached background work (cache refreshes) to finish.
    pub async fn settle(&self) {
        self.work.settle().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Destination;
    use crate::notify::DEFAULT_NOTIFICATION_BODY;
    use crate::response::{OFFLINE_RECONNECT_BODY, ServedSource};
    use crate::testutil::MockFetcher;
    use shltr_core::cache::compute_identity;
    use shltr_core::{Generation, ResponseSnapshot};

    const ORIGIN: &str = "https://app.example.com";

    async fn test_agent(generation: &str, precache: &[&str]) -> (ServiceAgent<MockFetcher>, MockFetcher, CacheDb) {
        let config = AgentConfig {
            generation: generation.into(),
            origin: ORIGIN.into(),
            precache: precache.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        };
        let db = CacheDb::open_in_memory().await.unwrap();
        let fetcher = MockFetcher::new();
        let agent = ServiceAgent::with_fetcher(config, db.clone(), fetcher.clone()).unwrap();
        (agent, fetcher, db)
    }

    fn fetch_event(method: &str, url: &str, destination: Destination) -> HostEvent {
        HostEvent::Fetch(FetchRequest { method: method.into(), url: url.into(), destination })
    }

    fn served_body(reply: &AgentReply) -> Vec<u8> {
        match reply {
            AgentReply::Fetch(FetchReply { served: Some(response) }) => response.body.clone(),
            other => panic!("expected a served response, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_install_then_offline_fetch_hits_cache() {
        let (mut agent, fetcher, _db) = test_agent("v1", &["index.html"]).await;
        fetcher.succeed("https://app.example.com/index.html", b"<html>home</html>", "text/html");

        let reply = agent.handle_event(HostEvent::Install).await;
        assert!(matches!(reply, AgentReply::Installed(ref outcome) if outcome.precached == 1));

        fetcher.go_offline("https://app.example.com/index.html");

        let reply = agent
            .handle_event(fetch_event("GET", "index.html", Destination::Document))
            .await;
        assert_eq!(served_body(&reply), b"<html>home</html>");

        agent.settle().await;
    }

    #[tokio::test]
    async fn test_install_failure_reports_and_commits_nothing() {
        let (mut agent, fetcher, db) = test_agent("v2", &["index.html", "missing.css"]).await;
        fetcher.succeed("https://app.example.com/index.html", b"<html>", "text/html");

        let reply = agent.handle_event(HostEvent::Install).await;
        assert!(matches!(reply, AgentReply::InstallFailed { ref error } if error.contains("missing.css")));

        assert_eq!(db.handle(Generation::new("v2")).entry_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_activate_leaves_single_generation() {
        let (mut agent, fetcher, db) = test_agent("v2", &["index.html"]).await;

        // a prior generation left over from the last deploy
        let old = db.handle(Generation::new("v1"));
        let snapshot =
            ResponseSnapshot::capture("https://app.example.com/index.html", 200, None, None, b"old".to_vec()).unwrap();
        old.put(&compute_identity("GET", "https://app.example.com/index.html"), &snapshot)
            .await
            .unwrap();

        fetcher.succeed("https://app.example.com/index.html", b"new", "text/html");
        agent.handle_event(HostEvent::Install).await;

        let reply = agent.handle_event(HostEvent::Activate).await;
        match reply {
            AgentReply::Activated(outcome) => {
                assert_eq!(outcome.generation, "v2");
                assert_eq!(outcome.removed, vec!["v1".to_string()]);
                assert!(outcome.claimed);
            }
            other => panic!("expected activation, got {other:?}"),
        }

        assert_eq!(db.list_generations().await.unwrap(), vec![Generation::new("v2")]);
    }

    #[tokio::test]
    async fn test_non_get_is_never_intercepted() {
        let (mut agent, fetcher, db) = test_agent("v1", &[]).await;

        let reply = agent
            .handle_event(fetch_event("POST", "book-appointment", Destination::Other))
            .await;

        assert!(matches!(reply, AgentReply::Fetch(FetchReply { served: None })));
        assert_eq!(fetcher.total_calls(), 0);
        assert!(db.list_generations().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_cross_origin_dynamic_is_declined() {
        let (mut agent, fetcher, _db) = test_agent("v1", &[]).await;

        let reply = agent
            .handle_event(fetch_event("GET", "https://api.vendor.example.com/auth", Destination::Other))
            .await;

        assert!(matches!(reply, AgentReply::Fetch(FetchReply { served: None })));
        assert_eq!(fetcher.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_second_request_observes_background_refresh() {
        let (mut agent, fetcher, _db) = test_agent("v1", &["dashboard.html"]).await;
        fetcher.succeed("https://app.example.com/dashboard.html", b"version A", "text/html");
        agent.handle_event(HostEvent::Install).await;

        fetcher.succeed("https://app.example.com/dashboard.html", b"version B", "text/html");

        let first = agent
            .handle_event(fetch_event("GET", "dashboard.html", Destination::Document))
            .await;
        assert_eq!(served_body(&first), b"version A");

        agent.settle().await;

        let second = agent
            .handle_event(fetch_event("GET", "dashboard.html", Destination::Document))
            .await;
        assert_eq!(served_body(&second), b"version B");

        agent.settle().await;
    }

    #[tokio::test]
    async fn test_api_success_returned_verbatim_and_not_cached() {
        let (mut agent, fetcher, db) = test_agent("v1", &[]).await;
        fetcher.succeed("https://app.example.com/api/services", b"[1,2,3]", "application/json");

        let reply = agent
            .handle_event(fetch_event("GET", "/api/services", Destination::Other))
            .await;

        match reply {
            AgentReply::Fetch(FetchReply { served: Some(response) }) => {
                assert_eq!(response.body, b"[1,2,3]");
                assert_eq!(response.source, ServedSource::Network);
            }
            other => panic!("expected a served response, got {other:?}"),
        }

        let cache = db.handle(Generation::new("v1"));
        assert!(
            cache
                .get(&compute_identity("GET", "https://app.example.com/api/services"))
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_api_offline_uncached_gets_reconnect_503() {
        let (mut agent, _fetcher, _db) = test_agent("v1", &[]).await;

        let reply = agent
            .handle_event(fetch_event("GET", "/api/services", Destination::Other))
            .await;

        match reply {
            AgentReply::Fetch(FetchReply { served: Some(response) }) => {
                assert_eq!(response.status, 503);
                assert_eq!(response.body, OFFLINE_RECONNECT_BODY.as_bytes());
            }
            other => panic!("expected a served response, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_push_and_click_flow() {
        let (mut agent, _fetcher, _db) = test_agent("v1", &[]).await;

        let reply = agent.handle_event(HostEvent::Push { data: None }).await;
        match reply {
            AgentReply::Notification(notification) => assert_eq!(notification.body, DEFAULT_NOTIFICATION_BODY),
            other => panic!("expected a notification, got {other:?}"),
        }

        let reply = agent
            .handle_event(HostEvent::NotificationClick { action: Some("view".into()) })
            .await;
        match reply {
            AgentReply::Navigate(navigate) => {
                assert_eq!(navigate.url, "https://app.example.com/notifications.html");
            }
            other => panic!("expected navigation, got {other:?}"),
        }
    }
}
