//! Agent configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (SHLTR_*)
//! 2. TOML config file (if SHLTR_CONFIG_FILE set)
//! 3. Built-in defaults
//!
//! The current generation tag lives here by design: it is injected at
//! startup and never computed from content, so bumping it stays an explicit
//! deploy-time action.

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::manifest::Manifest;
use crate::version::Generation;

mod validation;

pub use validation::ConfigError;

/// Agent configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (SHLTR_*)
/// 2. TOML config file (if SHLTR_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Current cache generation tag. Bump on every deploy that changes the
    /// manifest or strategy.
    ///
    /// Set via SHLTR_GENERATION environment variable.
    #[serde(default = "default_generation")]
    pub generation: String,

    /// Origin the application is served from. Requests to this origin are
    /// classified same-origin; manifest paths resolve against it.
    ///
    /// Set via SHLTR_ORIGIN environment variable.
    #[serde(default = "default_origin")]
    pub origin: String,

    /// Path to SQLite cache database.
    ///
    /// Set via SHLTR_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// User-Agent string for HTTP requests.
    ///
    /// Set via SHLTR_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Maximum bytes to fetch per request.
    ///
    /// Set via SHLTR_MAX_BYTES environment variable.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,

    /// HTTP request timeout in milliseconds.
    ///
    /// Set via SHLTR_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Ordered precache manifest: assets required for offline bootstrap.
    ///
    /// Set via SHLTR_PRECACHE environment variable or a config file.
    #[serde(default = "default_precache")]
    pub precache: Vec<String>,

    /// Navigation fallback page served for document requests that miss the
    /// cache while the network is down.
    ///
    /// Set via SHLTR_BOOTSTRAP_URL environment variable.
    #[serde(default = "default_bootstrap_url")]
    pub bootstrap_url: String,

    /// Page opened when a notification is clicked.
    ///
    /// Set via SHLTR_NOTIFICATIONS_URL environment variable.
    #[serde(default = "default_notifications_url")]
    pub notifications_url: String,

    /// Title shown on push notifications.
    ///
    /// Set via SHLTR_NOTIFICATION_TITLE environment variable.
    #[serde(default = "default_notification_title")]
    pub notification_title: String,

    /// Icon asset shown on push notifications.
    ///
    /// Set via SHLTR_NOTIFICATION_ICON environment variable.
    #[serde(default = "default_notification_icon")]
    pub notification_icon: String,

    /// Badge asset shown on push notifications.
    ///
    /// Set via SHLTR_NOTIFICATION_BADGE environment variable.
    #[serde(default = "default_notification_badge")]
    pub notification_badge: String,
}

fn default_generation() -> String {
    "v1".into()
}

fn default_origin() -> String {
    "https://app.invalid".into()
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./shltr-cache.sqlite")
}

fn default_user_agent() -> String {
    "shltr/0.1".into()
}

fn default_max_bytes() -> usize {
    5_242_880 // 5MB
}

fn default_timeout_ms() -> u64 {
    20_000
}

fn default_precache() -> Vec<String> {
    vec!["index.html".into(), "main.css".into(), "manifest.json".into()]
}

fn default_bootstrap_url() -> String {
    "index.html".into()
}

fn default_notifications_url() -> String {
    "notifications.html".into()
}

fn default_notification_title() -> String {
    "Application update".into()
}

fn default_notification_icon() -> String {
    "images/logo.png".into()
}

fn default_notification_badge() -> String {
    "images/badge.png".into()
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            generation: default_generation(),
            origin: default_origin(),
            db_path: default_db_path(),
            user_agent: default_user_agent(),
            max_bytes: default_max_bytes(),
            timeout_ms: default_timeout_ms(),
            precache: default_precache(),
            bootstrap_url: default_bootstrap_url(),
            notifications_url: default_notifications_url(),
            notification_title: default_notification_title(),
            notification_icon: default_notification_icon(),
            notification_badge: default_notification_badge(),
        }
    }
}

impl AgentConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// The configured generation as a typed tag.
    pub fn current_generation(&self) -> Generation {
        Generation::new(self.generation.clone())
    }

    /// The precache manifest in declaration order.
    pub fn manifest(&self) -> Manifest {
        Manifest::new(self.precache.clone())
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `SHLTR_`
    /// 2. TOML file from `SHLTR_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("SHLTR_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("SHLTR_")
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}
