//! The interception boundary with the host environment.
//!
//! The agent handles exactly three event classes: resource requests (produce
//! a response or decline), push-message delivery (produce a notification),
//! and notification interaction (produce a follow-up navigation). Lifecycle
//! events (install, activate) arrive over the same channel.
//!
//! Events and replies travel as newline-delimited JSON, tagged by the
//! `event` / `reply` field.

use serde::{Deserialize, Serialize};

use crate::lifecycle::{ActivateOutcome, InstallOutcome};
use crate::notify::Notification;
use crate::response::FetchReply;

/// Resource type of an intercepted request, as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Destination {
    Document,
    Script,
    Style,
    Image,
    Font,
    #[default]
    Other,
}

/// An intercepted resource request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchRequest {
    /// HTTP method. Anything but GET passes through untouched.
    pub method: String,

    /// Request URL, absolute or path-relative to the app origin.
    pub url: String,

    /// Resource type; hosts that cannot classify send nothing.
    #[serde(default)]
    pub destination: Destination,
}

/// Events delivered by the host environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "lowercase")]
pub enum HostEvent {
    /// A new generation was deployed; run the precache loader.
    Install,

    /// Cut over: retire stale generations and claim open sessions.
    Activate,

    /// An intercepted resource request.
    Fetch(FetchRequest),

    /// A push message, with an optional text payload.
    Push {
        #[serde(default)]
        data: Option<String>,
    },

    /// The user interacted with a displayed notification.
    NotificationClick {
        #[serde(default)]
        action: Option<String>,
    },
}

/// Follow-up navigation produced by a notification interaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigateReply {
    pub url: String,
}

/// Replies sent back to the host.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "reply", rename_all = "lowercase")]
pub enum AgentReply {
    Installed(InstallOutcome),

    #[serde(rename = "install_failed")]
    InstallFailed { error: String },

    Activated(ActivateOutcome),

    Fetch(FetchReply),

    Notification(Notification),

    Navigate(NavigateReply),

    Error { message: String },
}
