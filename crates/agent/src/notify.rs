//! Push notifications and notification interaction.
//!
//! A push message produces a user-visible notification; a notification
//! interaction produces a navigation to the notifications page, regardless
//! of which action was chosen or whether the body itself was clicked.

use serde::{Deserialize, Serialize};
use shltr_core::AgentConfig;

/// Body shown when a push message carries no payload.
pub const DEFAULT_NOTIFICATION_BODY: &str = "You have a new notification.";

/// Vibration pattern for incoming notifications.
const VIBRATE_PATTERN: [u32; 3] = [100, 50, 100];

/// A user action offered on a notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationAction {
    pub action: String,
    pub title: String,
    pub icon: String,
}

/// A user-visible notification produced from a push message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub icon: String,
    pub badge: String,
    pub vibrate: Vec<u32>,
    pub actions: Vec<NotificationAction>,
}

/// Build the notification for a push message.
pub fn for_push(config: &AgentConfig, payload: Option<String>) -> Notification {
    Notification {
        title: config.notification_title.clone(),
        body: payload.unwrap_or_else(|| DEFAULT_NOTIFICATION_BODY.to_string()),
        icon: config.notification_icon.clone(),
        badge: config.notification_badge.clone(),
        vibrate: VIBRATE_PATTERN.to_vec(),
        actions: vec![
            NotificationAction {
                action: "view".to_string(),
                title: "View".to_string(),
                icon: config.notification_icon.clone(),
            },
            NotificationAction {
                action: "close".to_string(),
                title: "Close".to_string(),
                icon: config.notification_icon.clone(),
            },
        ],
    }
}
