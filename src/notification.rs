//! Notification descriptors shown for push messages

use crate::config::schema::NotificationConfig;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A button shown on a notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationAction {
    pub action: String,
    pub title: String,
    pub icon: String,
}

/// Application data carried by a notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationData {
    /// Milliseconds since the Unix epoch
    pub date_of_arrival: i64,
    pub primary_key: u32,
}

/// Options passed to the host when showing a notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationOptions {
    /// Identifies the notification for later clicks and closes
    pub tag: String,
    pub body: String,
    pub icon: String,
    pub badge: String,
    pub vibrate: Vec<u32>,
    pub data: NotificationData,
    pub actions: Vec<NotificationAction>,
}

impl NotificationOptions {
    /// Build the descriptor for a push, using the default body when the
    /// push carried no payload
    pub fn for_push(config: &NotificationConfig, payload: Option<&str>, now: DateTime<Utc>) -> Self {
        let body = payload
            .map(str::to_string)
            .unwrap_or_else(|| config.default_body.clone());

        Self {
            tag: Uuid::new_v4().to_string(),
            body,
            icon: config.icon.clone(),
            badge: config.badge.clone(),
            vibrate: config.vibrate.clone(),
            data: NotificationData {
                date_of_arrival: now.timestamp_millis(),
                primary_key: 1,
            },
            actions: vec![
                NotificationAction {
                    action: config.open_action.clone(),
                    title: format!("Open {}", config.title),
                    icon: config.icon.clone(),
                },
                NotificationAction {
                    action: "close".to_string(),
                    title: "Close".to_string(),
                    icon: config.icon.clone(),
                },
            ],
        }
    }
}
