//! Sync, push, notification-click and message handlers

use super::OfflineAgent;
use crate::error::AgentResult;
use crate::notification::NotificationOptions;
use chrono::Utc;
use serde_json::Value;
use tracing::{debug, info};
use url::Url;

impl OfflineAgent {
    /// Handle a background sync. Returns whether the tag was recognized.
    pub fn sync(&self, tag: &str) -> bool {
        if tag == self.settings.sync_tag {
            info!("Background sync triggered");
            true
        } else {
            debug!("Ignoring sync tag {}", tag);
            false
        }
    }

    /// Show a notification for a push message
    pub async fn push(&self, payload: Option<&str>) -> AgentResult<NotificationOptions> {
        info!("Push notification received");
        let options = NotificationOptions::for_push(&self.settings.notifications, payload, Utc::now());
        self.host
            .show_notification(&self.settings.notifications.title, &options)
            .await?;
        Ok(options)
    }

    /// Close the clicked notification; the open action also opens the app.
    /// Returns the URL of the opened window, if any.
    pub async fn notification_click(
        &self,
        tag: &str,
        action: Option<&str>,
    ) -> AgentResult<Option<Url>> {
        info!("Notification clicked");
        self.host.close_notification(tag).await?;

        if action == Some(self.settings.notifications.open_action.as_str()) {
            self.host.open_window(&self.settings.open_url).await?;
            return Ok(Some(self.settings.open_url.clone()));
        }
        Ok(None)
    }

    /// Handle a message from a page. `{"type": "SKIP_WAITING"}` promotes
    /// the agent immediately; everything else is ignored. Returns whether
    /// the message was recognized.
    pub async fn message(&self, payload: &Value) -> AgentResult<bool> {
        let recognized = payload.get("type").and_then(Value::as_str)
            == Some(self.settings.skip_waiting_message.as_str());

        if recognized {
            info!("Skip-waiting requested by page");
            self.host.skip_waiting().await?;
        } else {
            debug!("Ignoring message {}", payload);
        }
        Ok(recognized)
    }
}
