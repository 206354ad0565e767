//! Host runtime abstraction
//!
//! Everything the agent asks of its hosting runtime that is not cache or
//! network: lifecycle promotion, client control, notifications, windows.

use crate::error::{AgentError, AgentResult};
use crate::notification::NotificationOptions;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tokio::fs;
use tracing::{debug, info};
use url::Url;

/// Operations the hosting runtime provides to the agent
#[async_trait]
pub trait Host: Send + Sync {
    /// Activate this agent without waiting for existing pages to close
    async fn skip_waiting(&self) -> AgentResult<()>;

    /// Take control of every open client immediately
    async fn claim_clients(&self) -> AgentResult<()>;

    /// Display a notification
    async fn show_notification(&self, title: &str, options: &NotificationOptions)
        -> AgentResult<()>;

    /// Dismiss a notification by tag
    async fn close_notification(&self, tag: &str) -> AgentResult<()>;

    /// Open (or focus) a client window at `url`
    async fn open_window(&self, url: &Url) -> AgentResult<()>;
}

/// A notification the host has displayed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShownNotification {
    pub title: String,
    pub options: NotificationOptions,
    pub shown_at: DateTime<Utc>,
    pub closed: bool,
}

/// Side effects the host has performed so far
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostState {
    pub skip_waiting_at: Option<DateTime<Utc>>,
    pub clients_claimed_at: Option<DateTime<Utc>>,
    pub notifications: Vec<ShownNotification>,
    pub opened_windows: Vec<String>,
}

impl HostState {
    /// Notifications that have not been closed
    pub fn open_notifications(&self) -> impl Iterator<Item = &ShownNotification> {
        self.notifications.iter().filter(|n| !n.closed)
    }

    /// Find a notification by tag
    pub fn notification(&self, tag: &str) -> Option<&ShownNotification> {
        self.notifications.iter().find(|n| n.options.tag == tag)
    }

    fn close(&mut self, tag: &str) -> AgentResult<()> {
        let shown = self
            .notifications
            .iter_mut()
            .find(|n| n.options.tag == tag)
            .ok_or_else(|| AgentError::NotificationNotFound(tag.to_string()))?;
        shown.closed = true;
        Ok(())
    }

    fn show(&mut self, title: &str, options: &NotificationOptions) {
        self.notifications.push(ShownNotification {
            title: title.to_string(),
            options: options.clone(),
            shown_at: Utc::now(),
            closed: false,
        });
    }
}

/// Host that keeps its state in memory
#[derive(Debug, Default)]
pub struct RecordingHost {
    state: Mutex<HostState>,
}

impl RecordingHost {
    /// Create a host with empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the recorded state
    pub fn state(&self) -> HostState {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HostState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl Host for RecordingHost {
    async fn skip_waiting(&self) -> AgentResult<()> {
        self.lock().skip_waiting_at = Some(Utc::now());
        Ok(())
    }

    async fn claim_clients(&self) -> AgentResult<()> {
        self.lock().clients_claimed_at = Some(Utc::now());
        Ok(())
    }

    async fn show_notification(
        &self,
        title: &str,
        options: &NotificationOptions,
    ) -> AgentResult<()> {
        self.lock().show(title, options);
        Ok(())
    }

    async fn close_notification(&self, tag: &str) -> AgentResult<()> {
        self.lock().close(tag)
    }

    async fn open_window(&self, url: &Url) -> AgentResult<()> {
        self.lock().opened_windows.push(url.to_string());
        Ok(())
    }
}

/// Host that persists its state to a JSON file
///
/// Successive CLI invocations share lifecycle state through this file.
#[derive(Debug, Clone)]
pub struct FileHost {
    path: PathBuf,
}

impl FileHost {
    /// Create a host backed by `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the state file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted state (empty if the file does not exist)
    pub async fn load(&self) -> AgentResult<HostState> {
        if !self.path.exists() {
            return Ok(HostState::default());
        }

        let content = fs::read_to_string(&self.path).await.map_err(|e| {
            AgentError::io(format!("reading host state {}", self.path.display()), e)
        })?;
        serde_json::from_str(&content).map_err(|e| {
            AgentError::Host(format!("corrupt state file {}: {}", self.path.display(), e))
        })
    }

    async fn save(&self, state: &HostState) -> AgentResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| AgentError::io("creating host state directory", e))?;
        }

        let json = serde_json::to_string_pretty(state)?;
        fs::write(&self.path, json).await.map_err(|e| {
            AgentError::io(format!("writing host state {}", self.path.display()), e)
        })?;

        debug!("Saved host state to {}", self.path.display());
        Ok(())
    }

    async fn update<F>(&self, apply: F) -> AgentResult<()>
    where
        F: FnOnce(&mut HostState) -> AgentResult<()> + Send,
    {
        let mut state = self.load().await?;
        apply(&mut state)?;
        self.save(&state).await
    }
}

#[async_trait]
impl Host for FileHost {
    async fn skip_waiting(&self) -> AgentResult<()> {
        info!("Skipping waiting phase");
        self.update(|s| {
            s.skip_waiting_at = Some(Utc::now());
            Ok(())
        })
        .await
    }

    async fn claim_clients(&self) -> AgentResult<()> {
        info!("Claiming clients");
        self.update(|s| {
            s.clients_claimed_at = Some(Utc::now());
            Ok(())
        })
        .await
    }

    async fn show_notification(
        &self,
        title: &str,
        options: &NotificationOptions,
    ) -> AgentResult<()> {
        info!("Showing notification {}: {}", options.tag, options.body);
        self.update(|s| {
            s.show(title, options);
            Ok(())
        })
        .await
    }

    async fn close_notification(&self, tag: &str) -> AgentResult<()> {
        self.update(|s| s.close(tag)).await
    }

    async fn open_window(&self, url: &Url) -> AgentResult<()> {
        info!("Opening window at {}", url);
        self.update(|s| {
            s.opened_windows.push(url.to_string());
            Ok(())
        })
        .await
    }
}
