//! Configuration schema for Memaster
//!
//! Configuration is stored at `~/.config/memaster/config.toml`

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Cache generation shipped with this build
pub const DEFAULT_VERSION: &str = "memaster-v1.4.0";

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Offline agent settings
    pub agent: AgentConfig,

    /// Network fetch settings
    pub network: NetworkConfig,

    /// Push notification settings
    pub notifications: NotificationConfig,

    /// On-disk state settings
    pub storage: StorageConfig,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Enable verbose logging
    pub verbose: bool,

    /// Log format: "text" or "json"
    pub log_format: String,

    /// Append lifecycle events to the journal
    pub journal: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            log_format: "text".to_string(),
            journal: true,
        }
    }
}

/// Offline agent configuration
///
/// Changing `precache` requires bumping `version`, otherwise clients keep
/// serving the old generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Cache generation name
    pub version: String,

    /// Base URL that relative entries resolve against (also the app origin)
    pub scope: String,

    /// Resources fetched and stored at install time
    pub precache: Vec<String>,

    /// Document served to navigations when both cache and network fail
    pub fallback_document: String,

    /// Background sync tag the agent recognizes
    pub sync_tag: String,

    /// Message `type` that forces the agent to skip waiting
    pub skip_waiting_message: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            version: DEFAULT_VERSION.to_string(),
            scope: "http://localhost:8080/".to_string(),
            precache: vec![
                "./".to_string(),
                "./index.html".to_string(),
                "./manifest.json".to_string(),
                "https://cdnjs.cloudflare.com/ajax/libs/font-awesome/6.0.0/css/all.min.css"
                    .to_string(),
                "/?source=pwa".to_string(),
                "/?homescreen=1".to_string(),
            ],
            fallback_document: "./index.html".to_string(),
            sync_tag: "background-sync-tasks".to_string(),
            skip_waiting_message: "SKIP_WAITING".to_string(),
        }
    }
}

/// Network fetch configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Overall request timeout in seconds, body download included (0 = no timeout).
    /// This stands in for the network stack's own timeout; the agent adds none.
    pub timeout_secs: u64,

    /// Follow HTTP redirects
    pub follow_redirects: bool,

    /// User-Agent header sent with every request
    pub user_agent: String,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            follow_redirects: true,
            user_agent: format!("memaster/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Push notification configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    /// Notification title
    pub title: String,

    /// Body used when the push carries no payload
    pub default_body: String,

    /// Icon URL
    pub icon: String,

    /// Badge URL
    pub badge: String,

    /// Vibration pattern in milliseconds
    pub vibrate: Vec<u32>,

    /// Action identifier that opens the app
    pub open_action: String,

    /// URL opened for `open_action`
    pub open_url: String,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            title: "Memaster".to_string(),
            default_body: "Task reminder from Memaster".to_string(),
            icon: "./manifest.json".to_string(),
            badge: "./manifest.json".to_string(),
            vibrate: vec![100, 50, 100],
            open_action: "view".to_string(),
            open_url: "./".to_string(),
        }
    }
}

/// On-disk state configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Override the platform state directory
    pub state_dir: Option<PathBuf>,
}
