//! Error types for Memaster
//!
//! All modules use `AgentResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for agent operations
pub type AgentResult<T> = Result<T, AgentError>;

/// All errors that can occur in the offline agent
#[derive(Error, Debug)]
pub enum AgentError {
    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    // Network errors
    #[error("Network request to {url} failed: {reason}")]
    Network { url: String, reason: String },

    #[error("Precache of {url} returned status {status}")]
    PrecacheStatus { url: String, status: u16 },

    // Cache errors
    #[error("Cache rejected request: {0}")]
    CacheRejected(String),

    #[error("Cache store {name} failed: {reason}")]
    CacheStore { name: String, reason: String },

    #[error("Corrupt cache entry {path}: {reason}")]
    CacheCorrupt { path: PathBuf, reason: String },

    #[error("Cache store not found: {0}")]
    CacheNotFound(String),

    // Host errors
    #[error("Host operation failed: {0}")]
    Host(String),

    #[error("Notification not found: {0}")]
    NotificationNotFound(String),

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    // General errors
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("{0}")]
    User(String),
}

impl AgentError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a network error for a URL
    pub fn network(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Network {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid URL error
    pub fn invalid_url(url: impl Into<String>, reason: impl ToString) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    /// Whether this error means the network could not be reached
    pub fn is_offline(&self) -> bool {
        matches!(self, Self::Network { .. })
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::Network { .. } => Some("Check your connection, or retry with --offline"),
            Self::PrecacheStatus { .. } => {
                Some("Every precache entry must be reachable; fix the URL or bump agent.version")
            }
            Self::InvalidUrl { .. } => Some("Check agent.scope and agent.precache in the config"),
            Self::CacheCorrupt { .. } => Some("Run: memaster cache clear"),
            Self::CacheNotFound(_) => Some("Run: memaster cache list"),
            Self::Host(_) => Some("Delete the host state file to reset lifecycle state"),
            _ => None,
        }
    }
}
