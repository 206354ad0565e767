//! The offline caching agent
//!
//! One agent instance owns one cache generation (its version tag) and
//! reacts to lifecycle events:
//!
//! - **install**: pre-populate the generation, then skip waiting
//! - **activate**: delete every other generation, then claim clients
//! - **fetch**: cache first, network second, offline fallback last
//! - **sync / push / notification click / message**: thin host pass-throughs
//!
//! Cache storage, network and host are injected, so every handler can run
//! against in-memory fakes.

mod activate;
mod event;
#[cfg(test)]
mod fixture;
mod install;
mod intercept;
mod passive;
mod tasks;

pub use activate::ActivateReport;
pub use event::{Event, EventKind, Outcome};
pub use install::{InstallReport, PrecacheObserver};
pub use intercept::{Interception, ResponseSource};
pub use tasks::BackgroundTasks;

use crate::cache::CacheStorage;
use crate::config::schema::{Config, NotificationConfig};
use crate::error::{AgentError, AgentResult};
use crate::fetch::Fetcher;
use crate::host::Host;
use crate::http::resolve;
use std::sync::Arc;
use tracing::info;
use url::Url;

/// Resolved, validated agent settings
#[derive(Debug, Clone)]
pub struct AgentSettings {
    /// Cache generation this agent reads and writes
    pub version: String,
    /// Base URL and page origin
    pub scope: Url,
    /// Resources stored at install time
    pub precache: Vec<Url>,
    /// Document served to offline navigations
    pub fallback_document: Url,
    /// Recognized background sync tag
    pub sync_tag: String,
    /// Message type that triggers skip-waiting
    pub skip_waiting_message: String,
    /// Push notification settings
    pub notifications: NotificationConfig,
    /// URL opened by the notification open action
    pub open_url: Url,
}

impl AgentSettings {
    /// Resolve every configured URL against the scope
    pub fn from_config(config: &Config) -> AgentResult<Self> {
        let agent = &config.agent;
        let scope =
            Url::parse(&agent.scope).map_err(|e| AgentError::invalid_url(&agent.scope, e))?;
        if scope.cannot_be_a_base() {
            return Err(AgentError::invalid_url(
                &agent.scope,
                "scope must be a hierarchical URL",
            ));
        }

        let precache = agent
            .precache
            .iter()
            .map(|entry| resolve(&scope, entry))
            .collect::<AgentResult<Vec<_>>>()?;

        if agent.version.trim().is_empty() {
            return Err(AgentError::User("agent.version must not be empty".to_string()));
        }

        Ok(Self {
            version: agent.version.clone(),
            fallback_document: resolve(&scope, &agent.fallback_document)?,
            open_url: resolve(&scope, &config.notifications.open_url)?,
            precache,
            sync_tag: agent.sync_tag.clone(),
            skip_waiting_message: agent.skip_waiting_message.clone(),
            notifications: config.notifications.clone(),
            scope,
        })
    }
}

/// Offline caching agent
pub struct OfflineAgent {
    settings: AgentSettings,
    storage: Arc<dyn CacheStorage>,
    fetcher: Arc<dyn Fetcher>,
    host: Arc<dyn Host>,
    tasks: BackgroundTasks,
}

impl OfflineAgent {
    /// Create an agent over the given collaborators
    pub fn new(
        settings: AgentSettings,
        storage: Arc<dyn CacheStorage>,
        fetcher: Arc<dyn Fetcher>,
        host: Arc<dyn Host>,
    ) -> Self {
        info!(
            "Agent {} loaded ({} storage, {} fetcher)",
            settings.version,
            storage.backend_name(),
            fetcher.fetcher_name()
        );
        Self {
            settings,
            storage,
            fetcher,
            host,
            tasks: BackgroundTasks::new(),
        }
    }

    /// Agent settings
    pub fn settings(&self) -> &AgentSettings {
        &self.settings
    }

    /// Current cache generation name
    pub fn version(&self) -> &str {
        &self.settings.version
    }

    /// The cache storage this agent uses
    pub fn storage(&self) -> &Arc<dyn CacheStorage> {
        &self.storage
    }

    /// Number of detached cache writes still outstanding
    pub fn pending_writes(&self) -> usize {
        self.tasks.pending()
    }

    /// Wait for every detached cache write to finish
    pub async fn settle(&self) -> usize {
        self.tasks.settle().await
    }
}
