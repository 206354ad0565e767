//! CLI command implementations
//!
//! Every command that drives the agent builds it over the on-disk cache,
//! the file-backed host state and either the real network or a network
//! that is always down.

pub mod activate;
pub mod cache;
pub mod config;
pub mod fetch;
pub mod install;
pub mod lifecycle;
pub mod status;

pub use activate::execute as activate;
pub use cache::execute as cache;
pub use config::execute as config;
pub use fetch::execute as fetch;
pub use install::execute as install;
pub use lifecycle::{click, message, push, sync};
pub use status::execute as status;

use crate::agent::{AgentSettings, OfflineAgent};
use crate::cache::DiskCacheStorage;
use crate::config::{Config, ConfigManager};
use crate::error::AgentResult;
use crate::fetch::{Fetcher, HttpFetcher, ScriptedFetcher};
use crate::host::FileHost;
use std::sync::Arc;

/// Which network the agent talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Network {
    Online,
    Offline,
}

/// Build an agent over the configured state directory
pub(crate) fn build_agent(config: &Config, network: Network) -> AgentResult<OfflineAgent> {
    let settings = AgentSettings::from_config(config)?;

    let fetcher: Arc<dyn Fetcher> = match network {
        Network::Online => Arc::new(HttpFetcher::new(settings.scope.clone(), &config.network)),
        Network::Offline => Arc::new(ScriptedFetcher::offline()),
    };

    Ok(OfflineAgent::new(
        settings,
        Arc::new(DiskCacheStorage::new(ConfigManager::caches_dir(config))),
        fetcher,
        Arc::new(FileHost::new(ConfigManager::host_state_path(config))),
    ))
}
