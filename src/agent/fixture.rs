//! Agent wired to in-memory collaborators for unit tests

use super::{AgentSettings, OfflineAgent};
use crate::cache::MemoryCacheStorage;
use crate::config::Config;
use crate::fetch::ScriptedFetcher;
use crate::host::RecordingHost;
use crate::http::{Response, ResponseType};
use std::sync::Arc;
use url::Url;

pub(super) struct Fixture {
    pub agent: OfflineAgent,
    pub storage: MemoryCacheStorage,
    pub fetcher: Arc<ScriptedFetcher>,
    pub host: Arc<RecordingHost>,
}

impl Fixture {
    /// Agent with default settings and the given network
    pub fn new(fetcher: ScriptedFetcher) -> Self {
        Self::with_config(&Config::default(), fetcher)
    }

    pub fn with_config(config: &Config, fetcher: ScriptedFetcher) -> Self {
        let settings = AgentSettings::from_config(config).unwrap();
        let storage = MemoryCacheStorage::new();
        let fetcher = Arc::new(fetcher);
        let host = Arc::new(RecordingHost::new());
        let agent = OfflineAgent::new(
            settings,
            Arc::new(storage.clone()),
            fetcher.clone(),
            host.clone(),
        );
        Self {
            agent,
            storage,
            fetcher,
            host,
        }
    }

    /// Resolve a reference against the default scope
    pub fn url(&self, reference: &str) -> Url {
        self.agent.settings().scope.join(reference).unwrap()
    }
}

/// A same-origin 200 response
pub(super) fn page(body: &str) -> Response {
    Response::new(200, body).with_type(ResponseType::Basic)
}

/// A network where every precache entry answers 200
pub(super) fn precache_network() -> ScriptedFetcher {
    let settings = AgentSettings::from_config(&Config::default()).unwrap();
    let fetcher = ScriptedFetcher::offline();
    for url in &settings.precache {
        fetcher.route(url, page(&format!("content of {}", url)));
    }
    fetcher
}
