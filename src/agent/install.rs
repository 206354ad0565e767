//! Install handler: pre-populate the current generation

use super::OfflineAgent;
use crate::error::{AgentError, AgentResult};
use crate::http::{CacheMode, Request, Response};
use futures_util::future::try_join_all;
use serde::Serialize;
use tracing::{error, info};
use url::Url;

/// Result of a successful install
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstallReport {
    /// Generation that was populated
    pub version: String,
    /// Entries stored, in precache order
    pub cached: Vec<Url>,
}

/// Receives progress while the precache list is being fetched
///
/// Fetches run concurrently, so `fetched` arrives in completion order.
pub trait PrecacheObserver: Send + Sync {
    /// Called once before any entry is requested
    fn started(&self, _total: usize) {}

    /// Called when an entry's response has arrived and passed the status check
    fn fetched(&self, _url: &Url) {}
}

impl PrecacheObserver for () {}

impl OfflineAgent {
    /// Open the current generation, store every precache entry, then ask
    /// the host to skip the waiting phase.
    ///
    /// Every entry is fetched with reload semantics so stale intermediate
    /// copies are never captured. If any fetch fails (or answers non-2xx)
    /// nothing is stored and the error is returned; a storage failure
    /// midway leaves the generation partially populated.
    pub async fn install(&self) -> AgentResult<InstallReport> {
        self.install_observed(&()).await
    }

    /// [`install`](Self::install), reporting each precache entry as it lands
    pub async fn install_observed(
        &self,
        observer: &dyn PrecacheObserver,
    ) -> AgentResult<InstallReport> {
        info!("Installing {}", self.settings.version);

        match self.populate(observer).await {
            Ok(report) => {
                info!(
                    "Installation complete: {} entries cached",
                    report.cached.len()
                );
                self.host.skip_waiting().await?;
                Ok(report)
            }
            Err(e) => {
                error!("Installation failed: {}", e);
                Err(e)
            }
        }
    }

    async fn populate(&self, observer: &dyn PrecacheObserver) -> AgentResult<InstallReport> {
        let version = &self.settings.version;
        self.storage.open(version).await?;

        let requests: Vec<Request> = self
            .settings
            .precache
            .iter()
            .map(|url| Request::get(url.clone()).with_cache_mode(CacheMode::Reload))
            .collect();

        info!("Caching {} app files", requests.len());
        observer.started(requests.len());
        let responses =
            try_join_all(requests.iter().map(|r| self.precache_fetch(r, observer))).await?;

        for (request, response) in requests.iter().zip(&responses) {
            self.storage.put(version, request, response).await?;
        }

        Ok(InstallReport {
            version: version.clone(),
            cached: requests.into_iter().map(|r| r.url).collect(),
        })
    }

    async fn precache_fetch(
        &self,
        request: &Request,
        observer: &dyn PrecacheObserver,
    ) -> AgentResult<Response> {
        let response = self.fetcher.fetch(request).await?;
        if !response.ok() {
            return Err(AgentError::PrecacheStatus {
                url: request.url.to_string(),
                status: response.status,
            });
        }
        observer.fetched(&request.url);
        Ok(response)
    }
}
