//! Fetch interception: cache first, then network, then offline fallback

use super::OfflineAgent;
use crate::http::{Method, Request, Response};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

/// Where an intercepted response came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case", tag = "source")]
pub enum ResponseSource {
    /// Found in a cache generation; no network call was made
    Cache,
    /// Fetched from the network; `stored` if a cache write was scheduled
    Network { stored: bool },
    /// Network failed on a navigation; the cached fallback document
    FallbackDocument,
    /// Network failed; the synthetic 503
    Unavailable,
}

/// Result of intercepting a request
#[derive(Debug, Clone, PartialEq)]
pub enum Interception {
    /// Not intercepted; the host handles the request itself
    Passthrough,
    /// The agent answered the request
    Respond {
        response: Response,
        source: ResponseSource,
    },
}

impl Interception {
    fn respond(response: Response, source: ResponseSource) -> Self {
        Self::Respond { response, source }
    }

    /// The response, unless the request was passed through
    pub fn response(&self) -> Option<&Response> {
        match self {
            Self::Passthrough => None,
            Self::Respond { response, .. } => Some(response),
        }
    }

    /// The response source, unless the request was passed through
    pub fn source(&self) -> Option<ResponseSource> {
        match self {
            Self::Passthrough => None,
            Self::Respond { source, .. } => Some(*source),
        }
    }
}

impl OfflineAgent {
    /// Answer a request from a controlled page.
    ///
    /// Never fails: every error path ends in a cached document or the
    /// synthetic 503. Non-HTTP(S) requests are passed through untouched.
    pub async fn handle_fetch(&self, request: Request) -> Interception {
        if !request.is_http() {
            debug!("Not intercepting {} request {}", request.url.scheme(), request.url);
            return Interception::Passthrough;
        }

        match self.storage.match_any(&request).await {
            Ok(Some(cached)) => {
                debug!("Serving from cache {}", request.url);
                return Interception::respond(cached, ResponseSource::Cache);
            }
            Ok(None) => {}
            Err(e) => {
                warn!("Cache lookup for {} failed: {}", request.url, e);
                return self.offline_fallback(&request).await;
            }
        }

        match self.fetcher.fetch(&request).await {
            Ok(response) => {
                let stored = response.is_cacheable() && request.method == Method::Get;
                if stored {
                    self.store_detached(request, response.clone());
                } else {
                    debug!(
                        "Not caching {} {} (status {}, {:?})",
                        request.method, request.url, response.status, response.response_type
                    );
                }
                Interception::respond(response, ResponseSource::Network { stored })
            }
            Err(e) => {
                debug!("Network fetch for {} failed: {}", request.url, e);
                self.offline_fallback(&request).await
            }
        }
    }

    /// Write a response to the current generation without blocking the
    /// caller; failures are logged and otherwise ignored.
    fn store_detached(&self, request: Request, response: Response) {
        let storage = Arc::clone(&self.storage);
        let version = self.settings.version.clone();

        self.tasks.spawn(async move {
            match storage.put(&version, &request, &response).await {
                Ok(()) => debug!("Cached {} in {}", request.url, version),
                Err(e) => warn!("Cache write for {} failed: {}", request.url, e),
            }
        });
    }

    async fn offline_fallback(&self, request: &Request) -> Interception {
        if request.is_navigation() {
            let fallback = Request::get(self.settings.fallback_document.clone());
            match self.storage.match_any(&fallback).await {
                Ok(Some(document)) => {
                    debug!("Offline navigation to {}, serving {}", request.url, fallback.url);
                    return Interception::respond(document, ResponseSource::FallbackDocument);
                }
                Ok(None) => warn!("Fallback document {} is not cached", fallback.url),
                Err(e) => warn!("Fallback lookup failed: {}", e),
            }
        }

        Interception::respond(Response::service_unavailable(), ResponseSource::Unavailable)
    }
}
