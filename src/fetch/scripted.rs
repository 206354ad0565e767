//! Fetcher with canned routes
//!
//! Unrouted URLs fail as if the network were down, so an empty
//! `ScriptedFetcher` is a fully offline network.

use super::Fetcher;
use crate::error::{AgentError, AgentResult};
use crate::http::{Request, Response};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use url::Url;

#[derive(Debug, Clone)]
enum Route {
    Respond(Response),
    Fail(String),
}

/// Fetcher answering from a fixed route table and recording every call
#[derive(Debug, Default)]
pub struct ScriptedFetcher {
    routes: Mutex<HashMap<String, Route>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedFetcher {
    /// A fetcher with no routes (every request fails)
    pub fn offline() -> Self {
        Self::default()
    }

    /// Answer `url` with `response`
    pub fn with_response(self, url: &Url, response: Response) -> Self {
        self.route(url, response);
        self
    }

    /// Fail `url` with a network error
    pub fn with_failure(self, url: &Url, reason: &str) -> Self {
        self.lock_routes()
            .insert(route_key(url), Route::Fail(reason.to_string()));
        self
    }

    /// Add or replace a route
    pub fn route(&self, url: &Url, response: Response) {
        self.lock_routes()
            .insert(route_key(url), Route::Respond(response));
    }

    /// URLs fetched so far, in call order
    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Number of fetches performed
    pub fn call_count(&self) -> usize {
        self.calls().len()
    }

    fn lock_routes(&self) -> std::sync::MutexGuard<'_, HashMap<String, Route>> {
        self.routes
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn route_key(url: &Url) -> String {
    let mut url = url.clone();
    url.set_fragment(None);
    url.to_string()
}

#[async_trait]
impl Fetcher for ScriptedFetcher {
    async fn fetch(&self, request: &Request) -> AgentResult<Response> {
        let key = route_key(&request.url);
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(key.clone());

        let route = self.lock_routes().get(&key).cloned();
        match route {
            Some(Route::Respond(response)) => Ok(response),
            Some(Route::Fail(reason)) => Err(AgentError::network(key, reason)),
            None => Err(AgentError::network(key, "network unreachable (offline)")),
        }
    }

    fn fetcher_name(&self) -> &'static str {
        "scripted"
    }
}
