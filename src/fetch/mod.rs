//! Network fetch abstraction
//!
//! The agent never talks to the network directly; it goes through a
//! [`Fetcher`], so tests and `--offline` runs can swap in canned routes.

mod http;
mod scripted;

pub use self::http::HttpFetcher;
pub use scripted::ScriptedFetcher;

use crate::error::AgentResult;
use crate::http::{same_origin, Request, RequestMode, Response, ResponseType};
use async_trait::async_trait;
use url::Url;

/// Performs network requests on behalf of the agent
///
/// An `Err` means the request never produced a response (offline, DNS,
/// refused connection). HTTP error statuses are returned as `Ok`.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Issue the request and return whatever the network answered
    async fn fetch(&self, request: &Request) -> AgentResult<Response>;

    /// Human-readable fetcher name for display
    fn fetcher_name(&self) -> &'static str;
}

/// Classify a network response as the page would see it
///
/// Navigations and responses from the scope origin are `Basic`; other
/// origins are `Cors` or `Opaque` depending on the request mode.
pub fn classify(scope: &Url, request: &Request, final_url: &Url) -> ResponseType {
    if request.mode == RequestMode::Navigate || same_origin(scope, final_url) {
        return ResponseType::Basic;
    }
    match request.mode {
        RequestMode::NoCors => ResponseType::Opaque,
        _ => ResponseType::Cors,
    }
}
