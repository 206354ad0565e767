//! Cache storage abstraction
//!
//! The registry of named cache generations. Implemented by an in-memory
//! backend (tests, embedding) and a directory-backed backend (CLI).

use crate::error::{AgentError, AgentResult};
use crate::http::{Method, Request, Response};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Identity of a cached request: method plus fragment-less URL
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RequestKey {
    pub method: Method,
    pub url: String,
}

impl RequestKey {
    /// Build the key for a request
    pub fn for_request(request: &Request) -> Self {
        let mut url = request.url.clone();
        url.set_fragment(None);
        Self {
            method: request.method,
            url: url.to_string(),
        }
    }

    /// SHA256 hex digest of the key, used as a file name
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.method.to_string().as_bytes());
        hasher.update(b" ");
        hasher.update(self.url.as_bytes());
        hex::encode(hasher.finalize())
    }
}

impl fmt::Display for RequestKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.url)
    }
}

/// Key under which a request may be stored, or an error if it may not
pub fn storable_key(request: &Request) -> AgentResult<RequestKey> {
    if request.method != Method::Get {
        return Err(AgentError::CacheRejected(format!(
            "{} {} (only GET requests can be cached)",
            request.method, request.url
        )));
    }
    Ok(RequestKey::for_request(request))
}

/// Key a request can match against, or `None` if it never matches
pub fn matchable_key(request: &Request) -> Option<RequestKey> {
    (request.method == Method::Get).then(|| RequestKey::for_request(request))
}

/// Process-wide registry of named cache stores
///
/// Every handler reads and writes through this interface; generation
/// names are the agent version tags.
#[async_trait]
pub trait CacheStorage: Send + Sync {
    /// Open a store, creating it if absent
    async fn open(&self, name: &str) -> AgentResult<()>;

    /// Check whether a store exists
    async fn has(&self, name: &str) -> AgentResult<bool>;

    /// All store names, in lexicographic order
    async fn keys(&self) -> AgentResult<Vec<String>>;

    /// Delete a store; returns whether it existed
    async fn delete(&self, name: &str) -> AgentResult<bool>;

    /// Store a response under a request (opens the store implicitly)
    async fn put(&self, name: &str, request: &Request, response: &Response) -> AgentResult<()>;

    /// Look up a request in one store
    async fn match_in(&self, name: &str, request: &Request) -> AgentResult<Option<Response>>;

    /// Look up a request across every store, in `keys()` order
    async fn match_any(&self, request: &Request) -> AgentResult<Option<Response>> {
        for name in self.keys().await? {
            if let Some(response) = self.match_in(&name, request).await? {
                return Ok(Some(response));
            }
        }
        Ok(None)
    }

    /// Keys of every entry in a store
    async fn entries(&self, name: &str) -> AgentResult<Vec<RequestKey>>;

    /// Human-readable backend name for display
    fn backend_name(&self) -> &'static str;
}
