//! Request and response model shared by the cache, fetchers and the agent

pub mod request;
pub mod response;

pub use request::{CacheMode, Destination, Method, Request, RequestMode};
pub use response::{status_text, Response, ResponseType, OFFLINE_BODY};

use crate::error::{AgentError, AgentResult};
use url::Url;

/// Resolve a relative or absolute reference against the agent scope
///
/// `./index.html` and `/?source=pwa` resolve against the scope; absolute
/// URLs are returned as-is.
pub fn resolve(scope: &Url, reference: &str) -> AgentResult<Url> {
    scope
        .join(reference)
        .map_err(|e| AgentError::invalid_url(reference, e))
}

/// Whether two URLs share scheme, host and port
pub fn same_origin(a: &Url, b: &Url) -> bool {
    a.origin() == b.origin()
}
