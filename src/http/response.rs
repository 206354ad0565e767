//! Response model returned to controlled pages

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use url::Url;

/// Body of the synthetic offline response
pub const OFFLINE_BODY: &str = "Offline - Please check your connection";

/// Response types, as seen by the page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseType {
    /// Same-origin, fully readable
    Basic,
    /// Cross-origin with CORS
    Cors,
    /// Constructed locally
    Default,
    Error,
    /// Cross-origin without CORS; status and body hidden
    Opaque,
    OpaqueRedirect,
}

/// A response returned to the page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub status: u16,
    pub status_text: String,
    /// Header map with lower-cased names
    pub headers: BTreeMap<String, String>,
    #[serde(skip)]
    pub body: Vec<u8>,
    pub response_type: ResponseType,
    /// Final URL after redirects
    pub url: Option<Url>,
    pub redirected: bool,
}

impl Response {
    /// Create a locally constructed response
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            status_text: status_text(status).to_string(),
            headers: BTreeMap::new(),
            body: body.into(),
            response_type: ResponseType::Default,
            url: None,
            redirected: false,
        }
    }

    /// The fixed 503 served when a subresource is unavailable offline
    pub fn service_unavailable() -> Self {
        Self::new(503, OFFLINE_BODY).with_header("Content-Type", "text/plain")
    }

    /// A cross-origin no-cors response: status, headers and body are hidden
    pub fn opaque(url: Url) -> Self {
        Self {
            status: 0,
            status_text: String::new(),
            headers: BTreeMap::new(),
            body: Vec::new(),
            response_type: ResponseType::Opaque,
            url: Some(url),
            redirected: false,
        }
    }

    /// Add a header (name is lower-cased)
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    /// Set the response type
    pub fn with_type(mut self, response_type: ResponseType) -> Self {
        self.response_type = response_type;
        self
    }

    /// Get a header value by case-insensitive name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Check if the response is OK (status 200-299)
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Only direct, same-origin 200 responses are written to the cache
    pub fn is_cacheable(&self) -> bool {
        self.status == 200 && self.response_type == ResponseType::Basic && !self.redirected
    }
}

/// Reason phrase for common status codes
pub fn status_text(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        204 => "No Content",
        301 => "Moved Permanently",
        302 => "Found",
        304 => "Not Modified",
        307 => "Temporary Redirect",
        308 => "Permanent Redirect",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        504 => "Gateway Timeout",
        _ => "",
    }
}
