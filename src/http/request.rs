//! Intercepted request model

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use url::Url;

/// HTTP methods
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Head,
    Post,
    Put,
    Delete,
    Options,
    Patch,
}

impl Method {
    /// Whether the method carries a request body
    pub fn has_body(&self) -> bool {
        matches!(self, Self::Post | Self::Put | Self::Patch)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Get => "GET",
            Self::Head => "HEAD",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Options => "OPTIONS",
            Self::Patch => "PATCH",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for Method {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "HEAD" => Ok(Self::Head),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "DELETE" => Ok(Self::Delete),
            "OPTIONS" => Ok(Self::Options),
            "PATCH" => Ok(Self::Patch),
            other => Err(format!("unsupported method '{}'", other)),
        }
    }
}

/// Request mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RequestMode {
    Navigate,
    SameOrigin,
    NoCors,
    Cors,
}

/// What the request is loading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Destination {
    /// A full document (navigation)
    Document,
    Script,
    Style,
    Image,
    Font,
    Manifest,
    /// fetch() / XHR, no specific destination
    Empty,
}

/// How the request interacts with intermediate HTTP caches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CacheMode {
    Default,
    /// Bypass intermediate caches and refresh them
    Reload,
    NoStore,
}

/// A request seen by the agent
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    /// Absolute request URL
    pub url: Url,
    pub method: Method,
    /// Header map with lower-cased names
    pub headers: BTreeMap<String, String>,
    pub body: Option<Vec<u8>>,
    pub mode: RequestMode,
    pub destination: Destination,
    pub cache: CacheMode,
}

impl Request {
    /// Create a request with the given method
    pub fn new(url: Url, method: Method) -> Self {
        Self {
            url,
            method,
            headers: BTreeMap::new(),
            body: None,
            mode: RequestMode::Cors,
            destination: Destination::Empty,
            cache: CacheMode::Default,
        }
    }

    /// Create a subresource GET request
    pub fn get(url: Url) -> Self {
        Self::new(url, Method::Get)
    }

    /// Create a navigation request for a full document
    pub fn navigate(url: Url) -> Self {
        Self {
            mode: RequestMode::Navigate,
            destination: Destination::Document,
            ..Self::get(url)
        }
    }

    /// Set the cache mode
    pub fn with_cache_mode(mut self, cache: CacheMode) -> Self {
        self.cache = cache;
        self
    }

    /// Set the request mode
    pub fn with_mode(mut self, mode: RequestMode) -> Self {
        self.mode = mode;
        self
    }

    /// Add a header (name is lower-cased)
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    /// Whether the request loads a full document
    pub fn is_navigation(&self) -> bool {
        self.destination == Destination::Document
    }

    /// Whether the URL scheme is http or https
    pub fn is_http(&self) -> bool {
        matches!(self.url.scheme(), "http" | "https")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn navigate_is_document() {
        let req = Request::navigate(url("http://localhost:8080/tasks"));
        assert!(req.is_navigation());
        assert_eq!(req.mode, RequestMode::Navigate);
        assert_eq!(req.method, Method::Get);
    }

    #[test]
    fn scheme_detection() {
        assert!(Request::get(url("https://example.com/")).is_http());
        assert!(!Request::get(url("chrome-extension://abc/popup.js")).is_http());
        assert!(!Request::get(url("data:text/plain,hi")).is_http());
    }

    #[test]
    fn method_parse() {
        assert_eq!("post".parse::<Method>().unwrap(), Method::Post);
        assert!("BREW".parse::<Method>().is_err());
        assert_eq!(Method::Options.to_string(), "OPTIONS");
    }

    #[test]
    fn header_names_lowercased() {
        let req = Request::get(url("http://localhost/")).with_header("Accept", "text/html");
        assert_eq!(req.headers.get("accept").map(String::as_str), Some("text/html"));
    }
}
