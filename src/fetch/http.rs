//! HTTP fetcher backed by ureq
//!
//! ureq is blocking, so every request runs on tokio's blocking pool.

use super::{classify, Fetcher};
use crate::config::schema::NetworkConfig;
use crate::error::{AgentError, AgentResult};
use crate::http::{same_origin, CacheMode, Method, Request, RequestMode, Response, ResponseType};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::debug;
use ureq::ResponseExt;
use url::Url;

/// Redirect hops followed when redirects are enabled
const MAX_REDIRECTS: u32 = 10;

/// Fetcher that performs real HTTP requests
#[derive(Clone)]
pub struct HttpFetcher {
    agent: ureq::Agent,
    scope: Url,
}

impl HttpFetcher {
    /// Create a fetcher for pages served under `scope`
    pub fn new(scope: Url, config: &NetworkConfig) -> Self {
        let timeout = (config.timeout_secs > 0).then(|| Duration::from_secs(config.timeout_secs));
        let max_redirects = if config.follow_redirects {
            MAX_REDIRECTS
        } else {
            0
        };

        let agent_config = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(timeout)
            .max_redirects(max_redirects)
            .user_agent(config.user_agent.as_str())
            .build();

        Self {
            agent: ureq::Agent::new_with_config(agent_config),
            scope,
        }
    }

    /// Headers actually sent, including cache-bypass headers for reloads
    fn outgoing_headers(request: &Request) -> BTreeMap<String, String> {
        let mut headers = request.headers.clone();
        match request.cache {
            CacheMode::Default => {}
            CacheMode::Reload => {
                headers.insert("cache-control".to_string(), "no-cache".to_string());
                headers.insert("pragma".to_string(), "no-cache".to_string());
            }
            CacheMode::NoStore => {
                headers.insert("cache-control".to_string(), "no-store".to_string());
            }
        }
        headers
    }

    fn send_blocking(agent: &ureq::Agent, scope: &Url, request: &Request) -> AgentResult<Response> {
        let url = request.url.as_str();
        let headers = Self::outgoing_headers(request);
        let body: &[u8] = request.body.as_deref().unwrap_or(&[]);

        let result = match request.method {
            Method::Get => with_headers(agent.get(url), &headers).call(),
            Method::Head => with_headers(agent.head(url), &headers).call(),
            Method::Delete => with_headers(agent.delete(url), &headers).call(),
            Method::Options => with_headers(agent.options(url), &headers).call(),
            Method::Post => with_headers(agent.post(url), &headers).send(body),
            Method::Put => with_headers(agent.put(url), &headers).send(body),
            Method::Patch => with_headers(agent.patch(url), &headers).send(body),
        };
        let mut response = result.map_err(|e| AgentError::network(url, e.to_string()))?;

        let final_url = Url::parse(&response.get_uri().to_string())
            .unwrap_or_else(|_| request.url.clone());
        let redirected = !urls_equal(&final_url, &request.url);

        let response_type = classify(scope, request, &final_url);
        if response_type == ResponseType::Opaque {
            let mut opaque = Response::opaque(final_url);
            opaque.redirected = redirected;
            return Ok(opaque);
        }

        let status = response.status();
        let mut headers = BTreeMap::new();
        for (name, value) in response.headers() {
            let Ok(value) = value.to_str() else {
                continue;
            };
            headers
                .entry(name.as_str().to_string())
                .and_modify(|existing: &mut String| {
                    existing.push_str(", ");
                    existing.push_str(value);
                })
                .or_insert_with(|| value.to_string());
        }

        // ureq caps reads at 10 MB unless told otherwise
        let body = response
            .body_mut()
            .with_config()
            .limit(u64::MAX)
            .read_to_vec()
            .map_err(|e| AgentError::network(url, format!("reading body: {}", e)))?;

        Ok(Response {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or("").to_string(),
            headers,
            body,
            response_type,
            url: Some(final_url),
            redirected,
        })
    }
}

fn with_headers<B>(
    mut builder: ureq::RequestBuilder<B>,
    headers: &BTreeMap<String, String>,
) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

fn urls_equal(a: &Url, b: &Url) -> bool {
    let mut a = a.clone();
    let mut b = b.clone();
    a.set_fragment(None);
    b.set_fragment(None);
    a == b
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, request: &Request) -> AgentResult<Response> {
        if request.mode == RequestMode::SameOrigin && !same_origin(&self.scope, &request.url) {
            return Err(AgentError::network(
                request.url.as_str(),
                "cross-origin request in same-origin mode",
            ));
        }

        debug!("{} {} ({:?})", request.method, request.url, request.cache);

        let agent = self.agent.clone();
        let scope = self.scope.clone();
        let request = request.clone();
        tokio::task::spawn_blocking(move || Self::send_blocking(&agent, &scope, &request))
            .await
            .map_err(|e| AgentError::Internal(format!("fetch task failed: {}", e)))?
    }

    fn fetcher_name(&self) -> &'static str {
        "http"
    }
}
