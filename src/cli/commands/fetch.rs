//! Fetch command - send one request through the agent

use super::{build_agent, Network};
use crate::agent::{Interception, ResponseSource};
use crate::cli::args::FetchArgs;
use crate::config::Config;
use crate::error::{AgentError, AgentResult};
use crate::http::{resolve, Request, Response};
use crate::journal::Journal;
use console::style;
use serde_json::json;
use std::io::Write;
use tokio::fs;
use tracing::debug;

/// Execute the fetch command
pub async fn execute(args: FetchArgs, config: &Config) -> AgentResult<()> {
    let journal = Journal::new(config);
    let network = if args.offline {
        Network::Offline
    } else {
        Network::Online
    };
    let agent = build_agent(config, network)?;

    let url = resolve(&agent.settings().scope, &args.url)?;
    let request = if args.navigate {
        Request::navigate(url)
    } else {
        let request = Request::new(url, args.method);
        match args.mode {
            Some(mode) => request.with_mode(mode.into()),
            None => request,
        }
    };
    let method = request.method;
    let url = request.url.clone();

    let interception = agent.handle_fetch(request).await;

    let written = agent.settle().await;
    debug!("{} cache write(s) settled", written);

    let Interception::Respond { response, source } = interception else {
        eprintln!(
            "{} {} requests are not intercepted",
            style("[SKIP]").dim(),
            url.scheme()
        );
        journal
            .record("fetch", &json!({ "url": url, "method": method, "source": "passthrough" }))
            .await;
        return Ok(());
    };

    eprintln!(
        "{} {} {} ({})",
        source_label(source),
        response.status,
        response.status_text,
        describe(source)
    );

    journal
        .record(
            "fetch",
            &json!({
                "url": url,
                "method": method,
                "status": response.status,
                "source": source,
            }),
        )
        .await;

    match args.output {
        Some(path) => {
            let mut content = Vec::new();
            if args.include_headers {
                content.extend_from_slice(head(&response).as_bytes());
            }
            content.extend_from_slice(&response.body);
            fs::write(&path, content)
                .await
                .map_err(|e| AgentError::io(format!("writing {}", path.display()), e))?;
            eprintln!("Saved {} bytes to {}", response.body.len(), path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            if args.include_headers {
                stdout
                    .write_all(head(&response).as_bytes())
                    .map_err(|e| AgentError::io("writing response head", e))?;
            }
            stdout
                .write_all(&response.body)
                .and_then(|_| stdout.flush())
                .map_err(|e| AgentError::io("writing response body", e))?;
        }
    }

    Ok(())
}

fn source_label(source: ResponseSource) -> console::StyledObject<&'static str> {
    match source {
        ResponseSource::Cache => style("[CACHE]").green(),
        ResponseSource::Network { .. } => style("[NETWORK]").cyan(),
        ResponseSource::FallbackDocument => style("[FALLBACK]").yellow(),
        ResponseSource::Unavailable => style("[OFFLINE]").red(),
    }
}

fn describe(source: ResponseSource) -> &'static str {
    match source {
        ResponseSource::Cache => "served from cache",
        ResponseSource::Network { stored: true } => "fetched and cached",
        ResponseSource::Network { stored: false } => "fetched, not cacheable",
        ResponseSource::FallbackDocument => "offline, served fallback document",
        ResponseSource::Unavailable => "offline",
    }
}

/// Status line and headers, HTTP/1.1 style
fn head(response: &Response) -> String {
    let mut head = format!("HTTP/1.1 {} {}\r\n", response.status, response.status_text);
    for (name, value) in &response.headers {
        head.push_str(&format!("{}: {}\r\n", name, value));
    }
    head.push_str("\r\n");
    head
}
