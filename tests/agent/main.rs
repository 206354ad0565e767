//! Agent lifecycle against a real HTTP server

use axum::extract::Request as HttpRequest;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Redirect};
use axum::routing::get;
use axum::Router;
use memaster::agent::{AgentSettings, Event, OfflineAgent, Outcome, ResponseSource};
use memaster::cache::{CacheStorage, MemoryCacheStorage};
use memaster::config::Config;
use memaster::fetch::{Fetcher, HttpFetcher, ScriptedFetcher};
use memaster::host::RecordingHost;
use memaster::http::{Request, RequestMode, ResponseType, OFFLINE_BODY};
use memaster::AgentError;
use std::sync::Arc;
use url::Url;

const SHELL: &str = "<html><body>Memaster</body></html>";

/// Larger than ureq's default body read limit
const LARGE_BODY: usize = 11 * 1024 * 1024;

fn app() -> Router {
    Router::new()
        .route("/", get(|| async { SHELL }))
        .route("/index.html", get(|| async { SHELL }))
        .route(
            "/manifest.json",
            get(|| async { ([(header::CONTENT_TYPE, "application/json")], "{\"name\":\"Memaster\"}") }),
        )
        .route("/app.js", get(|| async { "console.log('memaster')" }))
        .route("/old-home", get(|| async { Redirect::temporary("/index.html") }))
        .route("/broken", get(|| async { StatusCode::INTERNAL_SERVER_ERROR }))
        .route("/media/lecture.bin", get(|| async { vec![7u8; LARGE_BODY] }))
        .route(
            "/cache-control",
            get(|req: HttpRequest| async move {
                req.headers()
                    .get(header::CACHE_CONTROL)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("none")
                    .to_string()
                    .into_response()
            }),
        )
}

/// Serve the test app on an ephemeral port and return its base URL
async fn serve() -> Url {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app()).await.unwrap();
    });
    Url::parse(&format!("http://{}/", addr)).unwrap()
}

fn config_for(scope: &Url, precache: &[&str]) -> Config {
    let mut config = Config::default();
    config.agent.scope = scope.to_string();
    config.agent.precache = precache.iter().map(|s| s.to_string()).collect();
    config.network.timeout_secs = 5;
    config
}

struct Harness {
    agent: OfflineAgent,
    storage: MemoryCacheStorage,
    host: Arc<RecordingHost>,
}

fn online(config: &Config, storage: &MemoryCacheStorage) -> Harness {
    let settings = AgentSettings::from_config(config).unwrap();
    let fetcher = HttpFetcher::new(settings.scope.clone(), &config.network);
    harness(settings, storage, Arc::new(fetcher))
}

fn offline(config: &Config, storage: &MemoryCacheStorage) -> Harness {
    let settings = AgentSettings::from_config(config).unwrap();
    harness(settings, storage, Arc::new(ScriptedFetcher::offline()))
}

fn harness(
    settings: AgentSettings,
    storage: &MemoryCacheStorage,
    fetcher: Arc<dyn Fetcher>,
) -> Harness {
    let host = Arc::new(RecordingHost::new());
    let agent = OfflineAgent::new(settings, Arc::new(storage.clone()), fetcher, host.clone());
    Harness {
        agent,
        storage: storage.clone(),
        host,
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn install_then_serve_offline() {
    let base = serve().await;
    let config = config_for(&base, &["./", "./index.html", "./manifest.json", "/?source=pwa"]);
    let storage = MemoryCacheStorage::new();

    let live = online(&config, &storage);
    let report = live.agent.install().await.unwrap();
    assert_eq!(report.cached.len(), 4);
    assert!(live.host.state().skip_waiting_at.is_some());

    let manifest = live
        .storage
        .match_in("memaster-v1.4.0", &Request::get(base.join("manifest.json").unwrap()))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(manifest.body, b"{\"name\":\"Memaster\"}");
    assert_eq!(manifest.header("content-type"), Some("application/json"));

    // Runtime caching of a same-origin subresource
    let fetched = live
        .agent
        .handle_fetch(Request::get(base.join("app.js").unwrap()))
        .await;
    assert_eq!(
        fetched.source(),
        Some(ResponseSource::Network { stored: true })
    );
    assert_eq!(live.agent.settle().await, 1);

    // The network goes away
    let cut = offline(&config, &storage);

    let script = cut
        .agent
        .handle_fetch(Request::get(base.join("app.js").unwrap()))
        .await;
    assert_eq!(script.source(), Some(ResponseSource::Cache));

    let page = cut
        .agent
        .handle_fetch(Request::navigate(base.join("projects/17").unwrap()))
        .await;
    assert_eq!(page.source(), Some(ResponseSource::FallbackDocument));
    assert_eq!(page.response().unwrap().body, SHELL.as_bytes());

    let missing = cut
        .agent
        .handle_fetch(Request::get(base.join("styles.css").unwrap()))
        .await;
    let response = missing.response().unwrap();
    assert_eq!(response.status, 503);
    assert_eq!(response.body, OFFLINE_BODY.as_bytes());
}

#[tokio::test(flavor = "multi_thread")]
async fn install_uses_reload_semantics() {
    let base = serve().await;
    let config = config_for(&base, &["./cache-control"]);
    let storage = MemoryCacheStorage::new();

    online(&config, &storage).agent.install().await.unwrap();

    let stored = storage
        .match_in(
            "memaster-v1.4.0",
            &Request::get(base.join("cache-control").unwrap()),
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.body, b"no-cache");
}

#[tokio::test(flavor = "multi_thread")]
async fn install_aborts_on_error_status() {
    let base = serve().await;
    let config = config_for(&base, &["./", "./broken"]);
    let storage = MemoryCacheStorage::new();
    let live = online(&config, &storage);

    let err = live.agent.install().await.unwrap_err();
    assert!(matches!(err, AgentError::PrecacheStatus { status: 500, .. }));
    assert!(live.host.state().skip_waiting_at.is_none());
    assert!(storage.entries("memaster-v1.4.0").await.unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn activation_cleans_previous_release() {
    let base = serve().await;
    let storage = MemoryCacheStorage::new();

    let mut previous = config_for(&base, &["./"]);
    previous.agent.version = "memaster-v1.3.0".to_string();
    online(&previous, &storage).agent.install().await.unwrap();

    let current = online(&config_for(&base, &["./"]), &storage);
    let Outcome::Installed(_) = current.agent.dispatch(Event::Install).await.unwrap() else {
        panic!("expected Installed");
    };
    let Outcome::Activated(report) = current.agent.dispatch(Event::Activate).await.unwrap() else {
        panic!("expected Activated");
    };

    assert_eq!(report.deleted, vec!["memaster-v1.3.0"]);
    assert_eq!(storage.keys().await.unwrap(), vec!["memaster-v1.4.0"]);
    assert!(current.host.state().clients_claimed_at.is_some());
}

#[tokio::test(flavor = "multi_thread")]
async fn redirected_navigation_is_flagged() {
    let base = serve().await;
    let storage = MemoryCacheStorage::new();
    let live = online(&config_for(&base, &[]), &storage);

    let result = live
        .agent
        .handle_fetch(Request::navigate(base.join("old-home").unwrap()))
        .await;
    let response = result.response().unwrap();
    assert_eq!(response.status, 200);
    assert!(response.redirected);
    assert_eq!(response.body, SHELL.as_bytes());
    assert_eq!(result.source(), Some(ResponseSource::Network { stored: false }));

    assert_eq!(live.agent.settle().await, 0);
    let again = Request::navigate(base.join("old-home").unwrap());
    assert!(storage.match_any(&again).await.unwrap().is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn large_body_is_returned_and_cached() {
    let base = serve().await;
    let storage = MemoryCacheStorage::new();
    let live = online(&config_for(&base, &[]), &storage);
    let url = base.join("media/lecture.bin").unwrap();

    let result = live.agent.handle_fetch(Request::get(url.clone())).await;
    assert_eq!(result.source(), Some(ResponseSource::Network { stored: true }));
    let response = result.response().unwrap();
    assert_eq!(response.status, 200);
    assert_eq!(response.body.len(), LARGE_BODY);

    live.agent.settle().await;
    let cached = storage.match_any(&Request::get(url)).await.unwrap().unwrap();
    assert_eq!(cached.body.len(), LARGE_BODY);
}

#[tokio::test(flavor = "multi_thread")]
async fn cross_origin_responses_are_not_cached() {
    let base = serve().await;
    let other = serve().await;
    let storage = MemoryCacheStorage::new();
    let live = online(&config_for(&base, &[]), &storage);
    let font = other.join("app.js").unwrap();

    let opaque = live
        .agent
        .handle_fetch(Request::get(font.clone()).with_mode(RequestMode::NoCors))
        .await;
    let response = opaque.response().unwrap();
    assert_eq!(response.response_type, ResponseType::Opaque);
    assert_eq!(response.status, 0);
    assert!(response.body.is_empty());

    let cors = live.agent.handle_fetch(Request::get(font.clone())).await;
    assert_eq!(cors.response().unwrap().response_type, ResponseType::Cors);
    assert_eq!(cors.source(), Some(ResponseSource::Network { stored: false }));

    live.agent.settle().await;
    assert!(storage.match_any(&Request::get(font)).await.unwrap().is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn same_origin_mode_blocks_cross_origin() {
    let base = serve().await;
    let other = serve().await;
    let storage = MemoryCacheStorage::new();
    let live = online(&config_for(&base, &[]), &storage);

    let result = live
        .agent
        .handle_fetch(Request::get(other.join("app.js").unwrap()).with_mode(RequestMode::SameOrigin))
        .await;
    assert_eq!(result.source(), Some(ResponseSource::Unavailable));
}
