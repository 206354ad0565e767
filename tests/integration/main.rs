//! Integration tests for the memaster CLI

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    /// A config file whose state lives in a temp dir
    struct Sandbox {
        dir: TempDir,
        config: PathBuf,
    }

    impl Sandbox {
        fn new() -> Self {
            Self::with_agent("")
        }

        /// Extra `[agent]` keys are appended verbatim
        fn with_agent(agent: &str) -> Self {
            let dir = TempDir::new().unwrap();
            let config = dir.path().join("config.toml");
            let state = dir.path().join("state");
            std::fs::write(
                &config,
                format!(
                    "[storage]\nstate_dir = {:?}\n\n[agent]\n{}\n",
                    state.display().to_string(),
                    agent
                ),
            )
            .unwrap();
            Self { dir, config }
        }

        fn state(&self) -> PathBuf {
            self.dir.path().join("state")
        }

        fn cmd(&self) -> Command {
            let mut cmd = memaster();
            cmd.arg("--config").arg(&self.config);
            cmd
        }

        fn host_state(&self) -> serde_json::Value {
            read_json(&self.state().join("host.json"))
        }
    }

    fn memaster() -> Command {
        let mut cmd = cargo_bin_cmd!("memaster");
        cmd.env_remove("MEMASTER_CONFIG").env_remove("RUST_LOG");
        cmd
    }

    fn read_json(path: &Path) -> serde_json::Value {
        serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
    }

    #[test]
    fn help_displays() {
        memaster()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("offline caching agent"));
    }

    #[test]
    fn version_displays() {
        memaster()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("memaster"));
    }

    #[test]
    fn config_path_honors_flag() {
        let sandbox = Sandbox::new();
        sandbox
            .cmd()
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("config.toml"));
    }

    #[test]
    fn config_show() {
        let sandbox = Sandbox::new();
        sandbox
            .cmd()
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[agent]"))
            .stdout(predicate::str::contains("memaster-v1.4.0"));
    }

    #[test]
    fn config_init_refuses_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        memaster()
            .arg("--config")
            .arg(&path)
            .args(["config", "init"])
            .assert()
            .success();
        assert!(path.exists());

        memaster()
            .arg("--config")
            .arg(&path)
            .args(["config", "init"])
            .assert()
            .success()
            .stdout(predicate::str::contains("--force"));
    }

    #[test]
    fn invalid_config_reports_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[agent]\nversion = 3\n").unwrap();

        memaster()
            .arg("--config")
            .arg(&path)
            .arg("status")
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid configuration"));
    }

    #[test]
    fn offline_subresource_gets_503() {
        let sandbox = Sandbox::new();
        sandbox
            .cmd()
            .args(["fetch", "./app.js", "--offline"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Offline - Please check your connection"))
            .stderr(predicate::str::contains("503"));
    }

    #[test]
    fn offline_navigation_without_cache_gets_503() {
        let sandbox = Sandbox::new();
        sandbox
            .cmd()
            .args(["fetch", "./projects/1", "--navigate", "--offline", "-i"])
            .assert()
            .success()
            .stdout(predicate::str::starts_with("HTTP/1.1 503 Service Unavailable"));
    }

    #[test]
    fn non_http_is_not_intercepted() {
        let sandbox = Sandbox::new();
        sandbox
            .cmd()
            .args(["fetch", "chrome-extension://abc/inject.js", "--offline"])
            .assert()
            .success()
            .stderr(predicate::str::contains("not intercepted"));
    }

    #[test]
    fn skip_waiting_message_is_recorded() {
        let sandbox = Sandbox::new();
        sandbox
            .cmd()
            .args(["message", r#"{"type":"SKIP_WAITING"}"#])
            .assert()
            .success()
            .stdout(predicate::str::contains("Skip-waiting requested"));

        assert!(sandbox.host_state()["skip_waiting_at"].is_string());

        let journal = std::fs::read_to_string(sandbox.state().join("journal.log")).unwrap();
        assert!(journal.contains("\"event\":\"message\""));
    }

    #[test]
    fn malformed_message_fails() {
        let sandbox = Sandbox::new();
        sandbox
            .cmd()
            .args(["message", "{not json"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("JSON error"));
    }

    #[test]
    fn push_then_click_opens_window() {
        let sandbox = Sandbox::new();
        sandbox
            .cmd()
            .args(["push", "Review your flashcards"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Notification shown"));

        let state = sandbox.host_state();
        let shown = &state["notifications"][0];
        assert_eq!(shown["title"], "Memaster");
        assert_eq!(shown["options"]["body"], "Review your flashcards");
        let tag = shown["options"]["tag"].as_str().unwrap().to_string();

        sandbox
            .cmd()
            .args(["click", &tag, "--action", "view"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Window opened"));

        let state = sandbox.host_state();
        assert_eq!(state["notifications"][0]["closed"], true);
        assert_eq!(state["opened_windows"][0], "http://localhost:8080/");
    }

    #[test]
    fn click_unknown_notification_fails() {
        let sandbox = Sandbox::new();
        sandbox
            .cmd()
            .args(["click", "no-such-tag"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Notification not found"));
    }

    #[test]
    fn sync_tags() {
        let sandbox = Sandbox::new();
        sandbox
            .cmd()
            .args(["sync", "background-sync-tasks"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Background sync triggered"));

        sandbox
            .cmd()
            .args(["sync", "other"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Ignored sync tag other"));
    }

    #[test]
    fn cache_list_empty() {
        let sandbox = Sandbox::new();
        sandbox
            .cmd()
            .args(["cache", "list"])
            .assert()
            .success()
            .stdout(predicate::str::contains("No cache generations found."));
    }

    #[test]
    fn cache_delete_missing() {
        let sandbox = Sandbox::new();
        sandbox
            .cmd()
            .args(["cache", "delete", "memaster-v0.1.0"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Cache store not found"));
    }

    #[test]
    fn install_offline_fails() {
        let sandbox = Sandbox::with_agent("scope = \"http://127.0.0.1:9/\"\nprecache = [\"./\"]");
        sandbox
            .cmd()
            .arg("install")
            .assert()
            .failure()
            .stderr(predicate::str::contains("Network request"));

        let host = sandbox.state().join("host.json");
        assert!(!host.exists() || read_json(&host)["skip_waiting_at"].is_null());
    }
}

mod lifecycle_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use axum::routing::get;
    use axum::Router;
    use predicates::prelude::*;
    use std::path::Path;
    use tempfile::TempDir;

    const SHELL: &str = "<html>Memaster app shell</html>";

    /// Serve a tiny app on its own runtime thread and return its base URL
    fn serve_app() -> String {
        let (tx, rx) = std::sync::mpsc::channel();
        std::thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().unwrap();
            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
                tx.send(listener.local_addr().unwrap()).unwrap();
                let app = Router::new()
                    .route("/", get(|| async { SHELL }))
                    .route("/index.html", get(|| async { SHELL }))
                    .route("/manifest.json", get(|| async { "{}" }))
                    .route("/tasks.json", get(|| async { "[]" }));
                axum::serve(listener, app).await.unwrap();
            });
        });
        format!("http://{}/", rx.recv().unwrap())
    }

    fn write_config(dir: &Path, base: &str, version: &str) -> std::path::PathBuf {
        let config = dir.join(format!("{}.toml", version));
        std::fs::write(
            &config,
            format!(
                "[storage]\nstate_dir = {:?}\n\n[agent]\nversion = {:?}\nscope = {:?}\nprecache = [\"./\", \"./index.html\", \"./manifest.json\"]\n",
                dir.join("state").display().to_string(),
                version,
                base
            ),
        )
        .unwrap();
        config
    }

    fn memaster(config: &Path) -> Command {
        let mut cmd = cargo_bin_cmd!("memaster");
        cmd.env_remove("MEMASTER_CONFIG")
            .env_remove("RUST_LOG")
            .arg("--config")
            .arg(config);
        cmd
    }

    #[test]
    fn install_activate_and_serve_offline() {
        let base = serve_app();
        let dir = TempDir::new().unwrap();
        let previous = write_config(dir.path(), &base, "memaster-v1.3.0");
        let current = write_config(dir.path(), &base, "memaster-v1.4.0");

        memaster(&previous).arg("install").assert().success();
        memaster(&current)
            .arg("install")
            .assert()
            .success()
            .stdout(predicate::str::contains("3 entries cached"));

        memaster(&current)
            .args(["cache", "list", "--format", "plain"])
            .assert()
            .success()
            .stdout("memaster-v1.3.0\nmemaster-v1.4.0\n");

        memaster(&current)
            .arg("activate")
            .assert()
            .success()
            .stdout(predicate::str::contains("memaster-v1.3.0"));

        memaster(&current)
            .args(["cache", "list", "--format", "plain"])
            .assert()
            .success()
            .stdout("memaster-v1.4.0\n");

        // Runtime caching, then the same request with the network down
        memaster(&current)
            .args(["fetch", "./tasks.json"])
            .assert()
            .success()
            .stdout("[]")
            .stderr(predicate::str::contains("fetched and cached"));

        memaster(&current)
            .args(["fetch", "./tasks.json", "--offline"])
            .assert()
            .success()
            .stdout("[]")
            .stderr(predicate::str::contains("served from cache"));

        memaster(&current)
            .args(["fetch", "./projects/42", "--navigate", "--offline"])
            .assert()
            .success()
            .stdout(SHELL)
            .stderr(predicate::str::contains("fallback document"));

        memaster(&current)
            .arg("status")
            .assert()
            .success()
            .stdout(predicate::str::contains("Ready to serve offline"));
    }
}
