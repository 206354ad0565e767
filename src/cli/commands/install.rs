//! Install command - pre-populate the current cache generation

use super::{build_agent, Network};
use crate::agent::PrecacheObserver;
use crate::config::Config;
use crate::error::AgentResult;
use crate::journal::Journal;
use crate::ui::{self, EntryProgress, UiContext};
use serde_json::json;
use url::Url;

impl PrecacheObserver for EntryProgress {
    fn started(&self, total: usize) {
        self.expect(total);
    }

    fn fetched(&self, url: &Url) {
        self.advance(url.as_str());
    }
}

/// Execute the install command
pub async fn execute(config: &Config) -> AgentResult<()> {
    let ctx = UiContext::detect();
    let journal = Journal::new(config);
    let agent = build_agent(config, Network::Online)?;

    ui::intro(&ctx, &format!("Installing {}", agent.version()));

    let mut progress = EntryProgress::new(&ctx);
    progress.begin("Caching app files");

    match agent.install_observed(&progress).await {
        Ok(report) => {
            progress.finish(&format!("{} entries cached", report.cached.len()));
            journal.record("install", &json!(report)).await;
            ui::outro(&ctx, ui::Tone::Ok, &format!("{} installed", report.version));
            Ok(())
        }
        Err(e) => {
            progress.fail("Installation failed");
            journal
                .record(
                    "install_failed",
                    &json!({ "version": agent.version(), "error": e.to_string() }),
                )
                .await;
            Err(e)
        }
    }
}
