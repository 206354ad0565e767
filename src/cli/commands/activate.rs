//! Activate command - drop stale generations and claim clients

use super::{build_agent, Network};
use crate::config::Config;
use crate::error::AgentResult;
use crate::journal::Journal;
use crate::ui::{self, UiContext};
use serde_json::json;

/// Execute the activate command
pub async fn execute(config: &Config) -> AgentResult<()> {
    let ctx = UiContext::detect();
    let journal = Journal::new(config);
    // Activation never touches the network
    let agent = build_agent(config, Network::Offline)?;

    ui::intro(&ctx, &format!("Activating {}", agent.version()));

    let report = match agent.activate().await {
        Ok(report) => report,
        Err(e) => {
            journal
                .record(
                    "activate_failed",
                    &json!({ "version": agent.version(), "error": e.to_string() }),
                )
                .await;
            return Err(e);
        }
    };

    if report.deleted.is_empty() {
        ui::step(&ctx, ui::Tone::Info, "No stale generations");
    }
    for name in &report.deleted {
        ui::step_with(&ctx, ui::Tone::Ok, "Deleted old cache", name);
    }
    ui::step(&ctx, ui::Tone::Ok, "Clients claimed");

    journal.record("activate", &json!(report)).await;
    ui::outro(&ctx, ui::Tone::Ok, &format!("{} is active", report.version));
    Ok(())
}
