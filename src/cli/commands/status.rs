//! Status command - show agent, cache and host state

use crate::agent::AgentSettings;
use crate::cache::{CacheStorage, DiskCacheStorage};
use crate::config::{Config, ConfigManager};
use crate::error::AgentResult;
use crate::host::FileHost;
use crate::http::Request;
use crate::ui::{self, UiContext};
use chrono::{DateTime, Utc};
use console::style;

/// Execute the status command
pub async fn execute(config: &Config) -> AgentResult<()> {
    let ctx = UiContext::detect();
    let settings = AgentSettings::from_config(config)?;
    let storage = DiskCacheStorage::new(ConfigManager::caches_dir(config));
    let host = FileHost::new(ConfigManager::host_state_path(config));

    ui::intro(&ctx, "Memaster Status");

    ui::section(&ctx, "Agent");
    ui::key_value(&ctx, "Version", &settings.version);
    ui::key_value(&ctx, "Scope", settings.scope.as_str());
    ui::key_value(
        &ctx,
        "State directory",
        &ConfigManager::state_dir(config).display().to_string(),
    );

    ui::section(&ctx, "Caches");
    let names = storage.keys().await?;
    let mut healthy = names.contains(&settings.version);
    if names.is_empty() {
        ui::step_with(&ctx, ui::Tone::Warn, "No cache generations", "Run: memaster install");
    }
    for name in &names {
        let entries = storage.entries(name).await?.len();
        if *name == settings.version {
            ui::step_with(&ctx, ui::Tone::Ok, name, &format!("current, {} entries", entries));
        } else {
            ui::step_with(
                &ctx,
                ui::Tone::Warn,
                &format!("{} ({} entries)", name, entries),
                "stale, run: memaster activate",
            );
        }
    }

    let fallback = Request::get(settings.fallback_document.clone());
    if storage.match_any(&fallback).await?.is_some() {
        ui::step_with(&ctx, ui::Tone::Ok, "Fallback document cached", fallback.url.as_str());
    } else {
        healthy = false;
        ui::step_with(
            &ctx,
            ui::Tone::Warn,
            &format!("Fallback document {} not cached", fallback.url),
            "Offline navigations will get a 503",
        );
    }

    ui::section(&ctx, "Host");
    let state = host.load().await?;
    ui::key_value(&ctx, "Skip waiting", &timestamp(state.skip_waiting_at));
    ui::key_value(&ctx, "Clients claimed", &timestamp(state.clients_claimed_at));
    ui::key_value(
        &ctx,
        "Notifications",
        &format!(
            "{} shown, {} open",
            state.notifications.len(),
            state.open_notifications().count()
        ),
    );
    for shown in state.open_notifications() {
        ui::remark(&ctx, &format!("{} {}", shown.options.tag, shown.options.body));
    }
    ui::key_value(&ctx, "Windows opened", &state.opened_windows.len().to_string());

    if healthy {
        ui::outro(&ctx, ui::Tone::Ok, "Ready to serve offline");
    } else {
        ui::outro(&ctx, ui::Tone::Warn, "Offline support incomplete");
    }

    Ok(())
}

fn timestamp(at: Option<DateTime<Utc>>) -> String {
    match at {
        Some(at) => at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        None => style("never").dim().to_string(),
    }
}
