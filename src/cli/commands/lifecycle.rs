//! Sync, push, click and message commands

use super::{build_agent, Network};
use crate::cli::args::{ClickArgs, MessageArgs, PushArgs, SyncArgs};
use crate::config::Config;
use crate::error::AgentResult;
use crate::journal::Journal;
use crate::ui::{self, UiContext};
use serde_json::json;

/// Execute the sync command
pub async fn sync(args: SyncArgs, config: &Config) -> AgentResult<()> {
    let ctx = UiContext::detect();
    let agent = build_agent(config, Network::Offline)?;

    let recognized = agent.sync(&args.tag);
    if recognized {
        ui::step_with(&ctx, ui::Tone::Ok, "Background sync triggered", &args.tag);
    } else {
        ui::step_with(
            &ctx,
            ui::Tone::Warn,
            &format!("Ignored sync tag {}", args.tag),
            &format!("Registered tag is {}", agent.settings().sync_tag),
        );
    }

    Journal::new(config)
        .record("sync", &json!({ "tag": args.tag, "recognized": recognized }))
        .await;
    Ok(())
}

/// Execute the push command
pub async fn push(args: PushArgs, config: &Config) -> AgentResult<()> {
    let ctx = UiContext::detect();
    let agent = build_agent(config, Network::Offline)?;

    let options = agent.push(args.payload.as_deref()).await?;

    ui::step_with(&ctx, ui::Tone::Ok, "Notification shown", &options.body);
    ui::key_value(&ctx, "Tag", &options.tag);
    for action in &options.actions {
        ui::key_value(&ctx, "Action", &format!("{} ({})", action.action, action.title));
    }

    Journal::new(config)
        .record("push", &json!({ "tag": options.tag, "body": options.body }))
        .await;
    Ok(())
}

/// Execute the click command
pub async fn click(args: ClickArgs, config: &Config) -> AgentResult<()> {
    let ctx = UiContext::detect();
    let agent = build_agent(config, Network::Offline)?;

    let opened = agent
        .notification_click(&args.tag, args.action.as_deref())
        .await?;

    ui::step(&ctx, ui::Tone::Ok, "Notification closed");
    if let Some(ref url) = opened {
        ui::step_with(&ctx, ui::Tone::Ok, "Window opened", url.as_str());
    }

    Journal::new(config)
        .record(
            "notificationclick",
            &json!({ "tag": args.tag, "action": args.action, "opened": opened }),
        )
        .await;
    Ok(())
}

/// Execute the message command
pub async fn message(args: MessageArgs, config: &Config) -> AgentResult<()> {
    let ctx = UiContext::detect();
    let payload: serde_json::Value = serde_json::from_str(&args.payload)?;
    let agent = build_agent(config, Network::Offline)?;

    let recognized = agent.message(&payload).await?;
    if recognized {
        ui::step(&ctx, ui::Tone::Ok, "Skip-waiting requested");
    } else {
        ui::step(&ctx, ui::Tone::Info, "Message ignored");
    }

    Journal::new(config)
        .record("message", &json!({ "payload": payload, "recognized": recognized }))
        .await;
    Ok(())
}
