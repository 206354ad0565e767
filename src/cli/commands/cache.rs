//! Cache command - inspect and manage cache generations

use crate::cache::{CacheStorage, DiskCacheStorage};
use crate::cli::args::{CacheAction, CacheArgs, OutputFormat};
use crate::config::{Config, ConfigManager};
use crate::error::{AgentError, AgentResult};
use crate::journal::Journal;
use crate::ui::{self, UiContext};
use console::style;
use serde::Serialize;
use serde_json::json;
use tracing::debug;

/// One row of `cache list`
#[derive(Debug, Serialize)]
struct GenerationSummary {
    name: String,
    entries: usize,
    current: bool,
}

/// Execute the cache command
pub async fn execute(args: CacheArgs, config: &Config) -> AgentResult<()> {
    let storage = DiskCacheStorage::new(ConfigManager::caches_dir(config));
    debug!("Cache root: {}", storage.root().display());

    match args.action {
        CacheAction::List { format } => list_generations(&storage, config, format).await,
        CacheAction::Show { name } => show_generation(&storage, &name).await,
        CacheAction::Delete { name } => delete_generation(&storage, config, &name).await,
        CacheAction::Clear { yes } => clear_generations(&storage, config, yes).await,
    }
}

async fn summarize(
    storage: &dyn CacheStorage,
    config: &Config,
) -> AgentResult<Vec<GenerationSummary>> {
    let mut summaries = Vec::new();
    for name in storage.keys().await? {
        let entries = storage.entries(&name).await?.len();
        summaries.push(GenerationSummary {
            current: name == config.agent.version,
            name,
            entries,
        });
    }
    Ok(summaries)
}

async fn list_generations(
    storage: &dyn CacheStorage,
    config: &Config,
    format: OutputFormat,
) -> AgentResult<()> {
    let summaries = summarize(storage, config).await?;

    match format {
        OutputFormat::Table => print_table(&summaries),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summaries)?),
        OutputFormat::Plain => {
            for summary in &summaries {
                println!("{}", summary.name);
            }
        }
    }

    Ok(())
}

fn print_table(summaries: &[GenerationSummary]) {
    if summaries.is_empty() {
        println!("No cache generations found.");
        return;
    }

    println!("{:<32} {:<8} {:<8}", "GENERATION", "ENTRIES", "STATE");
    println!("{}", "-".repeat(50));

    for summary in summaries {
        let state = if summary.current {
            style("current").green().to_string()
        } else {
            style("stale").yellow().to_string()
        };
        println!("{:<32} {:<8} {:<8}", summary.name, summary.entries, state);
    }

    println!();
    println!("Total: {} generation(s)", summaries.len());
}

async fn show_generation(storage: &dyn CacheStorage, name: &str) -> AgentResult<()> {
    let entries = storage.entries(name).await?;

    println!("{} ({} entries)", style(name).bold(), entries.len());
    for key in &entries {
        println!("  {} {}", style("•").cyan(), key);
    }
    Ok(())
}

async fn delete_generation(
    storage: &dyn CacheStorage,
    config: &Config,
    name: &str,
) -> AgentResult<()> {
    let ctx = UiContext::detect();

    if !storage.delete(name).await? {
        return Err(AgentError::CacheNotFound(name.to_string()));
    }

    ui::step_with(&ctx, ui::Tone::Ok, "Deleted cache", name);
    Journal::new(config)
        .record("cache_delete", &json!({ "names": [name] }))
        .await;
    Ok(())
}

async fn clear_generations(
    storage: &dyn CacheStorage,
    config: &Config,
    yes: bool,
) -> AgentResult<()> {
    let ctx = UiContext::detect().with_auto_yes(yes);
    let names = storage.keys().await?;

    if names.is_empty() {
        println!("No cache generations to clear.");
        return Ok(());
    }

    if !ui::confirm_removal(&ctx, &names).await? {
        println!("Aborted.");
        return Ok(());
    }

    for name in &names {
        storage.delete(name).await?;
    }

    ui::step(&ctx, ui::Tone::Ok, &format!("Cleared {} cache generation(s)", names.len()));
    Journal::new(config)
        .record("cache_delete", &json!({ "names": names }))
        .await;
    Ok(())
}
