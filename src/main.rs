//! Memaster - offline caching agent
//!
//! CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use memaster::cli::{commands, Cli, Commands};
use memaster::config::{Config, ConfigManager};
use memaster::error::AgentResult;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> AgentResult<()> {
    let cli = Cli::parse();

    let manager = match cli.config {
        Some(ref path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    };
    let config = manager.load().await?;

    init_logging(cli.verbose, &config);
    debug!("Using config {}", manager.path().display());

    if let Commands::Config(args) = cli.command {
        return commands::config(args, &config, &manager).await;
    }

    ConfigManager::ensure_state_dirs(&config).await?;

    match cli.command {
        Commands::Install => commands::install(&config).await,
        Commands::Activate => commands::activate(&config).await,
        Commands::Fetch(args) => commands::fetch(args, &config).await,
        Commands::Sync(args) => commands::sync(args, &config).await,
        Commands::Push(args) => commands::push(args, &config).await,
        Commands::Click(args) => commands::click(args, &config).await,
        Commands::Message(args) => commands::message(args, &config).await,
        Commands::Cache(args) => commands::cache(args, &config).await,
        Commands::Status => commands::status(&config).await,
        Commands::Config(_) => unreachable!("Config handled above"),
    }
}

/// 0 = warn, 1 = info, 2+ = debug; `RUST_LOG` wins when set
fn init_logging(verbose: u8, config: &Config) {
    let level = match verbose {
        0 if config.general.verbose => "info",
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("memaster={}", level)));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    if config.general.log_format == "json" {
        builder.json().init();
    } else {
        builder.without_time().init();
    }
}
