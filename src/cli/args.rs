//! CLI argument definitions using clap derive

use crate::http::{Method, RequestMode};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Memaster - offline caching agent
///
/// Pre-caches the Memaster app shell, keeps one cache generation per
/// release and answers requests cache-first with an offline fallback.
#[derive(Parser, Debug)]
#[command(name = "memaster")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "MEMASTER_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Pre-populate the current cache generation
    Install,

    /// Delete stale cache generations and claim clients
    Activate,

    /// Send a request through the agent
    Fetch(FetchArgs),

    /// Deliver a background sync event
    Sync(SyncArgs),

    /// Deliver a push message (shows a notification)
    Push(PushArgs),

    /// Click a shown notification
    Click(ClickArgs),

    /// Post a JSON message to the agent
    Message(MessageArgs),

    /// Inspect and manage cache generations
    Cache(CacheArgs),

    /// Show agent, cache and host state
    Status,

    /// Show or initialize configuration
    Config(ConfigArgs),
}

/// Arguments for the fetch command
#[derive(Parser, Debug)]
pub struct FetchArgs {
    /// URL to request, absolute or relative to the agent scope
    pub url: String,

    /// Treat the request as a page navigation
    #[arg(short, long)]
    pub navigate: bool,

    /// HTTP method
    #[arg(short = 'X', long, default_value = "GET", conflicts_with = "navigate")]
    pub method: Method,

    /// Request mode for subresource requests
    #[arg(long, value_enum, conflicts_with = "navigate")]
    pub mode: Option<ModeArg>,

    /// Simulate a network that is down
    #[arg(long)]
    pub offline: bool,

    /// Write the body to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print the status line and headers before the body
    #[arg(short, long)]
    pub include_headers: bool,
}

/// Request mode as accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    SameOrigin,
    NoCors,
    Cors,
}

impl From<ModeArg> for RequestMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::SameOrigin => RequestMode::SameOrigin,
            ModeArg::NoCors => RequestMode::NoCors,
            ModeArg::Cors => RequestMode::Cors,
        }
    }
}

/// Arguments for the sync command
#[derive(Parser, Debug)]
pub struct SyncArgs {
    /// Sync registration tag
    pub tag: String,
}

/// Arguments for the push command
#[derive(Parser, Debug)]
pub struct PushArgs {
    /// Push payload text (notification body)
    pub payload: Option<String>,
}

/// Arguments for the click command
#[derive(Parser, Debug)]
pub struct ClickArgs {
    /// Notification tag, as printed by `push`
    pub tag: String,

    /// Action button that was clicked
    #[arg(short, long)]
    pub action: Option<String>,
}

/// Arguments for the message command
#[derive(Parser, Debug)]
pub struct MessageArgs {
    /// JSON payload, e.g. '{"type":"SKIP_WAITING"}'
    pub payload: String,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Subcommand for config
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init {
        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },
}

/// Output format for listings
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// JSON output
    Json,
    /// Simple text (one per line)
    Plain,
}

/// Arguments for the cache command
#[derive(Parser, Debug)]
pub struct CacheArgs {
    /// Subcommand for cache
    #[command(subcommand)]
    pub action: CacheAction,
}

/// Cache subcommands
#[derive(Subcommand, Debug)]
pub enum CacheAction {
    /// List cache generations
    List {
        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// List the entries of one generation
    Show {
        /// Generation name
        name: String,
    },

    /// Delete one generation
    Delete {
        /// Generation name
        name: String,
    },

    /// Delete every generation
    Clear {
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}
