//! CLI argument parsing with clap

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};

/// Portal - revalidation decisions and backoff-wrapped operations
#[derive(Parser, Debug)]
#[command(name = "portal")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to a portal.yaml config file
    #[arg(short, long, global = true, env = "PORTAL_CONFIG")]
    pub config: Option<Utf8PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show version information
    Version(VersionArgs),

    /// Decide whether a view's loader data must be refetched after an action
    Revalidate(RevalidateArgs),

    /// Validate a submitted `_action` intent for a route domain
    Intent(IntentArgs),

    /// Inspect or run operations under the backoff policy
    #[command(subcommand)]
    Backoff(BackoffCommands),

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommands),
}

// Version command
#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

// Revalidate command
#[derive(Args, Debug)]
pub struct RevalidateArgs {
    /// View whose gate to consult (content-detail, content-list)
    #[arg(long)]
    pub view: String,

    /// Action tag of the completed write (e.g. rename, save)
    #[arg(long, conflicts_with = "outcome")]
    pub action: Option<String>,

    /// Action result body as JSON, e.g. '{"status":true,"actionType":"publish"}'
    #[arg(long)]
    pub outcome: Option<String>,

    /// The framework's default decision
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub default: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

// Intent command
#[derive(Args, Debug)]
pub struct IntentArgs {
    /// Route domain (asset, chat, content, content-chat, dataset, template, operator, user)
    #[arg(long)]
    pub domain: String,

    /// Submitted intent
    pub intent: String,
}

// Backoff commands
#[derive(Subcommand, Debug)]
pub enum BackoffCommands {
    /// Print the delay before each retry
    Schedule(BackoffScheduleArgs),

    /// Run a command, retrying with backoff while it exits non-zero
    Run(BackoffRunArgs),
}

#[derive(Args, Debug)]
pub struct BackoffScheduleArgs {
    /// Named operation policy (falls back to the default policy)
    #[arg(long)]
    pub operation: Option<String>,

    /// Override the number of retries
    #[arg(long)]
    pub retries: Option<u32>,

    /// Show the deterministic part only
    #[arg(long)]
    pub no_jitter: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct BackoffRunArgs {
    /// Named operation policy (falls back to the default policy)
    #[arg(long)]
    pub operation: Option<String>,

    /// Override the number of retries
    #[arg(long)]
    pub retries: Option<u32>,

    /// Override the base delay in milliseconds
    #[arg(long)]
    pub base_delay_ms: Option<u64>,

    /// Command and arguments to run
    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,
}

// Config commands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the effective runtime configuration
    Show(ConfigShowArgs),

    /// Print the path of the user config file
    Path,
}

#[derive(Args, Debug)]
pub struct ConfigShowArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}
