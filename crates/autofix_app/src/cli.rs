use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser, Clone)]
#[command(
    name = "autofix",
    version,
    about = "Watch and steer an autofix run for one issue"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Follow the run of one issue; stdin lines are operator input
    Watch(WatchArgs),
}

#[derive(Debug, Args, Clone, Default)]
pub struct WatchArgs {
    /// Issue (group) id the run belongs to
    #[arg(long = "group")]
    pub group_id: String,

    /// Event id sent along with start requests
    #[arg(long = "event")]
    pub event_id: String,

    /// Start a run with this instruction right away
    #[arg(long)]
    pub instruction: Option<String>,

    /// RON config file (defaults to ./autofix.ron when present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// API root, overrides the config file
    #[arg(long)]
    pub base_url: Option<String>,

    /// Bearer token, overrides the config file
    #[arg(long)]
    pub token: Option<String>,

    /// Delay between two fetches of a running run
    #[arg(long)]
    pub poll_interval_ms: Option<u64>,
}
