//! Terminal driver for watching and steering an autofix run.
pub mod cli;
pub mod config;
pub mod input;
pub mod render;

mod app;
mod effects;

use anyhow::Result;

use crate::cli::{Cli, Command};

pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Watch(args) => app::watch(args).await,
    }
}
