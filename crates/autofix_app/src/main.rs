use anyhow::{Context, Result};
use clap::Parser;

use autofix_app::cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to build tokio runtime")?;
    runtime.block_on(autofix_app::run(cli))
}
