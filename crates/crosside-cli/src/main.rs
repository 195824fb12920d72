//! crosside CLI
//!
//! Keeps an editor installation's settings, keybindings and extensions in
//! step with a shared storage directory.

mod cli;
mod commands;
mod context;
mod error;
mod host;
mod interactive;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use context::AppContext;
use error::Result;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let Some(command) = cli.command else {
        println!("{} editor profile sync", "crosside".green().bold());
        println!();
        println!("Run {} for available commands.", "crosside --help".cyan());
        return Ok(());
    };

    match command {
        Commands::Sync { target, yes } => {
            let ctx = AppContext::load(cli.config.as_deref(), yes)?;
            commands::run_sync(&ctx, target).await
        }
        Commands::Watch { yes } => {
            let ctx = AppContext::load(cli.config.as_deref(), yes)?;
            commands::run_watch(&ctx, yes).await
        }
        Commands::Status { json } => {
            let ctx = AppContext::load(cli.config.as_deref(), false)?;
            commands::run_status(&ctx, json)
        }
    }
}

/// Logs go to stderr; `RUST_LOG` wins unless `--verbose` is given.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbose)
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!("verbose mode enabled");
}
