//! Watch command implementation

use std::sync::Arc;

use colored::Colorize;
use crosside_core::{ArtifactKind, ChangeWatchPipeline, FileWatchBridge};
use tokio::sync::mpsc;

use super::print_report;
use crate::context::AppContext;
use crate::error::{CliError, Result};
use crate::interactive;

/// Optionally sync once, then push local edits until Ctrl-C.
pub async fn run_watch(ctx: &AppContext, assume_yes: bool) -> Result<()> {
    if ctx.config.auto_sync && startup_sync_accepted(ctx, assume_yes).await? {
        println!("{} Synchronizing before watching...", "=>".blue().bold());
        for report in &ctx.engine.sync_profile().await.kinds {
            print_report(report);
        }
    }

    let targets: Vec<_> = ArtifactKind::ALL
        .iter()
        .filter_map(|&kind| ctx.engine.target_path(kind).map(|path| (kind, path)))
        .collect();
    if targets.is_empty() {
        return Err(CliError::user(format!(
            "No settings, keybindings or extensions found for {}",
            ctx.engine.installation()
        )));
    }

    let (_bridge, mut changes) = FileWatchBridge::start(targets.clone())?;
    let (tx, mut reports) = mpsc::unbounded_channel();
    let pipeline = ChangeWatchPipeline::new(Arc::clone(&ctx.engine), ctx.config.debounce())
        .with_reports(tx);

    println!("{} Watching for changes (Ctrl-C to stop):", "=>".blue().bold());
    for (kind, path) in &targets {
        println!("   {} {}: {}", "*".dimmed(), kind.to_string().cyan(), path);
    }

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            Some(kind) = changes.recv() => pipeline.notify(kind),
            Some(report) = reports.recv() => print_report(&report),
            result = &mut shutdown => {
                result?;
                break;
            }
        }
    }

    pipeline.dispose();
    println!("{} Stopped watching.", "OK".green().bold());
    Ok(())
}

async fn startup_sync_accepted(ctx: &AppContext, assume_yes: bool) -> Result<bool> {
    if assume_yes || !ctx.config.prompt_on_auto_sync {
        return Ok(true);
    }
    interactive::confirm("Synchronize with storage before watching?", true).await
}
