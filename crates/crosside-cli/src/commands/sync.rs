//! Sync command implementation

use colored::Colorize;
use crosside_core::KindReport;

use super::print_report;
use crate::cli::SyncTarget;
use crate::context::AppContext;
use crate::error::{CliError, Result};

/// Run one reconciliation pass for `target`.
///
/// Every kind is reported; the command fails when any of them did.
pub async fn run_sync(ctx: &AppContext, target: SyncTarget) -> Result<()> {
    println!(
        "{} Synchronizing {} with {}...",
        "=>".blue().bold(),
        ctx.engine.installation().as_str().cyan(),
        ctx.engine.storage().root()
    );

    let reports: Vec<KindReport> = match target.kind() {
        Some(kind) => vec![ctx.engine.sync_kind(kind).await],
        None => ctx.engine.sync_profile().await.kinds,
    };

    for report in &reports {
        print_report(report);
    }

    let failed = reports.iter().filter(|r| r.outcome.is_failure()).count();
    if failed > 0 {
        return Err(CliError::user(format!(
            "Synchronization failed for {failed} of {} item(s)",
            reports.len()
        )));
    }

    println!("{} Synchronization complete.", "OK".green().bold());
    Ok(())
}
