//! Status command implementation

use colored::Colorize;
use crosside_core::{ArtifactKind, Timestamp};
use serde::Serialize;

use crate::context::AppContext;
use crate::error::Result;

/// State of one artifact kind as seen from this installation.
#[derive(Debug, Serialize)]
pub struct KindStatus {
    pub kind: ArtifactKind,
    pub storage_path: String,
    pub stored: bool,
    pub modified: Option<Timestamp>,
    pub recorded: Option<Timestamp>,
    pub target: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StatusReport {
    pub installation: String,
    pub storage: String,
    pub kinds: Vec<KindStatus>,
}

/// Collect the status without creating anything on disk.
pub fn collect_status(ctx: &AppContext) -> Result<StatusReport> {
    let engine = &ctx.engine;
    let storage = engine.storage();
    let ledger = engine.ledger();

    let mut kinds = Vec::with_capacity(ArtifactKind::ALL.len());
    for kind in ArtifactKind::ALL {
        let stored = storage.exists(kind);
        let recorded = if ledger.path().is_file() {
            ledger.recorded_time(engine.installation(), kind)?
        } else {
            None
        };
        kinds.push(KindStatus {
            kind,
            storage_path: storage.path(kind).to_string(),
            stored,
            modified: if stored { storage.modified(kind).ok() } else { None },
            recorded,
            target: engine.target_path(kind).map(|path| path.to_string()),
        });
    }

    Ok(StatusReport {
        installation: engine.installation().to_string(),
        storage: storage.root().to_string(),
        kinds,
    })
}

/// Run the status command
pub fn run_status(ctx: &AppContext, json: bool) -> Result<()> {
    let report = collect_status(ctx)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{}", "Sync Status".bold());
    println!();
    println!("{}: {}", "Installation".dimmed(), report.installation.cyan());
    println!("{}:      {}", "Storage".dimmed(), report.storage);
    println!();

    for status in &report.kinds {
        let state = if status.stored {
            "stored".green()
        } else {
            "not stored".yellow()
        };
        println!("{} ({})", status.kind.to_string().bold(), state);
        println!("   {}: {}", "modified".dimmed(), describe(status.modified));
        println!("   {}: {}", "last sync".dimmed(), describe(status.recorded));
        println!(
            "   {}:   {}",
            "target".dimmed(),
            status.target.as_deref().unwrap_or("not found")
        );
    }

    Ok(())
}

fn describe(time: Option<Timestamp>) -> String {
    time.map_or_else(|| "never".to_string(), |t| t.to_string())
}
