//! Command implementations for crosside-cli

pub mod status;
pub mod sync;
pub mod watch;

pub use status::run_status;
pub use sync::run_sync;
pub use watch::run_watch;

use colored::Colorize;
use crosside_core::{KindReport, Outcome};

/// One report line: a marker, the kind and what happened.
pub(crate) fn print_report(report: &KindReport) {
    let marker = match &report.outcome {
        Outcome::Failed { .. } => "!".red().bold(),
        Outcome::PartiallyApplied { .. } => "!".yellow().bold(),
        Outcome::Declined | Outcome::Skipped { .. } => "-".yellow(),
        Outcome::Unchanged => "=".dimmed(),
        Outcome::Seeded | Outcome::PulledFromStorage | Outcome::PushedToStorage => "+".green(),
    };
    println!("   {} {}: {}", marker, report.kind.to_string().cyan(), report.outcome);
}
