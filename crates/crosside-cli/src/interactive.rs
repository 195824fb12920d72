//! Interactive prompts for CLI commands
//!
//! Uses dialoguer for terminal confirmation. Prompts block, so they run on
//! the blocking pool to keep the runtime free for pending work.

use colored::Colorize;
use crosside_core::ExtensionDiff;
use dialoguer::Confirm;

use crate::error::{CliError, Result};

/// Ask a yes/no question.
pub async fn confirm(prompt: impl Into<String>, default: bool) -> Result<bool> {
    let prompt = prompt.into();
    tokio::task::spawn_blocking(move || {
        Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact()
            .map_err(CliError::from)
    })
    .await
    .map_err(|e| CliError::user(format!("prompt task failed: {e}")))?
}

/// List the pending extension changes and ask whether to apply them.
pub async fn confirm_extension_diff(diff: &ExtensionDiff) -> Result<bool> {
    println!();
    println!("{}", "Extension changes".bold());
    for id in &diff.to_install {
        println!("   {} {}", "+".green(), id.cyan());
    }
    for id in &diff.to_delete {
        println!("   {} {}", "-".red(), id.cyan());
    }
    println!();

    let summary = format!(
        "Install {} and uninstall {} extension(s)?",
        diff.to_install.len(),
        diff.to_delete.len()
    );
    confirm(summary, true).await
}
