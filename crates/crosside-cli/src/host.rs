//! Extension host backed by the editor's command-line launcher
//!
//! VS Code and its forks accept `--list-extensions`,
//! `--install-extension <id>` and `--uninstall-extension <id>`.

use async_trait::async_trait;
use crosside_core::{ApplyOutcome, Error, ExtensionDiff, ExtensionHost, Result};
use tokio::process::Command;

use crate::interactive;

/// Runs the editor CLI for every extension operation.
#[derive(Debug, Clone)]
pub struct EditorCliHost {
    command: Option<String>,
}

impl EditorCliHost {
    /// `command` is `None` when no launcher is known for the installation;
    /// every operation then fails with [`Error::Host`].
    pub fn new(command: Option<String>) -> Self {
        Self { command }
    }

    fn command(&self) -> Result<&str> {
        self.command.as_deref().ok_or_else(|| Error::Host {
            message: "no editor command known, set paths.editor_cli".into(),
        })
    }

    /// Run the launcher with `args` and return its stdout.
    async fn run(&self, args: &[&str]) -> Result<String> {
        let command = self.command()?;
        tracing::debug!(command, ?args, "running editor cli");

        let output = Command::new(command)
            .args(args)
            .output()
            .await
            .map_err(|e| Error::Host {
                message: format!("cannot run `{command}`: {e}"),
            })?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).into_owned())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(Error::Host {
                message: format!(
                    "`{command} {}` exited with {}: {}",
                    args.join(" "),
                    output.status,
                    stderr.trim()
                ),
            })
        }
    }

    /// Run one install or uninstall, logging instead of failing.
    async fn apply_one(&self, flag: &str, id: &str) -> bool {
        match self.run(&[flag, id]).await {
            Ok(_) => {
                tracing::info!(extension = id, operation = flag, "extension updated");
                true
            }
            Err(e) => {
                tracing::warn!(extension = id, operation = flag, error = %e, "extension operation failed");
                false
            }
        }
    }
}

#[async_trait]
impl ExtensionHost for EditorCliHost {
    async fn installed_extensions(&self) -> Result<Vec<String>> {
        let stdout = self.run(&["--list-extensions"]).await?;
        Ok(parse_extension_list(&stdout))
    }

    async fn apply_extension_diff(&self, diff: &ExtensionDiff, confirm: bool) -> Result<ApplyOutcome> {
        if confirm {
            let accepted = interactive::confirm_extension_diff(diff)
                .await
                .map_err(|e| Error::Host {
                    message: e.to_string(),
                })?;
            if !accepted {
                return Ok(ApplyOutcome::Declined);
            }
        }

        let mut failed = Vec::new();
        for id in &diff.to_delete {
            if !self.apply_one("--uninstall-extension", id).await {
                failed.push(id.clone());
            }
        }
        for id in &diff.to_install {
            if !self.apply_one("--install-extension", id).await {
                failed.push(id.clone());
            }
        }
        Ok(ApplyOutcome::Fulfilled { failed })
    }
}

/// Identifiers from `--list-extensions` output.
///
/// Remote editors print a header line before the list; anything that is
/// not a `publisher.name` token is skipped.
fn parse_extension_list(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.contains(char::is_whitespace) && line.contains('.'))
        .map(str::to_string)
        .collect()
}
