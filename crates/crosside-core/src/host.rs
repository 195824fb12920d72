//! Extension host seam

use async_trait::async_trait;

use crate::Result;
use crate::extensions::{ApplyOutcome, ExtensionDiff};

/// Extension management of the live editor installation.
///
/// Implementations install and uninstall through the editor itself; the
/// sync engine only decides what to change.
#[async_trait]
pub trait ExtensionHost: Send + Sync {
    /// Installed, non-builtin extension identifiers.
    async fn installed_extensions(&self) -> Result<Vec<String>>;

    /// Apply `diff`, asking the user first when `confirm` is set.
    ///
    /// Individual failures are reported in [`ApplyOutcome::Fulfilled`]
    /// rather than aborting the remaining items.
    async fn apply_extension_diff(&self, diff: &ExtensionDiff, confirm: bool) -> Result<ApplyOutcome>;
}
