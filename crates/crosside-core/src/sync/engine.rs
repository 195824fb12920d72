//! SyncEngine implementation
//!
//! One reconciliation pass per artifact kind:
//!
//! - no storage copy: seed it from the target side
//! - otherwise ask the ledger for a verdict and move content from the newer
//!   side to the older one, recording the new baseline
//!
//! Errors never escape a pass; they become [`Outcome::Failed`] so sibling
//! kinds are unaffected.

use std::sync::Arc;

use crosside_content::{read_recommendations, recommendations_document, update_recommendations};
use crosside_fs::{NormalizedPath, io};

use crate::config::SyncConfig;
use crate::extensions::{ApplyOutcome, ExtensionFilter};
use crate::host::ExtensionHost;
use crate::installation::Installation;
use crate::kind::{ArtifactKind, Transfer};
use crate::ledger::{SyncLedger, Verdict};
use crate::locator::TargetLocator;
use crate::storage::Storage;
use crate::{Error, Result};

use super::report::{KindReport, Outcome, ProfileReport};

/// Options for sync passes
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Ask before installing or uninstalling extensions
    pub confirm_extensions: bool,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            confirm_extensions: true,
        }
    }
}

/// Reconciles one installation against the storage copy.
pub struct SyncEngine {
    installation: Installation,
    storage: Storage,
    ledger: SyncLedger,
    locator: Arc<dyn TargetLocator>,
    host: Arc<dyn ExtensionHost>,
    filter: ExtensionFilter,
    options: SyncOptions,
}

impl SyncEngine {
    pub fn new(
        installation: Installation,
        storage: Storage,
        locator: Arc<dyn TargetLocator>,
        host: Arc<dyn ExtensionHost>,
    ) -> Self {
        Self {
            installation,
            ledger: SyncLedger::new(storage.clone()),
            storage,
            locator,
            host,
            filter: ExtensionFilter::default(),
            options: SyncOptions::default(),
        }
    }

    /// Engine for the installation, storage and filters of `config`.
    pub fn from_config(
        config: &SyncConfig,
        locator: Arc<dyn TargetLocator>,
        host: Arc<dyn ExtensionHost>,
    ) -> Self {
        Self::new(config.installation(), config.storage(), locator, host)
            .with_filter(config.extension_filter())
            .with_options(SyncOptions {
                confirm_extensions: config.prompt_on_extension_sync,
            })
    }

    pub fn with_filter(mut self, filter: ExtensionFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_options(mut self, options: SyncOptions) -> Self {
        self.options = options;
        self
    }

    pub fn installation(&self) -> &Installation {
        &self.installation
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    pub fn ledger(&self) -> &SyncLedger {
        &self.ledger
    }

    /// Target file of `kind`, if it can be found.
    pub fn target_path(&self, kind: ArtifactKind) -> Option<NormalizedPath> {
        self.locator.locate(&self.installation, kind)
    }

    /// Run all three kinds concurrently.
    ///
    /// Each kind is independent: a failure or a declined confirmation in
    /// one does not affect the others.
    pub async fn sync_profile(&self) -> ProfileReport {
        let (settings, keybindings, extensions) = tokio::join!(
            self.sync_kind(ArtifactKind::Settings),
            self.sync_kind(ArtifactKind::Keybindings),
            self.sync_kind(ArtifactKind::Extensions),
        );
        ProfileReport::new(vec![settings, keybindings, extensions])
    }

    /// One reconciliation pass for `kind`.
    pub async fn sync_kind(&self, kind: ArtifactKind) -> KindReport {
        let outcome = self
            .try_sync_kind(kind)
            .await
            .unwrap_or_else(|e| self.failed(kind, e));
        tracing::info!(kind = %kind, outcome = %outcome, "sync pass finished");
        KindReport::new(kind, outcome)
    }

    /// Push the target side to storage after a local change.
    ///
    /// Re-checks freshness first and does nothing when storage is already
    /// newer, e.g. after a concurrent manual sync.
    pub async fn push_to_storage(&self, kind: ArtifactKind) -> KindReport {
        let outcome = self
            .try_push_to_storage(kind)
            .await
            .unwrap_or_else(|e| self.failed(kind, e));
        tracing::info!(kind = %kind, outcome = %outcome, "push finished");
        KindReport::new(kind, outcome)
    }

    fn failed(&self, kind: ArtifactKind, error: Error) -> Outcome {
        tracing::error!(
            kind = %kind,
            installation = %self.installation,
            path = %self.storage.path(kind),
            error = %error,
            "not synced"
        );
        Outcome::Failed {
            error: error.to_string(),
        }
    }

    async fn try_sync_kind(&self, kind: ArtifactKind) -> Result<Outcome> {
        self.storage.ensure_dir()?;
        let target = self.target_path(kind);

        if !self.storage.exists(kind) {
            return self.seed(kind, target.as_ref()).await;
        }

        let verdict = if kind == ArtifactKind::Extensions && target.is_none() {
            // nothing local to compare against, storage wins
            Some(Verdict::StorageNewer)
        } else {
            self.ledger
                .compare(&self.installation, kind, target.as_ref())
                .verdict
        };

        match verdict {
            Some(Verdict::StorageNewer) => self.pull(kind, target.as_ref()).await,
            Some(Verdict::TargetNewer) => self.push(kind, target.as_ref()).await,
            Some(Verdict::Equal) => Ok(Outcome::Unchanged),
            None => {
                tracing::debug!(kind = %kind, "no usable timestamps, leaving both sides alone");
                Ok(Outcome::Unchanged)
            }
        }
    }

    async fn try_push_to_storage(&self, kind: ArtifactKind) -> Result<Outcome> {
        self.storage.ensure_dir()?;
        let target = self.target_path(kind);

        if !self.storage.exists(kind) {
            return self.seed(kind, target.as_ref()).await;
        }

        let comparison = self
            .ledger
            .compare(&self.installation, kind, target.as_ref());
        if comparison.verdict == Some(Verdict::StorageNewer) {
            return Ok(Outcome::Skipped {
                reason: "storage copy is newer".into(),
            });
        }
        self.push(kind, target.as_ref()).await
    }

    /// First run: copy the target side into storage verbatim.
    async fn seed(&self, kind: ArtifactKind, target: Option<&NormalizedPath>) -> Result<Outcome> {
        let content = match kind.spec().transfer {
            Transfer::Replace => io::read_text(self.require_target(kind, target)?)?,
            Transfer::MergeRecommendations => {
                let installed = self.installed_extensions().await?;
                recommendations_document(&installed)
            }
        };
        self.storage.write(kind, &content)?;
        tracing::info!(kind = %kind, path = %self.storage.path(kind), "seeded storage copy");
        Ok(Outcome::Seeded)
    }

    /// Storage is authoritative: bring the target side in line.
    async fn pull(&self, kind: ArtifactKind, target: Option<&NormalizedPath>) -> Result<Outcome> {
        match kind.spec().transfer {
            Transfer::Replace => {
                let path = self.require_target(kind, target)?;
                let content = self.storage.read(kind)?;
                if io::read_text(path).ok().as_deref() != Some(content.as_str()) {
                    io::write_text(path, &content)?;
                }
                self.record_transfer(kind);
                Ok(Outcome::PulledFromStorage)
            }
            Transfer::MergeRecommendations => self.pull_extensions(kind).await,
        }
    }

    async fn pull_extensions(&self, kind: ArtifactKind) -> Result<Outcome> {
        let stored = read_recommendations(&self.storage.read(kind)?)?;
        let installed = self.host.installed_extensions().await?;
        let diff = self.filter.plan(&installed, &stored);

        if diff.is_empty() {
            self.record_transfer(kind);
            return Ok(Outcome::Unchanged);
        }

        tracing::info!(
            install = diff.to_install.len(),
            uninstall = diff.to_delete.len(),
            "applying extension changes"
        );
        match self
            .host
            .apply_extension_diff(&diff, self.options.confirm_extensions)
            .await?
        {
            ApplyOutcome::Declined => {
                tracing::info!(kind = %kind, "extension changes declined");
                Ok(Outcome::Declined)
            }
            ApplyOutcome::Fulfilled { failed } if failed.is_empty() => {
                self.record_transfer(kind);
                Ok(Outcome::PulledFromStorage)
            }
            ApplyOutcome::Fulfilled { failed } => {
                let error = Error::PartialApply {
                    failed: failed.clone(),
                };
                // left unrecorded, the next pass pulls again
                tracing::warn!(kind = %kind, error = %error, "some extension changes failed");
                Ok(Outcome::PartiallyApplied { failed })
            }
        }
    }

    /// Target is authoritative: bring storage in line.
    async fn push(&self, kind: ArtifactKind, target: Option<&NormalizedPath>) -> Result<Outcome> {
        let source = self.storage.read(kind)?;
        let content = match kind.spec().transfer {
            Transfer::Replace => io::read_text(self.require_target(kind, target)?)?,
            Transfer::MergeRecommendations => {
                let stored = read_recommendations(&source)?;
                let installed = self.installed_extensions().await?;
                let desired = self.filter.storage_list(&stored, &installed);
                update_recommendations(&source, &desired)?.text
            }
        };

        if content == source {
            return Ok(Outcome::Unchanged);
        }
        self.storage.write(kind, &content)?;
        self.record_transfer(kind);
        Ok(Outcome::PushedToStorage)
    }

    async fn installed_extensions(&self) -> Result<Vec<String>> {
        let installed = self.host.installed_extensions().await?;
        Ok(self.filter.normalize(installed))
    }

    fn require_target<'a>(
        &self,
        kind: ArtifactKind,
        target: Option<&'a NormalizedPath>,
    ) -> Result<&'a NormalizedPath> {
        target.ok_or_else(|| {
            Error::not_found(format!("{kind} file of {}", self.installation), self.installation.data_dir_name())
        })
    }

    /// Record the current time as the new baseline.
    ///
    /// Ledger failures are logged; the next pass falls back to file times.
    fn record_transfer(&self, kind: ArtifactKind) {
        if let Err(e) = self
            .ledger
            .update_recorded_time(&self.installation, kind, None)
        {
            tracing::warn!(kind = %kind, error = %e, "could not update sync ledger");
        }
    }
}
