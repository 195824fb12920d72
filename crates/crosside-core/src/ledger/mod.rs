//! Sync ledger: last reconciliation time per installation and kind
//!
//! The ledger is a JSON file in the storage directory:
//!
//! ```json
//! {
//!   "Cursor": { "settings": 1700000000000 },
//!   "Visual Studio Code": { "extensions": 1700000000000, "keybindings": 1700000000000 }
//! }
//! ```
//!
//! A missing entry means "never recorded", which is distinct from any
//! timestamp. Writes replace the whole file atomically; concurrent updates
//! are last-writer-wins.

mod policy;

pub use policy::{Comparison, Decision, Tier, Verdict, compare_filesystem, decide};

use std::collections::BTreeMap;

use crosside_fs::{NormalizedPath, io};
use serde::{Deserialize, Serialize};

use crate::installation::Installation;
use crate::kind::ArtifactKind;
use crate::storage::Storage;
use crate::time::Timestamp;
use crate::{Error, Result};

/// Name of the ledger file inside the storage directory.
pub const LEDGER_FILE: &str = "crosside-sync.json";

/// Recorded times of one installation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedTimes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keybindings: Option<Timestamp>,
}

impl RecordedTimes {
    pub fn get(&self, kind: ArtifactKind) -> Option<Timestamp> {
        match kind {
            ArtifactKind::Settings => self.settings,
            ArtifactKind::Keybindings => self.keybindings,
            ArtifactKind::Extensions => self.extensions,
        }
    }

    pub fn set(&mut self, kind: ArtifactKind, time: Timestamp) {
        let slot = match kind {
            ArtifactKind::Settings => &mut self.settings,
            ArtifactKind::Keybindings => &mut self.keybindings,
            ArtifactKind::Extensions => &mut self.extensions,
        };
        *slot = Some(time);
    }
}

/// Installation identity to recorded times, kept sorted for stable output.
pub type LedgerEntries = BTreeMap<String, RecordedTimes>;

/// File-backed ledger bound to a storage directory.
#[derive(Debug, Clone)]
pub struct SyncLedger {
    storage: Storage,
    path: NormalizedPath,
}

impl SyncLedger {
    pub fn new(storage: Storage) -> Self {
        let path = storage.root().join(LEDGER_FILE);
        Self { storage, path }
    }

    pub fn path(&self) -> &NormalizedPath {
        &self.path
    }

    /// Create an empty ledger file if none exists.
    pub fn ensure_exists(&self) -> Result<()> {
        if self.path.is_file() {
            return Ok(());
        }
        self.storage.ensure_dir()?;
        self.save(&LedgerEntries::new())?;
        tracing::info!(path = %self.path, "created sync ledger");
        Ok(())
    }

    /// Read every entry, creating the file first if needed.
    pub fn entries(&self) -> Result<LedgerEntries> {
        self.ensure_exists()?;
        let content = io::read_text_locked(&self.path)?;
        if content.trim().is_empty() {
            return Ok(LedgerEntries::new());
        }
        serde_json::from_str(&content).map_err(|e| Error::Ledger {
            message: format!("{}: {e}", self.path),
        })
    }

    pub fn recorded_time(
        &self,
        installation: &Installation,
        kind: ArtifactKind,
    ) -> Result<Option<Timestamp>> {
        Ok(self
            .entries()?
            .get(installation.as_str())
            .and_then(|times| times.get(kind)))
    }

    /// Record `time` (default: now) for one installation and kind.
    ///
    /// Other kinds and installations are kept as they are.
    pub fn update_recorded_time(
        &self,
        installation: &Installation,
        kind: ArtifactKind,
        time: Option<Timestamp>,
    ) -> Result<Timestamp> {
        let time = time.unwrap_or_else(Timestamp::now);
        let mut entries = self.entries()?;
        entries
            .entry(installation.as_str().to_string())
            .or_default()
            .set(kind, time);
        self.save(&entries)?;

        tracing::debug!(installation = %installation, kind = %kind, time = time.as_millis(), "recorded sync time");
        Ok(time)
    }

    /// Modification time of the storage copy of `kind`.
    pub fn artifact_timestamp(&self, kind: ArtifactKind) -> Result<Timestamp> {
        self.storage.modified(kind)
    }

    /// Compare the storage copy against the target side.
    ///
    /// Uses the ledger tier when both the storage timestamp and the ledger
    /// can be read, seeding the ledger when it has no baseline yet.
    /// Otherwise falls back to comparing the two files' modification times
    /// and leaves the ledger alone.
    pub fn compare(
        &self,
        installation: &Installation,
        kind: ArtifactKind,
        target: Option<&NormalizedPath>,
    ) -> Comparison {
        let inputs = self
            .artifact_timestamp(kind)
            .and_then(|storage| Ok((storage, self.recorded_time(installation, kind)?)));

        match inputs {
            Ok((storage, recorded)) => {
                let decision = decide(Some(storage), recorded);
                if decision.seed
                    && let Err(e) = self.update_recorded_time(installation, kind, Some(storage))
                {
                    tracing::warn!(kind = %kind, error = %e, "could not seed sync ledger");
                }
                tracing::debug!(kind = %kind, verdict = %decision.verdict, seeded = decision.seed, "ledger comparison");
                Comparison::ledger(decision.verdict)
            }
            Err(e) => {
                tracing::debug!(kind = %kind, error = %e, "ledger comparison unavailable, comparing file times");
                let storage = io::modified_millis(&self.storage.path(kind))
                    .ok()
                    .map(Timestamp::from_millis);
                let target = target
                    .and_then(|path| io::modified_millis(path).ok())
                    .map(Timestamp::from_millis);
                Comparison::filesystem(compare_filesystem(storage, target))
            }
        }
    }

    fn save(&self, entries: &LedgerEntries) -> Result<()> {
        let mut content = serde_json::to_string_pretty(entries)?;
        content.push('\n');
        io::write_atomic(&self.path, content.as_bytes())?;
        Ok(())
    }
}
