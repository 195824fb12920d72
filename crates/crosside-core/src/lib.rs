//! Reconciliation core for crosside-sync
//!
//! Keeps one canonical storage copy of an editor's settings, keybindings and
//! extension recommendations in step with a local editor installation.
//!
//! - [`ledger`] records, per installation and artifact kind, when the two
//!   sides were last reconciled, and turns that into a verdict.
//! - [`sync`] drives one reconciliation pass per kind.
//! - [`watch`] pushes local edits to storage after a quiet period.

pub mod config;
pub mod error;
pub mod extensions;
pub mod host;
pub mod installation;
pub mod kind;
pub mod ledger;
pub mod locator;
pub mod storage;
pub mod sync;
pub mod time;
pub mod watch;

pub use config::{PathOverrides, SyncConfig};
pub use error::{Error, Result};
pub use extensions::{ApplyOutcome, ExtensionDiff, ExtensionFilter};
pub use host::ExtensionHost;
pub use installation::{Installation, KNOWN_EDITORS, KnownEditor};
pub use kind::{ArtifactKind, ArtifactSpec, TargetSource, Transfer};
pub use ledger::{Comparison, Decision, RecordedTimes, SyncLedger, Tier, Verdict};
pub use locator::{PlatformLocator, TargetLocator};
pub use storage::Storage;
pub use sync::{KindReport, Outcome, ProfileReport, SyncEngine, SyncOptions};
pub use time::Timestamp;
pub use watch::{ChangeWatchPipeline, Debouncer, FileWatchBridge};
