//! Shared fixtures for crosside-core integration tests

#![allow(dead_code)]

use std::fs::{self, File};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::{Duration, UNIX_EPOCH};

use async_trait::async_trait;
use crosside_core::locator::EXTENSIONS_MANIFEST;
use crosside_core::{
    ApplyOutcome, ArtifactKind, ExtensionDiff, ExtensionFilter, ExtensionHost, Installation,
    PlatformLocator, Result, Storage, SyncEngine, SyncOptions, Timestamp,
};
use tempfile::TempDir;

/// Identity that matches no real editor on the test machine.
pub const INSTALLATION: &str = "crosside test editor";

/// In-memory extension host.
#[derive(Default)]
pub struct FakeHost {
    installed: Mutex<Vec<String>>,
    applied: Mutex<Vec<(ExtensionDiff, bool)>>,
    decline: bool,
    failing: Vec<String>,
}

impl FakeHost {
    pub fn with_installed(ids: &[&str]) -> Self {
        Self {
            installed: Mutex::new(ids.iter().map(|s| s.to_string()).collect()),
            ..Self::default()
        }
    }

    pub fn declining(mut self) -> Self {
        self.decline = true;
        self
    }

    pub fn failing(mut self, ids: &[&str]) -> Self {
        self.failing = ids.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn installed(&self) -> Vec<String> {
        self.installed.lock().unwrap().clone()
    }

    pub fn set_installed(&self, ids: &[&str]) {
        *self.installed.lock().unwrap() = ids.iter().map(|s| s.to_string()).collect();
    }

    pub fn applied(&self) -> Vec<(ExtensionDiff, bool)> {
        self.applied.lock().unwrap().clone()
    }
}

#[async_trait]
impl ExtensionHost for FakeHost {
    async fn installed_extensions(&self) -> Result<Vec<String>> {
        Ok(self.installed())
    }

    async fn apply_extension_diff(&self, diff: &ExtensionDiff, confirm: bool) -> Result<ApplyOutcome> {
        self.applied.lock().unwrap().push((diff.clone(), confirm));
        if self.decline {
            return Ok(ApplyOutcome::Declined);
        }

        let mut installed = self.installed.lock().unwrap();
        let mut failed = Vec::new();
        for id in &diff.to_delete {
            if self.failing.contains(id) {
                failed.push(id.clone());
            } else {
                installed.retain(|i| i != id);
            }
        }
        for id in &diff.to_install {
            if self.failing.contains(id) {
                failed.push(id.clone());
            } else {
                installed.push(id.clone());
            }
        }
        Ok(ApplyOutcome::Fulfilled { failed })
    }
}

/// Temporary storage directory plus a fake installation.
pub struct Sandbox {
    _dir: TempDir,
    pub storage: Storage,
    pub user_dir: PathBuf,
    pub extensions_dir: PathBuf,
    pub host: Arc<FakeHost>,
}

impl Sandbox {
    pub fn new() -> Self {
        Self::with_host(FakeHost::default())
    }

    pub fn with_host(host: FakeHost) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let user_dir = dir.path().join("user");
        let extensions_dir = dir.path().join("extensions");
        fs::create_dir_all(&user_dir).unwrap();
        fs::create_dir_all(&extensions_dir).unwrap();

        Self {
            storage: Storage::new(dir.path().join("storage")),
            user_dir,
            extensions_dir,
            host: Arc::new(host),
            _dir: dir,
        }
    }

    pub fn installation(&self) -> Installation {
        Installation::new(INSTALLATION)
    }

    pub fn engine(&self) -> SyncEngine {
        let locator = PlatformLocator::new()
            .with_user_dir(&self.user_dir)
            .with_extensions_dir(&self.extensions_dir);
        SyncEngine::new(
            self.installation(),
            self.storage.clone(),
            Arc::new(locator),
            self.host.clone(),
        )
        .with_filter(ExtensionFilter::new(
            Vec::<String>::new(),
            ["octohash.crosside-sync"],
        ))
        .with_options(SyncOptions {
            confirm_extensions: false,
        })
    }

    pub fn target_path(&self, kind: ArtifactKind) -> PathBuf {
        match kind {
            ArtifactKind::Extensions => self.extensions_dir.join(EXTENSIONS_MANIFEST),
            other => self.user_dir.join(other.storage_file()),
        }
    }

    pub fn write_target(&self, kind: ArtifactKind, content: &str) {
        fs::write(self.target_path(kind), content).unwrap();
    }

    pub fn read_target(&self, kind: ArtifactKind) -> String {
        fs::read_to_string(self.target_path(kind)).unwrap()
    }

    /// Storage copy with a fixed modification time.
    pub fn write_storage(&self, kind: ArtifactKind, content: &str, mtime_millis: i64) {
        self.storage.write(kind, content).unwrap();
        set_mtime(&self.storage.path(kind).to_native(), mtime_millis);
    }

    pub fn read_storage(&self, kind: ArtifactKind) -> String {
        self.storage.read(kind).unwrap()
    }

    pub fn record(&self, kind: ArtifactKind, millis: i64) {
        crosside_core::SyncLedger::new(self.storage.clone())
            .update_recorded_time(&self.installation(), kind, Some(Timestamp::from_millis(millis)))
            .unwrap();
    }

    pub fn recorded(&self, kind: ArtifactKind) -> Option<Timestamp> {
        crosside_core::SyncLedger::new(self.storage.clone())
            .recorded_time(&self.installation(), kind)
            .unwrap()
    }
}

pub fn set_mtime(path: &std::path::Path, millis: i64) {
    let file = File::options().write(true).open(path).unwrap();
    file.set_modified(UNIX_EPOCH + Duration::from_millis(millis as u64))
        .unwrap();
}
