//! The canonical storage copy

use crosside_fs::{NormalizedPath, io};

use crate::kind::ArtifactKind;
use crate::time::Timestamp;
use crate::{Error, Result};

/// Directory holding one file per artifact kind plus the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Storage {
    root: NormalizedPath,
}

impl Storage {
    pub fn new(root: impl Into<NormalizedPath>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &NormalizedPath {
        &self.root
    }

    pub fn path(&self, kind: ArtifactKind) -> NormalizedPath {
        self.root.join(kind.storage_file())
    }

    pub fn ensure_dir(&self) -> Result<()> {
        io::ensure_dir(&self.root)?;
        Ok(())
    }

    pub fn exists(&self, kind: ArtifactKind) -> bool {
        self.path(kind).is_file()
    }

    pub fn read(&self, kind: ArtifactKind) -> Result<String> {
        let path = self.path(kind);
        io::read_text(&path).map_err(|e| {
            if e.is_not_found() {
                Error::not_found(format!("storage copy of {kind}"), &path)
            } else {
                e.into()
            }
        })
    }

    pub fn write(&self, kind: ArtifactKind, content: &str) -> Result<()> {
        let path = self.path(kind);
        io::write_text(&path, content)?;
        tracing::debug!(kind = %kind, path = %path, "updated storage copy");
        Ok(())
    }

    /// Filesystem modification time of the storage copy.
    ///
    /// Fails with [`Error::NotFound`] if the copy has never been created.
    pub fn modified(&self, kind: ArtifactKind) -> Result<Timestamp> {
        let path = self.path(kind);
        io::modified_millis(&path)
            .map(Timestamp::from_millis)
            .map_err(|e| {
                if e.is_not_found() {
                    Error::not_found(format!("storage copy of {kind}"), &path)
                } else {
                    e.into()
                }
            })
    }
}
