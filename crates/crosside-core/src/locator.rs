//! Discovery of target-side files for an installation

use std::path::PathBuf;

use crosside_fs::{NormalizedPath, expand_home};

use crate::config::PathOverrides;
use crate::installation::Installation;
use crate::kind::{ArtifactKind, TargetSource};

/// VS Code's manifest of installed extensions, rewritten on every
/// install and uninstall.
pub const EXTENSIONS_MANIFEST: &str = "extensions.json";

/// Finds the live files of an installation.
pub trait TargetLocator: Send + Sync {
    /// Path of an existing config file in the installation's `User`
    /// directory, `None` when it cannot be found.
    fn locate_config_file(&self, installation: &Installation, filename: &str)
    -> Option<NormalizedPath>;

    /// Path of the installed-extensions manifest, if present.
    fn locate_extensions_manifest(&self, installation: &Installation) -> Option<NormalizedPath>;

    /// Target file for an artifact kind.
    fn locate(&self, installation: &Installation, kind: ArtifactKind) -> Option<NormalizedPath> {
        match kind.spec().target {
            TargetSource::ConfigFile(filename) => self.locate_config_file(installation, filename),
            TargetSource::InstalledExtensions => self.locate_extensions_manifest(installation),
        }
    }
}

/// Locates files in the platform's standard editor directories.
///
/// Configured overrides are tried first, then `<config dir>/<name>/User`,
/// and on Linux also `~/.config/<name>/User`.
#[derive(Debug, Clone, Default)]
pub struct PlatformLocator {
    user_dir: Option<PathBuf>,
    extensions_dir: Option<PathBuf>,
}

impl PlatformLocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_overrides(paths: &PathOverrides) -> Self {
        Self {
            user_dir: paths.user_dir.as_deref().map(expand_home),
            extensions_dir: paths.extensions_dir.as_deref().map(expand_home),
        }
    }

    pub fn with_user_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.user_dir = Some(dir.into());
        self
    }

    pub fn with_extensions_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.extensions_dir = Some(dir.into());
        self
    }

    /// Candidate `User` directories in lookup order.
    pub fn user_dir_candidates(&self, installation: &Installation) -> Vec<PathBuf> {
        let name = installation.data_dir_name();
        let mut candidates = Vec::new();

        if let Some(dir) = &self.user_dir {
            candidates.push(dir.clone());
        }
        if let Some(config) = dirs::config_dir() {
            candidates.push(config.join(name).join("User"));
        }
        if cfg!(target_os = "linux")
            && let Some(home) = dirs::home_dir()
        {
            candidates.push(home.join(".config").join(name).join("User"));
        }

        candidates.dedup();
        candidates
    }

    fn extensions_dir_candidates(&self, installation: &Installation) -> Vec<PathBuf> {
        self.extensions_dir
            .clone()
            .into_iter()
            .chain(installation.default_extensions_dir())
            .collect()
    }
}

fn first_existing(candidates: Vec<PathBuf>, filename: &str) -> Option<NormalizedPath> {
    candidates
        .into_iter()
        .map(|dir| dir.join(filename))
        .find(|path| path.is_file())
        .map(NormalizedPath::from)
}

impl TargetLocator for PlatformLocator {
    fn locate_config_file(
        &self,
        installation: &Installation,
        filename: &str,
    ) -> Option<NormalizedPath> {
        let found = first_existing(self.user_dir_candidates(installation), filename);
        match &found {
            Some(path) => tracing::debug!(installation = %installation, path = %path, "found config file"),
            None => tracing::warn!(installation = %installation, file = filename, "config file not found"),
        }
        found
    }

    fn locate_extensions_manifest(&self, installation: &Installation) -> Option<NormalizedPath> {
        let found = first_existing(self.extensions_dir_candidates(installation), EXTENSIONS_MANIFEST);
        if found.is_none() {
            tracing::warn!(installation = %installation, "extensions manifest not found");
        }
        found
    }
}
