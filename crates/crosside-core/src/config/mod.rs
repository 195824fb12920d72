//! User configuration
//!
//! Loaded from `<config dir>/crosside-sync/config.toml` (or any `.toml` /
//! `.json` path given explicitly). Every field has a default, so a missing
//! file or a partial one is fine.

use std::path::PathBuf;
use std::time::Duration;

use crosside_fs::{ConfigStore, NormalizedPath, expand_home};
use serde::{Deserialize, Serialize};

use crate::extensions::ExtensionFilter;
use crate::installation::Installation;
use crate::storage::Storage;
use crate::{Error, Result};

/// Directory name under the platform config dir.
pub const CONFIG_DIR_NAME: &str = "crosside-sync";
pub const CONFIG_FILE: &str = "config.toml";

/// Identifier of this tool's own editor extension.
pub const SELF_EXTENSION_ID: &str = "octohash.crosside-sync";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Storage directory, `~` is expanded
    pub storage_path: String,
    /// Identity of the installation being synced
    pub installation: String,
    /// Run a full sync when `watch` starts
    pub auto_sync: bool,
    pub prompt_on_auto_sync: bool,
    /// Ask before installing or uninstalling extensions
    pub prompt_on_extension_sync: bool,
    pub exclude_extensions: Vec<String>,
    /// Never uninstalled by a sync
    pub protected_extensions: Vec<String>,
    /// Quiet period of the watch pipeline in milliseconds
    pub debounce_ms: u64,
    pub paths: PathOverrides,
}

/// Optional replacements for platform discovery.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathOverrides {
    pub user_dir: Option<String>,
    pub extensions_dir: Option<String>,
    pub editor_cli: Option<String>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            storage_path: "~/.crosside-sync".to_string(),
            installation: "Visual Studio Code".to_string(),
            auto_sync: true,
            prompt_on_auto_sync: false,
            prompt_on_extension_sync: true,
            exclude_extensions: Vec::new(),
            protected_extensions: vec![SELF_EXTENSION_ID.to_string()],
            debounce_ms: 500,
            paths: PathOverrides::default(),
        }
    }
}

impl SyncConfig {
    /// Default config file location.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE))
    }

    /// Load from `path`, or from [`SyncConfig::default_path`] when `None`.
    ///
    /// A missing file yields the defaults.
    pub fn load(path: Option<&NormalizedPath>) -> Result<Self> {
        let path = match path {
            Some(path) => path.clone(),
            None => match Self::default_path() {
                Some(path) => NormalizedPath::from(path),
                None => {
                    tracing::debug!("no platform config directory, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        let config: Self = ConfigStore::new().load_or_default(&path)?;
        config.validate()?;
        tracing::debug!(path = %path, installation = %config.installation, "loaded configuration");
        Ok(config)
    }

    pub fn save(&self, path: &NormalizedPath) -> Result<()> {
        ConfigStore::new().save(path, self)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.storage_path.trim().is_empty() {
            return Err(Error::Config {
                message: "storage_path must not be empty".into(),
            });
        }
        if self.installation.trim().is_empty() {
            return Err(Error::Config {
                message: "installation must not be empty".into(),
            });
        }
        Ok(())
    }

    pub fn storage(&self) -> Storage {
        Storage::new(expand_home(&self.storage_path))
    }

    pub fn installation(&self) -> Installation {
        Installation::new(self.installation.as_str())
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn extension_filter(&self) -> ExtensionFilter {
        ExtensionFilter::new(&self.exclude_extensions, &self.protected_extensions)
    }

    /// Editor launcher: the override, else the known product's command.
    pub fn editor_cli(&self) -> Option<String> {
        self.paths
            .editor_cli
            .clone()
            .or_else(|| self.installation().cli_command().map(str::to_string))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults() {
        let config = SyncConfig::default();
        assert_eq!(config.debounce(), Duration::from_millis(500));
        assert_eq!(config.protected_extensions, vec![SELF_EXTENSION_ID]);
        assert_eq!(config.editor_cli().as_deref(), Some("code"));
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = NormalizedPath::new(dir.path().join("config.toml"));
        std::fs::write(
            path.to_native(),
            "installation = \"Cursor\"\ndebounce_ms = 50\n\n[paths]\nuser_dir = \"/tmp/user\"\n",
        )
        .unwrap();

        let config = SyncConfig::load(Some(&path)).unwrap();
        assert_eq!(config.installation, "Cursor");
        assert_eq!(config.debounce_ms, 50);
        assert_eq!(config.paths.user_dir.as_deref(), Some("/tmp/user"));
        assert!(config.auto_sync);
        assert_eq!(config.editor_cli().as_deref(), Some("cursor"));
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = NormalizedPath::new(dir.path().join("absent.toml"));
        assert_eq!(SyncConfig::load(Some(&path)).unwrap(), SyncConfig::default());
    }

    #[test]
    fn empty_installation_is_rejected() {
        let config = SyncConfig {
            installation: " ".into(),
            ..SyncConfig::default()
        };
        assert!(matches!(config.validate(), Err(Error::Config { .. })));
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = NormalizedPath::new(dir.path().join("config.json"));
        let config = SyncConfig {
            exclude_extensions: vec!["a.b".into()],
            ..SyncConfig::default()
        };

        config.save(&path).unwrap();
        assert_eq!(SyncConfig::load(Some(&path)).unwrap(), config);
    }
}
