//! Configuration and engine wiring shared by all commands

use std::path::Path;
use std::sync::Arc;

use crosside_core::{PlatformLocator, SyncConfig, SyncEngine, SyncOptions};
use crosside_fs::NormalizedPath;

use crate::error::Result;
use crate::host::EditorCliHost;

/// Loaded configuration plus an engine for the configured installation.
pub struct AppContext {
    pub config: SyncConfig,
    pub engine: Arc<SyncEngine>,
}

impl AppContext {
    /// Load the configuration from `config_path` (or the default location)
    /// and build the engine. `assume_yes` disables every confirmation.
    pub fn load(config_path: Option<&Path>, assume_yes: bool) -> Result<Self> {
        let config_path = config_path.map(NormalizedPath::new);
        let config = SyncConfig::load(config_path.as_ref())?;

        let locator = PlatformLocator::from_overrides(&config.paths);
        let host = EditorCliHost::new(config.editor_cli());
        let engine = SyncEngine::from_config(&config, Arc::new(locator), Arc::new(host))
            .with_options(SyncOptions {
                confirm_extensions: config.prompt_on_extension_sync && !assume_yes,
            });

        tracing::debug!(
            installation = %config.installation,
            storage = %engine.storage().root(),
            "context ready"
        );
        Ok(Self {
            config,
            engine: Arc::new(engine),
        })
    }
}
