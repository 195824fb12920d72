//! Error types for crosside-core

/// Result type for crosside-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in crosside-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A storage copy, target file or installation directory is missing
    #[error("{what} not found at {path}")]
    NotFound { what: String, path: String },

    /// The ledger file exists but cannot be used
    #[error("Ledger error: {message}")]
    Ledger { message: String },

    #[error("Invalid configuration: {message}")]
    Config { message: String },

    /// The editor refused or failed an extension operation
    #[error("Extension host error: {message}")]
    Host { message: String },

    /// Some extension installs or uninstalls failed
    #[error("Failed to apply extension changes: {}", failed.join(", "))]
    PartialApply { failed: Vec<String> },

    #[error("Watch error: {message}")]
    Watch { message: String },

    // Transparent wrappers for underlying crate errors
    /// Filesystem error from crosside-fs
    #[error(transparent)]
    Fs(#[from] crosside_fs::Error),

    /// Malformed document from crosside-content
    #[error(transparent)]
    Content(#[from] crosside_content::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// File watcher error
    #[error(transparent)]
    Notify(#[from] notify::Error),
}

impl Error {
    pub fn not_found(what: impl Into<String>, path: impl ToString) -> Self {
        Self::NotFound {
            what: what.into(),
            path: path.to_string(),
        }
    }

    /// True for missing artifacts, whichever layer reported them.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound { .. } => true,
            Self::Fs(e) => e.is_not_found(),
            Self::Io(e) => e.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }
}
