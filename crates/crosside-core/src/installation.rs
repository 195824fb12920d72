//! Installation identity and the known editor table

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Opaque identity of one editor installation, compared by exact match.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Installation(String);

/// Layout facts about an editor product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KnownEditor {
    /// Product name, also the installation identity
    pub product: &'static str,
    /// Directory name under the platform config dir
    pub data_dir: &'static str,
    /// Extensions directory relative to the home directory
    pub extensions_dir: &'static str,
    /// Command line launcher
    pub cli: &'static str,
}

pub const KNOWN_EDITORS: &[KnownEditor] = &[
    KnownEditor {
        product: "Visual Studio Code",
        data_dir: "Code",
        extensions_dir: ".vscode/extensions",
        cli: "code",
    },
    KnownEditor {
        product: "Visual Studio Code - Insiders",
        data_dir: "Code - Insiders",
        extensions_dir: ".vscode-insiders/extensions",
        cli: "code-insiders",
    },
    KnownEditor {
        product: "VSCodium",
        data_dir: "VSCodium",
        extensions_dir: ".vscode-oss/extensions",
        cli: "codium",
    },
    KnownEditor {
        product: "VSCodium - Insiders",
        data_dir: "VSCodium - Insiders",
        extensions_dir: ".vscode-oss/extensions",
        cli: "codium-insiders",
    },
    KnownEditor {
        product: "Cursor",
        data_dir: "Cursor",
        extensions_dir: ".cursor/extensions",
        cli: "cursor",
    },
    KnownEditor {
        product: "Windsurf",
        data_dir: "Windsurf",
        extensions_dir: ".windsurf/extensions",
        cli: "windsurf",
    },
];

impl Installation {
    pub fn new(identity: impl Into<String>) -> Self {
        Self(identity.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn known(&self) -> Option<&'static KnownEditor> {
        KNOWN_EDITORS.iter().find(|e| e.product == self.0)
    }

    /// Directory name under the platform config dir.
    ///
    /// Unknown identities are used verbatim.
    pub fn data_dir_name(&self) -> &str {
        self.known().map_or(self.0.as_str(), |e| e.data_dir)
    }

    pub fn default_extensions_dir(&self) -> Option<PathBuf> {
        let editor = self.known()?;
        dirs::home_dir().map(|home| home.join(editor.extensions_dir))
    }

    pub fn cli_command(&self) -> Option<&'static str> {
        self.known().map(|e| e.cli)
    }
}

impl fmt::Display for Installation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Installation {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
