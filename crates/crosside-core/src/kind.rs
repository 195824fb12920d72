//! Artifact kinds and their per-kind strategy

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

/// One of the synchronized documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    Settings,
    Keybindings,
    Extensions,
}

/// Where the target side of an artifact lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetSource {
    /// A file in the installation's `User` directory
    ConfigFile(&'static str),
    /// The live set of installed extensions, tracked through the
    /// installation's extension manifest
    InstalledExtensions,
}

/// How content moves between the two sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transfer {
    /// Whole-file replacement
    Replace,
    /// Item-level merge of the recommendation list
    MergeRecommendations,
}

/// Everything the sync engine needs to know about one artifact kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArtifactSpec {
    pub kind: ArtifactKind,
    pub storage_file: &'static str,
    pub target: TargetSource,
    pub transfer: Transfer,
}

const SPECS: [ArtifactSpec; 3] = [
    ArtifactSpec {
        kind: ArtifactKind::Settings,
        storage_file: "settings.json",
        target: TargetSource::ConfigFile("settings.json"),
        transfer: Transfer::Replace,
    },
    ArtifactSpec {
        kind: ArtifactKind::Keybindings,
        storage_file: "keybindings.json",
        target: TargetSource::ConfigFile("keybindings.json"),
        transfer: Transfer::Replace,
    },
    ArtifactSpec {
        kind: ArtifactKind::Extensions,
        storage_file: "extensions.json",
        target: TargetSource::InstalledExtensions,
        transfer: Transfer::MergeRecommendations,
    },
];

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 3] = [Self::Settings, Self::Keybindings, Self::Extensions];

    pub fn spec(self) -> &'static ArtifactSpec {
        match self {
            Self::Settings => &SPECS[0],
            Self::Keybindings => &SPECS[1],
            Self::Extensions => &SPECS[2],
        }
    }

    /// Key used in the ledger file.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Settings => "settings",
            Self::Keybindings => "keybindings",
            Self::Extensions => "extensions",
        }
    }

    pub fn storage_file(self) -> &'static str {
        self.spec().storage_file
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArtifactKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::Config {
                message: format!(
                    "unknown artifact kind '{s}' (expected settings, keybindings or extensions)"
                ),
            })
    }
}
