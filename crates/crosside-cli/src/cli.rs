//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use crosside_core::ArtifactKind;

/// crosside - Keep editor settings, keybindings and extensions in sync
#[derive(Parser, Debug)]
#[command(name = "crosside")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (TOML or JSON)
    #[arg(long, global = true, env = "CROSSIDE_CONFIG")]
    pub config: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Reconcile the editor with the storage copy once
    ///
    /// Examples:
    ///   crosside sync                 # settings, keybindings and extensions
    ///   crosside sync settings        # only settings.json
    ///   crosside sync extensions -y   # no confirmation prompt
    Sync {
        /// What to synchronize
        #[arg(value_enum, default_value_t = SyncTarget::Profile)]
        target: SyncTarget,

        /// Skip all confirmation prompts
        #[arg(short, long)]
        yes: bool,
    },

    /// Push local edits to storage as they happen, until Ctrl-C
    Watch {
        /// Skip all confirmation prompts
        #[arg(short, long)]
        yes: bool,
    },

    /// Show storage copies and recorded sync times
    Status {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },
}

/// Scope of a `sync` run
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncTarget {
    Profile,
    Settings,
    Keybindings,
    Extensions,
}

impl SyncTarget {
    /// The single kind to sync, `None` for the whole profile.
    pub fn kind(self) -> Option<ArtifactKind> {
        match self {
            Self::Profile => None,
            Self::Settings => Some(ArtifactKind::Settings),
            Self::Keybindings => Some(ArtifactKind::Keybindings),
            Self::Extensions => Some(ArtifactKind::Extensions),
        }
    }
}
