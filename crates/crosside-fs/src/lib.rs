//! Filesystem primitives for crosside-sync
//!
//! Provides normalized path handling, home-relative path expansion,
//! atomic locked writes, modification-time reads and a format-agnostic
//! configuration store.

pub mod config;
pub mod error;
pub mod io;
pub mod path;

pub use config::{ConfigFormat, ConfigStore};
pub use error::{Error, Result};
pub use path::{NormalizedPath, expand_home};
