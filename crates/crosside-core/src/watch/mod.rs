//! Change watching
//!
//! [`FileWatchBridge`] turns file system events into artifact kinds,
//! [`ChangeWatchPipeline`] debounces them per kind with a [`Debouncer`] and
//! pushes the target side to storage once things settle.

mod debounce;
mod files;
mod pipeline;

pub use debounce::Debouncer;
pub use files::FileWatchBridge;
pub use pipeline::ChangeWatchPipeline;
