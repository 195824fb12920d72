//! Reconciliation passes
//!
//! [`SyncEngine`] runs one pass per artifact kind and reports the outcome
//! of each as a [`KindReport`].

mod engine;
mod report;

pub use engine::{SyncEngine, SyncOptions};
pub use report::{KindReport, Outcome, ProfileReport};
