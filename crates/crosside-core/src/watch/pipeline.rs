//! Debounced push-to-storage on local changes

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use crate::kind::ArtifactKind;
use crate::sync::{KindReport, SyncEngine};

use super::Debouncer;

/// Turns "target changed" notifications into debounced pushes.
///
/// At most one push per kind is pending at a time; each notification
/// restarts that kind's quiet period.
pub struct ChangeWatchPipeline {
    engine: Arc<SyncEngine>,
    debouncer: Debouncer<ArtifactKind>,
    reports: Option<mpsc::UnboundedSender<KindReport>>,
}

impl ChangeWatchPipeline {
    pub fn new(engine: Arc<SyncEngine>, quiet_period: Duration) -> Self {
        Self {
            engine,
            debouncer: Debouncer::new(quiet_period),
            reports: None,
        }
    }

    /// Send the report of every fired push to `reports`.
    pub fn with_reports(mut self, reports: mpsc::UnboundedSender<KindReport>) -> Self {
        self.reports = Some(reports);
        self
    }

    /// The target side of `kind` changed.
    pub fn notify(&self, kind: ArtifactKind) {
        tracing::debug!(kind = %kind, "target change noticed");
        let engine = Arc::clone(&self.engine);
        let reports = self.reports.clone();

        self.debouncer.schedule(kind, move || async move {
            let report = engine.push_to_storage(kind).await;
            if let Some(reports) = reports
                && reports.send(report).is_err()
            {
                tracing::debug!(kind = %kind, "report receiver gone");
            }
        });
    }

    pub fn is_pending(&self, kind: ArtifactKind) -> bool {
        self.debouncer.is_pending(&kind)
    }

    /// Cancel all pending pushes without running them.
    pub fn dispose(&self) {
        let pending = self.debouncer.pending();
        self.debouncer.cancel_all();
        tracing::debug!(cancelled = pending, "watch pipeline disposed");
    }
}
