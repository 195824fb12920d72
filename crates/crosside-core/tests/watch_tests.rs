//! Debounced pushes driven by target changes

mod common;

use std::fs;
use std::sync::Arc;
use std::time::Duration;

use common::Sandbox;
use crosside_core::{ArtifactKind, ChangeWatchPipeline, FileWatchBridge, Outcome};
use crosside_fs::NormalizedPath;
use pretty_assertions::assert_eq;
use tokio::sync::mpsc;

const QUIET: Duration = Duration::from_millis(500);

/// Storage older than the last recorded sync, so local edits get pushed.
fn pushable(sandbox: &Sandbox) {
    sandbox.write_target(ArtifactKind::Settings, "{}\n");
    sandbox.write_storage(ArtifactKind::Settings, "{}\n", 1000);
    sandbox.record(ArtifactKind::Settings, 5000);
}

#[tokio::test(start_paused = true)]
async fn burst_of_changes_pushes_once_with_the_last_content() {
    let sandbox = Sandbox::new();
    pushable(&sandbox);
    let (tx, mut rx) = mpsc::unbounded_channel();
    let pipeline = ChangeWatchPipeline::new(Arc::new(sandbox.engine()), QUIET).with_reports(tx);

    for i in 0..5 {
        sandbox.write_target(ArtifactKind::Settings, &format!("{{\"rev\": {i}}}\n"));
        pipeline.notify(ArtifactKind::Settings);
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    assert!(pipeline.is_pending(ArtifactKind::Settings));

    let report = rx.recv().await.unwrap();
    assert_eq!(report.kind, ArtifactKind::Settings);
    assert_eq!(report.outcome, Outcome::PushedToStorage);
    assert_eq!(sandbox.read_storage(ArtifactKind::Settings), "{\"rev\": 4}\n");

    tokio::time::sleep(QUIET * 4).await;
    assert!(rx.try_recv().is_err());
    assert!(!pipeline.is_pending(ArtifactKind::Settings));
}

#[tokio::test(start_paused = true)]
async fn dispose_cancels_pending_pushes() {
    let sandbox = Sandbox::new();
    pushable(&sandbox);
    let (tx, mut rx) = mpsc::unbounded_channel();
    let pipeline = ChangeWatchPipeline::new(Arc::new(sandbox.engine()), QUIET).with_reports(tx);

    sandbox.write_target(ArtifactKind::Settings, "{\"changed\": true}\n");
    pipeline.notify(ArtifactKind::Settings);
    pipeline.dispose();

    tokio::time::sleep(QUIET * 4).await;
    assert!(rx.try_recv().is_err());
    assert_eq!(sandbox.read_storage(ArtifactKind::Settings), "{}\n");
}

#[tokio::test(start_paused = true)]
async fn push_is_skipped_when_storage_became_newer() {
    let sandbox = Sandbox::new();
    sandbox.write_target(ArtifactKind::Settings, "{\"local\": 1}\n");
    sandbox.write_storage(ArtifactKind::Settings, "{\"remote\": 1}\n", 5000);
    sandbox.record(ArtifactKind::Settings, 1000);
    let (tx, mut rx) = mpsc::unbounded_channel();
    let pipeline = ChangeWatchPipeline::new(Arc::new(sandbox.engine()), QUIET).with_reports(tx);

    pipeline.notify(ArtifactKind::Settings);

    let report = rx.recv().await.unwrap();
    assert!(matches!(report.outcome, Outcome::Skipped { .. }));
    assert_eq!(sandbox.read_storage(ArtifactKind::Settings), "{\"remote\": 1}\n");
}

#[tokio::test(start_paused = true)]
async fn kinds_are_debounced_independently() {
    let sandbox = Sandbox::new();
    pushable(&sandbox);
    sandbox.write_target(ArtifactKind::Keybindings, "[]\n");
    sandbox.write_storage(ArtifactKind::Keybindings, "[]\n", 1000);
    sandbox.record(ArtifactKind::Keybindings, 5000);
    let (tx, mut rx) = mpsc::unbounded_channel();
    let pipeline = ChangeWatchPipeline::new(Arc::new(sandbox.engine()), QUIET).with_reports(tx);

    sandbox.write_target(ArtifactKind::Settings, "{\"a\": 1}\n");
    sandbox.write_target(ArtifactKind::Keybindings, "[{\"key\": \"f1\"}]\n");
    pipeline.notify(ArtifactKind::Settings);
    pipeline.notify(ArtifactKind::Keybindings);

    let mut kinds = vec![rx.recv().await.unwrap().kind, rx.recv().await.unwrap().kind];
    kinds.sort();
    assert_eq!(kinds, vec![ArtifactKind::Settings, ArtifactKind::Keybindings]);
    assert_eq!(sandbox.read_storage(ArtifactKind::Keybindings), "[{\"key\": \"f1\"}]\n");
}

#[tokio::test(flavor = "multi_thread")]
async fn file_watch_bridge_reports_target_writes() {
    let sandbox = Sandbox::new();
    sandbox.write_target(ArtifactKind::Settings, "{}\n");
    let target = NormalizedPath::new(sandbox.target_path(ArtifactKind::Settings));

    let (bridge, mut rx) = FileWatchBridge::start(vec![(ArtifactKind::Settings, target)]).unwrap();
    assert_eq!(bridge.watched().len(), 1);

    fs::write(sandbox.target_path(ArtifactKind::Settings), "{\"x\": 1}\n").unwrap();

    let kind = tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(kind, ArtifactKind::Settings);
}
