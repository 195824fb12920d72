//! Reconciliation passes against a sandboxed installation

mod common;

use common::{FakeHost, Sandbox, set_mtime};
use crosside_content::{read_recommendations, recommendations_document};
use crosside_core::{ArtifactKind, ExtensionDiff, Outcome, Timestamp};
use pretty_assertions::assert_eq;

const SETTINGS: &str = "{\n  // editor\n  \"editor.fontSize\": 14,\n}\n";
const STORED_SETTINGS: &str = "{\n  \"editor.fontSize\": 16\n}\n";

fn strings(ids: &[&str]) -> Vec<String> {
    ids.iter().map(|s| s.to_string()).collect()
}

fn write_manifest(sandbox: &Sandbox) {
    sandbox.write_target(ArtifactKind::Extensions, "[]");
}

#[tokio::test]
async fn first_sync_seeds_storage_from_the_target() {
    let sandbox = Sandbox::new();
    sandbox.write_target(ArtifactKind::Settings, SETTINGS);

    let report = sandbox.engine().sync_kind(ArtifactKind::Settings).await;

    assert_eq!(report.outcome, Outcome::Seeded);
    assert_eq!(sandbox.read_storage(ArtifactKind::Settings), SETTINGS);
    assert_eq!(sandbox.recorded(ArtifactKind::Settings), None);
}

#[tokio::test]
async fn seeding_extensions_stores_the_installed_list() {
    let sandbox = Sandbox::with_host(FakeHost::with_installed(&["Vue.Volar", "eamodio.gitlens"]));

    let report = sandbox.engine().sync_kind(ArtifactKind::Extensions).await;

    assert_eq!(report.outcome, Outcome::Seeded);
    assert_eq!(
        sandbox.read_storage(ArtifactKind::Extensions),
        recommendations_document(&["vue.volar", "eamodio.gitlens"])
    );
}

#[tokio::test]
async fn newer_storage_is_pulled_into_the_target() {
    let sandbox = Sandbox::new();
    sandbox.write_target(ArtifactKind::Settings, SETTINGS);
    sandbox.write_storage(ArtifactKind::Settings, STORED_SETTINGS, 5000);
    sandbox.record(ArtifactKind::Settings, 1000);

    let before = Timestamp::now();
    let report = sandbox.engine().sync_kind(ArtifactKind::Settings).await;

    assert_eq!(report.outcome, Outcome::PulledFromStorage);
    assert_eq!(sandbox.read_target(ArtifactKind::Settings), STORED_SETTINGS);
    assert!(sandbox.recorded(ArtifactKind::Settings).unwrap() >= before);
}

#[tokio::test]
async fn pulling_identical_content_leaves_the_target_file_alone() {
    let sandbox = Sandbox::new();
    sandbox.write_target(ArtifactKind::Settings, STORED_SETTINGS);
    set_mtime(&sandbox.target_path(ArtifactKind::Settings), 2000);
    sandbox.write_storage(ArtifactKind::Settings, STORED_SETTINGS, 5000);
    sandbox.record(ArtifactKind::Settings, 1000);

    let report = sandbox.engine().sync_kind(ArtifactKind::Settings).await;

    assert_eq!(report.outcome, Outcome::PulledFromStorage);
    let target = crosside_fs::NormalizedPath::new(sandbox.target_path(ArtifactKind::Settings));
    assert_eq!(crosside_fs::io::modified_millis(&target).unwrap(), 2000);
}

#[tokio::test]
async fn newer_target_is_pushed_to_storage() {
    let sandbox = Sandbox::new();
    sandbox.write_target(ArtifactKind::Keybindings, "[{\"key\": \"ctrl+k\"}]\n");
    sandbox.write_storage(ArtifactKind::Keybindings, "[]\n", 1000);
    sandbox.record(ArtifactKind::Keybindings, 5000);

    let report = sandbox.engine().sync_kind(ArtifactKind::Keybindings).await;

    assert_eq!(report.outcome, Outcome::PushedToStorage);
    assert_eq!(sandbox.read_storage(ArtifactKind::Keybindings), "[{\"key\": \"ctrl+k\"}]\n");
    assert!(sandbox.recorded(ArtifactKind::Keybindings).unwrap() > Timestamp::from_millis(5000));
}

#[tokio::test]
async fn pushing_identical_content_is_unchanged() {
    let sandbox = Sandbox::new();
    sandbox.write_target(ArtifactKind::Settings, SETTINGS);
    sandbox.write_storage(ArtifactKind::Settings, SETTINGS, 1000);
    sandbox.record(ArtifactKind::Settings, 5000);

    let report = sandbox.engine().sync_kind(ArtifactKind::Settings).await;

    assert_eq!(report.outcome, Outcome::Unchanged);
    assert_eq!(sandbox.recorded(ArtifactKind::Settings), Some(Timestamp::from_millis(5000)));
}

#[tokio::test]
async fn equal_times_leave_both_sides_alone() {
    let sandbox = Sandbox::new();
    sandbox.write_target(ArtifactKind::Settings, SETTINGS);
    sandbox.write_storage(ArtifactKind::Settings, STORED_SETTINGS, 3000);
    sandbox.record(ArtifactKind::Settings, 3000);

    let report = sandbox.engine().sync_kind(ArtifactKind::Settings).await;

    assert_eq!(report.outcome, Outcome::Unchanged);
    assert_eq!(sandbox.read_target(ArtifactKind::Settings), SETTINGS);
    assert_eq!(sandbox.read_storage(ArtifactKind::Settings), STORED_SETTINGS);
}

#[tokio::test]
async fn unrecorded_installation_takes_the_storage_copy() {
    let sandbox = Sandbox::new();
    sandbox.write_target(ArtifactKind::Settings, SETTINGS);
    sandbox.write_storage(ArtifactKind::Settings, STORED_SETTINGS, 1000);

    let report = sandbox.engine().sync_kind(ArtifactKind::Settings).await;

    assert_eq!(report.outcome, Outcome::PulledFromStorage);
    assert_eq!(sandbox.read_target(ArtifactKind::Settings), STORED_SETTINGS);
}

#[tokio::test]
async fn second_sync_after_a_pull_is_stable() {
    let sandbox = Sandbox::new();
    sandbox.write_target(ArtifactKind::Settings, SETTINGS);
    sandbox.write_storage(ArtifactKind::Settings, STORED_SETTINGS, 5000);
    sandbox.record(ArtifactKind::Settings, 1000);
    let engine = sandbox.engine();

    engine.sync_kind(ArtifactKind::Settings).await;
    let report = engine.sync_kind(ArtifactKind::Settings).await;

    assert_eq!(report.outcome, Outcome::Unchanged);
    assert_eq!(sandbox.read_storage(ArtifactKind::Settings), STORED_SETTINGS);
}

#[tokio::test]
async fn missing_target_fails_only_its_own_kind() {
    let sandbox = Sandbox::new();
    sandbox.write_target(ArtifactKind::Settings, SETTINGS);
    sandbox.write_storage(ArtifactKind::Settings, STORED_SETTINGS, 5000);
    sandbox.record(ArtifactKind::Settings, 1000);
    sandbox.write_storage(ArtifactKind::Keybindings, "[]\n", 5000);
    sandbox.record(ArtifactKind::Keybindings, 1000);

    let profile = sandbox.engine().sync_profile().await;

    assert!(!profile.success());
    assert!(matches!(
        profile.get(ArtifactKind::Keybindings).unwrap().outcome,
        Outcome::Failed { .. }
    ));
    assert_eq!(
        profile.get(ArtifactKind::Settings).unwrap().outcome,
        Outcome::PulledFromStorage
    );
    assert_eq!(profile.get(ArtifactKind::Extensions).unwrap().outcome, Outcome::Seeded);
    assert_eq!(sandbox.read_target(ArtifactKind::Settings), STORED_SETTINGS);
}

#[tokio::test]
async fn profile_reports_every_kind_in_order() {
    let sandbox = Sandbox::new();
    sandbox.write_target(ArtifactKind::Settings, SETTINGS);
    sandbox.write_target(ArtifactKind::Keybindings, "[]\n");

    let profile = sandbox.engine().sync_profile().await;

    let kinds: Vec<ArtifactKind> = profile.kinds.iter().map(|r| r.kind).collect();
    assert_eq!(kinds, ArtifactKind::ALL.to_vec());
    assert!(profile.success());
    assert!(profile.kinds.iter().all(|r| r.outcome == Outcome::Seeded));
}

#[tokio::test]
async fn extensions_pull_installs_and_uninstalls() {
    let sandbox = Sandbox::with_host(FakeHost::with_installed(&[
        "c.d",
        "x.y",
        "octohash.crosside-sync",
    ]));
    write_manifest(&sandbox);
    sandbox.write_storage(
        ArtifactKind::Extensions,
        &recommendations_document(&["A.B", "c.d"]),
        5000,
    );
    sandbox.record(ArtifactKind::Extensions, 1000);

    let report = sandbox.engine().sync_kind(ArtifactKind::Extensions).await;

    assert_eq!(report.outcome, Outcome::PulledFromStorage);
    assert_eq!(
        sandbox.host.applied(),
        vec![(
            ExtensionDiff {
                to_install: strings(&["a.b"]),
                to_delete: strings(&["x.y"]),
            },
            false
        )]
    );
    assert_eq!(
        sandbox.host.installed(),
        strings(&["c.d", "octohash.crosside-sync", "a.b"])
    );
}

#[tokio::test]
async fn matching_extensions_need_no_host_changes() {
    let sandbox = Sandbox::with_host(FakeHost::with_installed(&["a.b"]));
    write_manifest(&sandbox);
    sandbox.write_storage(ArtifactKind::Extensions, &recommendations_document(&["A.B"]), 5000);
    sandbox.record(ArtifactKind::Extensions, 1000);

    let report = sandbox.engine().sync_kind(ArtifactKind::Extensions).await;

    assert_eq!(report.outcome, Outcome::Unchanged);
    assert!(sandbox.host.applied().is_empty());
    assert!(sandbox.recorded(ArtifactKind::Extensions).unwrap() > Timestamp::from_millis(1000));
}

#[tokio::test]
async fn declined_extension_changes_are_not_recorded() {
    let sandbox = Sandbox::with_host(FakeHost::with_installed(&["x.y"]).declining());
    write_manifest(&sandbox);
    sandbox.write_storage(ArtifactKind::Extensions, &recommendations_document(&["a.b"]), 5000);
    sandbox.record(ArtifactKind::Extensions, 1000);

    let report = sandbox.engine().sync_kind(ArtifactKind::Extensions).await;

    assert_eq!(report.outcome, Outcome::Declined);
    assert_eq!(sandbox.host.installed(), strings(&["x.y"]));
    assert_eq!(sandbox.recorded(ArtifactKind::Extensions), Some(Timestamp::from_millis(1000)));
}

#[tokio::test]
async fn failed_extension_items_are_reported() {
    let sandbox = Sandbox::with_host(FakeHost::with_installed(&[]).failing(&["bad.ext"]));
    write_manifest(&sandbox);
    sandbox.write_storage(
        ArtifactKind::Extensions,
        &recommendations_document(&["good.ext", "bad.ext"]),
        5000,
    );
    sandbox.record(ArtifactKind::Extensions, 1000);

    let report = sandbox.engine().sync_kind(ArtifactKind::Extensions).await;

    assert_eq!(
        report.outcome,
        Outcome::PartiallyApplied {
            failed: strings(&["bad.ext"])
        }
    );
    assert!(report.outcome.is_failure());
    assert_eq!(sandbox.host.installed(), strings(&["good.ext"]));
    assert_eq!(sandbox.recorded(ArtifactKind::Extensions), Some(Timestamp::from_millis(1000)));
}

#[tokio::test]
async fn failed_extensions_stay_in_storage_and_are_retried() {
    let sandbox = Sandbox::with_host(FakeHost::with_installed(&[]).failing(&["bad.ext"]));
    write_manifest(&sandbox);
    let stored = recommendations_document(&["good.ext", "bad.ext"]);
    sandbox.write_storage(ArtifactKind::Extensions, &stored, 5000);
    sandbox.record(ArtifactKind::Extensions, 1000);
    let engine = sandbox.engine();

    engine.sync_kind(ArtifactKind::Extensions).await;
    let second = engine.sync_kind(ArtifactKind::Extensions).await;

    assert_eq!(
        second.outcome,
        Outcome::PartiallyApplied {
            failed: strings(&["bad.ext"])
        }
    );
    assert_eq!(sandbox.read_storage(ArtifactKind::Extensions), stored);
    assert_eq!(sandbox.host.applied().len(), 2);
    assert_eq!(sandbox.host.applied()[1].0.to_install, strings(&["bad.ext"]));
}

#[tokio::test]
async fn missing_manifest_lets_storage_win() {
    let sandbox = Sandbox::new();
    sandbox.write_storage(ArtifactKind::Extensions, &recommendations_document(&["a.b"]), 1000);
    sandbox.record(ArtifactKind::Extensions, 5000);

    let report = sandbox.engine().sync_kind(ArtifactKind::Extensions).await;

    assert_eq!(report.outcome, Outcome::PulledFromStorage);
    assert_eq!(sandbox.host.installed(), strings(&["a.b"]));
}

#[tokio::test]
async fn extensions_push_keeps_comments_and_stored_spelling() {
    let stored = "{\n  // shared\n  \"recommendations\": [\n    // vue\n    \"Vue.Volar\",\n    \"old.one\" // retired\n  ]\n}\n";
    let sandbox = Sandbox::with_host(FakeHost::with_installed(&["vue.volar", "New.One"]));
    write_manifest(&sandbox);
    sandbox.write_storage(ArtifactKind::Extensions, stored, 1000);
    sandbox.record(ArtifactKind::Extensions, 5000);

    let report = sandbox.engine().sync_kind(ArtifactKind::Extensions).await;

    assert_eq!(report.outcome, Outcome::PushedToStorage);
    let text = sandbox.read_storage(ArtifactKind::Extensions);
    assert_eq!(read_recommendations(&text).unwrap(), strings(&["Vue.Volar", "new.one"]));
    assert!(text.contains("// shared"));
    assert!(text.contains("// vue"));
    assert!(!text.contains("// retired"));
    assert!(sandbox.host.applied().is_empty());
}

#[tokio::test]
async fn watcher_push_skips_when_storage_is_newer() {
    let sandbox = Sandbox::new();
    sandbox.write_target(ArtifactKind::Settings, SETTINGS);
    sandbox.write_storage(ArtifactKind::Settings, STORED_SETTINGS, 5000);
    sandbox.record(ArtifactKind::Settings, 1000);

    let report = sandbox.engine().push_to_storage(ArtifactKind::Settings).await;

    assert!(matches!(report.outcome, Outcome::Skipped { .. }));
    assert_eq!(sandbox.read_storage(ArtifactKind::Settings), STORED_SETTINGS);
    assert_eq!(sandbox.read_target(ArtifactKind::Settings), SETTINGS);
}

#[tokio::test]
async fn watcher_push_writes_storage_when_target_is_newer() {
    let sandbox = Sandbox::new();
    sandbox.write_target(ArtifactKind::Settings, SETTINGS);
    sandbox.write_storage(ArtifactKind::Settings, STORED_SETTINGS, 1000);
    sandbox.record(ArtifactKind::Settings, 5000);

    let report = sandbox.engine().push_to_storage(ArtifactKind::Settings).await;

    assert_eq!(report.outcome, Outcome::PushedToStorage);
    assert_eq!(sandbox.read_storage(ArtifactKind::Settings), SETTINGS);
}
