//! File system events mapped to artifact kinds

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crosside_fs::NormalizedPath;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::kind::ArtifactKind;
use crate::{Error, Result};

/// Watches the target files and reports which kind changed.
///
/// Parent directories are watched rather than the files, since editors
/// often replace a file instead of writing it in place. Dropping the bridge
/// stops watching.
pub struct FileWatchBridge {
    _watcher: RecommendedWatcher,
    watched: Vec<(ArtifactKind, NormalizedPath)>,
}

impl FileWatchBridge {
    /// Start watching `targets`; changes arrive on the returned channel.
    pub fn start(
        targets: Vec<(ArtifactKind, NormalizedPath)>,
    ) -> Result<(Self, mpsc::UnboundedReceiver<ArtifactKind>)> {
        if targets.is_empty() {
            return Err(Error::Watch {
                message: "no target files to watch".into(),
            });
        }

        let (tx, rx) = mpsc::unbounded_channel();
        let by_path: HashMap<PathBuf, ArtifactKind> = targets
            .iter()
            .map(|(kind, path)| (path.to_native(), *kind))
            .collect();

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| match res {
            Ok(event) => {
                for kind in kinds_for_event(&event, &by_path) {
                    if tx.send(kind).is_err() {
                        return;
                    }
                }
            }
            Err(e) => tracing::warn!(error = %e, "watch error"),
        })?;

        let mut dirs: Vec<PathBuf> = targets
            .iter()
            .filter_map(|(_, path)| path.to_native().parent().map(Path::to_path_buf))
            .collect();
        dirs.sort();
        dirs.dedup();

        for dir in &dirs {
            watcher.watch(dir, RecursiveMode::NonRecursive)?;
            tracing::info!(path = %dir.display(), "watching directory");
        }

        Ok((
            Self {
                _watcher: watcher,
                watched: targets,
            },
            rx,
        ))
    }

    pub fn watched(&self) -> &[(ArtifactKind, NormalizedPath)] {
        &self.watched
    }
}

/// Kinds whose target file is touched by `event`.
fn kinds_for_event(event: &Event, by_path: &HashMap<PathBuf, ArtifactKind>) -> Vec<ArtifactKind> {
    if !matches!(
        event.kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    ) {
        return Vec::new();
    }

    let mut kinds: Vec<ArtifactKind> = event
        .paths
        .iter()
        .filter_map(|path| by_path.get(path).copied())
        .collect();
    kinds.dedup();
    kinds
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{AccessKind, ModifyKind};

    fn table() -> HashMap<PathBuf, ArtifactKind> {
        HashMap::from([
            (PathBuf::from("/user/settings.json"), ArtifactKind::Settings),
            (PathBuf::from("/user/keybindings.json"), ArtifactKind::Keybindings),
        ])
    }

    #[test]
    fn modify_maps_to_kind() {
        let event = Event::new(EventKind::Modify(ModifyKind::Any))
            .add_path(PathBuf::from("/user/keybindings.json"));
        assert_eq!(kinds_for_event(&event, &table()), vec![ArtifactKind::Keybindings]);
    }

    #[test]
    fn unrelated_files_and_access_are_ignored() {
        let other = Event::new(EventKind::Modify(ModifyKind::Any))
            .add_path(PathBuf::from("/user/tasks.json"));
        assert!(kinds_for_event(&other, &table()).is_empty());

        let access = Event::new(EventKind::Access(AccessKind::Any))
            .add_path(PathBuf::from("/user/settings.json"));
        assert!(kinds_for_event(&access, &table()).is_empty());
    }

    #[test]
    fn empty_target_list_is_an_error() {
        assert!(matches!(FileWatchBridge::start(Vec::new()), Err(Error::Watch { .. })));
    }
}
