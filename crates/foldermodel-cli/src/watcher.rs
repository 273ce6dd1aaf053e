//! OS file watching for the folder model.
//!
//! [`NotifyWatcher`] implements the model's [`PathWatcher`] boundary on top
//! of [`notify`] with debouncing. Changed paths are handed to a callback as
//! [`WatchMessage`]s; the main loop turns them into model notifications
//! with [`dispatch`].
//!
//! Access events (opens, reads, closes without writing) are dropped. The
//! model opens files to check readability and lists folders on every
//! directory change, so reacting to accesses would feed on itself.

use std::path::{Path, PathBuf};
use std::time::Duration;

use foldermodel_core::{Change, CoreError, CoreResult, FolderModel, PathWatcher, WatchTarget};
use notify::event::{AccessKind, AccessMode, MetadataKind, ModifyKind};
use notify::EventKind;
use notify_debouncer_full::{new_debouncer, DebounceEventResult, Debouncer, RecommendedCache};

/// Messages from the watcher to the main event loop.
#[derive(Debug)]
pub enum WatchMessage {
    /// These paths changed since the last message.
    Changed(Vec<PathBuf>),
    /// An error occurred while watching.
    Error(String),
}

/// Debounced watcher over individual directories and files.
pub struct NotifyWatcher {
    debouncer: Debouncer<notify::RecommendedWatcher, RecommendedCache>,
}

impl NotifyWatcher {
    /// Creates a watcher that reports through `on_message`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying notify watcher cannot be initialised.
    pub fn new<F>(debounce: Duration, mut on_message: F) -> anyhow::Result<Self>
    where
        F: FnMut(WatchMessage) + Send + 'static,
    {
        let debouncer = new_debouncer(debounce, None, move |result: DebounceEventResult| {
            match result {
                Ok(events) => {
                    let mut paths: Vec<PathBuf> = Vec::new();
                    for event in events.iter().filter(|e| is_content_change(&e.kind)) {
                        for path in &event.paths {
                            if !paths.contains(path) {
                                paths.push(path.clone());
                            }
                        }
                    }
                    if !paths.is_empty() {
                        on_message(WatchMessage::Changed(paths));
                    }
                }
                Err(errors) => {
                    let message = errors
                        .iter()
                        .map(|e| e.to_string())
                        .collect::<Vec<_>>()
                        .join("; ");
                    on_message(WatchMessage::Error(message));
                }
            }
        })?;

        Ok(Self { debouncer })
    }
}

/// Returns `false` for events that only record someone looking at a path.
///
/// A close after writing still counts: it is the last event of a write.
pub fn is_content_change(kind: &EventKind) -> bool {
    match kind {
        EventKind::Access(AccessKind::Close(AccessMode::Write)) => true,
        EventKind::Access(_) => false,
        EventKind::Modify(ModifyKind::Metadata(MetadataKind::AccessTime)) => false,
        _ => true,
    }
}

impl PathWatcher for NotifyWatcher {
    fn watch(&mut self, path: &Path, _target: WatchTarget) -> CoreResult<()> {
        // Non-recursive: folders are flat, files are watched one by one.
        self.debouncer
            .watch(path, notify::RecursiveMode::NonRecursive)
            .map_err(|e| watch_error(path, e))
    }

    fn unwatch(&mut self, path: &Path, _target: WatchTarget) -> CoreResult<()> {
        self.debouncer
            .unwatch(path)
            .map_err(|e| watch_error(path, e))
    }
}

fn watch_error(path: &Path, e: notify::Error) -> CoreError {
    CoreError::Watch {
        path: path.to_path_buf(),
        message: e.to_string(),
    }
}

/// Feeds a batch of changed paths to `model`.
///
/// Each path is routed through the model's watch set. Directory changes
/// run before file changes within a batch, and duplicates run once, so a
/// rename inside a folder adds the new name before the old one goes.
pub fn dispatch(model: &mut FolderModel, paths: &[PathBuf]) {
    let mut changes: Vec<Change> = Vec::new();
    for path in paths {
        for change in model.watch_set().route(path) {
            if !changes.contains(&change) {
                changes.push(change);
            }
        }
    }
    changes.sort_by_key(|c| matches!(c, Change::File(_)));

    for change in changes {
        match change {
            Change::Directory(dir) => model.directory_changed(&dir),
            Change::File(path) => model.file_changed(&path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::mpsc;
    use std::time::SystemTime;
    use tempfile::TempDir;

    fn touch(path: &Path, secs: u64) {
        fs::write(path, "x").unwrap();
        let file = fs::File::options().write(true).open(path).unwrap();
        file.set_modified(SystemTime::UNIX_EPOCH + Duration::from_secs(secs))
            .unwrap();
    }

    fn image_model(dir: &Path) -> FolderModel {
        let mut model = FolderModel::default();
        model.set_type_filters(["image/"]);
        model.set_folders([dir]);
        model
    }

    #[test]
    fn notify_watcher_creation() {
        let watcher = NotifyWatcher::new(Duration::from_millis(50), |_| {});
        assert!(watcher.is_ok());
    }

    #[test]
    fn notify_watcher_watch_and_unwatch() {
        let mut watcher = NotifyWatcher::new(Duration::from_millis(50), |_| {}).unwrap();
        let tmp = TempDir::new().unwrap();
        assert!(watcher.watch(tmp.path(), WatchTarget::Directory).is_ok());
        assert!(watcher.unwatch(tmp.path(), WatchTarget::Directory).is_ok());
    }

    #[test]
    fn notify_watcher_missing_path_is_watch_error() {
        let mut watcher = NotifyWatcher::new(Duration::from_millis(50), |_| {}).unwrap();
        let tmp = TempDir::new().unwrap();
        let result = watcher.watch(&tmp.path().join("gone"), WatchTarget::File);
        assert!(matches!(result, Err(CoreError::Watch { .. })));
    }

    #[test]
    fn notify_watcher_detects_new_file() {
        let (tx, rx) = mpsc::channel();
        let mut watcher = NotifyWatcher::new(Duration::from_millis(200), move |msg| {
            let _ = tx.send(msg);
        })
        .unwrap();
        let tmp = TempDir::new().unwrap();
        watcher.watch(tmp.path(), WatchTarget::Directory).unwrap();

        fs::write(tmp.path().join("new.jpg"), "jpeg").unwrap();

        // Wait for the debounced event (200ms debounce + margin)
        let msg = rx.recv_timeout(Duration::from_secs(2));
        assert!(
            msg.is_ok(),
            "should receive a change notification after file creation"
        );
        assert!(matches!(msg.unwrap(), WatchMessage::Changed(_)));
    }

    #[test]
    fn dispatch_new_file_inserts() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("x.jpg"), 100);
        let mut model = image_model(tmp.path());

        let z = tmp.path().join("z.jpg");
        touch(&z, 300);
        dispatch(&mut model, &[z]);

        assert_eq!(model.count(), 2);
        assert_eq!(model.record(0).unwrap().name(), "z.jpg");
    }

    #[test]
    fn dispatch_removed_file_removes() {
        let tmp = TempDir::new().unwrap();
        let x = tmp.path().join("x.jpg");
        touch(&x, 100);
        let mut model = image_model(tmp.path());

        fs::remove_file(&x).unwrap();
        dispatch(&mut model, &[x]);

        assert_eq!(model.count(), 0);
    }

    #[test]
    fn dispatch_rename_in_one_batch() {
        let tmp = TempDir::new().unwrap();
        let old = tmp.path().join("x.jpg");
        let new = tmp.path().join("y.jpg");
        touch(&old, 100);
        let mut model = image_model(tmp.path());

        fs::rename(&old, &new).unwrap();
        dispatch(&mut model, &[old, new]);

        assert_eq!(model.count(), 1);
        assert_eq!(model.record(0).unwrap().name(), "y.jpg");
    }

    #[test]
    fn dispatch_ignores_unrelated_paths() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("x.jpg"), 100);
        let mut model = image_model(tmp.path());

        let other = TempDir::new().unwrap();
        let stray = other.path().join("stray.jpg");
        touch(&stray, 500);
        dispatch(&mut model, &[stray]);

        assert_eq!(model.count(), 1);
    }

    #[test]
    fn access_events_are_not_content_changes() {
        use notify::event::{CreateKind, DataChange, RemoveKind};

        assert!(!is_content_change(&EventKind::Access(AccessKind::Open(
            AccessMode::Any
        ))));
        assert!(!is_content_change(&EventKind::Access(AccessKind::Close(
            AccessMode::Read
        ))));
        assert!(!is_content_change(&EventKind::Modify(ModifyKind::Metadata(
            MetadataKind::AccessTime
        ))));

        assert!(is_content_change(&EventKind::Access(AccessKind::Close(
            AccessMode::Write
        ))));
        assert!(is_content_change(&EventKind::Create(CreateKind::File)));
        assert!(is_content_change(&EventKind::Modify(ModifyKind::Data(
            DataChange::Any
        ))));
        assert!(is_content_change(&EventKind::Remove(RemoveKind::File)));
    }

    /// Feeds every batch that arrives within `quiet` of the previous one
    /// to the model. Returns the number of batches, giving up after `limit`.
    fn pump_until_quiet(
        model: &mut FolderModel,
        rx: &mpsc::Receiver<WatchMessage>,
        quiet: Duration,
        limit: usize,
    ) -> usize {
        let mut batches = 0;
        while batches < limit {
            match rx.recv_timeout(quiet) {
                Ok(WatchMessage::Changed(paths)) => {
                    dispatch(model, &paths);
                    batches += 1;
                }
                Ok(WatchMessage::Error(_)) => {}
                Err(_) => break,
            }
        }
        batches
    }

    #[test]
    fn real_watcher_settles_after_one_external_write() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("a.jpg"), 100);
        touch(&tmp.path().join("b.jpg"), 200);
        touch(&tmp.path().join("c.txt"), 300);

        let (tx, rx) = mpsc::channel();
        let watcher = NotifyWatcher::new(Duration::from_millis(100), move |msg| {
            let _ = tx.send(msg);
        })
        .unwrap();
        let mut model = FolderModel::new(watcher, foldermodel_core::MimeGuessClassifier);
        model.set_type_filters(["image/"]);
        model.set_folders([tmp.path()]);

        // Listing the folder must not wake the watcher up by itself.
        let limit = 10;
        let setup = pump_until_quiet(&mut model, &rx, Duration::from_millis(500), limit);
        assert!(setup < limit, "watcher kept firing after set_folders");

        touch(&tmp.path().join("z.jpg"), 300);

        let first = rx
            .recv_timeout(Duration::from_secs(3))
            .expect("the write should be reported");
        if let WatchMessage::Changed(paths) = first {
            dispatch(&mut model, &paths);
        }

        let follow_up = pump_until_quiet(&mut model, &rx, Duration::from_secs(1), limit);
        assert!(
            follow_up < limit,
            "change batches kept coming after a single write"
        );

        assert_eq!(model.count(), 3);
        assert_eq!(model.record(0).unwrap().name(), "z.jpg");
    }
}
