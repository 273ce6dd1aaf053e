//! The folder model: a live, type-filtered, newest-first list of the files
//! in a set of watched directories, with row selection.
//!
//! Reconfiguring folders or filters rebuilds the list from a fresh listing
//! ("resync"). Afterwards the list is patched incrementally from two
//! notification channels:
//!
//! - [`FolderModel::directory_changed`] discovers files that appeared in a
//!   watched directory. It never touches files it already knows.
//! - [`FolderModel::file_changed`] handles updates and removals of a single
//!   known file, and picks up files whose type now passes the filter.
//!
//! A rename arrives as a removal of the old path followed by a new file
//! at the new path; the record loses its row and its selection.

use std::path::{Path, PathBuf};

use crate::config::ModelConfig;
use crate::event::{EventBus, EventKind, ModelEvent, SubscriptionId};
use crate::fs::classify::{MimeGuessClassifier, TypeClassifier};
use crate::fs::entry::FileRecord;
use crate::fs::ops::{list_files, readable_file_metadata};
use crate::list::{SelectionState, SortedFileList, TypeFilterSet};
use crate::role::{Role, RoleValue};
use crate::watch::{DetachedWatcher, PathWatcher, WatchSet, WatchTarget};

/// Live list of recent files across watched folders.
///
/// All methods run to completion on the caller's thread; none of them
/// fail. Filesystem errors are logged and the affected entry skipped.
pub struct FolderModel {
    list: SortedFileList,
    filters: TypeFilterSet,
    selection: SelectionState,
    watch_set: WatchSet,
    watcher: Box<dyn PathWatcher>,
    classifier: Box<dyn TypeClassifier>,
    events: EventBus,
}

impl std::fmt::Debug for FolderModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FolderModel")
            .field("list", &self.list)
            .field("filters", &self.filters)
            .field("selection", &self.selection)
            .field("watch_set", &self.watch_set)
            .field("events", &self.events)
            .finish_non_exhaustive()
    }
}

impl Default for FolderModel {
    fn default() -> Self {
        Self::new(DetachedWatcher, MimeGuessClassifier)
    }
}

impl FolderModel {
    /// Creates an empty model with no folders, no filters and the
    /// single-selection policy enabled.
    pub fn new<W, C>(watcher: W, classifier: C) -> Self
    where
        W: PathWatcher + 'static,
        C: TypeClassifier + 'static,
    {
        Self {
            list: SortedFileList::new(),
            filters: TypeFilterSet::default(),
            selection: SelectionState::new(true),
            watch_set: WatchSet::new(),
            watcher: Box::new(watcher),
            classifier: Box::new(classifier),
            events: EventBus::new(),
        }
    }

    /// Applies a whole [`ModelConfig`]: policy first, then filters, then
    /// folders, so the listing happens once the filters are in place.
    pub fn apply_config(&mut self, config: &ModelConfig) {
        self.set_single_selection_only(config.single_selection_only);
        // No resync here: set_folders below does the one resync.
        self.filters = TypeFilterSet::new(config.type_filters.iter().cloned());
        self.events.emit(ModelEvent::TypeFiltersChanged);
        self.set_folders(config.folders.iter().cloned());
    }

    // --- configuration -------------------------------------------------

    /// Returns the watched folders in configuration order.
    pub fn folders(&self) -> &[PathBuf] {
        self.watch_set.directories()
    }

    /// Replaces the watched folders and rebuilds the list.
    ///
    /// Duplicate folders are watched once. Relative paths are made
    /// absolute against the current directory.
    pub fn set_folders<I, P>(&mut self, folders: I)
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        for dir in self.watch_set.take_directories() {
            self.unwatch(&dir, WatchTarget::Directory);
        }

        for dir in folders {
            let dir = absolutize(dir.into());
            if self.watch_set.insert_directory(dir.clone()) {
                self.watch(&dir, WatchTarget::Directory);
            }
        }

        for file in self.watch_set.take_orphaned_files() {
            self.unwatch(&file, WatchTarget::File);
        }

        self.resync();
        self.events.emit(ModelEvent::FoldersChanged);
    }

    /// Returns the accepted type prefixes.
    pub fn type_filters(&self) -> &[String] {
        self.filters.prefixes()
    }

    /// Replaces the type filters and rebuilds the list.
    pub fn set_type_filters<I, S>(&mut self, filters: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filters = TypeFilterSet::new(filters);
        self.resync();
        self.events.emit(ModelEvent::TypeFiltersChanged);
    }

    pub fn single_selection_only(&self) -> bool {
        self.selection.single_only()
    }

    /// Changes the selection policy. Enabling it while several rows are
    /// selected clears the selection first.
    pub fn set_single_selection_only(&mut self, single_only: bool) {
        let Some(cleared) = self.selection.set_single_only(single_only) else {
            return;
        };
        self.emit_selection_flips(&cleared);
        self.events.emit(ModelEvent::SingleSelectionOnlyChanged {
            single_selection_only: single_only,
        });
    }

    // --- synchronization ----------------------------------------------

    /// Rebuilds the list from a fresh listing of every watched folder.
    ///
    /// Every listed file is watched, matching or not, so a later change
    /// that makes it match is noticed. The selection is cleared.
    fn resync(&mut self) {
        self.list.clear();

        for dir in self.watch_set.directories().to_vec() {
            let files = match list_files(&dir) {
                Ok(files) => files,
                Err(e) => {
                    tracing::warn!("cannot list {}: {e}", dir.display());
                    continue;
                }
            };

            for file in files {
                if self.watch_set.insert_file(file.path.clone()) {
                    self.watch(&file.path, WatchTarget::File);
                }
                let file_type = self.classifier.classify(&file.path);
                if self.filters.matches(&file_type) {
                    self.list
                        .insert(FileRecord::new(file.path, &file.metadata, file_type));
                }
            }
        }

        self.selection.clear();
        tracing::debug!(
            "resynced {} folder(s): {} matching file(s)",
            self.watch_set.directories().len(),
            self.list.len()
        );

        self.events.emit(ModelEvent::Reset);
        self.events.emit(ModelEvent::CountChanged {
            count: self.list.len(),
        });
        self.events.emit(ModelEvent::SelectedFilesChanged);
    }

    /// Handles a coarse "something changed in `dir`" notification.
    ///
    /// Only files not watched yet are considered: they are watched and,
    /// when they pass the filter, inserted. Updates and removals of known
    /// files are left to [`FolderModel::file_changed`].
    pub fn directory_changed(&mut self, dir: &Path) {
        if !self.watch_set.is_watching_directory(dir) {
            tracing::debug!("ignoring change in unwatched folder {}", dir.display());
            return;
        }

        let files = match list_files(dir) {
            Ok(files) => files,
            Err(e) => {
                tracing::warn!("cannot list {}: {e}", dir.display());
                return;
            }
        };

        for file in files {
            if self.watch_set.is_watching_file(&file.path) {
                continue;
            }
            self.watch_set.insert_file(file.path.clone());
            self.watch(&file.path, WatchTarget::File);

            let file_type = self.classifier.classify(&file.path);
            if self.filters.matches(&file_type) {
                self.insert_record(FileRecord::new(file.path, &file.metadata, file_type));
            }
        }
    }

    /// Handles a notification that the file at `path` changed or vanished.
    pub fn file_changed(&mut self, path: &Path) {
        let row = self.list.position(path);
        // Anything but a readable regular file counts as gone.
        let metadata = readable_file_metadata(path);

        match (metadata, row) {
            (Some(metadata), None) => {
                if !self.watch_set.is_watching_file(path) {
                    tracing::debug!("ignoring change of unwatched file {}", path.display());
                    return;
                }
                // The type may have changed since the file was first seen.
                let file_type = self.classifier.classify(path);
                if self.filters.matches(&file_type) {
                    self.insert_record(FileRecord::new(path.to_path_buf(), &metadata, file_type));
                }
            }
            (Some(metadata), Some(row)) => {
                let file_type = self.classifier.classify(path);
                let record = FileRecord::new(path.to_path_buf(), &metadata, file_type);
                // Position is kept even if the timestamp moved.
                self.list.replace(row, record);
                tracing::debug!("updated {} at row {row}", path.display());
                self.events.emit(ModelEvent::RowChanged { row });
            }
            (None, Some(row)) => {
                self.forget_file(path);
                self.list.remove(row);
                tracing::debug!("removed {} from row {row}", path.display());
                self.events.emit(ModelEvent::RowRemoved { row });
                self.events.emit(ModelEvent::CountChanged {
                    count: self.list.len(),
                });
            }
            (None, None) => self.forget_file(path),
        }
    }

    fn insert_record(&mut self, record: FileRecord) {
        tracing::debug!("inserting {}", record.path().display());
        let row = self.list.insert(record);
        self.events.emit(ModelEvent::RowInserted { row });
        self.events.emit(ModelEvent::CountChanged {
            count: self.list.len(),
        });
    }

    /// Drops the watch on a vanished file so a file reappearing at the
    /// same path is discovered again as new.
    fn forget_file(&mut self, path: &Path) {
        if self.watch_set.remove_file(path) {
            self.unwatch(path, WatchTarget::File);
        }
    }

    fn watch(&mut self, path: &Path, target: WatchTarget) {
        if let Err(e) = self.watcher.watch(path, target) {
            tracing::warn!("failed to watch {}: {e}", path.display());
        }
    }

    fn unwatch(&mut self, path: &Path, target: WatchTarget) {
        if let Err(e) = self.watcher.unwatch(path, target) {
            tracing::warn!("failed to unwatch {}: {e}", path.display());
        }
    }

    // --- selection ------------------------------------------------------

    /// Returns the selected rows in ascending order.
    pub fn selected_files(&self) -> Vec<usize> {
        self.selection.selected()
    }

    pub fn is_selected(&self, row: usize) -> bool {
        self.selection.is_selected(row)
    }

    /// Flips the selection of `row`.
    ///
    /// Rows past the end can be deselected but not selected.
    pub fn toggle_selected(&mut self, row: usize) {
        if row >= self.list.len() && !self.selection.is_selected(row) {
            tracing::debug!("ignoring selection of row {row} past the end");
            return;
        }
        let flipped = self.selection.toggle(row);
        self.emit_selection_flips(&flipped);
    }

    /// Deselects every row.
    pub fn clear_selection(&mut self) {
        let flipped = self.selection.clear();
        self.emit_selection_flips(&flipped);
    }

    /// Selects every row. Under the single-selection policy only the
    /// first row ends up selected.
    pub fn select_all(&mut self) {
        let flipped = self.selection.select_all(self.list.len());
        self.emit_selection_flips(&flipped);
    }

    fn emit_selection_flips(&mut self, rows: &[usize]) {
        if rows.is_empty() {
            return;
        }
        for &row in rows {
            self.events.emit(ModelEvent::RowChanged { row });
        }
        self.events.emit(ModelEvent::SelectedFilesChanged);
    }

    // --- queries ----------------------------------------------------------

    /// Returns the number of listed files.
    pub fn count(&self) -> usize {
        self.list.len()
    }

    pub fn record(&self, row: usize) -> Option<&FileRecord> {
        self.list.get(row)
    }

    pub fn records(&self) -> &[FileRecord] {
        self.list.records()
    }

    pub fn watch_set(&self) -> &WatchSet {
        &self.watch_set
    }

    /// Returns the value of `role` for `row`, or `None` if `row` is out of
    /// range (or, for [`Role::FileUrl`], the path has no URL form).
    pub fn data(&self, row: usize, role: Role) -> Option<RoleValue> {
        let record = self.list.get(row)?;
        match role {
            Role::FileName => Some(RoleValue::Text(record.name().to_string())),
            Role::FilePath => Some(RoleValue::Text(
                record.path().to_string_lossy().into_owned(),
            )),
            Role::FileUrl => record.url().map(RoleValue::Url),
            Role::FileType => Some(RoleValue::Text(record.file_type().to_string())),
            Role::Selected => Some(RoleValue::Bool(self.selection.is_selected(row))),
        }
    }

    /// Looks up a field by its role name, e.g. `"fileName"`.
    pub fn get(&self, row: usize, role_name: &str) -> Option<RoleValue> {
        self.data(row, Role::from_name(role_name)?)
    }

    // --- notifications ------------------------------------------------

    /// Registers `callback` for events of `kind`.
    pub fn subscribe<F>(&mut self, kind: EventKind, callback: F) -> SubscriptionId
    where
        F: FnMut(&ModelEvent) + 'static,
    {
        self.events.subscribe(kind, callback)
    }

    /// Registers `callback` for every event.
    pub fn subscribe_all<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&ModelEvent) + 'static,
    {
        self.events.subscribe_all(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }
}

fn absolutize(path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        return path;
    }
    std::path::absolute(&path).unwrap_or(path)
}
