//! Watch subscriptions.
//!
//! The model records what it observes in a [`WatchSet`] and mirrors every
//! change to a [`PathWatcher`], the boundary to whatever service actually
//! delivers filesystem notifications. The service reports back through
//! [`FolderModel::directory_changed`](crate::FolderModel::directory_changed)
//! and [`FolderModel::file_changed`](crate::FolderModel::file_changed);
//! [`WatchSet::route`] turns a raw changed path into those calls.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::error::CoreResult;

/// What kind of path a subscription is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WatchTarget {
    Directory,
    File,
}

/// Subscription boundary to a filesystem watch service.
pub trait PathWatcher {
    /// Starts observing `path`.
    fn watch(&mut self, path: &Path, target: WatchTarget) -> CoreResult<()>;
    /// Stops observing `path`.
    fn unwatch(&mut self, path: &Path, target: WatchTarget) -> CoreResult<()>;
}

/// A watcher that subscribes to nothing, for hosts that deliver change
/// notifications by other means.
#[derive(Debug, Clone, Copy, Default)]
pub struct DetachedWatcher;

impl PathWatcher for DetachedWatcher {
    fn watch(&mut self, _path: &Path, _target: WatchTarget) -> CoreResult<()> {
        Ok(())
    }

    fn unwatch(&mut self, _path: &Path, _target: WatchTarget) -> CoreResult<()> {
        Ok(())
    }
}

/// A notification addressed to the model.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Change {
    /// Something inside the directory changed; names unknown.
    Directory(PathBuf),
    /// The file at this path changed, or no longer exists.
    File(PathBuf),
}

/// Paths currently observed: directories in configuration order, and
/// the individual files seen inside them.
#[derive(Debug, Clone, Default)]
pub struct WatchSet {
    directories: Vec<PathBuf>,
    files: HashSet<PathBuf>,
}

impl WatchSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn directories(&self) -> &[PathBuf] {
        &self.directories
    }

    pub fn files(&self) -> &HashSet<PathBuf> {
        &self.files
    }

    pub fn is_watching_directory(&self, dir: &Path) -> bool {
        self.directories.iter().any(|d| d == dir)
    }

    pub fn is_watching_file(&self, path: &Path) -> bool {
        self.files.contains(path)
    }

    /// Adds a directory. Returns `false` if it was already present.
    pub fn insert_directory(&mut self, dir: PathBuf) -> bool {
        if self.is_watching_directory(&dir) {
            return false;
        }
        self.directories.push(dir);
        true
    }

    /// Adds a file. Returns `false` if it was already present.
    pub fn insert_file(&mut self, path: PathBuf) -> bool {
        self.files.insert(path)
    }

    /// Removes a file. Returns `false` if it was not present.
    pub fn remove_file(&mut self, path: &Path) -> bool {
        self.files.remove(path)
    }

    /// Removes and returns every directory.
    pub fn take_directories(&mut self) -> Vec<PathBuf> {
        std::mem::take(&mut self.directories)
    }

    /// Removes and returns the files whose parent is no longer a watched
    /// directory.
    pub fn take_orphaned_files(&mut self) -> Vec<PathBuf> {
        let orphans: Vec<PathBuf> = self
            .files
            .iter()
            .filter(|f| !f.parent().is_some_and(|p| self.is_watching_directory(p)))
            .cloned()
            .collect();
        for orphan in &orphans {
            self.files.remove(orphan);
        }
        orphans
    }

    /// Translates a raw changed path into model notifications.
    ///
    /// A watched directory yields a directory change. A path inside a
    /// watched directory yields a change for that directory (so newly
    /// created files are discovered), plus a file change when the file
    /// itself is watched.
    pub fn route(&self, path: &Path) -> Vec<Change> {
        let mut changes = Vec::new();
        if self.is_watching_directory(path) {
            changes.push(Change::Directory(path.to_path_buf()));
        }
        if let Some(parent) = path.parent() {
            if self.is_watching_directory(parent) {
                changes.push(Change::Directory(parent.to_path_buf()));
            }
        }
        if self.is_watching_file(path) {
            changes.push(Change::File(path.to_path_buf()));
        }
        changes
    }
}
