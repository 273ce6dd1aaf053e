//! File record representation.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use unicode_normalization::UnicodeNormalization;
use url::Url;

/// Snapshot of a single listed file.
///
/// `FileRecord` is immutable: when a file changes on disk the model
/// builds a fresh record and swaps it in. Two records refer to the same
/// file when their paths are equal, regardless of the other fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    path: PathBuf,
    name: String,
    modified: Option<SystemTime>,
    file_type: String,
}

impl FileRecord {
    /// Creates a record from a path, its metadata and an already-classified type tag.
    ///
    /// The display name is the NFC-normalised last path component.
    pub fn new(path: PathBuf, metadata: &std::fs::Metadata, file_type: String) -> Self {
        Self::from_parts(path, metadata.modified().ok(), file_type)
    }

    /// Creates a record without touching the filesystem.
    pub fn from_parts(path: PathBuf, modified: Option<SystemTime>, file_type: String) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().nfc().collect::<String>())
            .unwrap_or_default();

        Self {
            path,
            name,
            modified,
            file_type,
        }
    }

    /// Returns the absolute path of the file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the file name (last component of the path).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the last-modified time, if the platform reported one.
    pub fn modified(&self) -> Option<SystemTime> {
        self.modified
    }

    /// Returns the classified type tag, e.g. `image/jpeg`.
    pub fn file_type(&self) -> &str {
        &self.file_type
    }

    /// Returns the `file://` URL form of the path.
    ///
    /// `None` for relative paths, which cannot be expressed as file URLs.
    pub fn url(&self) -> Option<Url> {
        Url::from_file_path(&self.path).ok()
    }

    /// Returns `true` if the record refers to `path`.
    pub fn is_for(&self, path: &Path) -> bool {
        self.path == path
    }
}
