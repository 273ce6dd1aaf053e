//! Directory listing for the folder model.

use std::path::Path;

use crate::error::{CoreError, CoreResult};

/// A readable regular file found while listing a folder.
#[derive(Debug)]
pub struct ListedFile {
    pub path: std::path::PathBuf,
    pub metadata: std::fs::Metadata,
}

/// Lists the readable regular files directly inside `dir`, oldest first.
///
/// Directories, FIFOs, sockets, device nodes, entries whose metadata
/// cannot be read and files that cannot be opened for reading are
/// skipped silently. Entries with equal
/// modification times are ordered by path so repeated listings agree.
///
/// # Errors
///
/// - [`CoreError::NotFound`] — the path does not exist.
/// - [`CoreError::NotADirectory`] — the path is not a directory.
/// - [`CoreError::PermissionDenied`] — read access is denied.
/// - [`CoreError::Io`] — any other I/O error.
pub fn list_files(dir: &Path) -> CoreResult<Vec<ListedFile>> {
    if !dir.exists() {
        return Err(CoreError::NotFound(dir.to_path_buf()));
    }
    if !dir.is_dir() {
        return Err(CoreError::NotADirectory(dir.to_path_buf()));
    }

    let read_dir = std::fs::read_dir(dir).map_err(|e| CoreError::from_io(dir, e))?;

    let mut files = Vec::new();
    for dir_entry in read_dir {
        let dir_entry = match dir_entry {
            Ok(e) => e,
            Err(_) => continue,
        };
        let path = dir_entry.path();
        if let Some(metadata) = readable_file_metadata(&path) {
            files.push(ListedFile { path, metadata });
        }
    }

    files.sort_by(|a, b| {
        let time_a = a.metadata.modified().ok();
        let time_b = b.metadata.modified().ok();
        time_a.cmp(&time_b).then_with(|| a.path.cmp(&b.path))
    });

    Ok(files)
}

/// Returns the metadata of `path` if it is a regular file that can be
/// opened for reading.
///
/// Symlinks are followed, so a link to a photo counts as the photo. The
/// file type is checked before opening: opening a FIFO blocks until a
/// writer shows up.
pub fn readable_file_metadata(path: &Path) -> Option<std::fs::Metadata> {
    let metadata = std::fs::metadata(path).ok()?;
    if !metadata.is_file() {
        return None;
    }
    std::fs::File::open(path).ok()?;
    Some(metadata)
}
