//! File type classification.
//!
//! The model never inspects file contents itself; it asks a
//! [`TypeClassifier`] for a MIME-like tag and prefix-matches that against
//! the active filters.

use std::path::Path;

/// Produces a type tag such as `image/jpeg` for a file.
///
/// Implementations must be synchronous and should not fail: return a
/// generic tag (e.g. `application/octet-stream`) when nothing better is
/// known, including when the file has vanished.
pub trait TypeClassifier {
    fn classify(&self, path: &Path) -> String;
}

/// Extension-based classifier backed by `mime_guess`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MimeGuessClassifier;

impl TypeClassifier for MimeGuessClassifier {
    fn classify(&self, path: &Path) -> String {
        mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string()
    }
}

impl<F> TypeClassifier for F
where
    F: Fn(&Path) -> String,
{
    fn classify(&self, path: &Path) -> String {
        self(path)
    }
}
