//! File system side of the folder model.
//!
//! [`entry::FileRecord`] is the immutable per-file snapshot,
//! [`ops::list_files`] enumerates a watched folder and
//! [`classify::TypeClassifier`] assigns the type tag used for filtering.

pub mod classify;
pub mod entry;
pub mod ops;

pub use classify::{MimeGuessClassifier, TypeClassifier};
pub use entry::FileRecord;
pub use ops::{list_files, readable_file_metadata, ListedFile};
