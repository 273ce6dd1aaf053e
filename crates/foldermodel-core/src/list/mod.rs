//! In-memory list state: the sorted records, the type filter and the
//! row selection.

pub mod filter;
pub mod selection;
pub mod sorted;

pub use filter::TypeFilterSet;
pub use selection::SelectionState;
pub use sorted::SortedFileList;
