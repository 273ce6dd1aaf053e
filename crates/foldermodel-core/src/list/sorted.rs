//! Newest-first list of file records.

use std::path::Path;

use crate::fs::entry::FileRecord;

/// File records ordered by modification time, most recent first.
///
/// The ordering is maintained only by [`SortedFileList::insert`].
/// [`SortedFileList::replace`] swaps a record in place without re-checking
/// the order, so a record whose timestamp changed after insertion keeps
/// its old position.
#[derive(Debug, Clone, Default)]
pub struct SortedFileList {
    records: Vec<FileRecord>,
}

impl SortedFileList {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `record` and returns the row it landed on.
    ///
    /// Scans from the most recent end and inserts in front of the first
    /// record that is not strictly more recent than `record`. A record
    /// tying with existing ones therefore goes in front of them, and the
    /// existing ones keep their relative order. A record without a
    /// modification time counts as older than any dated one and sorts last.
    pub fn insert(&mut self, record: FileRecord) -> usize {
        let row = self
            .records
            .iter()
            .position(|existing| record.modified() >= existing.modified())
            .unwrap_or(self.records.len());
        self.records.insert(row, record);
        row
    }

    /// Returns the row of the record for `path`, if listed.
    pub fn position(&self, path: &Path) -> Option<usize> {
        self.records.iter().position(|r| r.is_for(path))
    }

    /// Returns `true` if a record for `path` is listed.
    pub fn contains(&self, path: &Path) -> bool {
        self.position(path).is_some()
    }

    /// Replaces the record at `row`. Returns the previous record, or
    /// `None` (leaving the list untouched) if `row` is out of bounds.
    pub fn replace(&mut self, row: usize, record: FileRecord) -> Option<FileRecord> {
        let slot = self.records.get_mut(row)?;
        Some(std::mem::replace(slot, record))
    }

    /// Removes and returns the record at `row`.
    pub fn remove(&mut self, row: usize) -> Option<FileRecord> {
        if row < self.records.len() {
            Some(self.records.remove(row))
        } else {
            None
        }
    }

    /// Removes every record.
    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Returns the record at `row`.
    pub fn get(&self, row: usize) -> Option<&FileRecord> {
        self.records.get(row)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[FileRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &FileRecord> {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, SystemTime};

    fn rec(name: &str, secs: u64) -> FileRecord {
        FileRecord::from_parts(
            format!("/tmp/a/{name}").into(),
            Some(SystemTime::UNIX_EPOCH + Duration::from_secs(secs)),
            "image/jpeg".into(),
        )
    }

    fn names(list: &SortedFileList) -> Vec<&str> {
        list.iter().map(|r| r.name()).collect()
    }

    fn is_non_increasing(list: &SortedFileList) -> bool {
        list.records()
            .windows(2)
            .all(|w| w[0].modified() >= w[1].modified())
    }

    #[test]
    fn insert_into_empty_list() {
        let mut list = SortedFileList::new();
        assert_eq!(list.insert(rec("x.jpg", 100)), 0);
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn newer_goes_first_older_goes_last() {
        let mut list = SortedFileList::new();
        list.insert(rec("x.jpg", 100));
        assert_eq!(list.insert(rec("z.jpg", 300)), 0);
        assert_eq!(list.insert(rec("w.jpg", 50)), 2);
        assert_eq!(list.insert(rec("y.jpg", 200)), 1);
        assert_eq!(names(&list), vec!["z.jpg", "y.jpg", "x.jpg", "w.jpg"]);
    }

    #[test]
    fn stays_non_increasing_for_any_insert_order() {
        let stamps = [5u64, 1, 9, 9, 3, 7, 1, 0, 12, 5, 5, 8];
        let mut list = SortedFileList::new();
        for (i, secs) in stamps.iter().enumerate() {
            list.insert(rec(&format!("f{i}.jpg"), *secs));
            assert!(is_non_increasing(&list), "broken after insert {i}");
        }
        assert_eq!(list.len(), stamps.len());
    }

    #[test]
    fn tie_goes_in_front_and_keeps_existing_order() {
        let mut list = SortedFileList::new();
        list.insert(rec("a.jpg", 100));
        list.insert(rec("b.jpg", 100));
        assert_eq!(names(&list), vec!["b.jpg", "a.jpg"]);

        let row = list.insert(rec("c.jpg", 100));
        assert_eq!(row, 0);
        assert_eq!(names(&list), vec!["c.jpg", "b.jpg", "a.jpg"]);
    }

    #[test]
    fn tie_inserts_after_strictly_newer() {
        let mut list = SortedFileList::new();
        list.insert(rec("old.jpg", 100));
        list.insert(rec("new.jpg", 300));
        assert_eq!(list.insert(rec("same.jpg", 100)), 1);
        assert_eq!(names(&list), vec!["new.jpg", "same.jpg", "old.jpg"]);
    }

    #[test]
    fn missing_timestamp_sorts_last() {
        let mut list = SortedFileList::new();
        list.insert(rec("x.jpg", 100));
        let undated = FileRecord::from_parts("/tmp/a/u.jpg".into(), None, String::new());
        assert_eq!(list.insert(undated), 1);
    }

    #[test]
    fn position_and_contains() {
        let mut list = SortedFileList::new();
        list.insert(rec("x.jpg", 100));
        list.insert(rec("z.jpg", 300));
        assert_eq!(list.position(Path::new("/tmp/a/x.jpg")), Some(1));
        assert!(list.contains(Path::new("/tmp/a/z.jpg")));
        assert!(!list.contains(Path::new("/tmp/a/nope.jpg")));
    }

    #[test]
    fn replace_keeps_position_without_resort() {
        let mut list = SortedFileList::new();
        list.insert(rec("x.jpg", 100));
        list.insert(rec("z.jpg", 300));

        let old = list.replace(1, rec("x.jpg", 999)).unwrap();
        assert_eq!(old.modified(), rec("x.jpg", 100).modified());
        assert_eq!(names(&list), vec!["z.jpg", "x.jpg"]);
        assert!(list.replace(5, rec("q.jpg", 1)).is_none());
    }

    #[test]
    fn remove_out_of_bounds_is_none() {
        let mut list = SortedFileList::new();
        list.insert(rec("x.jpg", 100));
        assert!(list.remove(3).is_none());
        assert_eq!(list.remove(0).unwrap().name(), "x.jpg");
        assert!(list.is_empty());
    }
}
