//! Selection over list rows.

use std::collections::BTreeSet;

/// Selected rows plus the single-selection policy.
///
/// Every mutating method returns the rows whose selected state flipped,
/// in the order they flipped, so the caller can emit one row-changed
/// notification per entry. While `single_only` is set at most one row is
/// selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionState {
    selected: BTreeSet<usize>,
    single_only: bool,
}

impl Default for SelectionState {
    fn default() -> Self {
        Self::new(true)
    }
}

impl SelectionState {
    pub fn new(single_only: bool) -> Self {
        Self {
            selected: BTreeSet::new(),
            single_only,
        }
    }

    pub fn is_selected(&self, row: usize) -> bool {
        self.selected.contains(&row)
    }

    /// Returns the selected rows in ascending order.
    pub fn selected(&self) -> Vec<usize> {
        self.selected.iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn single_only(&self) -> bool {
        self.single_only
    }

    /// Flips `row`. Selecting under the single policy first deselects
    /// the current selection.
    pub fn toggle(&mut self, row: usize) -> Vec<usize> {
        if self.selected.remove(&row) {
            return vec![row];
        }

        let mut flipped = Vec::new();
        if self.single_only {
            flipped.extend(std::mem::take(&mut self.selected));
        }
        self.selected.insert(row);
        flipped.push(row);
        flipped
    }

    /// Deselects every row.
    pub fn clear(&mut self) -> Vec<usize> {
        std::mem::take(&mut self.selected).into_iter().collect()
    }

    /// Selects every row in `0..count`.
    ///
    /// Under the single policy only row `0` ends up selected.
    pub fn select_all(&mut self, count: usize) -> Vec<usize> {
        if count == 0 {
            return Vec::new();
        }

        if self.single_only {
            if self.selected.len() == 1 && self.is_selected(0) {
                return Vec::new();
            }
            let mut flipped = self.clear();
            self.selected.insert(0);
            flipped.push(0);
            return flipped;
        }

        let mut flipped = Vec::new();
        for row in 0..count {
            if self.selected.insert(row) {
                flipped.push(row);
            }
        }
        flipped
    }

    /// Changes the policy. Turning the single policy on while more than
    /// one row is selected clears the selection first.
    ///
    /// Returns `None` when `single_only` is unchanged, otherwise the rows
    /// that were deselected.
    pub fn set_single_only(&mut self, single_only: bool) -> Option<Vec<usize>> {
        if single_only == self.single_only {
            return None;
        }
        let cleared = if single_only && self.selected.len() > 1 {
            self.clear()
        } else {
            Vec::new()
        };
        self.single_only = single_only;
        Some(cleared)
    }
}
