//! Derived selected-values view.
//!
//! `SelectedView` stores the values of selected entries together with a
//! parallel sequence of slots recording, for each value, the owning entry and
//! its current position in the main list. The two sequences are always the
//! same length and aligned index for index.
//!
//! In positional mode the positions are kept sorted ascending, which lets a
//! newly selected entry find its place without re-scanning the main list.
//! Positions are tracked in append mode too, so switching modes mid-session
//! keeps both sequences consistent (existing order is left as is).

use crate::entry::EntryId;

/// One selected entry: identity plus current list position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Slot {
    key: EntryId,
    position: usize,
}

/// Ordered values of the selected entries of a list.
#[derive(Debug, Clone)]
pub struct SelectedView<T> {
    values: Vec<T>,
    slots: Vec<Slot>,
}

impl<T> SelectedView<T> {
    /// Create an empty view.
    pub fn new() -> Self {
        Self {
            values: Vec::new(),
            slots: Vec::new(),
        }
    }

    /// Get the selected values in view order.
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Get the recorded list positions, aligned with [`values`](Self::values).
    pub fn positions(&self) -> Vec<usize> {
        self.slots.iter().map(|s| s.position).collect()
    }

    /// Get the number of selected values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Check if an entry has a value in the view.
    pub fn contains(&self, key: EntryId) -> bool {
        self.slots.iter().any(|s| s.key == key)
    }

    fn index_of(&self, key: EntryId) -> Option<usize> {
        self.slots.iter().position(|s| s.key == key)
    }

    /// Append a value (selection order).
    /// Returns the view index it landed at.
    pub fn append(&mut self, key: EntryId, position: usize, value: T) -> usize {
        self.slots.push(Slot { key, position });
        self.values.push(value);
        self.values.len() - 1
    }

    /// Insert a value so recorded positions stay ascending (list order).
    /// Returns the view index it landed at.
    pub fn insert_ordered(&mut self, key: EntryId, position: usize, value: T) -> usize {
        let at = self.insertion_point(position);
        self.slots.insert(at, Slot { key, position });
        self.values.insert(at, value);
        at
    }

    /// Find where `position` belongs among the recorded positions.
    ///
    /// Past the last recorded position appends, before the first prepends,
    /// otherwise the value goes right before the first position strictly
    /// greater than `position`.
    fn insertion_point(&self, position: usize) -> usize {
        let (Some(first), Some(last)) = (self.slots.first(), self.slots.last()) else {
            return 0;
        };
        if position > last.position {
            self.slots.len()
        } else if position < first.position {
            0
        } else {
            self.slots
                .iter()
                .position(|s| s.position > position)
                .unwrap_or(self.slots.len())
        }
    }

    /// Remove an entry's value.
    /// Returns the removed value, if the entry was in the view.
    pub fn remove(&mut self, key: EntryId) -> Option<T> {
        let at = self.index_of(key)?;
        self.slots.remove(at);
        Some(self.values.remove(at))
    }

    /// Clear the view.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.values.clear();
    }

    // -------------------------------------------------------------------------
    // Position bookkeeping for structural list changes
    // -------------------------------------------------------------------------

    /// An entry was inserted into the main list at `index`.
    pub fn shift_for_insert(&mut self, index: usize) {
        for slot in &mut self.slots {
            if slot.position >= index {
                slot.position += 1;
            }
        }
    }

    /// The entry at `index` left the main list.
    ///
    /// Its own value must already have been removed from the view.
    pub fn shift_for_remove(&mut self, index: usize) {
        for slot in &mut self.slots {
            if slot.position > index {
                slot.position -= 1;
            }
        }
    }

    /// The entry at `from` moved to `to` in the main list.
    ///
    /// Updates every recorded position. Returns the view index of the moved
    /// entry if it is selected; its value is not reordered here.
    pub fn shift_for_move(&mut self, from: usize, to: usize) -> Option<usize> {
        let mut moved = None;
        for (i, slot) in self.slots.iter_mut().enumerate() {
            if slot.position == from {
                slot.position = to;
                moved = Some(i);
            } else if from < to && slot.position > from && slot.position <= to {
                slot.position -= 1;
            } else if from > to && slot.position >= to && slot.position < from {
                slot.position += 1;
            }
        }
        moved
    }

    /// Re-place an entry's value according to its recorded position.
    pub fn reposition(&mut self, key: EntryId) {
        let Some(at) = self.index_of(key) else {
            return;
        };
        let slot = self.slots.remove(at);
        let value = self.values.remove(at);
        self.insert_ordered(slot.key, slot.position, value);
    }
}

impl<T> Default for SelectedView<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::SelectableEntry;

    fn keys(n: usize) -> Vec<EntryId> {
        (0..n).map(|_| SelectableEntry::new(()).id()).collect()
    }

    #[test]
    fn test_append_keeps_selection_order() {
        let k = keys(3);
        let mut view = SelectedView::new();
        view.append(k[2], 2, 'c');
        view.append(k[0], 0, 'a');
        view.append(k[1], 1, 'b');

        assert_eq!(view.values(), &['c', 'a', 'b']);
        assert_eq!(view.positions(), vec![2, 0, 1]);
    }

    #[test]
    fn test_insert_ordered_branches() {
        let k = keys(5);
        let mut view = SelectedView::new();

        // Empty view
        assert_eq!(view.insert_ordered(k[2], 2, 'c'), 0);
        // Greater than last: append
        assert_eq!(view.insert_ordered(k[4], 4, 'e'), 1);
        // Smaller than first: prepend
        assert_eq!(view.insert_ordered(k[0], 0, 'a'), 0);
        // In between: before first strictly greater
        assert_eq!(view.insert_ordered(k[3], 3, 'd'), 2);
        assert_eq!(view.insert_ordered(k[1], 1, 'b'), 1);

        assert_eq!(view.values(), &['a', 'b', 'c', 'd', 'e']);
        assert_eq!(view.positions(), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_remove_leaves_others_in_order() {
        let k = keys(3);
        let mut view = SelectedView::new();
        view.insert_ordered(k[0], 0, "a");
        view.insert_ordered(k[1], 1, "b");
        view.insert_ordered(k[2], 2, "c");

        assert_eq!(view.remove(k[1]), Some("b"));
        assert_eq!(view.remove(k[1]), None);
        assert_eq!(view.values(), &["a", "c"]);
        assert_eq!(view.positions(), vec![0, 2]);
    }

    #[test]
    fn test_remove_by_identity_with_equal_values() {
        let k = keys(2);
        let mut view = SelectedView::new();
        view.append(k[0], 0, "same");
        view.append(k[1], 1, "same");

        view.remove(k[1]);

        assert_eq!(view.values(), &["same"]);
        assert!(view.contains(k[0]));
        assert!(!view.contains(k[1]));
    }

    #[test]
    fn test_shift_for_insert_and_remove() {
        let k = keys(2);
        let mut view = SelectedView::new();
        view.insert_ordered(k[0], 1, 'x');
        view.insert_ordered(k[1], 3, 'y');

        view.shift_for_insert(2);
        assert_eq!(view.positions(), vec![1, 4]);

        view.shift_for_insert(0);
        assert_eq!(view.positions(), vec![2, 5]);

        view.shift_for_remove(3);
        assert_eq!(view.positions(), vec![2, 4]);
    }

    #[test]
    fn test_move_then_reposition() {
        // List: a b c d, with a, c, d selected
        let k = keys(4);
        let mut view = SelectedView::new();
        view.insert_ordered(k[0], 0, 'a');
        view.insert_ordered(k[2], 2, 'c');
        view.insert_ordered(k[3], 3, 'd');

        // Move a to the end: b c d a
        let moved = view.shift_for_move(0, 3);
        assert_eq!(moved, Some(0));
        assert_eq!(view.positions(), vec![3, 1, 2]);

        view.reposition(k[0]);
        assert_eq!(view.values(), &['c', 'd', 'a']);
        assert_eq!(view.positions(), vec![1, 2, 3]);

        // Move d (position 2) to the front: d b c a
        view.shift_for_move(2, 0);
        view.reposition(k[3]);
        assert_eq!(view.values(), &['d', 'c', 'a']);
        assert_eq!(view.positions(), vec![0, 2, 3]);
    }

    #[test]
    fn test_move_of_unselected_entry() {
        let k = keys(2);
        let mut view = SelectedView::new();
        view.insert_ordered(k[0], 0, 'a');
        view.insert_ordered(k[1], 2, 'c');

        // Unselected entry at 1 moves to 2
        assert_eq!(view.shift_for_move(1, 2), None);
        assert_eq!(view.positions(), vec![0, 1]);
    }
}
