//! Error types

use crate::entry::EntryId;

/// Misuse of a [`SelectionTrackingList`](crate::selection::SelectionTrackingList).
///
/// Every structural mutation validates its arguments up front and returns
/// one of these instead of touching the list.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    /// Index past the end of the list.
    #[error("index {index} out of bounds for list of length {len}")]
    IndexOutOfBounds {
        /// The requested index.
        index: usize,
        /// Length of the list at the time of the call.
        len: usize,
    },

    /// The entry is not tracked by this list.
    #[error("entry {0} is not in the list")]
    EntryNotFound(EntryId),

    /// The entry is already tracked by this list.
    #[error("entry {0} is already in the list")]
    DuplicateEntry(EntryId),
}

/// Result alias used by fallible list operations.
pub type Result<T> = std::result::Result<T, SelectionError>;
