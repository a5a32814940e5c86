//! The observable ordered container capability.
//!
//! Containers that expose structural mutations and raise a
//! [`CollectionChange`] after each one implement [`ObservableList`].
//! Implementors own their storage and locking; the trait only fixes the
//! contract callers and UI bindings rely on.
//!
//! # Contract
//!
//! 1. Exactly one notification per successful mutation that changes the
//!    container, raised after the state has been updated. A mutation that
//!    leaves the container as it was (replacing an entry with itself,
//!    moving an entry onto its own index) succeeds and raises nothing.
//! 2. A failed mutation leaves the container untouched and raises nothing.
//! 3. Indices follow `Vec` semantics: `insert` accepts `0..=len`, every
//!    other operation accepts `0..len`.

use crate::error::Result;
use crate::handlers::HandlerId;

/// A structural change to an [`ObservableList`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionChange<E> {
    /// Entries were inserted starting at `index`.
    Added {
        /// Index of the first inserted entry.
        index: usize,
        /// The inserted entries, in order.
        entries: Vec<E>,
    },
    /// Entries were removed starting at `index`.
    Removed {
        /// Index the first removed entry occupied.
        index: usize,
        /// The removed entries, in order.
        entries: Vec<E>,
    },
    /// The entry at `index` was swapped for another.
    Replaced {
        /// Position of the replacement.
        index: usize,
        /// The entry that left the list.
        old: E,
        /// The entry now at `index`.
        new: E,
    },
    /// An entry moved from one position to another.
    Moved {
        /// Previous index.
        from: usize,
        /// New index.
        to: usize,
        /// The moved entry.
        entry: E,
    },
    /// The list was emptied.
    Reset,
}

impl<E> CollectionChange<E> {
    /// Get the entries that joined the list with this change.
    pub fn added(&self) -> &[E] {
        match self {
            CollectionChange::Added { entries, .. } => entries,
            CollectionChange::Replaced { new, .. } => std::slice::from_ref(new),
            _ => &[],
        }
    }

    /// Get the entries that left the list with this change.
    ///
    /// `Reset` carries no entries; subscribers that track membership
    /// should drop everything they hold for the list.
    pub fn removed(&self) -> &[E] {
        match self {
            CollectionChange::Removed { entries, .. } => entries,
            CollectionChange::Replaced { old, .. } => std::slice::from_ref(old),
            _ => &[],
        }
    }
}

/// Trait for ordered containers that raise structural notifications.
///
/// # Example
///
/// ```ignore
/// fn mirror_len<L: ObservableList>(list: &L) -> HandlerId {
///     list.subscribe_collection_changed(|change| {
///         if matches!(change, CollectionChange::Reset) {
///             log::debug!("list reset");
///         }
///     })
/// }
/// ```
pub trait ObservableList {
    /// The element type.
    type Entry: Clone;

    // =========================================================================
    // Required Methods - Access
    // =========================================================================

    /// Get the number of entries.
    fn len(&self) -> usize;

    /// Get an entry by index.
    fn get(&self, index: usize) -> Option<Self::Entry>;

    // =========================================================================
    // Required Methods - Mutation
    // =========================================================================

    /// Insert an entry at `index`, shifting later entries right.
    fn insert(&self, index: usize, entry: Self::Entry) -> Result<()>;

    /// Remove and return the entry at `index`.
    fn remove(&self, index: usize) -> Result<Self::Entry>;

    /// Put `entry` at `index`, returning the entry it displaced.
    fn replace(&self, index: usize, entry: Self::Entry) -> Result<Self::Entry>;

    /// Move the entry at `from` so that it ends up at `to`.
    fn move_entry(&self, from: usize, to: usize) -> Result<()>;

    /// Remove every entry.
    fn clear(&self);

    // =========================================================================
    // Required Methods - Notification
    // =========================================================================

    /// Register a structural-change handler.
    fn subscribe_collection_changed<F>(&self, handler: F) -> HandlerId
    where
        F: Fn(&CollectionChange<Self::Entry>) + Send + Sync + 'static;

    /// Remove a structural-change handler.
    /// Returns true if it was registered.
    fn unsubscribe_collection_changed(&self, id: HandlerId) -> bool;

    // =========================================================================
    // Provided Methods
    // =========================================================================

    /// Check if the list is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append an entry.
    fn push(&self, entry: Self::Entry) -> Result<()> {
        self.insert(self.len(), entry)
    }

    /// Get all entries.
    fn entries(&self) -> Vec<Self::Entry> {
        (0..self.len()).filter_map(|i| self.get(i)).collect()
    }
}
