//! Selection tracking list state.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak};

use log::{debug, trace, warn};

use crate::collection::{CollectionChange, ObservableList};
use crate::entry::{EntryId, SelectableEntry};
use crate::error::{Result, SelectionError};
use crate::handlers::{HandlerId, Handlers};

use super::config::SelectionConfig;
use super::view::SelectedView;

/// Unique identifier for a SelectionTrackingList instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListId(usize);

impl ListId {
    fn new() -> Self {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        Self(COUNTER.fetch_add(1, Ordering::SeqCst))
    }
}

impl std::fmt::Display for ListId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "__selection_list_{}", self.0)
    }
}

/// An entry in the list together with the list's subscription on it.
#[derive(Debug)]
struct Tracked<T> {
    entry: SelectableEntry<T>,
    subscription: HandlerId,
}

/// Internal state for the list.
#[derive(Debug)]
struct ListInner<T> {
    /// The entries in list order.
    entries: Vec<Tracked<T>>,
    /// Values of the selected entries.
    view: SelectedView<T>,
    /// Ordering configuration.
    config: SelectionConfig,
}

impl<T: Clone> ListInner<T> {
    fn position_of(&self, id: EntryId) -> Option<usize> {
        self.entries.iter().position(|t| t.entry.id() == id)
    }

    fn check_index(&self, index: usize) -> Result<()> {
        let len = self.entries.len();
        if index < len {
            Ok(())
        } else {
            Err(SelectionError::IndexOutOfBounds { index, len })
        }
    }

    /// Add a selected entry's value at list `position`.
    fn place(&mut self, entry: &SelectableEntry<T>, position: usize) {
        let value = entry.value();
        let at = if self.config.maintain_order {
            self.view.insert_ordered(entry.id(), position, value)
        } else {
            self.view.append(entry.id(), position, value)
        };
        trace!("{} placed at view index {} (list position {})", entry.id(), at, position);
    }

    /// Bring the view in line with an entry's flag.
    /// Returns false if the entry is not in this list.
    fn apply_toggle(&mut self, entry: &SelectableEntry<T>) -> bool {
        let Some(position) = self.position_of(entry.id()) else {
            return false;
        };
        if entry.is_selected() {
            if !self.view.contains(entry.id()) {
                self.place(entry, position);
            }
        } else {
            self.view.remove(entry.id());
        }
        true
    }
}

/// State shared between list handles and the entry subscriptions.
struct ListShared<T> {
    id: ListId,
    inner: RwLock<ListInner<T>>,
    selection_changed: Handlers<SelectableEntry<T>>,
    collection_changed: Handlers<CollectionChange<SelectableEntry<T>>>,
}

impl<T> ListShared<T> {
    fn read(&self) -> RwLockReadGuard<'_, ListInner<T>> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, ListInner<T>> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: Clone> ListShared<T> {
    /// Entry flag-change handler.
    ///
    /// Updates the view first, then notifies subscribers with no lock held.
    fn on_selection_changed(&self, entry: &SelectableEntry<T>) {
        let applied = self.write().apply_toggle(entry);
        if !applied {
            warn!("{}: change from untracked {} ignored", self.id, entry.id());
            return;
        }
        trace!(
            "{}: {} selected={}",
            self.id,
            entry.id(),
            entry.is_selected()
        );
        self.selection_changed.emit(entry);
    }
}

impl<T> Drop for ListShared<T> {
    fn drop(&mut self) {
        let inner = self.inner.get_mut().unwrap_or_else(PoisonError::into_inner);
        for tracked in &inner.entries {
            tracked.entry.unsubscribe(tracked.subscription);
        }
    }
}

/// An ordered list of selectable entries with a derived view of the
/// selected values.
///
/// `SelectionTrackingList<T>` subscribes to every entry it holds. When an
/// entry's flag flips, the list updates its selected values and then raises
/// the selection-changed event, so handlers always observe the new view.
///
/// The selected values come in one of two orders:
/// - append order (default): the order in which entries were selected
/// - positional order (`maintain_order`): the entries' order in the list
///
/// Structural mutations resynchronize the view: removing a selected entry
/// drops its value, inserting an already selected entry adds it, and moving
/// an entry re-places its value in positional order.
///
/// # Example
///
/// ```
/// use selectkit::prelude::*;
///
/// let list = SelectionTrackingList::with_config(SelectionConfig::positional());
/// let a = SelectableEntry::new("a");
/// let b = SelectableEntry::new("b");
/// list.push(a.clone()).unwrap();
/// list.push(b.clone()).unwrap();
///
/// b.set_selected(true);
/// a.set_selected(true);
/// assert_eq!(list.selected_values(), vec!["a", "b"]);
/// ```
pub struct SelectionTrackingList<T> {
    shared: Arc<ListShared<T>>,
}

impl<T> SelectionTrackingList<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Create a new empty list in append order.
    pub fn new() -> Self {
        Self::with_config(SelectionConfig::default())
    }

    /// Create a new empty list with a configuration.
    pub fn with_config(config: SelectionConfig) -> Self {
        Self {
            shared: Arc::new(ListShared {
                id: ListId::new(),
                inner: RwLock::new(ListInner {
                    entries: Vec::new(),
                    view: SelectedView::new(),
                    config,
                }),
                selection_changed: Handlers::new(),
                collection_changed: Handlers::new(),
            }),
        }
    }

    /// Create a list with initial entries.
    ///
    /// Every entry is tracked; already selected entries seed the view in
    /// list order. Fails on an entry that appears twice.
    pub fn with_entries<I>(config: SelectionConfig, entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = SelectableEntry<T>>,
    {
        let list = Self::with_config(config);
        list.seed(entries, true)?;
        Ok(list)
    }

    /// Track initial entries in order.
    ///
    /// A repeated entry fails when `strict`, otherwise it is skipped.
    fn seed<I>(&self, entries: I, strict: bool) -> Result<()>
    where
        I: IntoIterator<Item = SelectableEntry<T>>,
    {
        let mut inner = self.shared.write();
        for entry in entries {
            if inner.position_of(entry.id()).is_some() {
                if strict {
                    return Err(SelectionError::DuplicateEntry(entry.id()));
                }
                warn!("{}: skipped repeated {}", self.shared.id, entry.id());
                continue;
            }
            let position = inner.entries.len();
            let tracked = self.track(entry);
            if tracked.entry.is_selected() {
                inner.place(&tracked.entry, position);
            }
            inner.entries.push(tracked);
        }
        debug!(
            "{}: created with {} entries ({} selected)",
            self.shared.id,
            inner.entries.len(),
            inner.view.len()
        );
        Ok(())
    }

    /// Get a handle that does not keep the list alive.
    ///
    /// Handlers that need to read the list should capture this instead of
    /// a clone; a clone stored in the list's own handlers keeps it alive.
    pub fn downgrade(&self) -> WeakSelectionTrackingList<T> {
        WeakSelectionTrackingList {
            shared: Arc::downgrade(&self.shared),
        }
    }

    /// Get the unique ID.
    pub fn id(&self) -> ListId {
        self.shared.id
    }

    /// Subscribe the list to an entry's flag changes.
    ///
    /// The subscription holds only a weak reference to the list state.
    fn track(&self, entry: SelectableEntry<T>) -> Tracked<T> {
        let list = Arc::downgrade(&self.shared);
        let subscription = entry.subscribe(move |changed| {
            if let Some(shared) = list.upgrade() {
                shared.on_selection_changed(changed);
            }
        });
        Tracked {
            entry,
            subscription,
        }
    }

    fn untrack(tracked: &Tracked<T>) {
        tracked.entry.unsubscribe(tracked.subscription);
    }

    fn emit(&self, change: CollectionChange<SelectableEntry<T>>) {
        self.shared.collection_changed.emit(&change);
    }

    // -------------------------------------------------------------------------
    // Entry lookup
    // -------------------------------------------------------------------------

    /// Get the index of an entry.
    pub fn position(&self, entry: &SelectableEntry<T>) -> Option<usize> {
        self.shared.read().position_of(entry.id())
    }

    /// Check if the list tracks an entry.
    pub fn contains(&self, entry: &SelectableEntry<T>) -> bool {
        self.position(entry).is_some()
    }

    /// Remove an entry by identity. Returns the index it occupied.
    pub fn remove_entry(&self, entry: &SelectableEntry<T>) -> Result<usize> {
        let index = self
            .position(entry)
            .ok_or(SelectionError::EntryNotFound(entry.id()))?;
        self.remove(index)?;
        Ok(index)
    }

    // -------------------------------------------------------------------------
    // Selection
    // -------------------------------------------------------------------------

    /// Get the selected values in view order.
    pub fn selected_values(&self) -> Vec<T> {
        self.shared.read().view.values().to_vec()
    }

    /// Get the list positions of the selected values, aligned with
    /// [`selected_values`](Self::selected_values).
    pub fn selected_positions(&self) -> Vec<usize> {
        self.shared.read().view.positions()
    }

    /// Get the number of selected entries.
    pub fn selected_count(&self) -> usize {
        self.shared.read().view.len()
    }

    /// Check whether selected values follow list order.
    pub fn maintain_order(&self) -> bool {
        self.shared.read().config.maintain_order
    }

    /// Set whether future selections follow list order.
    ///
    /// Values already in the view keep their current order.
    pub fn set_maintain_order(&self, maintain_order: bool) {
        let mut inner = self.shared.write();
        if inner.config.maintain_order != maintain_order {
            inner.config.maintain_order = maintain_order;
            debug!("{}: maintain_order={}", self.shared.id, maintain_order);
        }
    }

    /// Get the current configuration.
    pub fn config(&self) -> SelectionConfig {
        self.shared.read().config
    }

    /// Select every entry.
    /// Returns the number of entries whose flag changed.
    pub fn select_all(&self) -> usize {
        self.set_all(true)
    }

    /// Deselect every entry.
    /// Returns the number of entries whose flag changed.
    pub fn deselect_all(&self) -> usize {
        self.set_all(false)
    }

    fn set_all(&self, selected: bool) -> usize {
        // Snapshot first: each toggle re-enters the list through its handler.
        let entries: Vec<_> = self.entries();
        entries
            .iter()
            .filter(|entry| entry.set_selected(selected))
            .count()
    }

    // -------------------------------------------------------------------------
    // Notifications
    // -------------------------------------------------------------------------

    /// Register a handler for entry flag changes.
    ///
    /// Runs after the selected values have been updated. To read the list
    /// from the handler, capture [`downgrade`](Self::downgrade).
    pub fn subscribe_selection_changed<F>(&self, handler: F) -> HandlerId
    where
        F: Fn(&SelectableEntry<T>) + Send + Sync + 'static,
    {
        self.shared.selection_changed.subscribe(handler)
    }

    /// Remove a selection-changed handler.
    /// Returns true if it was registered.
    pub fn unsubscribe_selection_changed(&self, id: HandlerId) -> bool {
        self.shared.selection_changed.unsubscribe(id)
    }
}

impl<T> ObservableList for SelectionTrackingList<T>
where
    T: Clone + Send + Sync + 'static,
{
    type Entry = SelectableEntry<T>;

    fn len(&self) -> usize {
        self.shared.read().entries.len()
    }

    fn get(&self, index: usize) -> Option<SelectableEntry<T>> {
        self.shared
            .read()
            .entries
            .get(index)
            .map(|t| t.entry.clone())
    }

    fn entries(&self) -> Vec<SelectableEntry<T>> {
        self.shared
            .read()
            .entries
            .iter()
            .map(|t| t.entry.clone())
            .collect()
    }

    fn insert(&self, index: usize, entry: SelectableEntry<T>) -> Result<()> {
        {
            let mut inner = self.shared.write();
            let len = inner.entries.len();
            if index > len {
                return Err(SelectionError::IndexOutOfBounds { index, len });
            }
            if inner.position_of(entry.id()).is_some() {
                return Err(SelectionError::DuplicateEntry(entry.id()));
            }
            let tracked = self.track(entry.clone());
            inner.entries.insert(index, tracked);
            inner.view.shift_for_insert(index);
            if entry.is_selected() {
                inner.place(&entry, index);
            }
            debug!("{}: inserted {} at {}", self.shared.id, entry.id(), index);
        }
        self.emit(CollectionChange::Added {
            index,
            entries: vec![entry],
        });
        Ok(())
    }

    fn remove(&self, index: usize) -> Result<SelectableEntry<T>> {
        let entry = {
            let mut inner = self.shared.write();
            inner.check_index(index)?;
            let tracked = inner.entries.remove(index);
            Self::untrack(&tracked);
            inner.view.remove(tracked.entry.id());
            inner.view.shift_for_remove(index);
            debug!(
                "{}: removed {} from {}",
                self.shared.id,
                tracked.entry.id(),
                index
            );
            tracked.entry
        };
        self.emit(CollectionChange::Removed {
            index,
            entries: vec![entry.clone()],
        });
        Ok(entry)
    }

    fn replace(&self, index: usize, entry: SelectableEntry<T>) -> Result<SelectableEntry<T>> {
        let old = {
            let mut inner = self.shared.write();
            inner.check_index(index)?;
            // Same entry in place: nothing changes, nothing to raise
            if inner.entries[index].entry == entry {
                return Ok(entry);
            }
            if inner.position_of(entry.id()).is_some() {
                return Err(SelectionError::DuplicateEntry(entry.id()));
            }
            let tracked = self.track(entry.clone());
            let old = std::mem::replace(&mut inner.entries[index], tracked);
            Self::untrack(&old);
            inner.view.remove(old.entry.id());
            if entry.is_selected() {
                inner.place(&entry, index);
            }
            debug!(
                "{}: replaced {} with {} at {}",
                self.shared.id,
                old.entry.id(),
                entry.id(),
                index
            );
            old.entry
        };
        self.emit(CollectionChange::Replaced {
            index,
            old: old.clone(),
            new: entry,
        });
        Ok(old)
    }

    fn move_entry(&self, from: usize, to: usize) -> Result<()> {
        let entry = {
            let mut inner = self.shared.write();
            inner.check_index(from)?;
            inner.check_index(to)?;
            if from == to {
                return Ok(());
            }
            let tracked = inner.entries.remove(from);
            let entry = tracked.entry.clone();
            inner.entries.insert(to, tracked);
            let selected = inner.view.shift_for_move(from, to).is_some();
            if selected && inner.config.maintain_order {
                inner.view.reposition(entry.id());
            }
            debug!("{}: moved {} from {} to {}", self.shared.id, entry.id(), from, to);
            entry
        };
        self.emit(CollectionChange::Moved { from, to, entry });
        Ok(())
    }

    fn clear(&self) {
        {
            let mut inner = self.shared.write();
            for tracked in inner.entries.drain(..) {
                Self::untrack(&tracked);
            }
            inner.view.clear();
            debug!("{}: cleared", self.shared.id);
        }
        self.emit(CollectionChange::Reset);
    }

    fn subscribe_collection_changed<F>(&self, handler: F) -> HandlerId
    where
        F: Fn(&CollectionChange<SelectableEntry<T>>) + Send + Sync + 'static,
    {
        self.shared.collection_changed.subscribe(handler)
    }

    fn unsubscribe_collection_changed(&self, id: HandlerId) -> bool {
        self.shared.collection_changed.unsubscribe(id)
    }
}

impl<T> FromIterator<SelectableEntry<T>> for SelectionTrackingList<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Collect entries into an append-order list, skipping repeats.
    fn from_iter<I: IntoIterator<Item = SelectableEntry<T>>>(iter: I) -> Self {
        let list = Self::new();
        // Never fails: repeats are skipped
        let _ = list.seed(iter, false);
        list
    }
}

/// Non-owning handle to a [`SelectionTrackingList`].
pub struct WeakSelectionTrackingList<T> {
    shared: Weak<ListShared<T>>,
}

impl<T> WeakSelectionTrackingList<T> {
    /// Get the list back, if any strong handle is still alive.
    pub fn upgrade(&self) -> Option<SelectionTrackingList<T>> {
        self.shared
            .upgrade()
            .map(|shared| SelectionTrackingList { shared })
    }
}

impl<T> Clone for WeakSelectionTrackingList<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Weak::clone(&self.shared),
        }
    }
}

impl<T> std::fmt::Debug for WeakSelectionTrackingList<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeakSelectionTrackingList")
            .field("alive", &(self.shared.strong_count() > 0))
            .finish()
    }
}

impl<T> Clone for SelectionTrackingList<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T> Default for SelectionTrackingList<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for SelectionTrackingList<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.shared.read();
        f.debug_struct("SelectionTrackingList")
            .field("id", &self.shared.id)
            .field("len", &inner.entries.len())
            .field("selected", &inner.view.len())
            .field("config", &inner.config)
            .finish()
    }
}
