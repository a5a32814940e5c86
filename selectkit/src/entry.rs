use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use log::trace;

use crate::handlers::{HandlerId, Handlers};

/// Unique identifier for a [`SelectableEntry`].
///
/// Identity is per entry, not per value: two entries wrapping equal values
/// are distinct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(usize);

impl EntryId {
    fn new() -> Self {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        Self(COUNTER.fetch_add(1, Ordering::SeqCst))
    }
}

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "__entry_{}", self.0)
    }
}

#[derive(Debug)]
struct EntryInner<T> {
    value: T,
    selected: bool,
}

/// A value paired with a selection flag.
///
/// `SelectableEntry<T>` is a cheap cloneable handle: clones share the same
/// value, flag and subscribers. Flipping the flag notifies every subscriber
/// with the entry itself; setting the flag to its current value does nothing.
///
/// # Example
///
/// ```
/// use selectkit::entry::SelectableEntry;
///
/// let entry = SelectableEntry::new("apples");
/// entry.subscribe(|e| println!("{} -> {}", e.value(), e.is_selected()));
///
/// assert!(entry.set_selected(true));
/// assert!(!entry.set_selected(true));
/// ```
pub struct SelectableEntry<T> {
    id: EntryId,
    inner: Arc<RwLock<EntryInner<T>>>,
    handlers: Arc<Handlers<SelectableEntry<T>>>,
}

impl<T> SelectableEntry<T> {
    /// Create an unselected entry.
    pub fn new(value: T) -> Self {
        Self::with_selected(value, false)
    }

    /// Create an entry with an initial selection state.
    pub fn with_selected(value: T, selected: bool) -> Self {
        Self {
            id: EntryId::new(),
            inner: Arc::new(RwLock::new(EntryInner { value, selected })),
            handlers: Arc::new(Handlers::new()),
        }
    }

    /// Get the unique ID.
    pub fn id(&self) -> EntryId {
        self.id
    }

    /// Get a clone of the wrapped value.
    pub fn value(&self) -> T
    where
        T: Clone,
    {
        self.with_value(T::clone)
    }

    /// Borrow the wrapped value for the duration of `f`.
    pub fn with_value<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        match self.inner.read() {
            Ok(guard) => f(&guard.value),
            Err(poisoned) => f(&poisoned.into_inner().value),
        }
    }

    /// Check if the entry is selected.
    pub fn is_selected(&self) -> bool {
        self.inner
            .read()
            .map(|g| g.selected)
            .unwrap_or_else(|poisoned| poisoned.into_inner().selected)
    }

    /// Set the selection flag.
    /// Returns true if the flag changed (and subscribers were notified).
    pub fn set_selected(&self, selected: bool) -> bool {
        {
            let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
            if guard.selected == selected {
                return false;
            }
            guard.selected = selected;
        }
        trace!("{} selected={}", self.id, selected);
        self.handlers.emit(self);
        true
    }

    /// Flip the selection flag. Returns the new state.
    pub fn toggle(&self) -> bool {
        let selected = !self.is_selected();
        self.set_selected(selected);
        selected
    }

    /// Register for flag-change notifications.
    pub fn subscribe<F>(&self, handler: F) -> HandlerId
    where
        F: Fn(&SelectableEntry<T>) + Send + Sync + 'static,
    {
        self.handlers.subscribe(handler)
    }

    /// Remove a flag-change subscription.
    /// Returns true if it was registered.
    pub fn unsubscribe(&self, id: HandlerId) -> bool {
        self.handlers.unsubscribe(id)
    }

    /// Number of current subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.handlers.len()
    }
}

impl<T> Clone for SelectableEntry<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            inner: Arc::clone(&self.inner),
            handlers: Arc::clone(&self.handlers),
        }
    }
}

impl<T> PartialEq for SelectableEntry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for SelectableEntry<T> {}

impl<T: std::fmt::Debug> std::fmt::Debug for SelectableEntry<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        f.debug_struct("SelectableEntry")
            .field("id", &self.id)
            .field("value", &guard.value)
            .field("selected", &guard.selected)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_notifies_only_on_transition() {
        let entry = SelectableEntry::new(1);
        let seen = Arc::new(Mutex::new(Vec::new()));

        let s = Arc::clone(&seen);
        entry.subscribe(move |e| s.lock().unwrap().push(e.is_selected()));

        assert!(entry.set_selected(true));
        assert!(!entry.set_selected(true));
        assert!(!entry.toggle());
        assert!(entry.toggle());

        assert_eq!(*seen.lock().unwrap(), vec![true, false, true]);
    }

    #[test]
    fn test_clones_share_state() {
        let entry = SelectableEntry::new("a");
        let other = entry.clone();

        other.set_selected(true);

        assert!(entry.is_selected());
        assert_eq!(entry, other);
        assert_ne!(entry, SelectableEntry::new("a"));
    }

    #[test]
    fn test_handler_sees_updated_flag() {
        let entry = SelectableEntry::with_selected(5, true);
        let observed = Arc::new(Mutex::new(None));

        let o = Arc::clone(&observed);
        entry.subscribe(move |e| *o.lock().unwrap() = Some((e.value(), e.is_selected())));
        entry.set_selected(false);

        assert_eq!(*observed.lock().unwrap(), Some((5, false)));
    }

    #[test]
    fn test_unsubscribed_handler_is_silent() {
        let entry = SelectableEntry::new(());
        let count = Arc::new(AtomicUsize::new(0));

        let c = Arc::clone(&count);
        let id = entry.subscribe(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(entry.subscriber_count(), 1);
        assert!(entry.unsubscribe(id));

        entry.toggle();
        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert_eq!(entry.subscriber_count(), 0);
    }
}
