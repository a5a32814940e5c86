//! Synchronous handler registries.
//!
//! Every notification source in the crate (entry flags, list structure,
//! network status) keeps its subscribers in a [`Handlers`] registry.
//! Handlers run on the emitting thread, in registration order, and no
//! internal lock is held while they run, so a handler may freely read the
//! object that raised the notification.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

/// Identifier returned by `subscribe`, used to unsubscribe later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(usize);

impl HandlerId {
    fn new() -> Self {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        Self(COUNTER.fetch_add(1, Ordering::SeqCst))
    }
}

impl std::fmt::Display for HandlerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "__handler_{}", self.0)
    }
}

/// A shared notification callback.
pub type Handler<A> = Arc<dyn Fn(&A) + Send + Sync>;

/// Ordered set of handlers receiving `&A`.
pub struct Handlers<A> {
    inner: RwLock<Vec<(HandlerId, Handler<A>)>>,
}

impl<A> Handlers<A> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Vec::new()),
        }
    }

    /// Register a closure. Returns its ID.
    pub fn subscribe<F>(&self, handler: F) -> HandlerId
    where
        F: Fn(&A) + Send + Sync + 'static,
    {
        self.subscribe_shared(Arc::new(handler))
    }

    /// Register an already shared handler. Returns its ID.
    pub fn subscribe_shared(&self, handler: Handler<A>) -> HandlerId {
        let id = HandlerId::new();
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, handler));
        id
    }

    /// Remove a handler.
    /// Returns true if it was registered.
    pub fn unsubscribe(&self, id: HandlerId) -> bool {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let before = guard.len();
        guard.retain(|(handler_id, _)| *handler_id != id);
        guard.len() != before
    }

    /// Number of registered handlers.
    pub fn len(&self) -> usize {
        self.inner
            .read()
            .map(|g| g.len())
            .unwrap_or_else(|poisoned| poisoned.into_inner().len())
    }

    /// Check if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Deliver `arg` to every handler.
    ///
    /// The handler list is snapshotted first; handlers added or removed
    /// during delivery take effect from the next emit.
    pub fn emit(&self, arg: &A) {
        let snapshot: Vec<Handler<A>> = match self.inner.read() {
            Ok(guard) => guard.iter().map(|(_, h)| Arc::clone(h)).collect(),
            Err(poisoned) => poisoned
                .into_inner()
                .iter()
                .map(|(_, h)| Arc::clone(h))
                .collect(),
        };
        for handler in snapshot {
            handler(arg);
        }
    }
}

impl<A> Default for Handlers<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> std::fmt::Debug for Handlers<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Handlers")
            .field("len", &self.len())
            .finish()
    }
}
