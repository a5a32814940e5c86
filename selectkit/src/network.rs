//! Network connectivity status.
//!
//! [`NetworkStatus`] is a thin wrapper over a platform
//! [`ConnectivitySource`]: it reports the source's availability flag as is
//! and re-raises the source's change event to its own subscribers.
//! [`ManualConnectivity`] is an in-process source driven by the caller,
//! used by tests and by hosts without a platform facility.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use log::debug;

use crate::handlers::{Handler, HandlerId, Handlers};

/// A platform facility reporting network reachability.
pub trait ConnectivitySource: Send + Sync {
    /// Check if the network is currently reachable.
    fn is_network_available(&self) -> bool;

    /// Register for reachability changes. The handler receives the new value.
    fn subscribe(&self, handler: Handler<bool>) -> HandlerId;

    /// Remove a reachability handler.
    /// Returns true if it was registered.
    fn unsubscribe(&self, id: HandlerId) -> bool;
}

/// Caller-driven connectivity source.
#[derive(Debug, Default)]
pub struct ManualConnectivity {
    available: AtomicBool,
    handlers: Handlers<bool>,
}

impl ManualConnectivity {
    /// Create a source with an initial availability.
    pub fn new(available: bool) -> Self {
        Self {
            available: AtomicBool::new(available),
            handlers: Handlers::new(),
        }
    }

    /// Set availability.
    /// Returns true if it changed (and the change event was raised).
    pub fn set_available(&self, available: bool) -> bool {
        if self.available.swap(available, Ordering::SeqCst) == available {
            return false;
        }
        self.handlers.emit(&available);
        true
    }
}

impl ConnectivitySource for ManualConnectivity {
    fn is_network_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    fn subscribe(&self, handler: Handler<bool>) -> HandlerId {
        self.handlers.subscribe_shared(handler)
    }

    fn unsubscribe(&self, id: HandlerId) -> bool {
        self.handlers.unsubscribe(id)
    }
}

/// Device network status backed by a [`ConnectivitySource`].
///
/// Dropping the wrapper detaches it from the source.
pub struct NetworkStatus<S: ConnectivitySource> {
    source: Arc<S>,
    handlers: Arc<Handlers<bool>>,
    subscription: HandlerId,
}

impl<S: ConnectivitySource> NetworkStatus<S> {
    /// Wrap a source and start forwarding its change event.
    pub fn new(source: Arc<S>) -> Self {
        let handlers: Arc<Handlers<bool>> = Arc::new(Handlers::new());
        let forward: Weak<Handlers<bool>> = Arc::downgrade(&handlers);
        let subscription = source.subscribe(Arc::new(move |available: &bool| {
            debug!("network available={}", available);
            if let Some(handlers) = forward.upgrade() {
                handlers.emit(available);
            }
        }));
        Self {
            source,
            handlers,
            subscription,
        }
    }

    /// Check if the network is currently reachable.
    pub fn is_network_available(&self) -> bool {
        self.source.is_network_available()
    }

    /// Register for reachability changes.
    pub fn subscribe_changed<F>(&self, handler: F) -> HandlerId
    where
        F: Fn(&bool) + Send + Sync + 'static,
    {
        self.handlers.subscribe(handler)
    }

    /// Remove a reachability handler.
    /// Returns true if it was registered.
    pub fn unsubscribe_changed(&self, id: HandlerId) -> bool {
        self.handlers.unsubscribe(id)
    }

    /// Get the wrapped source.
    pub fn source(&self) -> &Arc<S> {
        &self.source
    }
}

impl<S: ConnectivitySource> Drop for NetworkStatus<S> {
    fn drop(&mut self) {
        self.source.unsubscribe(self.subscription);
    }
}

impl<S: ConnectivitySource> std::fmt::Debug for NetworkStatus<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NetworkStatus")
            .field("available", &self.is_network_available())
            .field("subscribers", &self.handlers.len())
            .finish()
    }
}
