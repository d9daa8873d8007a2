//! Minimal publish/subscribe state store.
//!
//! Readers take a snapshot; interested parties subscribe and are called after
//! every `set`. Listeners run on the caller of `set`, with no lock held, so a
//! listener may read the store or even set it again.

use std::{
    fmt,
    sync::{
        Arc, Weak,
        atomic::{AtomicU64, Ordering},
    },
};

use parking_lot::Mutex;

use crate::{HostKind, MenuRequest};

/// Callback invoked with the new state.
type Listener<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Shared store state.
struct StoreInner<T> {
    /// Current value.
    snapshot: Mutex<T>,
    /// Registered listeners with their ids.
    listeners: Mutex<Vec<(u64, Listener<T>)>>,
    /// Next listener id.
    next_id: AtomicU64,
}

/// Observable value with snapshot reads.
pub struct Store<T> {
    /// Shared state.
    inner: Arc<StoreInner<T>>,
}

impl<T> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: Clone + Send + 'static> Store<T> {
    /// Create a store holding `initial`.
    pub fn new(initial: T) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                snapshot: Mutex::new(initial),
                listeners: Mutex::new(Vec::new()),
                next_id: AtomicU64::new(0),
            }),
        }
    }

    /// Current value.
    pub fn snapshot(&self) -> T {
        self.inner.snapshot.lock().clone()
    }

    /// Register `listener`; it stays registered until the returned
    /// [`Subscription`] is dropped.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let listener: Listener<T> = Arc::new(listener);
        self.inner.listeners.lock().push((id, listener));
        let weak: Weak<StoreInner<T>> = Arc::downgrade(&self.inner);
        Subscription {
            cancel: Some(Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.listeners.lock().retain(|(i, _)| *i != id);
                }
            })),
        }
    }

    /// Replace the value and notify every listener.
    pub fn set(&self, next: T) {
        *self.inner.snapshot.lock() = next.clone();
        let listeners: Vec<Listener<T>> = self
            .inner
            .listeners
            .lock()
            .iter()
            .map(|(_, l)| l.clone())
            .collect();
        for l in listeners {
            l(&next);
        }
    }

    /// Number of live subscriptions.
    pub fn listener_count(&self) -> usize {
        self.inner.listeners.lock().len()
    }
}

impl<T: fmt::Debug> fmt::Debug for Store<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("snapshot", &*self.inner.snapshot.lock())
            .finish_non_exhaustive()
    }
}

/// Drop guard that removes a store listener.
pub struct Subscription {
    /// Removal action, taken on drop.
    cancel: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

/// Observable state of one provider.
#[derive(Clone, Debug, PartialEq)]
pub struct MenuState {
    /// The committed request, if a menu is open.
    pub request: Option<MenuRequest>,
    /// Host layer responsible for rendering.
    pub active_host: HostKind,
    /// Whether a menu is open.
    pub is_open: bool,
    /// Bumped on every committed open, so an identical request opened twice
    /// is still a new open.
    pub generation: u64,
}

impl MenuState {
    /// Closed state rendered by `host`.
    #[must_use]
    pub fn closed(host: HostKind) -> Self {
        Self {
            request: None,
            active_host: host,
            is_open: false,
            generation: 0,
        }
    }
}

/// Store of a provider's [`MenuState`].
pub type MenuStore = Store<MenuState>;
