//! Keyed, cancellable trailing-edge timers.
//!
//! Scheduling a key that already has a pending timer cancels the old one, so a
//! burst of events collapses to a single run `delay` after the last event.

use std::{
    collections::HashMap, fmt::Debug, future::Future, hash::Hash, sync::Arc, time::Duration,
};

use parking_lot::Mutex;
use tokio::time;
use tokio_util::sync::CancellationToken;
use tracing::trace;

/// One pending timer.
struct DebounceEntry {
    /// Cancels the sleeping task.
    token: CancellationToken,
    /// Distinguishes this entry from a later replacement under the same key.
    generation: u64,
}

/// Shared map state.
struct Inner<K> {
    /// Pending timers by key.
    entries: HashMap<K, DebounceEntry>,
    /// Next generation number.
    next_gen: u64,
}

/// Keyed debouncer running on the ambient Tokio runtime.
pub struct Debouncer<K> {
    /// Pending timers.
    inner: Arc<Mutex<Inner<K>>>,
}

impl<K> Clone for Debouncer<K> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<K> Default for Debouncer<K> {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                entries: HashMap::new(),
                next_gen: 0,
            })),
        }
    }
}

impl<K> Debouncer<K>
where
    K: Eq + Hash + Clone + Debug + Send + 'static,
{
    /// Create an empty debouncer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `action` after `delay` unless `key` is rescheduled or cancelled
    /// first. Must be called from within a Tokio runtime.
    pub fn schedule<F>(&self, key: K, delay: Duration, action: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let token = CancellationToken::new();
        let cancel = token.clone();
        let generation = {
            let mut inner = self.inner.lock();
            let generation = inner.next_gen;
            inner.next_gen += 1;
            if let Some(old) = inner.entries.insert(
                key.clone(),
                DebounceEntry { token, generation },
            ) {
                old.token.cancel();
                trace!(?key, "debounce_replaced");
            }
            generation
        };

        let inner = self.inner.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = time::sleep(delay) => {}
                _ = cancel.cancelled() => {
                    trace!(?key, "debounce_cancelled");
                    return;
                }
            }
            {
                let mut inner = inner.lock();
                if inner
                    .entries
                    .get(&key)
                    .is_some_and(|e| e.generation == generation)
                {
                    inner.entries.remove(&key);
                }
            }
            trace!(?key, "debounce_fire");
            action.await;
        });
    }

    /// Whether a timer is pending for `key`.
    pub fn is_pending(&self, key: &K) -> bool {
        self.inner.lock().entries.contains_key(key)
    }

    /// Cancel the pending timer for `key`, if any.
    pub fn cancel(&self, key: &K) {
        if let Some(entry) = self.inner.lock().entries.remove(key) {
            entry.token.cancel();
            trace!(?key, "debounce_cancel");
        }
    }

    /// Cancel every pending timer.
    pub fn clear(&self) {
        let drained: Vec<DebounceEntry> = {
            let mut inner = self.inner.lock();
            inner.entries.drain().map(|(_, e)| e).collect()
        };
        for e in &drained {
            e.token.cancel();
        }
        trace!(count = drained.len(), "debounce_clear");
    }
}
