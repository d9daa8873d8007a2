//! Anchor bookkeeping and cross-provider routing.
//!
//! Each provider keeps an [`AnchorRegistry`] of the anchors mounted beneath it.
//! Providers themselves register with a [`ProviderRegistry`] shared by the
//! whole application, so an `open` for an anchor that lives under a nested
//! provider (one inside a modal, say) can be routed there.

use std::{
    collections::HashMap,
    fmt,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use anchor_geom::Margins;
use anchor_measure::TargetHandle;
use parking_lot::Mutex;
use tracing::trace;

use crate::{HostKind, MenuStore};

/// A registered anchor.
#[derive(Clone)]
pub struct AnchorEntry {
    /// Measurable element backing the anchor.
    pub target: TargetHandle,
    /// Outer margins declared on the anchored element.
    pub margins: Option<Margins>,
}

impl fmt::Debug for AnchorEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnchorEntry")
            .field("margins", &self.margins)
            .finish_non_exhaustive()
    }
}

/// Anchors known to one provider, keyed by id. Cloning shares the map.
#[derive(Clone, Default)]
pub struct AnchorRegistry {
    /// Entries by anchor id.
    entries: Arc<Mutex<HashMap<String, AnchorEntry>>>,
}

impl AnchorRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or replace the anchor under `id`.
    pub fn register(&self, id: impl Into<String>, target: TargetHandle, margins: Option<Margins>) {
        let id = id.into();
        trace!(%id, "anchor_register");
        self.entries
            .lock()
            .insert(id, AnchorEntry { target, margins });
    }

    /// Remove the anchor under `id`.
    pub fn unregister(&self, id: &str) {
        if self.entries.lock().remove(id).is_some() {
            trace!(%id, "anchor_unregister");
        }
    }

    /// Look up the anchor under `id`.
    pub fn get(&self, id: &str) -> Option<AnchorEntry> {
        self.entries.lock().get(id).cloned()
    }

    /// Whether `id` is registered.
    pub fn contains(&self, id: &str) -> bool {
        self.entries.lock().contains_key(id)
    }

    /// Number of registered anchors.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether no anchors are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl fmt::Debug for AnchorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ids: Vec<String> = self.entries.lock().keys().cloned().collect();
        ids.sort();
        f.debug_struct("AnchorRegistry").field("ids", &ids).finish()
    }
}

/// Identifier assigned to a provider when it registers.
pub type ProviderId = u64;

/// What the routing layer knows about a mounted provider.
#[derive(Clone, Debug)]
pub struct ProviderEntry {
    /// Registration id, increasing with mount order.
    pub id: ProviderId,
    /// The provider's anchors.
    pub anchors: AnchorRegistry,
    /// The provider's state store; routed requests are committed here.
    pub store: MenuStore,
    /// Host used when a request names none.
    pub default_host: HostKind,
}

/// Shared state behind a [`ProviderRegistry`].
#[derive(Default)]
struct RegistryInner {
    /// Mounted providers, oldest first.
    stack: Mutex<Vec<ProviderEntry>>,
    /// Next provider id.
    next_id: AtomicU64,
}

/// Application-wide stack of mounted providers. Cloning shares the stack.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    /// Shared stack.
    inner: Arc<RegistryInner>,
}

impl ProviderRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a provider onto the stack. It is removed when the returned guard
    /// is dropped.
    pub fn register(
        &self,
        anchors: AnchorRegistry,
        store: MenuStore,
        default_host: HostKind,
    ) -> ProviderRegistration {
        let id = self.inner.next_id.fetch_add(1, Ordering::SeqCst);
        self.inner.stack.lock().push(ProviderEntry {
            id,
            anchors,
            store,
            default_host,
        });
        trace!(id, "provider_register");
        ProviderRegistration {
            registry: self.clone(),
            id,
        }
    }

    /// Remove the provider with `id`, if present.
    fn unregister(&self, id: ProviderId) {
        let mut stack = self.inner.stack.lock();
        if let Some(idx) = stack.iter().position(|p| p.id == id) {
            stack.remove(idx);
            trace!(id, "provider_unregister");
        }
    }

    /// The most recently mounted provider that owns `anchor_id`.
    pub fn find_for_anchor(&self, anchor_id: &str) -> Option<ProviderEntry> {
        if anchor_id.is_empty() {
            return None;
        }
        self.inner
            .stack
            .lock()
            .iter()
            .rev()
            .find(|p| p.anchors.contains(anchor_id))
            .cloned()
    }

    /// Every provider that owns `anchor_id`, oldest first.
    pub fn find_all_for_anchor(&self, anchor_id: &str) -> Vec<ProviderEntry> {
        if anchor_id.is_empty() {
            return Vec::new();
        }
        self.inner
            .stack
            .lock()
            .iter()
            .filter(|p| p.anchors.contains(anchor_id))
            .cloned()
            .collect()
    }

    /// Number of mounted providers.
    pub fn len(&self) -> usize {
        self.inner.stack.lock().len()
    }

    /// Whether no providers are mounted.
    pub fn is_empty(&self) -> bool {
        self.inner.stack.lock().is_empty()
    }
}

impl fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("providers", &self.len())
            .finish()
    }
}

/// Drop guard returned by [`ProviderRegistry::register`].
#[derive(Debug)]
pub struct ProviderRegistration {
    /// Registry to remove from.
    registry: ProviderRegistry,
    /// Id of the registered provider.
    id: ProviderId,
}

impl ProviderRegistration {
    /// Id assigned at registration.
    #[must_use]
    pub fn id(&self) -> ProviderId {
        self.id
    }
}

impl Drop for ProviderRegistration {
    fn drop(&mut self) {
        self.registry.unregister(self.id);
    }
}
