//! Menu provider.
//!
//! A provider owns the anchors mounted beneath it and the state store its
//! hosts render from. Opening is deferred by one frame so the gesture that
//! triggered it cannot also land on a freshly mounted backdrop; a newer open
//! or a close cancels a deferred one that has not committed yet.

use std::sync::Arc;

use anchor_geom::Margins;
use anchor_measure::{FrameClockHandle, TargetHandle};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use crate::{
    AnchorRegistry, HostKind, MenuRequest, MenuState, MenuStore, OpenMenuOptions,
    ProviderRegistration, ProviderRegistry, Result,
};

/// Provider settings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProviderConfig {
    /// Host used when a request does not name one.
    pub default_host: HostKind,
    /// Close an open menu when the application leaves the foreground.
    pub auto_close_on_background: bool,
}

/// State shared with deferred commits.
struct Shared {
    /// Anchors mounted beneath this provider.
    anchors: AnchorRegistry,
    /// This provider's state.
    store: MenuStore,
    /// Application-wide provider stack used for routing.
    registry: ProviderRegistry,
    /// Host used when a request names none.
    default_host: HostKind,
}

/// Publish `request` (or a close, for `None`) on `store`.
fn set_request(store: &MenuStore, default_host: HostKind, request: Option<MenuRequest>) {
    let generation = store.snapshot().generation;
    let Some(request) = request else {
        store.set(MenuState {
            generation,
            ..MenuState::closed(default_host)
        });
        return;
    };
    let host = match request.host.as_deref() {
        None => default_host,
        Some(name) => HostKind::parse(name).unwrap_or_else(|| {
            warn!(host = name, "unknown host; falling back to view");
            HostKind::View
        }),
    };
    debug!(id = %request.id, %host, generation = generation + 1, "menu_open");
    store.set(MenuState {
        request: Some(request),
        active_host: host,
        is_open: true,
        generation: generation + 1,
    });
}

impl Shared {
    /// Commit an open, routing it to another provider if the anchor is not
    /// ours.
    fn commit(&self, request: MenuRequest) {
        if self.anchors.contains(&request.id) {
            set_request(&self.store, self.default_host, Some(request));
            return;
        }
        let owners = self.registry.find_all_for_anchor(&request.id);
        if owners.len() > 1 {
            warn!(
                id = %request.id,
                count = owners.len(),
                "anchor id registered by several providers; using the most recently mounted"
            );
        }
        match self.registry.find_for_anchor(&request.id) {
            Some(target) => {
                debug!(id = %request.id, provider = target.id, "routing open");
                set_request(&target.store, target.default_host, Some(request));
            }
            None => {
                warn!(id = %request.id, "anchor not registered with any provider; ignoring open");
            }
        }
    }
}

/// Owner of a set of anchors and the menu state rendered for them.
pub struct MenuProvider {
    /// State reachable from deferred commits.
    shared: Arc<Shared>,
    /// Settings.
    config: ProviderConfig,
    /// Frame source for deferring opens.
    clock: FrameClockHandle,
    /// Cancels the deferred open, if one is in flight.
    pending: Mutex<Option<CancellationToken>>,
    /// Keeps this provider on the routing stack.
    registration: ProviderRegistration,
}

impl MenuProvider {
    /// Mount a provider on `registry`.
    pub fn new(registry: &ProviderRegistry, config: ProviderConfig, clock: FrameClockHandle) -> Self {
        let anchors = AnchorRegistry::new();
        let store = MenuStore::new(MenuState::closed(config.default_host));
        let registration = registry.register(anchors.clone(), store.clone(), config.default_host);
        Self {
            shared: Arc::new(Shared {
                anchors,
                store,
                registry: registry.clone(),
                default_host: config.default_host,
            }),
            config,
            clock,
            pending: Mutex::new(None),
            registration,
        }
    }

    /// Registration id on the provider stack.
    pub fn id(&self) -> u64 {
        self.registration.id()
    }

    /// Provider settings.
    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// Anchors mounted beneath this provider.
    pub fn anchors(&self) -> &AnchorRegistry {
        &self.shared.anchors
    }

    /// State store hosts subscribe to.
    pub fn store(&self) -> &MenuStore {
        &self.shared.store
    }

    /// Current state.
    pub fn state(&self) -> MenuState {
        self.shared.store.snapshot()
    }

    /// Whether a menu is open on this provider.
    pub fn is_open(&self) -> bool {
        self.state().is_open
    }

    /// Register an anchor under `id`.
    pub fn register_anchor(&self, id: impl Into<String>, target: TargetHandle, margins: Option<Margins>) {
        self.shared.anchors.register(id, target, margins);
    }

    /// Remove the anchor under `id`.
    pub fn unregister_anchor(&self, id: &str) {
        self.shared.anchors.unregister(id);
    }

    /// Whether an open is waiting for its frame.
    pub fn has_pending_open(&self) -> bool {
        self.pending
            .lock()
            .as_ref()
            .is_some_and(|t| !t.is_cancelled())
    }

    /// Open a menu against `options.id`.
    ///
    /// Unless `options.immediate` is set the commit happens on the next frame,
    /// which requires a Tokio runtime; without one the open commits at once.
    pub fn open(&self, options: OpenMenuOptions) -> Result<()> {
        options.validate()?;
        self.cancel_pending();

        if options.immediate {
            self.shared.commit(options);
            return Ok(());
        }
        let Ok(rt) = Handle::try_current() else {
            debug!(id = %options.id, "no runtime for deferred open; committing now");
            self.shared.commit(options);
            return Ok(());
        };

        let token = CancellationToken::new();
        let cancel = token.clone();
        *self.pending.lock() = Some(token);
        let shared = self.shared.clone();
        let clock = self.clock.clone();
        rt.spawn(async move {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    trace!(id = %options.id, "open_cancelled");
                }
                _ = clock.next_frame() => {
                    if cancel.is_cancelled() {
                        trace!(id = %options.id, "open_cancelled");
                        return;
                    }
                    cancel.cancel();
                    shared.commit(options);
                }
            }
        });
        Ok(())
    }

    /// Close the menu, cancelling any deferred open.
    pub fn close(&self) {
        self.cancel_pending();
        set_request(&self.shared.store, self.shared.default_host, None);
    }

    /// Report whether the application is in the foreground.
    pub fn set_app_active(&self, active: bool) {
        if !active && self.config.auto_close_on_background && self.is_open() {
            debug!("app backgrounded; closing menu");
            set_request(&self.shared.store, self.shared.default_host, None);
        }
    }

    /// Cancel the deferred open, if any.
    fn cancel_pending(&self) {
        if let Some(token) = self.pending.lock().take() {
            token.cancel();
        }
    }
}

impl Drop for MenuProvider {
    fn drop(&mut self) {
        self.cancel_pending();
        if self.is_open() {
            set_request(&self.shared.store, self.shared.default_host, None);
        }
    }
}
