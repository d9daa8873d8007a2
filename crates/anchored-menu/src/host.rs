//! Host-side positioning pipeline.
//!
//! A [`MenuHost`] renders the open menu for one host layer. For each open
//! session it measures the anchor and its own container, strips the anchor's
//! margins, translates the anchor into host coordinates and solves the menu
//! position against the host size. Results from a session that has since been
//! closed or replaced are dropped.

use std::{sync::Arc, time::Duration};

use anchor_geom::{
    LayoutDirection, MenuPosition, MenuSize, Rect, Solution, Viewport, adjust_for_margins,
    is_unmeasured, is_valid_rect, is_valid_size, solve,
};
use anchor_measure::{
    Debouncer, FrameClockHandle, MeasureCache, SessionCounter, SessionTicket, Stabilizer,
    TargetHandle,
};
use parking_lot::Mutex;
use tokio::runtime::Handle;
use tracing::{debug, trace, warn};

use crate::{AnchorRegistry, HostKind, MenuRequest, MenuState, MenuStore, Subscription};

/// Quiet period before re-measuring after a keyboard transition.
pub const REMEASURE_DEBOUNCE: Duration = Duration::from_millis(100);

/// Frames to wait after opening before the host container can be measured.
pub const MOUNT_FRAMES: u32 = 2;

/// Debounce key for keyboard-triggered re-measures.
const REMEASURE_KEY: &str = "remeasure";

/// Whether a host container reading can serve as the translation origin.
/// A container at the window origin is fine; non-finite or all-zero readings
/// are not.
fn host_origin_usable(host: &Rect) -> bool {
    [host.x, host.y, host.width, host.height]
        .iter()
        .all(|v| v.is_finite())
        && !is_unmeasured(Some(host))
}

/// Static host settings.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HostConfig {
    /// Layer this host renders.
    pub kind: HostKind,
    /// Device window size, used until the host container reports its size.
    pub window: Viewport,
}

impl HostConfig {
    /// Settings for a `kind` host in a window of the given size.
    #[must_use]
    pub const fn new(kind: HostKind, window: Viewport) -> Self {
        Self { kind, window }
    }
}

/// Mutable per-session geometry.
#[derive(Clone, Debug, Default)]
struct HostState {
    /// Request being rendered.
    request: Option<MenuRequest>,
    /// Store generation of the open being rendered, when following a store.
    generation: Option<u64>,
    /// Anchor rectangle in window space, margins removed.
    anchor: Option<Rect>,
    /// Host container rectangle in window space.
    host: Option<Rect>,
    /// Host container size from layout.
    host_size: MenuSize,
    /// Menu content size from layout.
    menu_size: MenuSize,
    /// Height covered by the software keyboard.
    keyboard: f64,
    /// Writing direction.
    direction: LayoutDirection,
}

/// Shared host internals.
struct HostInner {
    /// Static settings.
    config: HostConfig,
    /// Anchors the host may be asked to open against.
    anchors: AnchorRegistry,
    /// The host's own container.
    target: TargetHandle,
    /// Measurement driver.
    stabilizer: Stabilizer,
    /// Current session.
    session: SessionCounter,
    /// Keyboard re-measure timer.
    debounce: Debouncer<&'static str>,
    /// Recent measurements by anchor id.
    cache: Mutex<MeasureCache>,
    /// Geometry for the current session.
    state: Mutex<HostState>,
}

/// Positioning pipeline for one host layer. Cloning shares the host.
#[derive(Clone)]
pub struct MenuHost {
    /// Shared internals.
    inner: Arc<HostInner>,
}

impl MenuHost {
    /// Create a host that measures `target` as its container.
    pub fn new(
        config: HostConfig,
        anchors: AnchorRegistry,
        target: TargetHandle,
        clock: FrameClockHandle,
    ) -> Self {
        Self {
            inner: Arc::new(HostInner {
                config,
                anchors,
                target,
                stabilizer: Stabilizer::new(clock),
                session: SessionCounter::new(),
                debounce: Debouncer::new(),
                cache: Mutex::new(MeasureCache::default()),
                state: Mutex::new(HostState::default()),
            }),
        }
    }

    /// Layer this host renders.
    pub fn kind(&self) -> HostKind {
        self.inner.config.kind
    }

    /// Request currently being rendered.
    pub fn request(&self) -> Option<MenuRequest> {
        self.inner.state.lock().request.clone()
    }

    /// Start a session for `request` without measuring.
    ///
    /// Clears geometry from the previous session and seeds it from a fresh
    /// cache entry for the same anchor, if there is one.
    pub fn start(&self, request: MenuRequest) -> SessionTicket {
        self.inner.debounce.cancel(&REMEASURE_KEY);
        let ticket = self.inner.session.advance();
        let seed = self.inner.cache.lock().fresh(&request.id).copied();
        debug!(id = %request.id, session = ticket.get(), seeded = seed.is_some(), "host_begin");
        let mut st = self.inner.state.lock();
        st.anchor = seed.and_then(|e| e.anchor);
        st.host = seed.and_then(|e| e.host);
        st.menu_size = MenuSize::unknown();
        st.request = Some(request);
        st.generation = None;
        ticket
    }

    /// Start a session for `request` and measure it once the host has
    /// mounted. Returns whether the measurement was applied.
    pub async fn begin(&self, request: MenuRequest) -> bool {
        let ticket = self.start(request);
        self.settle_and_measure(ticket).await
    }

    /// Wait for the host to mount, then measure.
    async fn settle_and_measure(&self, ticket: SessionTicket) -> bool {
        for _ in 0..MOUNT_FRAMES {
            self.inner.stabilizer.clock().next_frame().await;
        }
        self.remeasure(ticket).await
    }

    /// Measure the anchor and host container for the session `ticket`.
    ///
    /// Returns `false` when there is nothing to measure or the session was
    /// superseded while measuring.
    pub async fn remeasure(&self, ticket: SessionTicket) -> bool {
        let Some(req) = self.request() else {
            return false;
        };
        let Some(entry) = self.inner.anchors.get(&req.id) else {
            debug!(id = %req.id, "anchor not registered; skipping measure");
            return false;
        };

        let (anchor, host) = self
            .inner
            .stabilizer
            .measure_pair(
                entry.target.as_ref(),
                self.inner.target.as_ref(),
                req.measurement,
                req.measurement_tries,
            )
            .await;

        if !self.inner.session.is_current(ticket) {
            debug!(id = %req.id, session = ticket.get(), "discarding stale measurement");
            return false;
        }
        let anchor = adjust_for_margins(anchor, entry.margins.as_ref());
        trace!(id = %req.id, ?anchor, ?host, "host_measured");
        {
            let mut st = self.inner.state.lock();
            st.anchor = anchor;
            st.host = host;
        }
        self.inner.cache.lock().insert(req.id, anchor, host);
        true
    }

    /// End the current session. In-flight measurements are discarded.
    pub fn end(&self) {
        self.inner.debounce.cancel(&REMEASURE_KEY);
        let ticket = self.inner.session.advance();
        debug!(session = ticket.get(), "host_end");
        let mut st = self.inner.state.lock();
        st.request = None;
        st.generation = None;
        st.anchor = None;
        st.host = None;
        st.menu_size = MenuSize::unknown();
    }

    /// Report the host container's laid-out size.
    pub fn set_host_size(&self, size: MenuSize) {
        self.inner.state.lock().host_size = size;
    }

    /// Report the menu content's laid-out size.
    pub fn set_menu_size(&self, size: MenuSize) {
        self.inner.state.lock().menu_size = size;
    }

    /// Set the writing direction.
    pub fn set_direction(&self, direction: LayoutDirection) {
        self.inner.state.lock().direction = direction;
    }

    /// The software keyboard appeared with the given height. Must be called
    /// within a Tokio runtime.
    pub fn keyboard_shown(&self, height: f64) {
        self.inner.state.lock().keyboard = height.max(0.0);
        self.schedule_remeasure();
    }

    /// The software keyboard was dismissed. Must be called within a Tokio
    /// runtime.
    pub fn keyboard_hidden(&self) {
        self.inner.state.lock().keyboard = 0.0;
        self.schedule_remeasure();
    }

    /// Whether a keyboard re-measure is waiting for its quiet period.
    pub fn remeasure_pending(&self) -> bool {
        self.inner.debounce.is_pending(&REMEASURE_KEY)
    }

    /// Debounce a re-measure for the current session.
    fn schedule_remeasure(&self) {
        if self.inner.state.lock().request.is_none() {
            return;
        }
        let ticket = self.inner.session.ticket();
        let host = self.clone();
        self.inner
            .debounce
            .schedule(REMEASURE_KEY, REMEASURE_DEBOUNCE, async move {
                host.remeasure(ticket).await;
            });
    }

    /// Anchor rectangle relative to the host container's origin.
    pub fn anchor_in_host(&self) -> Option<Rect> {
        let st = self.inner.state.lock();
        Some(st.anchor?.relative_to(&st.host?))
    }

    /// Region the menu is confined to.
    pub fn viewport(&self) -> Viewport {
        let st = self.inner.state.lock();
        if st.host_size.width != 0.0 && st.host_size.height != 0.0 {
            Viewport::from(st.host_size).shrink_bottom(st.keyboard)
        } else {
            self.inner.config.window
        }
    }

    /// Solver output for the current geometry, or `None` while positioning
    /// is withheld (no request, or no valid anchor measurement yet).
    pub fn solution(&self) -> Option<Solution> {
        let viewport = self.viewport();
        let st = self.inner.state.lock();
        let req = st.request.as_ref()?;
        let (anchor, host) = (st.anchor?, st.host?);
        if !is_valid_rect(&anchor) {
            trace!(
                id = %req.id,
                ?anchor,
                unmeasured = is_unmeasured(Some(&anchor)),
                "anchor geometry invalid; positioning withheld"
            );
            return None;
        }
        if !host_origin_usable(&host) {
            trace!(id = %req.id, ?host, "host geometry invalid; positioning withheld");
            return None;
        }
        Some(solve(
            &anchor.relative_to(&host),
            Some(st.menu_size),
            viewport,
            &req.policy(),
            st.direction,
        ))
    }

    /// Menu position in host coordinates.
    pub fn position(&self) -> Option<MenuPosition> {
        self.solution().map(|s| s.position)
    }

    /// True until the menu content has reported a usable size. The content
    /// should stay invisible and non-interactive meanwhile.
    pub fn needs_initial_measure(&self) -> bool {
        !is_valid_size(&self.inner.state.lock().menu_size)
    }

    /// Track `store`: start a session whenever a request for this host's
    /// layer is committed and end it on close. Drop the returned
    /// subscription to stop.
    pub fn follow(&self, store: &MenuStore) -> Subscription {
        let host = self.clone();
        let sub = store.subscribe(move |state| host.on_state(state));
        self.on_state(&store.snapshot());
        sub
    }

    /// React to a provider state change.
    fn on_state(&self, state: &MenuState) {
        let wanted = state
            .request
            .as_ref()
            .filter(|_| state.active_host == self.inner.config.kind);
        let (current, seen) = {
            let st = self.inner.state.lock();
            (st.request.clone(), st.generation)
        };
        match wanted {
            Some(req) if current.as_ref() != Some(req) || seen != Some(state.generation) => {
                let ticket = self.start(req.clone());
                self.inner.state.lock().generation = Some(state.generation);
                match Handle::try_current() {
                    Ok(rt) => {
                        let host = self.clone();
                        rt.spawn(async move {
                            host.settle_and_measure(ticket).await;
                        });
                    }
                    Err(_) => warn!(id = %req.id, "no runtime; host cannot measure"),
                }
            }
            Some(_) => {}
            None => {
                if current.is_some() {
                    self.end();
                }
            }
        }
    }
}
