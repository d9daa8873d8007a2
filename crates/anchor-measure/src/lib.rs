//! Measurement stabilizer for anchored menus.
//!
//! Layout in a retained UI tree completes asynchronously: a single read right
//! after a tap can report stale or all-zero geometry, especially inside
//! virtualized lists and freshly presented modals. This crate provides:
//! - [`Stabilizer`]: samples a [`MeasureTarget`] across frames until the
//!   reading settles, in [`Strategy::Fast`] or [`Strategy::Stable`] mode
//! - [`SessionCounter`]: a monotonic guard that lets late results from a
//!   superseded open session be discarded
//! - [`Debouncer`]: keyed, cancellable timers used to coalesce bursts of
//!   geometry-affecting events
//! - [`MeasureCache`]: short-lived per-anchor results used to pre-seed a
//!   position while a fresh measurement is in flight
//!
//! Frame pacing is abstracted behind [`FrameClock`] so the protocol can run
//! against a real UI loop or deterministically in tests.
#![warn(unsafe_op_in_unsafe_fn)]

mod cache;
mod clock;
mod debounce;
mod session;
mod stabilizer;
mod target;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_support;

pub use cache::{CACHE_FRESHNESS, CacheEntry, MeasureCache};
pub use clock::{DEFAULT_FRAME, FrameClock, FrameClockHandle, TokioFrameClock};
pub use debounce::Debouncer;
pub use session::{SessionCounter, SessionTicket};
pub use stabilizer::{
    DEFAULT_TRIES, POSITION_EPS, Stabilizer, Strategy, accept_sample, measure,
};
pub use target::{MeasureTarget, NodeHandle, TargetHandle};
