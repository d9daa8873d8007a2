//! Retry-based geometry sampling.
//!
//! Strategies:
//! - **fast**: yield one frame, read once. Low latency, but can observe stale
//!   or zero geometry where layout commits lag behind paint.
//! - **stable**: wait for interactions to settle, then read once per frame for
//!   up to `tries` frames. The first reading is never trusted on its own; a
//!   reading at the `(0, 0)` origin is rejected on every attempt but the last.
//!   If nothing is accepted the last reading is returned as a best effort.
//!
//! An element that cannot be resolved (unmounted, never registered) yields
//! `None` immediately without retrying.

use std::fmt;

use anchor_geom::Rect;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::{FrameClock, FrameClockHandle, MeasureTarget};

/// Default number of stable-mode attempts.
pub const DEFAULT_TRIES: u32 = 8;

/// Two consecutive readings whose origins differ by less than this (in points,
/// on both axes) are considered converged.
pub const POSITION_EPS: f64 = 1.0;

/// Measurement strategy.
///
/// Unrecognized names deserialize as [`Strategy::Stable`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Strategy {
    /// Settle, then sample across frames until the reading converges.
    #[default]
    Stable,
    /// One frame, one reading.
    Fast,
}

impl Strategy {
    /// Parse a strategy name; anything other than `fast` is `Stable`.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("fast") {
            Self::Fast
        } else {
            Self::Stable
        }
    }
}

impl From<String> for Strategy {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Stable => "stable",
            Self::Fast => "fast",
        })
    }
}

/// Stable-mode acceptance rule for the reading taken on `attempt` (0-based).
///
/// `prev` is the previous reading that was obtained, if any.
#[must_use]
pub fn accept_sample(sample: &Rect, prev: Option<&Rect>, attempt: u32, tries: u32) -> bool {
    let at_origin = sample.x == 0.0 && sample.y == 0.0 && attempt.saturating_add(1) < tries;
    let converged = prev.is_some_and(|p| sample.same_origin(p, POSITION_EPS));
    !at_origin && (converged || attempt >= 1)
}

/// Measure `target` once after a single frame.
async fn measure_fast(clock: &dyn FrameClock, target: &dyn MeasureTarget) -> Option<Rect> {
    clock.next_frame().await;
    let Some(node) = target.resolve() else {
        debug!("measure_fast: target unresolved");
        return None;
    };
    let got = target.measure_in_window(node).await;
    trace!(node, ?got, "measure_fast");
    got
}

/// Measure `target` until two readings agree or `tries` frames have passed.
async fn measure_stable(
    clock: &dyn FrameClock,
    target: &dyn MeasureTarget,
    tries: u32,
) -> Option<Rect> {
    clock.interactions_settled().await;
    let Some(node) = target.resolve() else {
        debug!("measure_stable: target unresolved");
        return None;
    };

    let mut last: Option<Rect> = None;
    for attempt in 0..tries {
        clock.next_frame().await;
        let Some(sample) = target.measure_in_window(node).await else {
            trace!(node, attempt, "measure_stable: no reading");
            continue;
        };
        trace!(node, attempt, ?sample, "measure_stable: sample");
        if accept_sample(&sample, last.as_ref(), attempt, tries) {
            debug!(node, attempt, ?sample, "measure_stable: accepted");
            return Some(sample);
        }
        last = Some(sample);
    }
    debug!(node, tries, ?last, "measure_stable: exhausted; using last reading");
    last
}

/// Measure `target` with the given strategy. `tries` applies to
/// [`Strategy::Stable`] only.
pub async fn measure(
    clock: &dyn FrameClock,
    target: &dyn MeasureTarget,
    strategy: Strategy,
    tries: u32,
) -> Option<Rect> {
    match strategy {
        Strategy::Fast => measure_fast(clock, target).await,
        Strategy::Stable => measure_stable(clock, target, tries).await,
    }
}

/// Measurement front-end bound to a frame clock.
#[derive(Clone)]
pub struct Stabilizer {
    /// Source of frame and settle suspension points.
    clock: FrameClockHandle,
}

impl fmt::Debug for Stabilizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stabilizer").finish_non_exhaustive()
    }
}

impl Stabilizer {
    /// Create a stabilizer driven by `clock`.
    #[must_use]
    pub fn new(clock: FrameClockHandle) -> Self {
        Self { clock }
    }

    /// The frame clock this stabilizer waits on.
    #[must_use]
    pub fn clock(&self) -> &FrameClockHandle {
        &self.clock
    }

    /// Measure a single target.
    pub async fn measure(
        &self,
        target: &dyn MeasureTarget,
        strategy: Strategy,
        tries: u32,
    ) -> Option<Rect> {
        measure(self.clock.as_ref(), target, strategy, tries).await
    }

    /// Measure an anchor and its containing host concurrently and wait for
    /// both. Neither result is used until the other has completed.
    pub async fn measure_pair(
        &self,
        anchor: &dyn MeasureTarget,
        host: &dyn MeasureTarget,
        strategy: Strategy,
        tries: u32,
    ) -> (Option<Rect>, Option<Rect>) {
        tokio::join!(
            self.measure(anchor, strategy, tries),
            self.measure(host, strategy, tries)
        )
    }
}
