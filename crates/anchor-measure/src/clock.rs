//! Frame pacing seam.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use tokio::{task, time};

/// Nominal frame interval of a 60 Hz display.
pub const DEFAULT_FRAME: Duration = Duration::from_millis(16);

/// Shared handle for frame clocks.
pub type FrameClockHandle = Arc<dyn FrameClock>;

/// Suspension points offered by the hosting UI loop.
#[async_trait]
pub trait FrameClock: Send + Sync + 'static {
    /// Resolve once the next rendering frame has been produced.
    async fn next_frame(&self);

    /// Resolve once pending interactions and animations have finished.
    async fn interactions_settled(&self);
}

/// Timer-driven clock for hosts without a native frame callback.
#[derive(Debug, Clone, Copy)]
pub struct TokioFrameClock {
    /// Time between frames.
    frame: Duration,
    /// Quiet period treated as "interactions settled".
    settle: Duration,
}

impl Default for TokioFrameClock {
    fn default() -> Self {
        Self::new(DEFAULT_FRAME, Duration::ZERO)
    }
}

impl TokioFrameClock {
    /// Create a clock with the given frame interval and settle delay.
    #[must_use]
    pub const fn new(frame: Duration, settle: Duration) -> Self {
        Self { frame, settle }
    }
}

#[async_trait]
impl FrameClock for TokioFrameClock {
    async fn next_frame(&self) {
        if self.frame.is_zero() {
            task::yield_now().await;
        } else {
            time::sleep(self.frame).await;
        }
    }

    async fn interactions_settled(&self) {
        if self.settle.is_zero() {
            task::yield_now().await;
        } else {
            time::sleep(self.settle).await;
        }
    }
}
