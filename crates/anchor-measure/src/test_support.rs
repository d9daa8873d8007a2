//! Deterministic fakes for exercising measurement without a UI.

use std::{
    collections::VecDeque,
    sync::{
        Arc,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
};

use anchor_geom::Rect;
use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::task;

use crate::{FrameClock, MeasureTarget, NodeHandle};

/// Frame clock whose frames and settles complete after a single yield.
#[derive(Debug, Default)]
pub struct ImmediateClock {
    /// Frames waited on so far.
    frames: AtomicUsize,
    /// Settle waits so far.
    settles: AtomicUsize,
}

impl ImmediateClock {
    /// Number of `next_frame` calls observed.
    pub fn frames(&self) -> usize {
        self.frames.load(Ordering::SeqCst)
    }

    /// Number of `interactions_settled` calls observed.
    pub fn settles(&self) -> usize {
        self.settles.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FrameClock for ImmediateClock {
    async fn next_frame(&self) {
        self.frames.fetch_add(1, Ordering::SeqCst);
        task::yield_now().await;
    }

    async fn interactions_settled(&self) {
        self.settles.fetch_add(1, Ordering::SeqCst);
        task::yield_now().await;
    }
}

/// Target that replays a script of readings.
///
/// Each measurement pops the next reading; the final reading repeats forever.
/// An empty script always reads `None`.
#[derive(Debug)]
pub struct ScriptedTarget {
    /// Remaining readings.
    script: Mutex<VecDeque<Option<Rect>>>,
    /// Whether the target still resolves to a node.
    mounted: AtomicBool,
    /// Node id handed out by `resolve`.
    node: NodeHandle,
    /// Measurements taken so far.
    reads: AtomicUsize,
}

impl ScriptedTarget {
    /// Mounted target with the given readings.
    pub fn new(script: Vec<Option<Rect>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            mounted: AtomicBool::new(true),
            node: 1,
            reads: AtomicUsize::new(0),
        }
    }

    /// Mounted target that always reads `rect`.
    pub fn fixed(rect: Rect) -> Self {
        Self::new(vec![Some(rect)])
    }

    /// Target that never resolves.
    pub fn unmounted() -> Self {
        let t = Self::new(Vec::new());
        t.mounted.store(false, Ordering::SeqCst);
        t
    }

    /// Wrap in an `Arc` for use as a [`crate::TargetHandle`].
    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Replace the remaining script.
    pub fn set_script(&self, script: Vec<Option<Rect>>) {
        *self.script.lock() = script.into();
    }

    /// Mount or unmount the target.
    pub fn set_mounted(&self, mounted: bool) {
        self.mounted.store(mounted, Ordering::SeqCst);
    }

    /// Number of measurements taken.
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MeasureTarget for ScriptedTarget {
    fn resolve(&self) -> Option<NodeHandle> {
        self.mounted.load(Ordering::SeqCst).then_some(self.node)
    }

    async fn measure_in_window(&self, _node: NodeHandle) -> Option<Rect> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        let mut script = self.script.lock();
        if script.len() > 1 {
            script.pop_front().flatten()
        } else {
            script.front().copied().flatten()
        }
    }
}
