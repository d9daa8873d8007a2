//! Measurable element seam.

use std::sync::Arc;

use anchor_geom::Rect;
use async_trait::async_trait;

/// Opaque identifier of a rendered node in the host UI tree.
pub type NodeHandle = u64;

/// Shared handle for measurable elements.
pub type TargetHandle = Arc<dyn MeasureTarget>;

/// A rendered element whose window-space rectangle can be read.
///
/// Implementations wrap whatever the host UI offers for "measure this view in
/// window coordinates". Both anchors and host containers are targets.
#[async_trait]
pub trait MeasureTarget: Send + Sync + 'static {
    /// Resolve the node currently backing this target; `None` once unmounted.
    fn resolve(&self) -> Option<NodeHandle>;

    /// Take one reading of `node`'s window-space rectangle.
    ///
    /// Returns `None` when the node could not be measured right now.
    async fn measure_in_window(&self, node: NodeHandle) -> Option<Rect>;
}
