use std::result::Result as StdResult;

use anchor_geom::PolicyError;
use thiserror::Error;

/// Convenient result type for the anchored-menu crate.
pub type Result<T> = StdResult<T, Error>;

/// Errors raised for caller contract violations.
///
/// Unmeasured anchors, unknown menu sizes and stale measurements are normal
/// operating conditions and never surface here.
#[derive(Debug, Error)]
pub enum Error {
    /// The open request carried settings the solver cannot interpret.
    #[error("invalid placement policy: {0}")]
    InvalidPolicy(#[from] PolicyError),

    /// An open request could not be decoded.
    #[error("invalid menu request: {0}")]
    Request(#[from] serde_json::Error),
}
