use thiserror::Error;

/// Caller contract violations detected while validating a placement policy.
///
/// Ordinary geometry uncertainty (unmeasured anchors, unknown menu sizes) is
/// never reported through this type.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PolicyError {
    /// The gap between anchor and menu is negative or not a finite number.
    #[error("invalid offset {0}: must be finite and >= 0")]
    Offset(f64),

    /// The minimum distance from the viewport edges is negative or not finite.
    #[error("invalid margin {0}: must be finite and >= 0")]
    Margin(f64),

    /// A stable measurement was requested with no attempts at all.
    #[error("measurement tries must be at least 1")]
    ZeroTries,
}
