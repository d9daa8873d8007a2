//! Validation gate applied to measured geometry before it reaches the solver.

use crate::{MenuSize, Rect};

/// True when every field is finite and the extent is strictly positive.
///
/// The degenerate `{0, 0, 0, 0}` rectangle always fails this check.
#[must_use]
pub fn is_valid_rect(rect: &Rect) -> bool {
    rect.x.is_finite()
        && rect.y.is_finite()
        && rect.width.is_finite()
        && rect.height.is_finite()
        && rect.width > 0.0
        && rect.height > 0.0
}

/// True when both dimensions are finite and strictly positive.
#[must_use]
pub fn is_valid_size(size: &MenuSize) -> bool {
    size.width.is_finite() && size.height.is_finite() && size.width > 0.0 && size.height > 0.0
}

/// True for a missing rectangle or the all-zero "not yet measured" reading
/// some layout systems report mid-transition.
#[must_use]
pub fn is_unmeasured(rect: Option<&Rect>) -> bool {
    rect.is_none_or(|r| r.x == 0.0 && r.y == 0.0 && r.width == 0.0 && r.height == 0.0)
}
