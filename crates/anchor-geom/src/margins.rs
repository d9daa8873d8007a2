//! Margin adjustment for anchored elements.
//!
//! An anchored element may declare outer margins on its own style. The
//! measured box then includes that margin space, which would push the menu
//! away from the visible edge of the element. [`adjust_for_margins`] strips it
//! back out so the anchor box matches what the user sees.

use serde::{Deserialize, Serialize};

use crate::Rect;

/// Resolved outer margins of an anchored element, in points.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    /// Space above the element.
    pub top: f64,
    /// Space below the element.
    pub bottom: f64,
    /// Space left of the element.
    pub left: f64,
    /// Space right of the element.
    pub right: f64,
}

impl Margins {
    /// Construct margins from each side.
    #[must_use]
    pub const fn new(top: f64, bottom: f64, left: f64, right: f64) -> Self {
        Self {
            top,
            bottom,
            left,
            right,
        }
    }

    /// The same margin on all four sides.
    #[must_use]
    pub const fn uniform(m: f64) -> Self {
        Self::new(m, m, m, m)
    }

    /// Resolve a style's margin shorthands into concrete sides.
    #[must_use]
    pub fn from_style(style: &StyleMargins) -> Self {
        let all = style.margin.unwrap_or(0.0);
        let side = |specific: Option<f64>, axis: Option<f64>| specific.or(axis).unwrap_or(all);
        Self {
            top: side(style.margin_top, style.margin_vertical),
            bottom: side(style.margin_bottom, style.margin_vertical),
            left: side(style.margin_left, style.margin_horizontal),
            right: side(style.margin_right, style.margin_horizontal),
        }
    }

    /// True when every side is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.top == 0.0 && self.bottom == 0.0 && self.left == 0.0 && self.right == 0.0
    }
}

/// Margin declarations as they appear on a flattened element style.
///
/// Precedence when resolving a side: the side-specific value, then the
/// vertical/horizontal shorthand, then `margin`, then zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StyleMargins {
    /// `margin` shorthand.
    pub margin: Option<f64>,
    /// `marginVertical` shorthand.
    pub margin_vertical: Option<f64>,
    /// `marginHorizontal` shorthand.
    pub margin_horizontal: Option<f64>,
    /// `marginTop`.
    pub margin_top: Option<f64>,
    /// `marginBottom`.
    pub margin_bottom: Option<f64>,
    /// `marginLeft`.
    pub margin_left: Option<f64>,
    /// `marginRight`.
    pub margin_right: Option<f64>,
}

/// Remove `margins` from a measured anchor rectangle.
///
/// Width shrinks by `left + right` and height by `top + bottom` (floored at
/// zero); the origin moves inward by `left` and `top`. A missing rectangle is
/// passed through untouched and absent margins return `rect` as-is.
#[must_use]
pub fn adjust_for_margins(rect: Option<Rect>, margins: Option<&Margins>) -> Option<Rect> {
    let (rect, m) = match (rect, margins) {
        (Some(r), Some(m)) => (r, m),
        (r, _) => return r,
    };
    Some(Rect {
        x: rect.x + m.left,
        y: rect.y + m.top,
        width: (rect.width - m.left - m.right).max(0.0),
        height: (rect.height - m.top - m.bottom).max(0.0),
    })
}
