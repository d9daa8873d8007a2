// Geometry primitives shared by measurement and solving.
// All coordinates are window-space points with the origin at the top-left.

use serde::{Deserialize, Serialize};

/// Absolute window-space rectangle produced by measuring a rendered element.
///
/// A rectangle with every field at zero is indistinguishable from "not yet
/// measured" and is rejected by [`crate::is_valid_rect`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Horizontal extent.
    pub width: f64,
    /// Vertical extent.
    pub height: f64,
}

impl Rect {
    /// Construct a rectangle from its origin and extent.
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The all-zero rectangle, equivalent to "not yet measured".
    #[must_use]
    pub const fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }

    /// Right edge (`x + width`).
    #[inline]
    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge (`y + height`).
    #[inline]
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Horizontal center.
    #[inline]
    #[must_use]
    pub fn cx(&self) -> f64 {
        self.x + self.width / 2.0
    }

    /// Express this rectangle relative to `origin`'s top-left corner.
    #[must_use]
    pub fn relative_to(&self, origin: &Self) -> Self {
        Self {
            x: self.x - origin.x,
            y: self.y - origin.y,
            ..*self
        }
    }

    /// True when both origins differ by strictly less than `eps` on each axis.
    #[must_use]
    pub fn same_origin(&self, other: &Self, eps: f64) -> bool {
        (self.x - other.x).abs() < eps && (self.y - other.y).abs() < eps
    }

    /// Extent of this rectangle as a [`MenuSize`].
    #[must_use]
    pub const fn size(&self) -> MenuSize {
        MenuSize::new(self.width, self.height)
    }
}

/// Size of the floating menu content.
///
/// Starts out as `{0, 0}` (unknown) until the content has completed a layout
/// pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MenuSize {
    /// Content width.
    pub width: f64,
    /// Content height.
    pub height: f64,
}

impl MenuSize {
    /// Construct a size.
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// The unknown size.
    #[must_use]
    pub const fn unknown() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// Region the menu must stay within: a host container or the device window.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Viewport width.
    pub width: f64,
    /// Viewport height.
    pub height: f64,
}

impl Viewport {
    /// Construct a viewport.
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Shrink the viewport from the bottom, e.g. while a software keyboard is
    /// covering part of it. Never goes below zero.
    #[must_use]
    pub fn shrink_bottom(self, by: f64) -> Self {
        Self {
            width: self.width,
            height: (self.height - by.max(0.0)).max(0.0),
        }
    }
}

impl From<MenuSize> for Viewport {
    fn from(s: MenuSize) -> Self {
        Self::new(s.width, s.height)
    }
}

/// Top-left corner at which the menu content should be placed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MenuPosition {
    /// Distance from the viewport's top edge.
    pub top: f64,
    /// Distance from the viewport's left edge.
    pub left: f64,
}

/// Compare two values within an inclusive tolerance.
#[inline]
#[must_use]
pub fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
    (a - b).abs() <= eps
}
