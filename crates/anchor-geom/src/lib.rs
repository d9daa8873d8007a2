//! Geometry for anchored menus.
//!
//! This crate holds the pure, synchronous half of menu positioning:
//! - [`Rect`], [`MenuSize`], [`Viewport`] and [`MenuPosition`]: the data model
//! - [`is_valid_rect`] / [`is_valid_size`]: the validation gate applied before
//!   any measured geometry is trusted
//! - [`adjust_for_margins`]: strips an anchor's declared margins from its
//!   measured box
//! - [`solve_position`]: computes the menu's top-left corner with directional
//!   fallback and edge clamping
//!
//! Nothing here touches a clock or a UI tree; measurement lives in
//! `anchor-measure`.
#![warn(unsafe_op_in_unsafe_fn)]

mod error;
mod margins;
mod policy;
mod rect;
mod solver;
mod validate;

#[cfg(test)]
mod property_tests;

pub use error::PolicyError;
pub use margins::{Margins, StyleMargins, adjust_for_margins};
pub use policy::{
    Align, DEFAULT_MARGIN, DEFAULT_OFFSET, LayoutDirection, Placement, PlacementPolicy,
};
pub use rect::{MenuPosition, MenuSize, Rect, Viewport, approx_eq};
pub use solver::{Side, Solution, solve, solve_position};
pub use validate::{is_unmeasured, is_valid_rect, is_valid_size};
