//! Menu position solver.
//!
//! Pure function of anchor geometry, menu size, viewport and policy. Calling it
//! again with the same inputs yields the same answer, and refining an unknown
//! menu size to a known one only ever tightens the result; the anchor never
//! needs to be re-measured for a re-solve.
//!
//! Horizontal: align to the anchor (start/center/end, swapped for RTL), then
//! clamp into `[margin, viewport.width - menu.width - margin]`.
//!
//! Vertical: compute the candidate tops below and above the anchor, pick one
//! according to [`Placement`] and whether it fits, then clamp into
//! `[margin, viewport.height - menu.height - margin]`. When neither side fits
//! the placement rule still decides; there is no multi-directional search and
//! the menu is never shrunk.

use crate::{
    Align, LayoutDirection, MenuPosition, MenuSize, Placement, PlacementPolicy, Rect, Viewport,
};

/// Vertical side of the anchor the menu ended up on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    /// Menu sits above the anchor.
    Above,
    /// Menu sits below the anchor.
    Below,
}

/// Full solver output, including the fit diagnostics behind the choice.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Solution {
    /// Final clamped position.
    pub position: MenuPosition,
    /// Side chosen before clamping.
    pub side: Side,
    /// Whether the menu fits above the anchor (true when height is unknown).
    pub fits_above: bool,
    /// Whether the menu fits below the anchor (true when height is unknown).
    pub fits_below: bool,
}

/// Clamp `v` into `[lo, hi]`, preferring `lo` when the range is empty.
#[inline]
fn clamp(v: f64, lo: f64, hi: f64) -> f64 {
    lo.max(hi.min(v))
}

/// A dimension counts as known only when it is strictly positive.
#[inline]
fn known(v: f64) -> Option<f64> {
    (v > 0.0).then_some(v)
}

/// Compute the menu's top-left corner.
///
/// `menu` is `None` (or zero) before the content has completed a layout pass;
/// in that case center/end alignment and upper-bound clamping are skipped.
#[must_use]
pub fn solve_position(
    anchor: &Rect,
    menu: Option<MenuSize>,
    viewport: Viewport,
    policy: &PlacementPolicy,
    direction: LayoutDirection,
) -> MenuPosition {
    solve(anchor, menu, viewport, policy, direction).position
}

/// Like [`solve_position`], but also report which side was chosen and why.
#[must_use]
pub fn solve(
    anchor: &Rect,
    menu: Option<MenuSize>,
    viewport: Viewport,
    policy: &PlacementPolicy,
    direction: LayoutDirection,
) -> Solution {
    let menu = menu.unwrap_or_default();
    let mw = known(menu.width);
    let mh = known(menu.height);
    let left = solve_left(anchor, mw, viewport, policy, direction);

    let below_top = anchor.bottom() + policy.offset;
    let above_top = anchor.y - mh.unwrap_or(0.0) - policy.offset;
    let fits_above = mh.is_none_or(|_| above_top >= policy.margin);
    let fits_below = mh.is_none_or(|h| below_top + h <= viewport.height - policy.margin);

    let side = match policy.placement {
        Placement::Top if fits_above => Side::Above,
        Placement::Top => Side::Below,
        Placement::Bottom | Placement::Auto if fits_below => Side::Below,
        Placement::Bottom | Placement::Auto => Side::Above,
    };
    let raw_top = match side {
        Side::Above => above_top,
        Side::Below => below_top,
    };
    let top = match mh {
        Some(h) => clamp(raw_top, policy.margin, viewport.height - h - policy.margin),
        None => raw_top.max(policy.margin),
    };

    Solution {
        position: MenuPosition { top, left },
        side,
        fits_above,
        fits_below,
    }
}

/// Horizontal half of the solver.
fn solve_left(
    anchor: &Rect,
    mw: Option<f64>,
    viewport: Viewport,
    policy: &PlacementPolicy,
    direction: LayoutDirection,
) -> f64 {
    let Some(w) = mw else {
        // Without a width only start alignment is computable.
        return anchor.x.max(policy.margin);
    };
    let left = match policy.align.resolve(direction, policy.rtl_aware) {
        Align::Start => anchor.x,
        Align::Center => anchor.cx() - w / 2.0,
        Align::End => anchor.right() - w,
    };
    clamp(left, policy.margin, viewport.width - w - policy.margin)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phone() -> Viewport {
        Viewport::new(360.0, 760.0)
    }

    #[test]
    fn scenario_flips_above_and_clamps_left() {
        let anchor = Rect::new(300.0, 700.0, 100.0, 40.0);
        let menu = MenuSize::new(180.0, 220.0);
        let s = solve(
            &anchor,
            Some(menu),
            phone(),
            &PlacementPolicy::default(),
            LayoutDirection::Ltr,
        );
        assert!(!s.fits_below);
        assert_eq!(s.side, Side::Above);
        assert_eq!(s.position, MenuPosition { top: 472.0, left: 172.0 });
    }

    #[test]
    fn auto_prefers_below_when_it_fits() {
        let anchor = Rect::new(20.0, 100.0, 100.0, 40.0);
        let pos = solve_position(
            &anchor,
            Some(MenuSize::new(180.0, 220.0)),
            phone(),
            &PlacementPolicy::default(),
            LayoutDirection::Ltr,
        );
        assert_eq!(pos, MenuPosition { top: 148.0, left: 20.0 });
    }

    #[test]
    fn top_falls_back_below_when_no_room_above() {
        let anchor = Rect::new(20.0, 60.0, 100.0, 40.0);
        let policy = PlacementPolicy::default().placement(Placement::Top);
        let s = solve(
            &anchor,
            Some(MenuSize::new(180.0, 220.0)),
            phone(),
            &policy,
            LayoutDirection::Ltr,
        );
        assert!(!s.fits_above);
        assert_eq!(s.side, Side::Below);
        assert_eq!(s.position.top, 108.0);
    }

    #[test]
    fn top_is_used_when_it_fits() {
        let anchor = Rect::new(20.0, 400.0, 100.0, 40.0);
        let policy = PlacementPolicy::default().placement(Placement::Top);
        let pos = solve_position(
            &anchor,
            Some(MenuSize::new(180.0, 220.0)),
            phone(),
            &policy,
            LayoutDirection::Ltr,
        );
        assert_eq!(pos.top, 400.0 - 220.0 - 8.0);
    }

    #[test]
    fn bottom_falls_back_above() {
        let anchor = Rect::new(20.0, 600.0, 100.0, 40.0);
        let policy = PlacementPolicy::default().placement(Placement::Bottom);
        let s = solve(
            &anchor,
            Some(MenuSize::new(180.0, 220.0)),
            phone(),
            &policy,
            LayoutDirection::Ltr,
        );
        assert_eq!(s.side, Side::Above);
        assert_eq!(s.position.top, 372.0);
    }

    #[test]
    fn neither_side_fits_still_follows_placement_rule() {
        // Tall menu in a short viewport: no room above or below.
        let anchor = Rect::new(20.0, 150.0, 100.0, 40.0);
        let menu = MenuSize::new(100.0, 250.0);
        let viewport = Viewport::new(360.0, 300.0);

        let top = PlacementPolicy::default().placement(Placement::Top);
        let s = solve(&anchor, Some(menu), viewport, &top, LayoutDirection::Ltr);
        assert!(!s.fits_above && !s.fits_below);
        assert_eq!(s.side, Side::Below);

        let auto = PlacementPolicy::default();
        let s = solve(&anchor, Some(menu), viewport, &auto, LayoutDirection::Ltr);
        assert_eq!(s.side, Side::Above);
        // Clamp range is [8, 42]; above_top = 150 - 250 - 8 = -108.
        assert_eq!(s.position.top, 8.0);
    }

    #[test]
    fn unknown_size_only_clamps_lower_bound() {
        let anchor = Rect::new(2.0, 700.0, 100.0, 40.0);
        let policy = PlacementPolicy::default().align(Align::End);
        let pos = solve_position(&anchor, None, phone(), &policy, LayoutDirection::Ltr);
        assert_eq!(pos, MenuPosition { top: 748.0, left: 8.0 });

        let zero = solve_position(
            &anchor,
            Some(MenuSize::unknown()),
            phone(),
            &policy,
            LayoutDirection::Ltr,
        );
        assert_eq!(zero, pos);
    }

    #[test]
    fn center_and_end_alignment() {
        let anchor = Rect::new(100.0, 100.0, 100.0, 40.0);
        let menu = Some(MenuSize::new(60.0, 50.0));
        let center = PlacementPolicy::default().align(Align::Center);
        let end = PlacementPolicy::default().align(Align::End);
        let ltr = LayoutDirection::Ltr;
        assert_eq!(solve_position(&anchor, menu, phone(), &center, ltr).left, 120.0);
        assert_eq!(solve_position(&anchor, menu, phone(), &end, ltr).left, 140.0);
    }

    #[test]
    fn rtl_swaps_start_and_end() {
        let anchor = Rect::new(100.0, 100.0, 100.0, 40.0);
        let menu = Some(MenuSize::new(60.0, 50.0));
        let start = PlacementPolicy::default();
        let end = PlacementPolicy::default().align(Align::End);
        let (ltr, rtl) = (LayoutDirection::Ltr, LayoutDirection::Rtl);
        assert_eq!(
            solve_position(&anchor, menu, phone(), &start, rtl),
            solve_position(&anchor, menu, phone(), &end, ltr)
        );
        assert_eq!(
            solve_position(&anchor, menu, phone(), &end, rtl),
            solve_position(&anchor, menu, phone(), &start, ltr)
        );
        let unaware = start.rtl_aware(false);
        assert_eq!(
            solve_position(&anchor, menu, phone(), &unaware, rtl),
            solve_position(&anchor, menu, phone(), &start, ltr)
        );
    }

    #[test]
    fn undersized_viewport_resolves_to_margin() {
        let anchor = Rect::new(50.0, 50.0, 20.0, 20.0);
        let menu = Some(MenuSize::new(400.0, 900.0));
        let pos = solve_position(
            &anchor,
            menu,
            phone(),
            &PlacementPolicy::default(),
            LayoutDirection::Ltr,
        );
        assert_eq!(pos, MenuPosition { top: 8.0, left: 8.0 });
    }
}
