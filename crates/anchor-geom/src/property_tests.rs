use proptest::prelude::*;

use crate::{
    Align, LayoutDirection, Margins, MenuSize, Placement, PlacementPolicy, Rect, Viewport,
    adjust_for_margins, approx_eq, solve, solve_position,
};

fn rect_strategy() -> impl Strategy<Value = Rect> {
    (
        -200.0f64..1200.0,
        -200.0f64..1200.0,
        1.0f64..400.0,
        1.0f64..400.0,
    )
        .prop_map(|(x, y, w, h)| Rect::new(x, y, w, h))
}

fn size_strategy() -> impl Strategy<Value = MenuSize> {
    (1.0f64..300.0, 1.0f64..300.0).prop_map(|(w, h)| MenuSize::new(w, h))
}

fn policy_strategy() -> impl Strategy<Value = PlacementPolicy> {
    (
        prop_oneof![
            Just(Placement::Auto),
            Just(Placement::Top),
            Just(Placement::Bottom)
        ],
        prop_oneof![Just(Align::Start), Just(Align::Center), Just(Align::End)],
        0.0f64..24.0,
        0.0f64..24.0,
        any::<bool>(),
    )
        .prop_map(|(placement, align, offset, margin, rtl_aware)| PlacementPolicy {
            placement,
            align,
            offset,
            margin,
            rtl_aware,
        })
}

fn direction_strategy() -> impl Strategy<Value = LayoutDirection> {
    prop_oneof![Just(LayoutDirection::Ltr), Just(LayoutDirection::Rtl)]
}

proptest! {
    #[test]
    fn solver_is_deterministic(
        anchor in rect_strategy(),
        menu in proptest::option::of(size_strategy()),
        policy in policy_strategy(),
        dir in direction_strategy(),
    ) {
        let vp = Viewport::new(1024.0, 1024.0);
        let a = solve_position(&anchor, menu, vp, &policy, dir);
        let b = solve_position(&anchor, menu, vp, &policy, dir);
        prop_assert_eq!(a, b);
    }

    #[test]
    fn known_size_is_contained(
        anchor in rect_strategy(),
        menu in size_strategy(),
        policy in policy_strategy(),
        dir in direction_strategy(),
    ) {
        // Large enough that the margins always fit around the menu.
        let vp = Viewport::new(800.0, 800.0);
        let pos = solve_position(&anchor, Some(menu), vp, &policy, dir);
        prop_assert!(pos.left >= policy.margin);
        let (max_left, max_top) = (
            vp.width - menu.width - policy.margin,
            vp.height - menu.height - policy.margin,
        );
        prop_assert!(pos.left <= max_left || approx_eq(pos.left, max_left, 1e-9));
        prop_assert!(pos.top >= policy.margin);
        prop_assert!(pos.top <= max_top || approx_eq(pos.top, max_top, 1e-9));
    }

    #[test]
    fn unknown_size_respects_lower_bounds(
        anchor in rect_strategy(),
        policy in policy_strategy(),
        dir in direction_strategy(),
    ) {
        let pos = solve_position(&anchor, None, Viewport::new(400.0, 400.0), &policy, dir);
        prop_assert!(pos.left >= policy.margin);
        prop_assert!(pos.top >= policy.margin);
    }

    #[test]
    fn top_falls_back_below_when_clipped(
        x in 0.0f64..200.0,
        y in 20.0f64..60.0,
        menu in size_strategy(),
    ) {
        let anchor = Rect::new(x, y, 40.0, 20.0);
        let vp = Viewport::new(1000.0, 1000.0);
        let policy = PlacementPolicy::default().placement(Placement::Top);
        let s = solve(&anchor, Some(menu), vp, &policy, LayoutDirection::Ltr);
        let above = y - menu.height - policy.offset;
        let below = anchor.bottom() + policy.offset;
        prop_assume!(above < policy.margin);
        prop_assume!(below + menu.height <= vp.height - policy.margin);
        prop_assert_eq!(s.position.top, below);
    }

    #[test]
    fn end_alignment_matches_clamped_formula(
        anchor in rect_strategy(),
        menu in size_strategy(),
    ) {
        let vp = Viewport::new(900.0, 900.0);
        let policy = PlacementPolicy::default().align(Align::End);
        let pos = solve_position(&anchor, Some(menu), vp, &policy, LayoutDirection::Ltr);
        let expected = (anchor.x + anchor.width - menu.width)
            .min(vp.width - menu.width - policy.margin)
            .max(policy.margin);
        prop_assert_eq!(pos.left, expected);
    }

    #[test]
    fn rtl_mirrors_start_end_and_keeps_center(
        anchor in rect_strategy(),
        menu in size_strategy(),
    ) {
        let vp = Viewport::new(900.0, 900.0);
        let start = PlacementPolicy::default();
        let center = start.align(Align::Center);
        let end = start.align(Align::End);
        let (ltr, rtl) = (LayoutDirection::Ltr, LayoutDirection::Rtl);
        prop_assert_eq!(
            solve_position(&anchor, Some(menu), vp, &start, rtl),
            solve_position(&anchor, Some(menu), vp, &end, ltr)
        );
        prop_assert_eq!(
            solve_position(&anchor, Some(menu), vp, &end, rtl),
            solve_position(&anchor, Some(menu), vp, &start, ltr)
        );
        prop_assert_eq!(
            solve_position(&anchor, Some(menu), vp, &center, rtl),
            solve_position(&anchor, Some(menu), vp, &center, ltr)
        );
    }

    #[test]
    fn margin_adjustment_never_grows_the_box(
        rect in rect_strategy(),
        (t, b, l, r) in (0.0f64..50.0, 0.0f64..50.0, 0.0f64..50.0, 0.0f64..50.0),
    ) {
        let m = Margins::new(t, b, l, r);
        let adjusted = adjust_for_margins(Some(rect), Some(&m));
        prop_assert!(adjusted.is_some());
        if let Some(a) = adjusted {
            prop_assert!(a.width <= rect.width && a.width >= 0.0);
            prop_assert!(a.height <= rect.height && a.height >= 0.0);
            prop_assert_eq!(a.x, rect.x + l);
            prop_assert_eq!(a.y, rect.y + t);
        }
    }
}
