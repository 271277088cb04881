//! Property-based tests for the toroidal geometry helpers.

use proptest::prelude::*;

use super::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]

    #[test]
    fn prop_wrap_lands_in_range(v in -1.0e5f32..1.0e5, lo in -500.0f32..500.0, span in 1.0f32..2_000.0) {
        let hi = lo + span;
        let w = wrap(v, lo, hi);
        prop_assert!(w >= lo && w < hi, "wrap({v}, {lo}, {hi}) = {w}");
    }

    #[test]
    fn prop_wrap_is_idempotent(v in -1.0e5f32..1.0e5, span in 1.0f32..2_000.0) {
        let once = wrap(v, 0.0, span);
        let twice = wrap(once, 0.0, span);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn prop_wrap_distance_is_symmetric_and_bounded(
        ax in 0.0f32..800.0,
        ay in 0.0f32..600.0,
        bx in 0.0f32..800.0,
        by in 0.0f32..600.0,
    ) {
        let a = Vec2::new(ax, ay);
        let b = Vec2::new(bx, by);
        let ab = wrap_aware_distance_squared(a, b, 800.0, 600.0);
        let ba = wrap_aware_distance_squared(b, a, 800.0, 600.0);
        prop_assert!((ab - ba).abs() <= 1e-2);
        // Never further than half the arena on either axis.
        prop_assert!(ab <= 400.0 * 400.0 + 300.0 * 300.0 + 1e-1);
        prop_assert!(ab <= (a - b).length_squared() + 1e-1);
    }

    #[test]
    fn prop_polygon_contains_its_own_vertices(
        cx in 50.0f32..750.0,
        cy in 50.0f32..550.0,
        angle in -10.0f32..10.0,
        radius in 5.0f32..40.0,
    ) {
        let local = [
            Vec2::new(radius, 0.0),
            Vec2::new(0.0, radius),
            Vec2::new(-radius, 0.0),
            Vec2::new(0.0, -radius),
        ];
        let world = transform_vertices(&local, cx, cy, angle);
        prop_assert!(point_in_polygon(&world, cx, cy));
        for v in &world {
            prop_assert!(point_in_polygon(&world, v.x, v.y));
        }
    }
}
