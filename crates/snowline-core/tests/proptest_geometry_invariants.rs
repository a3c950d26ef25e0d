//! Property tests for the curve and chord utilities.
//!
//! 1. Bezier evaluation reproduces its endpoints exactly
//! 2. Chord intersection is symmetric in argument order
//! 3. Reported intersections lie on both chords
//! 4. Projection parameters stay inside [0, 1]

use proptest::prelude::*;
use snowline_core::geometry::{evaluate_bezier, project_onto_chord, segment_intersection_2d};
use snowline_core::Vec3;

// ── Strategies ──────────────────────────────────────────────────────────

fn coord() -> impl Strategy<Value = f32> {
    -100.0f32..100.0
}

fn point() -> impl Strategy<Value = Vec3> {
    (coord(), -10.0f32..10.0, coord()).prop_map(|(x, y, z)| Vec3::new(x, y, z))
}

proptest! {
    #[test]
    fn bezier_endpoints_are_exact(p0 in point(), c in point(), p1 in point()) {
        prop_assert_eq!(evaluate_bezier(p0, c, p1, 0.0), p0);
        prop_assert_eq!(evaluate_bezier(p0, c, p1, 1.0), p1);
    }

    #[test]
    fn intersection_is_symmetric(a1 in point(), a2 in point(), b1 in point(), b2 in point()) {
        let ab = segment_intersection_2d(a1, a2, b1, b2);
        let ba = segment_intersection_2d(b1, b2, a1, a2);
        prop_assert_eq!(ab.is_some(), ba.is_some());
        if let (Some(ab), Some(ba)) = (ab, ba) {
            prop_assert!((ab.x - ba.x).abs() < 1e-2);
            prop_assert!((ab.z - ba.z).abs() < 1e-2);
            prop_assert!((ab.t_a - ba.t_b).abs() < 1e-4);
            prop_assert!((ab.t_b - ba.t_a).abs() < 1e-4);
        }
    }

    #[test]
    fn intersection_lies_on_both_chords(a1 in point(), a2 in point(), b1 in point(), b2 in point()) {
        if let Some(hit) = segment_intersection_2d(a1, a2, b1, b2) {
            prop_assert!((0.0..=1.0).contains(&hit.t_a));
            prop_assert!((0.0..=1.0).contains(&hit.t_b));
            let on_b = b1.lerp(&b2, hit.t_b);
            prop_assert!((on_b.x - hit.x).abs() < 1e-2);
            prop_assert!((on_b.z - hit.z).abs() < 1e-2);
        }
    }

    #[test]
    fn projection_parameter_is_clamped(p in point(), a in point(), b in point()) {
        let (t, d) = project_onto_chord(p, a, b);
        prop_assert!((0.0..=1.0).contains(&t));
        prop_assert!(d >= 0.0);
    }
}
