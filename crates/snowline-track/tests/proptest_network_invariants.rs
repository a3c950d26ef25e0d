//! Property tests for the derived network state.
//!
//! 1. A grid of rails crosses exactly rows × columns times, in any order
//! 2. Crossings are unique and reference valid, ordered segment pairs
//! 3. Bound manual ends sit exactly on their waypoint's connection point
//! 4. Endpoint merging never collapses a segment

use std::collections::BTreeSet;

use proptest::prelude::*;
use snowline_core::{FlatTerrain, NetworkConfig, Vec3};
use snowline_track::network::{bind_manual_segments_to_waypoints, merge_coincident_endpoints};
use snowline_track::{find_crossings, SegmentOrigin, TrackSegment, WaypointStore};

// ── Strategies ──────────────────────────────────────────────────────────

fn rail(a: Vec3, b: Vec3) -> TrackSegment {
    TrackSegment::straight(a, b, 0.4, SegmentOrigin::Manual)
}

/// Distinct integer offsets in [-40, 40]
fn lanes(max: usize) -> impl Strategy<Value = Vec<i32>> {
    prop::collection::btree_set(-40i32..=40, 1..max).prop_map(|s| s.into_iter().collect())
}

fn point() -> impl Strategy<Value = Vec3> {
    (-30.0f32..30.0, -30.0f32..30.0).prop_map(|(x, z)| Vec3::new(x, 0.0, z))
}

fn segments() -> impl Strategy<Value = Vec<TrackSegment>> {
    prop::collection::vec((point(), point()), 0..12).prop_map(|pairs| {
        pairs
            .into_iter()
            .filter(|(a, b)| a.distance(b) > 0.01)
            .map(|(a, b)| rail(a, b))
            .collect()
    })
}

fn grid(rows: &[i32], cols: &[i32]) -> Vec<TrackSegment> {
    let mut out = Vec::new();
    for &z in rows {
        out.push(rail(Vec3::new(-50.0, 0.0, z as f32), Vec3::new(50.0, 0.0, z as f32)));
    }
    for &x in cols {
        out.push(rail(Vec3::new(x as f32, 0.0, -50.0), Vec3::new(x as f32, 0.0, 50.0)));
    }
    out
}

proptest! {
    #[test]
    fn grid_crossing_count(rows in lanes(6), cols in lanes(6), reverse in any::<bool>()) {
        let mut segs = grid(&rows, &cols);
        if reverse {
            segs.reverse();
        }
        let crossings = find_crossings(&segs, 100.0, 0.5);
        prop_assert_eq!(crossings.len(), rows.len() * cols.len());
    }

    #[test]
    fn crossings_are_unique_and_ordered(segs in segments()) {
        let crossings = find_crossings(&segs, 100.0, 0.5);
        let mut keys = BTreeSet::new();
        for c in &crossings {
            let (i, j) = c.segments;
            prop_assert!(i < j && j < segs.len());
            let key = ((c.position.x * 100.0).round() as i64, (c.position.z * 100.0).round() as i64);
            prop_assert!(keys.insert(key));
        }
        prop_assert!(crossings.len() <= segs.len() * segs.len().saturating_sub(1) / 2);
    }

    #[test]
    fn bound_ends_are_exact(sites in prop::collection::vec((-5i32..5, -5i32..5), 1..6), segs in segments()) {
        let config = NetworkConfig::default();
        let mut store = WaypointStore::new();
        for (x, z) in sites {
            let _ = store.place(x as f32 * 4.0, z as f32 * 4.0, 0, 0.0, &FlatTerrain::default(), &config);
        }
        let mut segs = segs;
        bind_manual_segments_to_waypoints(&mut segs, store.as_slice(), config.bind_radius);
        for s in &segs {
            if let Some(id) = s.from {
                prop_assert_eq!(s.start, store.get(id).unwrap().connection_point());
            }
            if let Some(id) = s.to {
                prop_assert_eq!(s.end, store.get(id).unwrap().connection_point());
            }
            if let (Some(a), Some(b)) = (s.from, s.to) {
                prop_assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn merge_keeps_segments_non_degenerate(segs in segments(), radius in 0.1f32..3.0) {
        let mut segs = segs;
        merge_coincident_endpoints(&mut segs, radius);
        for s in &segs {
            prop_assert!(!s.is_degenerate());
        }
    }
}
