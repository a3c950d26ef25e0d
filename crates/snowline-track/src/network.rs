//! The track network: segments derived from waypoint proximity plus
//! user-drawn segments, and the crossings between them.
//!
//! A full rebuild runs, in order:
//! 1. [`rebuild_auto_connections`] - one segment per waypoint pair in range
//! 2. [`bind_manual_segments_to_waypoints`] - snap manual ends onto waypoints
//! 3. [`merge_coincident_endpoints`] - pairwise, index-ordered endpoint merge
//! 4. [`find_crossings`]
//!
//! Later passes depend on the output of earlier ones, so the order is fixed.

use snowline_core::geometry::{planar_perpendicular, project_onto_chord, DEGENERATE_LENGTH};
use snowline_core::{NetworkConfig, Result, SnowlineError, TerrainHeight, TrackRng, Vec3, WaypointId};
use tracing::{debug, info};

use crate::crossing::{find_crossings, Crossing};
use crate::segment::{SegmentEnd, SegmentOrigin, TrackSegment};
use crate::waypoint::{Waypoint, WaypointStore};

/// Result of a closest-segment query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClosestSegment {
    pub index: usize,
    /// Chord parameter of the projected foot
    pub t: f32,
    /// Planar distance to the chord
    pub distance: f32,
}

/// Segments and their derived crossings
#[derive(Debug, Clone, Default)]
pub struct TrackNetwork {
    segments: Vec<TrackSegment>,
    crossings: Vec<Crossing>,
}

impl TrackNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn segments(&self) -> &[TrackSegment] {
        &self.segments
    }

    pub fn segment(&self, index: usize) -> Option<&TrackSegment> {
        self.segments.get(index)
    }

    pub fn crossings(&self) -> &[Crossing] {
        &self.crossings
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Full rebuild: regenerate auto segments, keep manual ones, then rederive.
    ///
    /// Manual ends bound to waypoints that no longer exist lose their binding
    /// and stay where they are.
    pub fn rebuild(
        &mut self,
        waypoints: &WaypointStore,
        terrain: &impl TerrainHeight,
        config: &NetworkConfig,
        rng: &mut TrackRng,
    ) {
        let manual: Vec<TrackSegment> = self
            .segments
            .drain(..)
            .filter(|s| s.origin == SegmentOrigin::Manual)
            .collect();

        let mut segments = rebuild_auto_connections(waypoints, terrain, config, rng);
        segments.extend(manual);
        self.segments = segments;
        self.refresh(waypoints, config);

        info!(
            waypoints = waypoints.len(),
            segments = self.segments.len(),
            crossings = self.crossings.len(),
            "track network rebuilt"
        );
    }

    /// Bind, merge and recompute crossings without touching auto segments
    pub fn refresh(&mut self, waypoints: &WaypointStore, config: &NetworkConfig) {
        bind_manual_segments_to_waypoints(&mut self.segments, waypoints.as_slice(), config.bind_radius);
        merge_coincident_endpoints(&mut self.segments, config.merge_radius);
        self.update_crossings(config);
    }

    fn update_crossings(&mut self, config: &NetworkConfig) {
        self.crossings = find_crossings(
            &self.segments,
            config.crossing_precision,
            config.merge_radius,
        );
    }

    /// Move unbound manual ends and manual control points onto `terrain`.
    ///
    /// Bound ends are left for the bind pass, which puts them back on their
    /// waypoint. Auto segments are regenerated by a rebuild instead.
    pub fn reseat_manual_segments(&mut self, terrain: &impl TerrainHeight, config: &NetworkConfig) {
        for segment in &mut self.segments {
            if segment.origin != SegmentOrigin::Manual {
                continue;
            }
            for end in SegmentEnd::BOTH {
                if segment.binding(end).is_none() {
                    let point = seat_on_terrain(segment.endpoint(end), terrain, config);
                    segment.set_endpoint(end, point);
                }
            }
            segment.control = segment
                .control
                .map(|c| control_point_on_terrain(c, terrain, config));
        }
    }

    /// Replace all segments verbatim, recomputing only the crossings
    pub fn restore(&mut self, segments: Vec<TrackSegment>, config: &NetworkConfig) {
        self.segments = segments;
        self.update_crossings(config);
    }

    /// Append a user-drawn segment, returning its index.
    ///
    /// An explicit `control` wins; otherwise a curved segment gets a control
    /// point offset from the chord midpoint by `manual_curve_offset` of the
    /// chord length. Derived state is not refreshed here.
    pub fn add_manual_segment(
        &mut self,
        start: Vec3,
        end: Vec3,
        curved: bool,
        control: Option<Vec3>,
        terrain: &impl TerrainHeight,
        config: &NetworkConfig,
    ) -> Result<usize> {
        if start.distance(&end) < DEGENERATE_LENGTH {
            return Err(SnowlineError::DegenerateSegment);
        }

        let control = match control {
            Some(c) => Some(c),
            None if curved => {
                let chord = start.planar_distance(&end);
                let offset = planar_perpendicular(start, end) * (chord * config.manual_curve_offset);
                Some(control_point_on_terrain(start.midpoint(&end) + offset, terrain, config))
            }
            None => None,
        };

        self.segments.push(
            TrackSegment::straight(start, end, config.track_radius, SegmentOrigin::Manual)
                .with_control(control),
        );
        debug!(index = self.segments.len() - 1, curved = control.is_some(), "manual segment added");
        Ok(self.segments.len() - 1)
    }

    pub fn remove_segment(&mut self, index: usize, config: &NetworkConfig) -> Result<TrackSegment> {
        if index >= self.segments.len() {
            return Err(SnowlineError::SegmentNotFound(index));
        }
        let removed = self.segments.remove(index);
        self.update_crossings(config);
        Ok(removed)
    }

    /// Snap a freehand point onto existing structure.
    ///
    /// Returns the nearest waypoint connection point or segment endpoint within
    /// `snap_radius`, or `point` unchanged. When a segment end and a segment
    /// start are equally near, a start point prefers ends and an end point
    /// prefers starts, so drawn chains continue head to tail.
    pub fn snap_endpoint(
        &self,
        point: Vec3,
        is_start: bool,
        waypoints: &WaypointStore,
        snap_radius: f32,
    ) -> Vec3 {
        let preferred = if is_start { SegmentEnd::End } else { SegmentEnd::Start };

        let mut best: Option<(Vec3, f32, u8)> = None;
        let mut consider = |candidate: Vec3, rank: u8| {
            let d = candidate.distance(&point);
            if d > snap_radius {
                return;
            }
            let better = match best {
                None => true,
                Some((_, bd, br)) => d < bd || (d == bd && rank < br),
            };
            if better {
                best = Some((candidate, d, rank));
            }
        };

        for w in waypoints.iter() {
            consider(w.connection_point(), 0);
        }
        for s in &self.segments {
            for end in SegmentEnd::BOTH {
                let rank = if end == preferred { 1 } else { 2 };
                consider(s.endpoint(end), rank);
            }
        }

        best.map(|(p, _, _)| p).unwrap_or(point)
    }

    /// Segment whose chord is planar-closest to `point`
    pub fn closest_segment(&self, point: Vec3) -> Option<ClosestSegment> {
        self.segments
            .iter()
            .enumerate()
            .map(|(index, s)| {
                let (t, distance) = project_onto_chord(point, s.start, s.end);
                ClosestSegment { index, t, distance }
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }

    /// Indices of segments with either end bound to `waypoint`
    pub fn segments_bound_to(&self, waypoint: WaypointId) -> Vec<usize> {
        self.segments
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_bound_to(waypoint))
            .map(|(i, _)| i)
            .collect()
    }
}

/// `point` at track height above the terrain under it
pub fn seat_on_terrain(point: Vec3, terrain: &impl TerrainHeight, config: &NetworkConfig) -> Vec3 {
    point.with_y(terrain.height_at(point.x, point.z) + config.track_offset)
}

fn control_point_on_terrain(point: Vec3, terrain: &impl TerrainHeight, config: &NetworkConfig) -> Vec3 {
    point.with_y(
        terrain.height_at(point.x, point.z) + config.track_offset + config.control_height_offset,
    )
}

fn segment_radius(a: &Waypoint, b: Option<&Waypoint>, fallback: f32) -> f32 {
    let r = a.kind_info().hole_radius;
    match b {
        Some(b) => r.min(b.kind_info().hole_radius),
        None => r.min(fallback),
    }
}

/// One segment for every unordered waypoint pair within `connection_distance`.
///
/// Pairs at or beyond `curve_always_distance` are curved; pairs in the band
/// from `curve_maybe_distance` are curved with `curve_probability`; shorter
/// pairs are straight. A curve's control point is the chord midpoint pushed
/// sideways by a random fraction of the chord, to a random side, and lifted
/// onto the terrain.
pub fn rebuild_auto_connections(
    waypoints: &WaypointStore,
    terrain: &impl TerrainHeight,
    config: &NetworkConfig,
    rng: &mut TrackRng,
) -> Vec<TrackSegment> {
    let all = waypoints.as_slice();
    let mut segments = Vec::new();

    for i in 0..all.len() {
        for j in (i + 1)..all.len() {
            let a = &all[i];
            let b = &all[j];
            let start = a.connection_point();
            let end = b.connection_point();
            let distance = start.planar_distance(&end);
            if distance > config.connection_distance || distance < DEGENERATE_LENGTH {
                continue;
            }

            let curved = distance >= config.curve_always_distance
                || (distance >= config.curve_maybe_distance && rng.chance(config.curve_probability));

            let control = if curved {
                let fraction = rng.range(config.curve_offset_min, config.curve_offset_max);
                let side = rng.sign();
                let offset = planar_perpendicular(start, end) * (distance * fraction * side);
                Some(control_point_on_terrain(start.midpoint(&end) + offset, terrain, config))
            } else {
                None
            };

            segments.push(
                TrackSegment::straight(
                    start,
                    end,
                    segment_radius(a, Some(b), config.track_radius),
                    SegmentOrigin::Auto,
                )
                .with_control(control)
                .with_bindings(Some(a.id), Some(b.id)),
            );
        }
    }

    segments
}

/// Snap unbound manual ends onto nearby waypoints and record the binding.
///
/// An end binds to the nearest waypoint whose connection point is within
/// `bind_radius` or the waypoint's own connection radius, whichever is larger.
/// Both ends of one segment never bind to the same waypoint.
///
/// Ends that are already bound, on any segment, are put back exactly on their
/// waypoint's connection point; a binding to a waypoint that no longer exists
/// is dropped and the end stays where it is.
pub fn bind_manual_segments_to_waypoints(
    segments: &mut [TrackSegment],
    waypoints: &[Waypoint],
    bind_radius: f32,
) {
    for segment in segments.iter_mut() {
        for end in SegmentEnd::BOTH {
            if let Some(id) = segment.binding(end) {
                match waypoints.iter().find(|w| w.id == id) {
                    Some(w) => segment.set_endpoint(end, w.connection_point()),
                    None => {
                        debug!(waypoint = %id, ?end, "binding to missing waypoint dropped");
                        segment.set_binding(end, None);
                    }
                }
            }
        }
        if segment.origin != SegmentOrigin::Manual {
            continue;
        }
        for end in SegmentEnd::BOTH {
            if segment.binding(end).is_some() {
                continue;
            }
            let point = segment.endpoint(end);
            let other = segment.binding(end.opposite());
            let nearest = waypoints
                .iter()
                .filter(|w| Some(w.id) != other)
                .map(|w| (w, w.connection_point().distance(&point)))
                .filter(|(w, d)| *d <= bind_radius.max(w.connection_radius()))
                .min_by(|a, b| a.1.total_cmp(&b.1));

            if let Some((w, _)) = nearest {
                if segment.endpoint(end.opposite()).distance(&w.connection_point()) < DEGENERATE_LENGTH {
                    continue;
                }
                segment.set_endpoint(end, w.connection_point());
                segment.set_binding(end, Some(w.id));
                segment.radius = segment.radius.min(w.kind_info().hole_radius);
                debug!(waypoint = %w.id, ?end, "manual segment bound");
            }
        }
    }
}

/// Merge segment endpoints that lie within `merge_radius` of each other.
///
/// Pairs are visited in index order (`i < j`, start before end) and each
/// merge overwrites one endpoint with the other immediately, so later pairs
/// see earlier results. The later segment's end moves onto the earlier one
/// unless only the later end is bound to a waypoint; two ends bound to
/// different waypoints never move. A merge that would collapse a segment is
/// skipped. The result depends on segment order when more than two ends
/// cluster together.
pub fn merge_coincident_endpoints(segments: &mut [TrackSegment], merge_radius: f32) {
    let n = segments.len();
    for i in 0..n {
        for j in (i + 1)..n {
            for ei in SegmentEnd::BOTH {
                for ej in SegmentEnd::BOTH {
                    let pi = segments[i].endpoint(ei);
                    let pj = segments[j].endpoint(ej);
                    let d = pi.distance(&pj);
                    if d == 0.0 || d > merge_radius {
                        continue;
                    }

                    let bound_i = segments[i].binding(ei).is_some();
                    let bound_j = segments[j].binding(ej).is_some();
                    let (target, end, onto) = match (bound_i, bound_j) {
                        (_, false) => (j, ej, pi),
                        (false, true) => (i, ei, pj),
                        (true, true) => continue,
                    };

                    let other = segments[target].endpoint(end.opposite());
                    if other.distance(&onto) < DEGENERATE_LENGTH {
                        continue;
                    }
                    segments[target].set_endpoint(end, onto);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snowline_core::FlatTerrain;

    fn config() -> NetworkConfig {
        NetworkConfig::default()
    }

    fn store_with(points: &[(f32, f32)]) -> WaypointStore {
        let mut store = WaypointStore::new();
        for &(x, z) in points {
            store
                .place(x, z, 0, 0.0, &FlatTerrain::default(), &config())
                .unwrap();
        }
        store
    }

    fn manual(a: Vec3, b: Vec3) -> TrackSegment {
        TrackSegment::straight(a, b, 0.4, SegmentOrigin::Manual)
    }

    #[test]
    fn two_waypoints_within_range_connect_once() {
        let store = store_with(&[(0.0, 0.0), (7.0, 0.0)]);
        let mut rng = TrackRng::from_seed_u64(1);
        let segments = rebuild_auto_connections(&store, &FlatTerrain::default(), &config(), &mut rng);
        assert_eq!(segments.len(), 1);

        let s = &segments[0];
        let ids: Vec<_> = store.iter().map(|w| w.id).collect();
        assert_eq!(s.from, Some(ids[0]));
        assert_eq!(s.to, Some(ids[1]));
        assert_eq!(s.start, store.as_slice()[0].connection_point());
        assert_eq!(s.end, store.as_slice()[1].connection_point());
        assert_eq!(s.origin, SegmentOrigin::Auto);

        let mut network = TrackNetwork::new();
        network.rebuild(&store, &FlatTerrain::default(), &config(), &mut rng);
        assert_eq!(network.len(), 1);
        assert!(network.crossings().is_empty());
    }

    #[test]
    fn waypoints_out_of_range_do_not_connect() {
        let store = store_with(&[(0.0, 0.0), (9.5, 0.0)]);
        let mut rng = TrackRng::default();
        assert!(rebuild_auto_connections(&store, &FlatTerrain::default(), &config(), &mut rng).is_empty());
    }

    #[test]
    fn curve_choice_by_distance() {
        let mut rng = TrackRng::from_seed_u64(5);
        // 3.5 apart: always straight
        let short = store_with(&[(0.0, 0.0), (3.5, 0.0)]);
        for _ in 0..20 {
            let segs = rebuild_auto_connections(&short, &FlatTerrain::default(), &config(), &mut rng);
            assert!(!segs[0].is_curved());
        }
        // 7.0 apart: always curved
        let long = store_with(&[(0.0, 0.0), (7.0, 0.0)]);
        for _ in 0..20 {
            let segs = rebuild_auto_connections(&long, &FlatTerrain::default(), &config(), &mut rng);
            assert!(segs[0].is_curved());
        }
    }

    #[test]
    fn curve_control_point_offset_band() {
        let store = store_with(&[(0.0, 0.0), (7.0, 0.0)]);
        let terrain = FlatTerrain::new(1.0);
        let cfg = config();
        let mut rng = TrackRng::from_seed_u64(11);
        let mut sides = (false, false);
        for _ in 0..50 {
            let segs = rebuild_auto_connections(&store, &terrain, &cfg, &mut rng);
            let c = segs[0].control.unwrap();
            assert!((c.x - 3.5).abs() < 1e-4);
            let fraction = c.z.abs() / 7.0;
            assert!(fraction >= cfg.curve_offset_min - 1e-4 && fraction <= cfg.curve_offset_max + 1e-4);
            assert!((c.y - (1.0 + cfg.track_offset + cfg.control_height_offset)).abs() < 1e-5);
            if c.z > 0.0 {
                sides.0 = true;
            } else {
                sides.1 = true;
            }
        }
        assert!(sides.0 && sides.1, "curves should bend to both sides");
    }

    #[test]
    fn same_seed_same_geometry() {
        let store = store_with(&[(0.0, 0.0), (5.0, 0.0), (5.0, 5.0), (0.0, 6.0)]);
        let a = rebuild_auto_connections(&store, &FlatTerrain::default(), &config(), &mut TrackRng::from_seed_u64(9));
        let b = rebuild_auto_connections(&store, &FlatTerrain::default(), &config(), &mut TrackRng::from_seed_u64(9));
        assert_eq!(a, b);
    }

    #[test]
    fn manual_curve_uses_thirty_percent_offset() {
        let mut network = TrackNetwork::new();
        let idx = network
            .add_manual_segment(
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(0.0, 0.0, 10.0),
                true,
                None,
                &FlatTerrain::default(),
                &config(),
            )
            .unwrap();
        let c = network.segment(idx).unwrap().control.unwrap();
        assert!((c.x.abs() - 3.0).abs() < 1e-5);
        assert!((c.z - 5.0).abs() < 1e-5);
    }

    #[test]
    fn manual_explicit_control_wins() {
        let mut network = TrackNetwork::new();
        let control = Vec3::new(1.0, 2.0, 3.0);
        let idx = network
            .add_manual_segment(
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(4.0, 0.0, 0.0),
                false,
                Some(control),
                &FlatTerrain::default(),
                &config(),
            )
            .unwrap();
        assert_eq!(network.segment(idx).unwrap().control, Some(control));
    }

    #[test]
    fn degenerate_manual_segment_is_rejected() {
        let mut network = TrackNetwork::new();
        let p = Vec3::new(2.0, 0.0, 2.0);
        let err = network
            .add_manual_segment(p, p, false, None, &FlatTerrain::default(), &config())
            .unwrap_err();
        assert!(matches!(err, SnowlineError::DegenerateSegment));
        assert!(network.is_empty());
    }

    #[test]
    fn snap_prefers_nearest_structure() {
        let store = store_with(&[(0.0, 0.0)]);
        let mut network = TrackNetwork::new();
        network.restore(
            vec![manual(Vec3::new(10.0, 0.0, 0.0), Vec3::new(20.0, 0.0, 0.0))],
            &config(),
        );

        let near_wp = network.snap_endpoint(Vec3::new(0.5, 0.0, 0.5), true, &store, 1.5);
        assert_eq!(near_wp, store.as_slice()[0].connection_point());

        let near_end = network.snap_endpoint(Vec3::new(19.2, 0.0, 0.0), false, &store, 1.5);
        assert_eq!(near_end, Vec3::new(20.0, 0.0, 0.0));

        let free = Vec3::new(5.0, 0.0, 5.0);
        assert_eq!(network.snap_endpoint(free, true, &store, 1.5), free);
    }

    #[test]
    fn snap_tie_break_follows_chain_direction() {
        let store = WaypointStore::new();
        let mut network = TrackNetwork::new();
        network.restore(
            vec![
                manual(Vec3::new(-5.0, 0.0, 0.0), Vec3::new(-1.0, 0.0, 0.0)),
                manual(Vec3::new(1.0, 0.0, 0.0), Vec3::new(5.0, 0.0, 0.0)),
            ],
            &config(),
        );
        let origin = Vec3::ZERO;
        assert_eq!(network.snap_endpoint(origin, true, &store, 1.5), Vec3::new(-1.0, 0.0, 0.0));
        assert_eq!(network.snap_endpoint(origin, false, &store, 1.5), Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn manual_ends_bind_to_nearby_waypoints() {
        let store = store_with(&[(0.0, 0.0), (20.0, 0.0)]);
        let wps = store.as_slice();
        let mut segments = vec![manual(Vec3::new(0.4, 0.0, 0.3), Vec3::new(19.8, 0.0, 0.0))];
        bind_manual_segments_to_waypoints(&mut segments, wps, 1.0);

        assert_eq!(segments[0].from, Some(wps[0].id));
        assert_eq!(segments[0].to, Some(wps[1].id));
        assert_eq!(segments[0].start, wps[0].connection_point());
        assert_eq!(segments[0].end, wps[1].connection_point());
    }

    #[test]
    fn far_manual_ends_stay_unbound() {
        let store = store_with(&[(0.0, 0.0)]);
        let start = Vec3::new(3.0, 0.0, 0.0);
        let mut segments = vec![manual(start, Vec3::new(9.0, 0.0, 0.0))];
        bind_manual_segments_to_waypoints(&mut segments, store.as_slice(), 1.0);
        assert_eq!(segments[0].from, None);
        assert_eq!(segments[0].start, start);
    }

    #[test]
    fn bound_ends_follow_their_waypoint() {
        let mut store = store_with(&[(0.0, 0.0), (20.0, 0.0)]);
        let ids: Vec<_> = store.iter().map(|w| w.id).collect();
        let mut segments = vec![manual(Vec3::new(0.4, 0.0, 0.3), Vec3::new(10.0, 0.0, 0.0))];
        bind_manual_segments_to_waypoints(&mut segments, store.as_slice(), 1.0);
        assert_eq!(segments[0].from, Some(ids[0]));

        // The waypoint is lifted; the bound end goes with it
        let raised: Vec<Waypoint> = store
            .iter()
            .map(|w| Waypoint {
                position: w.position.with_y(4.0),
                hole_position: w.hole_position.with_y(4.05),
                ..w.clone()
            })
            .collect();
        let next = store.next_id();
        store.restore(raised, next);
        bind_manual_segments_to_waypoints(&mut segments, store.as_slice(), 1.0);
        assert_eq!(segments[0].start, store.as_slice()[0].connection_point());
        assert_eq!(segments[0].from, Some(ids[0]));

        // Gone entirely: the binding is dropped and the end stays put
        let start = segments[0].start;
        store.remove(ids[0]).unwrap();
        bind_manual_segments_to_waypoints(&mut segments, store.as_slice(), 1.0);
        assert_eq!(segments[0].from, None);
        assert_eq!(segments[0].start, start);
    }

    #[test]
    fn reseat_moves_free_manual_ends_onto_terrain() {
        let cfg = config();
        let mut network = TrackNetwork::new();
        network.restore(
            vec![
                manual(Vec3::new(0.0, 0.05, 0.0), Vec3::new(8.0, 0.05, 0.0))
                    .with_control(Some(Vec3::new(4.0, 0.15, 2.0))),
                manual(Vec3::new(20.0, 0.05, 0.0), Vec3::new(28.0, 0.05, 0.0))
                    .with_bindings(Some(WaypointId(1)), None),
            ],
            &cfg,
        );
        network.reseat_manual_segments(&FlatTerrain::new(3.0), &cfg);

        let free = &network.segments()[0];
        assert!((free.start.y - 3.05).abs() < 1e-6);
        assert!((free.end.y - 3.05).abs() < 1e-6);
        assert!((free.control.unwrap().y - 3.15).abs() < 1e-6);
        assert_eq!(free.start.x, 0.0);

        // Bound ends are left to the bind pass
        let bound = &network.segments()[1];
        assert_eq!(bound.start.y, 0.05);
        assert!((bound.end.y - 3.05).abs() < 1e-6);
    }

    #[test]
    fn both_ends_never_bind_to_one_waypoint() {
        let store = store_with(&[(0.0, 0.0)]);
        let mut segments = vec![manual(Vec3::new(0.3, 0.0, 0.0), Vec3::new(-0.3, 0.0, 0.0))];
        bind_manual_segments_to_waypoints(&mut segments, store.as_slice(), 1.0);
        assert!(segments[0].from.is_some());
        assert_eq!(segments[0].to, None);
    }

    #[test]
    fn merge_moves_later_endpoint_onto_earlier() {
        let mut segments = vec![
            manual(Vec3::new(0.0, 0.0, 0.0), Vec3::new(5.0, 0.0, 0.0)),
            manual(Vec3::new(5.3, 0.0, 0.0), Vec3::new(9.0, 0.0, 0.0)),
        ];
        merge_coincident_endpoints(&mut segments, 0.5);
        assert_eq!(segments[1].start, Vec3::new(5.0, 0.0, 0.0));
        assert_eq!(segments[0].end, Vec3::new(5.0, 0.0, 0.0));
    }

    #[test]
    fn merge_keeps_bound_endpoints_in_place() {
        let bound_at = Vec3::new(5.3, 0.0, 0.0);
        let mut segments = vec![
            manual(Vec3::new(0.0, 0.0, 0.0), Vec3::new(5.0, 0.0, 0.0)),
            manual(bound_at, Vec3::new(9.0, 0.0, 0.0)).with_bindings(Some(WaypointId(1)), None),
        ];
        merge_coincident_endpoints(&mut segments, 0.5);
        assert_eq!(segments[1].start, bound_at);
        assert_eq!(segments[0].end, bound_at);
    }

    #[test]
    fn merge_is_index_ordered() {
        // Three ends in a row, 0.4 apart: the middle one is pulled onto the
        // first, after which the third is 0.8 away and stays put.
        let mut segments = vec![
            manual(Vec3::new(-5.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 0.0)),
            manual(Vec3::new(0.4, 0.0, 0.0), Vec3::new(0.4, 0.0, 5.0)),
            manual(Vec3::new(0.8, 0.0, 0.0), Vec3::new(5.0, 0.0, 0.0)),
        ];
        merge_coincident_endpoints(&mut segments, 0.5);
        assert_eq!(segments[1].start, Vec3::new(0.0, 0.0, 0.0));
        assert_eq!(segments[2].start, Vec3::new(0.8, 0.0, 0.0));
    }

    #[test]
    fn merge_never_collapses_a_segment() {
        let mut segments = vec![
            manual(Vec3::new(0.0, 0.0, 0.0), Vec3::new(5.0, 0.0, 0.0)),
            manual(Vec3::new(0.2, 0.0, 0.0), Vec3::new(0.0, 0.0, 0.0)),
        ];
        merge_coincident_endpoints(&mut segments, 0.5);
        assert!(!segments[1].is_degenerate());
    }

    #[test]
    fn rebuild_keeps_manual_segments_after_auto() {
        let store = store_with(&[(0.0, 0.0), (6.0, 0.0)]);
        let cfg = config();
        let mut rng = TrackRng::default();
        let mut network = TrackNetwork::new();
        network
            .add_manual_segment(
                Vec3::new(30.0, 0.0, 0.0),
                Vec3::new(40.0, 0.0, 0.0),
                false,
                None,
                &FlatTerrain::default(),
                &cfg,
            )
            .unwrap();
        network.rebuild(&store, &FlatTerrain::default(), &cfg, &mut rng);
        assert_eq!(network.len(), 2);
        assert_eq!(network.segments()[0].origin, SegmentOrigin::Auto);
        assert_eq!(network.segments()[1].origin, SegmentOrigin::Manual);

        network.rebuild(&store, &FlatTerrain::default(), &cfg, &mut rng);
        assert_eq!(network.len(), 2);
    }

    #[test]
    fn rebuild_drops_bindings_to_removed_waypoints() {
        let mut store = store_with(&[(0.0, 0.0), (30.0, 0.0)]);
        let cfg = config();
        let mut rng = TrackRng::default();
        let mut network = TrackNetwork::new();
        network
            .add_manual_segment(
                Vec3::new(0.2, 0.0, 0.0),
                Vec3::new(15.0, 0.0, 0.0),
                false,
                None,
                &FlatTerrain::default(),
                &cfg,
            )
            .unwrap();
        network.rebuild(&store, &FlatTerrain::default(), &cfg, &mut rng);
        let first = store.as_slice()[0].id;
        assert_eq!(network.segments()[0].from, Some(first));

        store.remove(first).unwrap();
        network.rebuild(&store, &FlatTerrain::default(), &cfg, &mut rng);
        assert_eq!(network.segments()[0].from, None);
        assert!(network.segments_bound_to(first).is_empty());
    }

    #[test]
    fn crossing_found_on_rebuild() {
        // An auto segment along one diagonal, a manual one along the other
        let cfg = NetworkConfig {
            connection_distance: 7.5,
            ..config()
        };
        let mut store = WaypointStore::new();
        let t = FlatTerrain::default();
        for (x, z) in [(0.0, 0.0), (5.0, 5.0)] {
            store.place(x, z, 0, 0.0, &t, &cfg).unwrap();
        }
        let mut network = TrackNetwork::new();
        network
            .add_manual_segment(
                Vec3::new(0.0, 0.05, 5.0),
                Vec3::new(5.0, 0.05, 0.0),
                false,
                None,
                &t,
                &cfg,
            )
            .unwrap();
        network.rebuild(&store, &t, &cfg, &mut TrackRng::default());
        assert_eq!(network.crossings().len(), 1);
        let c = network.crossings()[0].position;
        assert!((c.x - 2.5).abs() < 1e-4 && (c.z - 2.5).abs() < 1e-4);
    }

    #[test]
    fn closest_segment_projection() {
        let mut network = TrackNetwork::new();
        network.restore(
            vec![
                manual(Vec3::new(0.0, 0.0, 0.0), Vec3::new(10.0, 0.0, 0.0)),
                manual(Vec3::new(0.0, 0.0, 5.0), Vec3::new(10.0, 0.0, 5.0)),
            ],
            &config(),
        );
        let hit = network.closest_segment(Vec3::new(3.0, 0.0, 4.0)).unwrap();
        assert_eq!(hit.index, 1);
        assert!((hit.t - 0.3).abs() < 1e-5);
        assert!((hit.distance - 1.0).abs() < 1e-5);
        assert!(TrackNetwork::new().closest_segment(Vec3::ZERO).is_none());
    }

    #[test]
    fn remove_segment_bounds() {
        let mut network = TrackNetwork::new();
        network.restore(vec![manual(Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0))], &config());
        assert!(matches!(
            network.remove_segment(3, &config()),
            Err(SnowlineError::SegmentNotFound(3))
        ));
        assert!(network.remove_segment(0, &config()).is_ok());
        assert!(network.is_empty());
    }
}
