//! Crossings between segment chords

use std::collections::HashSet;

use snowline_core::geometry::segment_intersection_2d;
use snowline_core::Vec3;

use crate::segment::TrackSegment;

/// Where two segments cross. Always derived, never edited.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Crossing {
    pub position: Vec3,
    /// Indices of the crossing segments, lower first
    pub segments: (usize, usize),
}

/// Every crossing between segment chords.
///
/// Curves are tested by their straight chord. Hits that fall on an endpoint of
/// both segments (within `junction_radius`) are junctions, not crossings.
/// Crossings whose coordinates round to the same `precision` cell are
/// reported once.
pub fn find_crossings(segments: &[TrackSegment], precision: f32, junction_radius: f32) -> Vec<Crossing> {
    let mut seen: HashSet<(i64, i64)> = HashSet::new();
    let mut crossings = Vec::new();

    for i in 0..segments.len() {
        for j in (i + 1)..segments.len() {
            let a = &segments[i];
            let b = &segments[j];
            let Some(hit) = segment_intersection_2d(a.start, a.end, b.start, b.end) else {
                continue;
            };

            let at = Vec3::new(hit.x, 0.0, hit.z);
            let near_end = |s: &TrackSegment| {
                s.start.planar_distance(&at) <= junction_radius
                    || s.end.planar_distance(&at) <= junction_radius
            };
            if near_end(a) && near_end(b) {
                continue;
            }

            let key = (
                (hit.x * precision).round() as i64,
                (hit.z * precision).round() as i64,
            );
            if !seen.insert(key) {
                continue;
            }

            let y = (a.start.y + (a.end.y - a.start.y) * hit.t_a
                + b.start.y
                + (b.end.y - b.start.y) * hit.t_b)
                * 0.5;
            crossings.push(Crossing {
                position: Vec3::new(hit.x, y, hit.z),
                segments: (i, j),
            });
        }
    }

    crossings
}
