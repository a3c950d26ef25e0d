//! Pure curve and chord math shared by the track network and the vehicle.
//!
//! Every consumer that needs a point on a segment goes through
//! [`evaluate_path`], so network geometry, previews and vehicle poses agree.

use crate::Vec3;

/// Determinants below this are treated as parallel chords.
pub const PARALLEL_EPSILON: f32 = 1e-6;

/// Chords shorter than this are degenerate.
pub const DEGENERATE_LENGTH: f32 = 1e-4;

/// Planar chord intersection with both chord parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanarHit {
    pub x: f32,
    pub z: f32,
    /// Parameter along the first chord in [0, 1]
    pub t_a: f32,
    /// Parameter along the second chord in [0, 1]
    pub t_b: f32,
}

/// Quadratic Bezier through `p0` and `p1` pulled toward `control`.
pub fn evaluate_bezier(p0: Vec3, control: Vec3, p1: Vec3, t: f32) -> Vec3 {
    let u = 1.0 - t;
    p0 * (u * u) + control * (2.0 * u * t) + p1 * (t * t)
}

/// Point on a straight or curved segment at parameter `t`.
pub fn evaluate_path(start: Vec3, end: Vec3, control: Option<Vec3>, t: f32) -> Vec3 {
    match control {
        Some(c) => evaluate_bezier(start, c, end, t),
        None => start.lerp(&end, t),
    }
}

/// Intersect chords `a1→a2` and `b1→b2` on the X/Z plane.
///
/// Returns `None` for (near-)parallel chords or when the crossing lies
/// outside either chord.
pub fn segment_intersection_2d(a1: Vec3, a2: Vec3, b1: Vec3, b2: Vec3) -> Option<PlanarHit> {
    let rx = a2.x - a1.x;
    let rz = a2.z - a1.z;
    let sx = b2.x - b1.x;
    let sz = b2.z - b1.z;

    let det = rx * sz - rz * sx;
    if det.abs() < PARALLEL_EPSILON {
        return None;
    }

    let qx = b1.x - a1.x;
    let qz = b1.z - a1.z;
    let t_a = (qx * sz - qz * sx) / det;
    let t_b = (qx * rz - qz * rx) / det;

    if !(0.0..=1.0).contains(&t_a) || !(0.0..=1.0).contains(&t_b) {
        return None;
    }

    Some(PlanarHit {
        x: a1.x + rx * t_a,
        z: a1.z + rz * t_a,
        t_a,
        t_b,
    })
}

/// Project `point` onto the planar chord `a→b`.
///
/// Returns the clamped chord parameter and the planar distance from `point`
/// to the projected foot. A degenerate chord projects onto `a`.
pub fn project_onto_chord(point: Vec3, a: Vec3, b: Vec3) -> (f32, f32) {
    let dx = b.x - a.x;
    let dz = b.z - a.z;
    let len_sq = dx * dx + dz * dz;
    if len_sq < DEGENERATE_LENGTH * DEGENERATE_LENGTH {
        return (0.0, point.planar_distance(&a));
    }
    let t = (((point.x - a.x) * dx + (point.z - a.z) * dz) / len_sq).clamp(0.0, 1.0);
    let foot = Vec3::new(a.x + dx * t, point.y, a.z + dz * t);
    (t, point.planar_distance(&foot))
}

/// Unit vector perpendicular to the planar direction of `from→to`.
///
/// For a chord heading along +Z this points along +X.
pub fn planar_perpendicular(from: Vec3, to: Vec3) -> Vec3 {
    let dx = to.x - from.x;
    let dz = to.z - from.z;
    let len = (dx * dx + dz * dz).sqrt();
    if len < DEGENERATE_LENGTH {
        return Vec3::ZERO;
    }
    Vec3::new(dz / len, 0.0, -dx / len)
}

/// Yaw in radians of a planar direction; 0 faces +Z, positive turns toward +X.
pub fn heading_of(direction: Vec3) -> f32 {
    direction.x.atan2(direction.z)
}

/// Wrap an angle to (-π, π].
pub fn wrap_angle(angle: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    let mut a = angle % TAU;
    if a <= -PI {
        a += TAU;
    } else if a > PI {
        a -= TAU;
    }
    a
}

/// Snap planar coordinates to the nearest grid intersection.
pub fn snap_to_grid(x: f32, z: f32, cell_size: f32) -> (f32, f32) {
    if cell_size <= 0.0 {
        return (x, z);
    }
    (
        (x / cell_size).round() * cell_size,
        (z / cell_size).round() * cell_size,
    )
}
