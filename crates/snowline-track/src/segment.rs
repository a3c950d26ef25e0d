//! Track segments

use snowline_core::geometry::{evaluate_path, DEGENERATE_LENGTH};
use snowline_core::{Vec3, WaypointId};

/// How a segment came to exist
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentOrigin {
    /// Derived from waypoint proximity; replaced on every rebuild
    Auto,
    /// Drawn by the user; survives rebuilds
    Manual,
}

/// One end of a segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentEnd {
    Start,
    End,
}

impl SegmentEnd {
    pub const BOTH: [SegmentEnd; 2] = [SegmentEnd::Start, SegmentEnd::End];

    pub fn opposite(self) -> Self {
        match self {
            SegmentEnd::Start => SegmentEnd::End,
            SegmentEnd::End => SegmentEnd::Start,
        }
    }

    /// Arc parameter of this end
    pub fn t(self) -> f32 {
        match self {
            SegmentEnd::Start => 0.0,
            SegmentEnd::End => 1.0,
        }
    }
}

/// A straight or quadratic Bezier piece of track.
///
/// Once an end is bound to a waypoint, that end sits exactly on the
/// waypoint's connection point.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackSegment {
    pub start: Vec3,
    pub end: Vec3,
    /// Bezier control point; `None` means straight
    pub control: Option<Vec3>,
    pub from: Option<WaypointId>,
    pub to: Option<WaypointId>,
    /// Half-width of the track bed
    pub radius: f32,
    pub origin: SegmentOrigin,
}

impl TrackSegment {
    pub fn straight(start: Vec3, end: Vec3, radius: f32, origin: SegmentOrigin) -> Self {
        Self {
            start,
            end,
            control: None,
            from: None,
            to: None,
            radius,
            origin,
        }
    }

    pub fn with_control(mut self, control: Option<Vec3>) -> Self {
        self.control = control;
        self
    }

    pub fn with_bindings(mut self, from: Option<WaypointId>, to: Option<WaypointId>) -> Self {
        self.from = from;
        self.to = to;
        self
    }

    pub fn is_curved(&self) -> bool {
        self.control.is_some()
    }

    /// Point on the path at arc parameter `t`
    pub fn point_at(&self, t: f32) -> Vec3 {
        evaluate_path(self.start, self.end, self.control, t)
    }

    /// Chord length. Curvature is not accounted for.
    pub fn length(&self) -> f32 {
        self.start.distance(&self.end)
    }

    pub fn is_degenerate(&self) -> bool {
        self.length() < DEGENERATE_LENGTH
    }

    pub fn endpoint(&self, end: SegmentEnd) -> Vec3 {
        match end {
            SegmentEnd::Start => self.start,
            SegmentEnd::End => self.end,
        }
    }

    pub fn set_endpoint(&mut self, end: SegmentEnd, point: Vec3) {
        match end {
            SegmentEnd::Start => self.start = point,
            SegmentEnd::End => self.end = point,
        }
    }

    pub fn binding(&self, end: SegmentEnd) -> Option<WaypointId> {
        match end {
            SegmentEnd::Start => self.from,
            SegmentEnd::End => self.to,
        }
    }

    pub fn set_binding(&mut self, end: SegmentEnd, waypoint: Option<WaypointId>) {
        match end {
            SegmentEnd::Start => self.from = waypoint,
            SegmentEnd::End => self.to = waypoint,
        }
    }

    pub fn is_bound_to(&self, waypoint: WaypointId) -> bool {
        self.from == Some(waypoint) || self.to == Some(waypoint)
    }

    /// The end planar-nearest to `point`, with its planar distance
    pub fn nearest_end(&self, point: Vec3) -> (SegmentEnd, f32) {
        let ds = self.start.planar_distance(&point);
        let de = self.end.planar_distance(&point);
        if ds <= de {
            (SegmentEnd::Start, ds)
        } else {
            (SegmentEnd::End, de)
        }
    }
}
