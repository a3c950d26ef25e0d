//! Vehicle locomotion along the track network.
//!
//! A vehicle on track is described by a segment index and an arc parameter
//! `t` in [0, 1]. `direction` says which way along the segment's parameter a
//! positive speed moves; a negative speed reverses without changing it.
//! Parameter steps are speed over chord length, so curves are traversed
//! slightly faster than their true arc length.
//!
//! When `t` overflows an end the vehicle looks for another segment with an
//! endpoint within `junction_threshold` and carries the overflow distance onto
//! it. With no such segment it stops dead at the end. With no segments at all
//! it roams freely over the terrain.

use snowline_core::geometry::{heading_of, wrap_angle, DEGENERATE_LENGTH};
use snowline_core::{TerrainHeight, Vec3, VehicleConfig};
use snowline_track::{SegmentEnd, TrackNetwork, TrackSegment};
use std::f32::consts::PI;
use tracing::debug;

/// Upper bound on segment transfers in a single tick
const MAX_TRANSFERS_PER_TICK: usize = 16;

/// Branches turning further than this from the travel direction are not
/// offered by manual switching
const MAX_SWITCH_TURN: f32 = 2.0 * PI / 3.0;

/// Which way along the segment parameter a positive speed moves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TravelDirection {
    #[default]
    Forward,
    Backward,
}

impl TravelDirection {
    pub fn sign(self) -> f32 {
        match self {
            TravelDirection::Forward => 1.0,
            TravelDirection::Backward => -1.0,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            TravelDirection::Forward => TravelDirection::Backward,
            TravelDirection::Backward => TravelDirection::Forward,
        }
    }

    fn from_sign(sign: f32) -> Self {
        if sign < 0.0 {
            TravelDirection::Backward
        } else {
            TravelDirection::Forward
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackPosition {
    pub segment: usize,
    pub t: f32,
}

/// Held drive controls for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DriveInput {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
}

/// What happened during a tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MotionEvent {
    /// No segments; moved by input directly
    FreeRoam,
    /// Stayed on the current segment
    OnTrack,
    /// Crossed onto another segment (the last transfer if several)
    Transferred { from: usize, to: usize },
    /// Ran off an unconnected end and stopped
    DeadEnd { segment: usize, end: SegmentEnd },
}

/// The train
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Vehicle {
    pub position: Vec3,
    /// Yaw in radians; 0 faces +Z
    pub heading: f32,
    /// Signed speed in world units per second
    pub speed: f32,
    pub direction: TravelDirection,
    pub track_position: Option<TrackPosition>,
}

impl Vehicle {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Forget the track position; the next tick re-acquires the closest segment
    pub fn detach(&mut self) {
        self.track_position = None;
    }

    /// Advance the vehicle by `dt` seconds.
    pub fn tick(
        &mut self,
        dt: f32,
        input: DriveInput,
        network: &TrackNetwork,
        terrain: &impl TerrainHeight,
        config: &VehicleConfig,
    ) -> MotionEvent {
        let segments = network.segments();
        if segments.is_empty() {
            self.free_roam(dt, input, terrain, config);
            return MotionEvent::FreeRoam;
        }

        let mut position = match self.track_position {
            Some(p) if p.segment < segments.len() => p,
            _ => {
                let Some(closest) = network.closest_segment(self.position) else {
                    self.free_roam(dt, input, terrain, config);
                    return MotionEvent::FreeRoam;
                };
                debug!(segment = closest.index, t = closest.t, "vehicle attached to track");
                self.direction = TravelDirection::Forward;
                TrackPosition {
                    segment: closest.index,
                    t: closest.t,
                }
            }
        };

        self.update_speed(dt, input, config);
        let event = self.advance(&mut position, segments, self.speed * dt, config);
        self.track_position = Some(position);
        self.apply_pose(&segments[position.segment], position.t, terrain, config);
        event
    }

    fn update_speed(&mut self, dt: f32, input: DriveInput, config: &VehicleConfig) {
        let a = config.acceleration;
        match (input.forward, input.backward) {
            (true, false) => {
                let rate = if self.speed < 0.0 { 2.0 * a } else { a };
                self.speed += rate * dt;
            }
            (false, true) => {
                let rate = if self.speed > 0.0 { 2.0 * a } else { a };
                self.speed -= rate * dt;
            }
            _ => {
                let decel = 0.5 * a * dt;
                if self.speed.abs() <= decel {
                    self.speed = 0.0;
                } else {
                    self.speed -= decel * self.speed.signum();
                }
            }
        }
        self.speed = self.speed.clamp(-config.max_speed, config.max_speed);
    }

    /// Move `distance` along the track (signed relative to `direction`)
    fn advance(
        &mut self,
        position: &mut TrackPosition,
        segments: &[TrackSegment],
        distance: f32,
        config: &VehicleConfig,
    ) -> MotionEvent {
        // Signed distance along the current segment's parameter
        let mut remaining = distance * self.direction.sign();
        let mut event = MotionEvent::OnTrack;

        for _ in 0..MAX_TRANSFERS_PER_TICK {
            if remaining == 0.0 {
                break;
            }
            let current = &segments[position.segment];
            let len = current.length();

            let (leaving, overflow) = if len < DEGENERATE_LENGTH {
                let end = if remaining > 0.0 { SegmentEnd::End } else { SegmentEnd::Start };
                (end, remaining.abs())
            } else {
                let t = position.t + remaining / len;
                // Landing exactly on the approached end resolves it with no overflow
                if remaining > 0.0 && t >= 1.0 {
                    (SegmentEnd::End, (t - 1.0) * len)
                } else if remaining < 0.0 && t <= 0.0 {
                    (SegmentEnd::Start, -t * len)
                } else {
                    position.t = t.clamp(0.0, 1.0);
                    break;
                }
            };

            let heading = Vec3::new(self.heading.sin(), 0.0, self.heading.cos());
            match next_segment(segments, position.segment, leaving, heading, config.junction_threshold) {
                Some((next, entered)) => {
                    let into = if entered == SegmentEnd::Start { 1.0 } else { -1.0 };
                    if into != remaining.signum() {
                        self.direction = self.direction.flipped();
                    }
                    debug!(from = position.segment, to = next, "vehicle changed segment");
                    event = MotionEvent::Transferred {
                        from: position.segment,
                        to: next,
                    };
                    *position = TrackPosition {
                        segment: next,
                        t: entered.t(),
                    };
                    remaining = overflow * into;
                }
                None => {
                    debug!(segment = position.segment, ?leaving, "vehicle hit a dead end");
                    position.t = leaving.t();
                    self.speed = 0.0;
                    return MotionEvent::DeadEnd {
                        segment: position.segment,
                        end: leaving,
                    };
                }
            }
        }

        position.t = position.t.clamp(0.0, 1.0);
        event
    }

    fn apply_pose(
        &mut self,
        segment: &TrackSegment,
        t: f32,
        terrain: &impl TerrainHeight,
        config: &VehicleConfig,
    ) {
        let p = segment.point_at(t);
        self.position = p.with_y(terrain.height_at(p.x, p.z) + config.ride_height);

        let h = config.heading_sample;
        let ahead = segment.point_at((t + h).min(1.0));
        let behind = segment.point_at((t - h).max(0.0));
        let tangent = (ahead - behind) * self.direction.sign();
        if tangent.planar_length() > f32::EPSILON {
            let flip = if self.speed < 0.0 { PI } else { 0.0 };
            self.heading = wrap_angle(heading_of(tangent) + flip);
        }
    }

    fn free_roam(
        &mut self,
        dt: f32,
        input: DriveInput,
        terrain: &impl TerrainHeight,
        config: &VehicleConfig,
    ) {
        self.track_position = None;
        self.speed = 0.0;

        let mut dir = Vec3::ZERO;
        if input.forward {
            dir.z -= 1.0;
        }
        if input.backward {
            dir.z += 1.0;
        }
        if input.left {
            dir.x -= 1.0;
        }
        if input.right {
            dir.x += 1.0;
        }
        if dir.planar_length() > 0.0 {
            let step = dir.normalized() * (config.free_roam_speed * dt);
            self.position = self.position + step;
            self.heading = heading_of(step);
        }
        self.position.y = terrain.height_at(self.position.x, self.position.z) + config.ride_height;
    }

    /// Jump onto a branch whose end is within `switch_radius` of the vehicle.
    ///
    /// A positive `preferred_sign` takes the branch turning furthest left of
    /// the travel direction, a negative one the furthest right, zero the
    /// straightest. Branches that would reverse the vehicle are ignored.
    /// Returns whether a switch happened.
    pub fn switch_at_junction(
        &mut self,
        preferred_sign: f32,
        network: &TrackNetwork,
        terrain: &impl TerrainHeight,
        config: &VehicleConfig,
    ) -> bool {
        let Some(current) = self.track_position else {
            return false;
        };
        let segments = network.segments();
        if current.segment >= segments.len() {
            return false;
        }

        // `heading` already points along the motion when reversing
        let moving_sign = if self.speed < 0.0 { -1.0 } else { 1.0 };
        let travel_heading = self.heading;

        let mut best: Option<(usize, SegmentEnd, f32)> = None;
        for (index, segment) in segments.iter().enumerate() {
            if index == current.segment || segment.is_degenerate() {
                continue;
            }
            let (end, d) = segment.nearest_end(self.position);
            if d > config.switch_radius {
                continue;
            }
            let entry = entry_direction(segment, end, config.heading_sample);
            if entry.planar_length() <= f32::EPSILON {
                continue;
            }
            let turn = wrap_angle(heading_of(entry) - travel_heading);
            if turn.abs() > MAX_SWITCH_TURN {
                continue;
            }

            let better = match best {
                None => true,
                Some((_, _, best_turn)) => {
                    if preferred_sign > 0.0 {
                        turn > best_turn
                    } else if preferred_sign < 0.0 {
                        turn < best_turn
                    } else {
                        turn.abs() < best_turn.abs()
                    }
                }
            };
            if better {
                best = Some((index, end, turn));
            }
        }

        let Some((index, end, turn)) = best else {
            return false;
        };

        let into = if end == SegmentEnd::Start { 1.0 } else { -1.0 };
        self.direction = TravelDirection::from_sign(into * moving_sign);
        self.track_position = Some(TrackPosition {
            segment: index,
            t: end.t(),
        });
        self.apply_pose(&segments[index], end.t(), terrain, config);
        debug!(from = current.segment, to = index, turn, "vehicle switched track");
        true
    }
}

/// Planar direction pointing into `segment` from `end`
fn entry_direction(segment: &TrackSegment, end: SegmentEnd, sample: f32) -> Vec3 {
    let inner_t = match end {
        SegmentEnd::Start => sample,
        SegmentEnd::End => 1.0 - sample,
    };
    let d = segment.point_at(inner_t) - segment.endpoint(end);
    Vec3::new(d.x, 0.0, d.z).normalized()
}

/// The segment to continue onto when leaving `current` through `leaving`.
///
/// Candidates have an endpoint within planar `threshold` of the exit point;
/// the one whose entry direction best continues the exit direction wins. A
/// degenerate segment has no direction of its own, so `heading` stands in.
fn next_segment(
    segments: &[TrackSegment],
    current: usize,
    leaving: SegmentEnd,
    heading: Vec3,
    threshold: f32,
) -> Option<(usize, SegmentEnd)> {
    let seg = &segments[current];
    let exit_point = seg.endpoint(leaving);
    let exit_dir = if seg.is_degenerate() {
        heading
    } else {
        entry_direction(seg, leaving, 0.01) * -1.0
    };

    segments
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != current)
        .filter_map(|(i, s)| {
            let (end, d) = s.nearest_end(exit_point);
            (d <= threshold).then(|| {
                let alignment = exit_dir.dot(&entry_direction(s, end, 0.01));
                (i, end, alignment)
            })
        })
        .max_by(|a, b| a.2.total_cmp(&b.2).then(b.0.cmp(&a.0)))
        .map(|(i, end, _)| (i, end))
}
