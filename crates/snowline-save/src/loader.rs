//! Network loading from JSON files

use crate::format::{SaveFile, SegmentRecord};
use snowline_core::geometry::DEGENERATE_LENGTH;
use snowline_core::{NetworkConfig, Result, SnowlineError, WaypointId};
use snowline_track::{SegmentOrigin, TrackSegment, Waypoint, WAYPOINT_KINDS};
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// A recoverable problem found while loading. The load still succeeds.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadWarning {
    /// Waypoint `index` had a `type` outside the catalog; kind 0 was used
    UnknownWaypointKind { index: usize, kind: i64 },
    /// A segment referenced a waypoint index that does not exist; unbound
    InvalidWaypointIndex { segment: usize, index: i64 },
    /// A segment marked curved had no control point; loaded straight
    MissingControlPoint { segment: usize },
    /// A segment with coincident ends was dropped
    DegenerateSegment { segment: usize },
}

impl fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadWarning::UnknownWaypointKind { index, kind } => {
                write!(f, "waypoint {index}: unknown type {kind}, using {}", WAYPOINT_KINDS[0].name)
            }
            LoadWarning::InvalidWaypointIndex { segment, index } => {
                write!(f, "segment {segment}: waypoint index {index} out of range, binding dropped")
            }
            LoadWarning::MissingControlPoint { segment } => {
                write!(f, "segment {segment}: curved without a control point, loaded straight")
            }
            LoadWarning::DegenerateSegment { segment } => {
                write!(f, "segment {segment}: start and end coincide, skipped")
            }
        }
    }
}

/// Everything reconstructed from a save file.
///
/// Waypoint ids are assigned from array position starting at 1. Derived
/// state (bindings of manual segments, merges, crossings) is not computed.
#[derive(Debug, Clone)]
pub struct LoadedNetwork {
    pub version: String,
    pub timestamp: u64,
    pub waypoints: Vec<Waypoint>,
    pub segments: Vec<TrackSegment>,
    pub warnings: Vec<LoadWarning>,
}

impl LoadedNetwork {
    /// First id not used by a loaded waypoint
    pub fn next_id(&self) -> WaypointId {
        WaypointId(self.waypoints.len() as u32 + 1)
    }
}

/// Load a network from a JSON file
pub fn load<P: AsRef<Path>>(path: P, config: &NetworkConfig) -> Result<LoadedNetwork> {
    let content = fs::read_to_string(path)?;
    load_string(&content, config)
}

/// Load a network from a JSON string.
///
/// Fails on invalid JSON or a missing waypoint or segment array. Bad type
/// indices and bad waypoint references are repaired and reported as warnings.
pub fn load_string(content: &str, config: &NetworkConfig) -> Result<LoadedNetwork> {
    let file: SaveFile = serde_json::from_str(content)?;

    let records = file
        .waypoints
        .ok_or_else(|| SnowlineError::MalformedSaveData("missing waypoints array".into()))?;
    let segment_records = file
        .segments
        .ok_or_else(|| SnowlineError::MalformedSaveData("missing segments array".into()))?;

    let mut warnings = Vec::new();

    let waypoints: Vec<Waypoint> = records
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            let kind = match usize::try_from(record.kind) {
                Ok(k) if k < WAYPOINT_KINDS.len() => k,
                _ => {
                    warnings.push(LoadWarning::UnknownWaypointKind {
                        index,
                        kind: record.kind,
                    });
                    0
                }
            };
            Waypoint {
                id: WaypointId(index as u32 + 1),
                position: record.position,
                hole_position: record.hole_position,
                rotation: record.rotation,
                kind,
            }
        })
        .collect();

    let mut segments = Vec::with_capacity(segment_records.len());
    for (index, record) in segment_records.into_iter().enumerate() {
        if let Some(segment) = segment_from_record(index, record, &waypoints, config, &mut warnings) {
            segments.push(segment);
        }
    }

    for w in &warnings {
        warn!("{w}");
    }
    debug!(
        version = %file.version,
        waypoints = waypoints.len(),
        segments = segments.len(),
        warnings = warnings.len(),
        "network loaded"
    );

    Ok(LoadedNetwork {
        version: file.version,
        timestamp: file.timestamp,
        waypoints,
        segments,
        warnings,
    })
}

fn segment_from_record(
    index: usize,
    record: SegmentRecord,
    waypoints: &[Waypoint],
    config: &NetworkConfig,
    warnings: &mut Vec<LoadWarning>,
) -> Option<TrackSegment> {
    if record.start.distance(&record.end) < DEGENERATE_LENGTH {
        warnings.push(LoadWarning::DegenerateSegment { segment: index });
        return None;
    }

    let mut resolve = |reference: Option<i64>| {
        let raw = reference?;
        match usize::try_from(raw).ok().and_then(|i| waypoints.get(i)) {
            Some(w) => Some(w),
            None => {
                warnings.push(LoadWarning::InvalidWaypointIndex {
                    segment: index,
                    index: raw,
                });
                None
            }
        }
    };
    let from = resolve(record.from_index);
    let to = resolve(record.to_index);

    if record.curved && record.control.is_none() {
        warnings.push(LoadWarning::MissingControlPoint { segment: index });
    }

    let origin = match record.auto {
        Some(true) => SegmentOrigin::Auto,
        Some(false) => SegmentOrigin::Manual,
        None if from.is_some() && to.is_some() => SegmentOrigin::Auto,
        None => SegmentOrigin::Manual,
    };

    let radius = if record.radius > 0.0 {
        record.radius
    } else {
        [from, to]
            .into_iter()
            .flatten()
            .map(|w| w.kind_info().hole_radius)
            .fold(config.track_radius, f32::min)
    };

    // Bound ends sit on the waypoint's hole regardless of what was written
    let start = from.map_or(record.start, |w| w.connection_point());
    let end = to.map_or(record.end, |w| w.connection_point());
    if start.distance(&end) < DEGENERATE_LENGTH {
        warnings.push(LoadWarning::DegenerateSegment { segment: index });
        return None;
    }

    Some(
        TrackSegment::straight(start, end, radius, origin)
            .with_control(record.control)
            .with_bindings(from.map(|w| w.id), to.map(|w| w.id)),
    )
}
