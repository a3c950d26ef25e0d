//! Network saving to JSON files

use crate::format::{SaveFile, SegmentRecord, WaypointRecord};
use snowline_core::{Result, WaypointId};
use snowline_track::{SegmentOrigin, TrackSegment, Waypoint};
use std::fs;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;

/// Save waypoints and segments to a file
pub fn save<P: AsRef<Path>>(path: P, waypoints: &[Waypoint], segments: &[TrackSegment]) -> Result<()> {
    let content = save_string(waypoints, segments)?;
    fs::write(path.as_ref(), content)?;
    debug!(path = %path.as_ref().display(), "network saved");
    Ok(())
}

/// Save waypoints and segments to a JSON string, stamped with the current time
pub fn save_string(waypoints: &[Waypoint], segments: &[TrackSegment]) -> Result<String> {
    let file = to_save_file(waypoints, segments, now_millis());
    Ok(serde_json::to_string_pretty(&file)?)
}

/// Convert live state to a save file.
///
/// Segment bindings become indices into `waypoints`; a binding to a waypoint
/// not in the slice is written as null.
pub fn to_save_file(waypoints: &[Waypoint], segments: &[TrackSegment], timestamp: u64) -> SaveFile {
    let index_of = |id: WaypointId| waypoints.iter().position(|w| w.id == id).map(|i| i as i64);

    let waypoint_records = waypoints
        .iter()
        .map(|w| {
            let kind = w.kind_info();
            WaypointRecord {
                position: w.position,
                hole_position: w.hole_position,
                rotation: w.rotation,
                hole_radius: kind.hole_radius,
                snowglobe_radius: kind.globe_radius,
                kind: w.kind as i64,
            }
        })
        .collect();

    let segment_records = segments
        .iter()
        .map(|s| SegmentRecord {
            start: s.start,
            end: s.end,
            radius: s.radius,
            from_index: s.from.and_then(index_of),
            to_index: s.to.and_then(index_of),
            curved: s.is_curved(),
            control: s.control,
            auto: Some(s.origin == SegmentOrigin::Auto),
        })
        .collect();

    SaveFile::new(waypoint_records, segment_records, timestamp)
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
