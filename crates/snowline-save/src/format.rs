//! Save file format definitions

use serde::{Deserialize, Serialize};
use snowline_core::Vec3;

/// Version string written to new save files
pub const SAVE_VERSION: &str = "1.0";

/// Root structure of a save file.
///
/// The two arrays are optional at the serde level so the loader can report a
/// missing one as malformed data rather than a generic parse failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveFile {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waypoints: Option<Vec<WaypointRecord>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segments: Option<Vec<SegmentRecord>>,
    /// Milliseconds since the Unix epoch
    #[serde(default)]
    pub timestamp: u64,
}

fn default_version() -> String {
    SAVE_VERSION.to_string()
}

impl SaveFile {
    pub fn new(waypoints: Vec<WaypointRecord>, segments: Vec<SegmentRecord>, timestamp: u64) -> Self {
        Self {
            version: default_version(),
            waypoints: Some(waypoints),
            segments: Some(segments),
            timestamp,
        }
    }
}

/// One placed waypoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaypointRecord {
    pub position: Vec3,
    pub hole_position: Vec3,
    #[serde(default)]
    pub rotation: f32,
    /// Written for other readers; the kind decides the real value on load
    #[serde(default)]
    pub hole_radius: f32,
    #[serde(default)]
    pub snowglobe_radius: f32,
    /// Signed so that corrupt negative values can be reported and clamped
    #[serde(rename = "type", default)]
    pub kind: i64,
}

/// One track segment. Waypoint references are indices into the waypoint array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentRecord {
    pub start: Vec3,
    pub end: Vec3,
    #[serde(default)]
    pub radius: f32,
    #[serde(default)]
    pub from_index: Option<i64>,
    #[serde(default)]
    pub to_index: Option<i64>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub curved: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control: Option<Vec3>,
    /// Absent in older files; inferred from the bindings when missing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto: Option<bool>,
}
