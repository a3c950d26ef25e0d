//! Error types for Snowline

use crate::WaypointId;
use thiserror::Error;

/// The main error type for Snowline operations
#[derive(Debug, Error)]
pub enum SnowlineError {
    #[error(
        "Invalid placement at ({x}, {z}): {nearest} is closer than the minimum separation {min_separation}"
    )]
    InvalidPlacement {
        x: f32,
        z: f32,
        nearest: WaypointId,
        min_separation: f32,
    },

    #[error("Waypoint not found: {0}")]
    WaypointNotFound(WaypointId),

    #[error("Segment not found: {0}")]
    SegmentNotFound(usize),

    #[error("Degenerate segment: start and end coincide")]
    DegenerateSegment,

    #[error("Malformed save data: {0}")]
    MalformedSaveData(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(String),

    #[error("Terrain error: {0}")]
    Terrain(String),
}

/// Result type alias for Snowline operations
pub type Result<T> = std::result::Result<T, SnowlineError>;

impl From<toml::de::Error> for SnowlineError {
    fn from(err: toml::de::Error) -> Self {
        SnowlineError::ConfigParse(err.to_string())
    }
}
