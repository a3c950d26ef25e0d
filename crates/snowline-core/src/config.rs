//! Numeric tuning for the network, the vehicle and the edit history.
//!
//! Every section and every field falls back to its default, so a config file
//! only needs to name the values it overrides:
//!
//! ```toml
//! [network]
//! connection_distance = 10.0
//!
//! [vehicle]
//! max_speed = 8.0
//! ```

use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Thresholds used when deriving and editing the track network
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Waypoints closer than this are auto-connected
    pub connection_distance: f32,
    /// Minimum planar distance between two waypoints
    pub min_separation: f32,
    /// Auto segments at least this long are always curved
    pub curve_always_distance: f32,
    /// Auto segments between this and `curve_always_distance` may be curved
    pub curve_maybe_distance: f32,
    /// Probability of curving a segment inside the optional band
    pub curve_probability: f32,
    /// Control point offset range, as a fraction of chord length
    pub curve_offset_min: f32,
    pub curve_offset_max: f32,
    /// Control point offset of user-drawn curves, as a fraction of chord length
    pub manual_curve_offset: f32,
    /// Extra height of a curve control point above the terrain
    pub control_height_offset: f32,
    /// Height of the track above the terrain
    pub track_offset: f32,
    /// Half-width of a segment with no bound waypoint
    pub track_radius: f32,
    /// Freehand endpoints within this distance join existing structure
    pub snap_radius: f32,
    /// Manual endpoints within this distance bind to a waypoint
    pub bind_radius: f32,
    /// Segment endpoints within this distance are merged
    pub merge_radius: f32,
    /// Crossings are deduplicated on `round(coordinate * crossing_precision)`
    pub crossing_precision: f32,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            connection_distance: 8.0,
            min_separation: 3.0,
            curve_always_distance: 6.0,
            curve_maybe_distance: 4.0,
            curve_probability: 0.5,
            curve_offset_min: 0.10,
            curve_offset_max: 0.25,
            manual_curve_offset: 0.30,
            control_height_offset: 0.1,
            track_offset: 0.05,
            track_radius: 0.4,
            snap_radius: 1.5,
            bind_radius: 1.0,
            merge_radius: 0.5,
            crossing_precision: 100.0,
        }
    }
}

/// Vehicle motion model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleConfig {
    pub max_speed: f32,
    pub acceleration: f32,
    /// Speed used when there is no track to follow
    pub free_roam_speed: f32,
    /// Height of the vehicle above the terrain
    pub ride_height: f32,
    /// Segment endpoints closer than this are connected
    pub junction_threshold: f32,
    /// Branch detection radius for manual switching
    pub switch_radius: f32,
    /// Parameter step used to sample the path tangent
    pub heading_sample: f32,
}

impl Default for VehicleConfig {
    fn default() -> Self {
        Self {
            max_speed: 6.0,
            acceleration: 4.0,
            free_roam_speed: 4.0,
            ride_height: 0.2,
            junction_threshold: 0.5,
            switch_radius: 1.0,
            heading_sample: 0.01,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Oldest snapshots are evicted beyond this many
    pub max_depth: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self { max_depth: 50 }
    }
}

/// Caller-side snapping of placement positions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub enabled: bool,
    pub cell_size: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            cell_size: 1.0,
        }
    }
}

/// Top-level config file structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnowlineConfig {
    pub network: NetworkConfig,
    pub vehicle: VehicleConfig,
    pub history: HistoryConfig,
    pub grid: GridConfig,
}

impl SnowlineConfig {
    /// Parse a config from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load a config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}
