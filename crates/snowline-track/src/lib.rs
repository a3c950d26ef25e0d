//! Snowline Track - The network of waypoints and track segments
//!
//! - `WaypointStore` - placed snowglobe waypoints with separation checks
//! - `TrackSegment` - straight or quadratic Bezier track between two points
//! - `TrackNetwork` - auto-connection, binding, endpoint merging and crossings
//! - `generate_random_waypoints` - seeded random map generation
//! - `EditHistory` - bounded undo/redo of waypoint and segment snapshots
//!
//! Rebuild order is fixed: auto-connect, bind manual segments to waypoints,
//! merge coincident endpoints, find crossings.

mod crossing;
mod generator;
mod history;
pub mod network;
mod segment;
mod waypoint;

pub use crossing::{find_crossings, Crossing};
pub use generator::generate_random_waypoints;
pub use history::{EditHistory, EditSnapshot};
pub use network::{ClosestSegment, TrackNetwork};
pub use segment::{SegmentEnd, SegmentOrigin, TrackSegment};
pub use waypoint::{Waypoint, WaypointKind, WaypointStore, WAYPOINT_KINDS};
