//! Session-stable waypoint identifiers

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies a placed waypoint for the lifetime of a session.
///
/// Ids come from a per-store counter and are never reused after removal, so
/// segment bindings stay unambiguous while waypoints come and go. Save files
/// refer to waypoints by array index instead.
#[derive(Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WaypointId(pub u32);

impl WaypointId {
    pub fn from_raw(id: u32) -> Self {
        Self(id)
    }

    pub fn raw(&self) -> u32 {
        self.0
    }

    /// The id following this one
    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Debug for WaypointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WaypointId({})", self.0)
    }
}

impl fmt::Display for WaypointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
