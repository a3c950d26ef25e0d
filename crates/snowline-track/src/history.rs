//! Undo/redo for network editing

use snowline_core::WaypointId;

use crate::segment::TrackSegment;
use crate::waypoint::{Waypoint, WaypointStore};

/// Full copy of the editable state at one point in time
#[derive(Debug, Clone, PartialEq)]
pub struct EditSnapshot {
    pub waypoints: Vec<Waypoint>,
    pub segments: Vec<TrackSegment>,
    pub next_id: WaypointId,
    pub description: String,
}

impl EditSnapshot {
    pub fn capture(
        waypoints: &WaypointStore,
        segments: &[TrackSegment],
        description: impl Into<String>,
    ) -> Self {
        Self {
            waypoints: waypoints.as_slice().to_vec(),
            segments: segments.to_vec(),
            next_id: waypoints.next_id(),
            description: description.into(),
        }
    }
}

/// Linear undo/redo history with bounded depth.
///
/// The caller snapshots the state *before* each edit. Undo and redo take the
/// live state and hand back the one to restore.
#[derive(Debug, Clone)]
pub struct EditHistory {
    undo: Vec<EditSnapshot>,
    redo: Vec<EditSnapshot>,
    max_depth: usize,
}

impl Default for EditHistory {
    fn default() -> Self {
        Self::new(50)
    }
}

impl EditHistory {
    pub fn new(max_depth: usize) -> Self {
        Self {
            undo: Vec::new(),
            redo: Vec::new(),
            max_depth: max_depth.max(1),
        }
    }

    /// Record the pre-edit state. Clears redo.
    pub fn snapshot(&mut self, snapshot: EditSnapshot) {
        self.undo.push(snapshot);
        self.redo.clear();
        if self.undo.len() > self.max_depth {
            self.undo.remove(0);
        }
    }

    /// Step back. `current` moves onto the redo stack.
    pub fn undo(&mut self, current: EditSnapshot) -> Option<EditSnapshot> {
        let previous = self.undo.pop()?;
        self.redo.push(current);
        Some(previous)
    }

    /// Step forward. `current` moves onto the undo stack.
    pub fn redo(&mut self, current: EditSnapshot) -> Option<EditSnapshot> {
        let next = self.redo.pop()?;
        self.undo.push(current);
        Some(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_description(&self) -> Option<&str> {
        self.undo.last().map(|s| s.description.as_str())
    }

    pub fn redo_description(&self) -> Option<&str> {
        self.redo.last().map(|s| s.description.as_str())
    }

    /// Number of undoable steps
    pub fn len(&self) -> usize {
        self.undo.len()
    }

    pub fn is_empty(&self) -> bool {
        self.undo.is_empty()
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}
