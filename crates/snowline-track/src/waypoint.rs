//! Placed waypoints and the store that owns them

use snowline_core::{NetworkConfig, Result, SnowlineError, TerrainHeight, Vec3, WaypointId};
use tracing::{debug, warn};

/// A snowglobe model. The hole is where track connects.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaypointKind {
    pub name: &'static str,
    pub hole_radius: f32,
    pub globe_radius: f32,
}

impl WaypointKind {
    /// Connection tolerance around the hole
    pub fn connection_radius(&self) -> f32 {
        self.hole_radius * 1.5
    }
}

/// The catalog of waypoint kinds. Index 0 is the fallback.
pub const WAYPOINT_KINDS: [WaypointKind; 4] = [
    WaypointKind {
        name: "classic",
        hole_radius: 0.6,
        globe_radius: 1.2,
    },
    WaypointKind {
        name: "cottage",
        hole_radius: 0.5,
        globe_radius: 1.0,
    },
    WaypointKind {
        name: "forest",
        hole_radius: 0.8,
        globe_radius: 1.6,
    },
    WaypointKind {
        name: "mini",
        hole_radius: 0.4,
        globe_radius: 0.8,
    },
];

/// A placed network node
#[derive(Debug, Clone, PartialEq)]
pub struct Waypoint {
    pub id: WaypointId,
    /// Base of the globe, on the terrain
    pub position: Vec3,
    /// Connection point track segments snap to
    pub hole_position: Vec3,
    /// Degrees around Y; cosmetic only
    pub rotation: f32,
    /// Index into [`WAYPOINT_KINDS`]
    pub kind: usize,
}

impl Waypoint {
    pub fn kind_info(&self) -> &'static WaypointKind {
        WAYPOINT_KINDS.get(self.kind).unwrap_or(&WAYPOINT_KINDS[0])
    }

    pub fn connection_point(&self) -> Vec3 {
        self.hole_position
    }

    pub fn connection_radius(&self) -> f32 {
        self.kind_info().connection_radius()
    }
}

/// Owns every placed waypoint, in placement order.
#[derive(Debug, Clone)]
pub struct WaypointStore {
    waypoints: Vec<Waypoint>,
    next_id: WaypointId,
}

impl Default for WaypointStore {
    fn default() -> Self {
        Self::new()
    }
}

impl WaypointStore {
    pub fn new() -> Self {
        Self {
            waypoints: Vec::new(),
            next_id: WaypointId(1),
        }
    }

    /// Place a waypoint at planar `(x, z)`.
    ///
    /// The height comes from `terrain`; the connection point sits
    /// `config.track_offset` above it. Fails with `InvalidPlacement` when an
    /// existing waypoint is closer than `config.min_separation`, in which case
    /// the store is unchanged. Grid snapping is the caller's job.
    pub fn place(
        &mut self,
        x: f32,
        z: f32,
        kind: usize,
        rotation: f32,
        terrain: &impl TerrainHeight,
        config: &NetworkConfig,
    ) -> Result<WaypointId> {
        let site = Vec3::new(x, 0.0, z);
        if let Some(nearest) = self
            .waypoints
            .iter()
            .find(|w| w.position.planar_distance(&site) < config.min_separation)
        {
            debug!(x, z, nearest = %nearest.id, "waypoint placement rejected");
            return Err(SnowlineError::InvalidPlacement {
                x,
                z,
                nearest: nearest.id,
                min_separation: config.min_separation,
            });
        }

        let kind = if kind < WAYPOINT_KINDS.len() {
            kind
        } else {
            warn!(kind, "unknown waypoint kind, using {}", WAYPOINT_KINDS[0].name);
            0
        };

        let ground = terrain.height_at(x, z);
        let id = self.next_id;
        self.next_id = id.next();
        self.waypoints.push(Waypoint {
            id,
            position: Vec3::new(x, ground, z),
            hole_position: Vec3::new(x, ground + config.track_offset, z),
            rotation,
            kind,
        });
        debug!(%id, x, z, kind, "waypoint placed");
        Ok(id)
    }

    pub fn remove(&mut self, id: WaypointId) -> Result<Waypoint> {
        let index = self
            .index_of(id)
            .ok_or(SnowlineError::WaypointNotFound(id))?;
        Ok(self.waypoints.remove(index))
    }

    pub fn get(&self, id: WaypointId) -> Option<&Waypoint> {
        self.waypoints.iter().find(|w| w.id == id)
    }

    pub fn index_of(&self, id: WaypointId) -> Option<usize> {
        self.waypoints.iter().position(|w| w.id == id)
    }


    pub fn iter(&self) -> impl Iterator<Item = &Waypoint> {
        self.waypoints.iter()
    }

    pub fn as_slice(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn next_id(&self) -> WaypointId {
        self.next_id
    }

    /// Replace all waypoints, e.g. from an edit snapshot
    pub fn restore(&mut self, waypoints: Vec<Waypoint>, next_id: WaypointId) {
        self.waypoints = waypoints;
        self.next_id = next_id;
        if let Some(max) = self.waypoints.iter().map(|w| w.id).max() {
            if max >= self.next_id {
                self.next_id = max.next();
            }
        }
    }

    pub fn clear(&mut self) {
        self.waypoints.clear();
    }
}
