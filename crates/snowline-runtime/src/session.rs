//! The editing and driving session.
//!
//! `Session` owns every piece of mutable state: waypoints, the track network,
//! the vehicle, edit history and the random source. All edits go through it so
//! that each one is snapshotted before it happens and the derived network is
//! rebuilt after. Any network change detaches the vehicle, which re-acquires
//! the closest segment on its next tick.

use crate::clock::GameClock;
use crate::input::InputState;
use crate::locomotion::{MotionEvent, Vehicle};
use snowline_core::geometry::snap_to_grid;
use snowline_core::{Result, SnowlineConfig, TerrainHeight, TrackRng, Vec3, WaypointId};
use snowline_save::LoadWarning;
use snowline_track::network::seat_on_terrain;
use snowline_track::{
    generate_random_waypoints, EditHistory, EditSnapshot, TrackNetwork, TrackSegment, Waypoint,
    WaypointStore,
};
use std::path::Path;
use tracing::{debug, info};

pub struct Session<T: TerrainHeight> {
    config: SnowlineConfig,
    terrain: T,
    waypoints: WaypointStore,
    network: TrackNetwork,
    vehicle: Vehicle,
    history: EditHistory,
    rng: TrackRng,
    clock: GameClock,
}

impl<T: TerrainHeight> Session<T> {
    pub fn new(terrain: T, config: SnowlineConfig) -> Self {
        Self::with_rng(terrain, config, TrackRng::default())
    }

    pub fn with_seed(terrain: T, config: SnowlineConfig, seed: u64) -> Self {
        Self::with_rng(terrain, config, TrackRng::from_seed_u64(seed))
    }

    fn with_rng(terrain: T, config: SnowlineConfig, rng: TrackRng) -> Self {
        let history = EditHistory::new(config.history.max_depth);
        Self {
            config,
            terrain,
            waypoints: WaypointStore::new(),
            network: TrackNetwork::new(),
            vehicle: Vehicle::default(),
            history,
            rng,
            clock: GameClock::new(),
        }
    }

    pub fn config(&self) -> &SnowlineConfig {
        &self.config
    }

    pub fn terrain(&self) -> &T {
        &self.terrain
    }

    pub fn waypoints(&self) -> &WaypointStore {
        &self.waypoints
    }

    pub fn network(&self) -> &TrackNetwork {
        &self.network
    }

    pub fn vehicle(&self) -> &Vehicle {
        &self.vehicle
    }

    pub fn history(&self) -> &EditHistory {
        &self.history
    }

    pub fn clock(&self) -> &GameClock {
        &self.clock
    }

    /// Move the vehicle, detaching it from the track
    pub fn teleport_vehicle(&mut self, position: Vec3) {
        self.vehicle = Vehicle::new(position);
    }

    fn capture(&self, description: &str) -> EditSnapshot {
        EditSnapshot::capture(&self.waypoints, self.network.segments(), description)
    }

    fn rebuild(&mut self) {
        self.network
            .rebuild(&self.waypoints, &self.terrain, &self.config.network, &mut self.rng);
        self.vehicle.detach();
    }

    fn refresh(&mut self) {
        self.network.refresh(&self.waypoints, &self.config.network);
        self.vehicle.detach();
    }

    // --- Edits ---

    /// Place a waypoint, snapping to the grid when enabled.
    ///
    /// A rejected placement changes nothing and records no history.
    pub fn place_waypoint(&mut self, x: f32, z: f32, kind: usize, rotation: f32) -> Result<WaypointId> {
        let (x, z) = if self.config.grid.enabled {
            snap_to_grid(x, z, self.config.grid.cell_size)
        } else {
            (x, z)
        };

        let before = self.capture("place waypoint");
        let id = self
            .waypoints
            .place(x, z, kind, rotation, &self.terrain, &self.config.network)?;
        self.history.snapshot(before);
        self.rebuild();
        Ok(id)
    }

    pub fn remove_waypoint(&mut self, id: WaypointId) -> Result<Waypoint> {
        let before = self.capture("remove waypoint");
        let removed = self.waypoints.remove(id)?;
        self.history.snapshot(before);
        self.rebuild();
        Ok(removed)
    }

    /// Draw a segment. Only the planar position of `start` and `end` is
    /// used: both are seated at track height on the terrain and snap onto
    /// nearby structure, then the derived state is refreshed. Returns the new
    /// segment's index.
    pub fn add_manual_segment(
        &mut self,
        start: Vec3,
        end: Vec3,
        curved: bool,
        control: Option<Vec3>,
    ) -> Result<usize> {
        let snap = self.config.network.snap_radius;
        let start = seat_on_terrain(start, &self.terrain, &self.config.network);
        let end = seat_on_terrain(end, &self.terrain, &self.config.network);
        let start = self.network.snap_endpoint(start, true, &self.waypoints, snap);
        let end = self.network.snap_endpoint(end, false, &self.waypoints, snap);

        let before = self.capture("add segment");
        let index = self.network.add_manual_segment(
            start,
            end,
            curved,
            control,
            &self.terrain,
            &self.config.network,
        )?;
        self.history.snapshot(before);
        self.refresh();
        Ok(index)
    }

    pub fn remove_segment(&mut self, index: usize) -> Result<TrackSegment> {
        let before = self.capture("remove segment");
        let removed = self.network.remove_segment(index, &self.config.network)?;
        self.history.snapshot(before);
        self.vehicle.detach();
        Ok(removed)
    }

    /// Replace the map with up to `count` random waypoints inside
    /// `[-half_extent, half_extent]²`. Returns how many were placed.
    pub fn generate_random_network(&mut self, count: usize, half_extent: f32) -> usize {
        let before = self.capture("generate network");
        self.waypoints.clear();
        self.network = TrackNetwork::new();
        let placed = generate_random_waypoints(
            &mut self.waypoints,
            count,
            half_extent,
            &self.terrain,
            &self.config.network,
            &self.config.grid,
            &mut self.rng,
        );
        self.history.snapshot(before);
        self.rebuild();
        info!(placed, "random network generated");
        placed
    }

    /// Remove every waypoint and segment
    pub fn clear(&mut self) {
        let before = self.capture("clear");
        self.waypoints.clear();
        self.network = TrackNetwork::new();
        self.history.snapshot(before);
        self.vehicle.detach();
    }

    /// Swap the terrain, re-seating waypoints and manual track and
    /// regenerating auto segments. Not recorded in history; snapshots taken on
    /// the old terrain keep their heights.
    pub fn set_terrain(&mut self, terrain: T) {
        self.terrain = terrain;
        let offset = self.config.network.track_offset;
        let reseated: Vec<Waypoint> = self
            .waypoints
            .iter()
            .map(|w| {
                let ground = self.terrain.height_at(w.position.x, w.position.z);
                Waypoint {
                    position: w.position.with_y(ground),
                    hole_position: w.hole_position.with_y(ground + offset),
                    ..w.clone()
                }
            })
            .collect();
        let next_id = self.waypoints.next_id();
        self.waypoints.restore(reseated, next_id);
        self.network
            .reseat_manual_segments(&self.terrain, &self.config.network);
        self.rebuild();
    }

    // --- History ---

    pub fn undo(&mut self) -> bool {
        let current = self.capture("undo");
        match self.history.undo(current) {
            Some(snapshot) => {
                info!(edit = %snapshot.description, "undo");
                self.apply_snapshot(snapshot);
                true
            }
            None => {
                debug!("nothing to undo");
                false
            }
        }
    }

    pub fn redo(&mut self) -> bool {
        let current = self.capture("redo");
        match self.history.redo(current) {
            Some(snapshot) => {
                info!(edit = %snapshot.description, "redo");
                self.apply_snapshot(snapshot);
                true
            }
            None => {
                debug!("nothing to redo");
                false
            }
        }
    }

    /// Restore a snapshot exactly; only crossings are recomputed
    fn apply_snapshot(&mut self, snapshot: EditSnapshot) {
        self.waypoints.restore(snapshot.waypoints, snapshot.next_id);
        self.network.restore(snapshot.segments, &self.config.network);
        self.vehicle.detach();
    }

    // --- Driving ---

    /// Run one rendered frame: a pending switch request, then every whole
    /// fixed step the clock has accumulated.
    pub fn frame(&mut self, dt: f64, input: &InputState) -> Vec<MotionEvent> {
        if let Some(sign) = input.switch_request() {
            self.vehicle
                .switch_at_junction(sign, &self.network, &self.terrain, &self.config.vehicle);
        }

        self.clock.advance(dt);
        let step = self.clock.fixed_timestep as f32;
        let drive = input.drive_input();
        (0..self.clock.take_fixed_steps())
            .map(|_| {
                self.vehicle
                    .tick(step, drive, &self.network, &self.terrain, &self.config.vehicle)
            })
            .collect()
    }

    // --- Persistence ---

    pub fn save_string(&self) -> Result<String> {
        snowline_save::save_string(self.waypoints.as_slice(), self.network.segments())
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        snowline_save::save(path, self.waypoints.as_slice(), self.network.segments())
    }

    /// Replace the session state with a save file's contents.
    ///
    /// On failure the session is untouched. On success history is cleared and
    /// bind, merge and crossing passes run over the loaded segments.
    pub fn load_string(&mut self, content: &str) -> Result<Vec<LoadWarning>> {
        let loaded = snowline_save::load_string(content, &self.config.network)?;
        let next_id = loaded.next_id();
        self.waypoints.restore(loaded.waypoints, next_id);
        self.network.restore(loaded.segments, &self.config.network);
        self.network.refresh(&self.waypoints, &self.config.network);
        self.history.clear();
        self.vehicle.detach();
        info!(
            waypoints = self.waypoints.len(),
            segments = self.network.len(),
            warnings = loaded.warnings.len(),
            "session loaded"
        );
        Ok(loaded.warnings)
    }

    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<Vec<LoadWarning>> {
        let content = std::fs::read_to_string(path)?;
        self.load_string(&content)
    }
}
