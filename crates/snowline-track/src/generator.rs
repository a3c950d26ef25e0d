//! Random waypoint layouts

use snowline_core::geometry::snap_to_grid;
use snowline_core::{GridConfig, NetworkConfig, TerrainHeight, TrackRng};
use tracing::debug;

use crate::waypoint::{WaypointStore, WAYPOINT_KINDS};

/// Attempts per requested waypoint before giving up on a crowded area
const ATTEMPTS_PER_WAYPOINT: usize = 20;

/// Scatter up to `count` waypoints over `[-half_extent, half_extent]²`.
///
/// Positions are grid-snapped when the grid is enabled; kinds and rotations
/// are random. Positions too close to an existing waypoint are retried a
/// bounded number of times, so fewer than `count` may be placed. Returns the
/// number placed. The network is not rebuilt.
pub fn generate_random_waypoints(
    store: &mut WaypointStore,
    count: usize,
    half_extent: f32,
    terrain: &impl TerrainHeight,
    network: &NetworkConfig,
    grid: &GridConfig,
    rng: &mut TrackRng,
) -> usize {
    let mut placed = 0;
    let mut attempts = 0;
    let max_attempts = count.saturating_mul(ATTEMPTS_PER_WAYPOINT);

    while placed < count && attempts < max_attempts {
        attempts += 1;
        let mut x = rng.range(-half_extent, half_extent);
        let mut z = rng.range(-half_extent, half_extent);
        if grid.enabled {
            (x, z) = snap_to_grid(x, z, grid.cell_size);
        }
        let kind = rng.index(WAYPOINT_KINDS.len());
        let rotation = rng.range(0.0, 360.0);

        if store.place(x, z, kind, rotation, terrain, network).is_ok() {
            placed += 1;
        }
    }

    debug!(requested = count, placed, attempts, "random waypoints generated");
    placed
}
