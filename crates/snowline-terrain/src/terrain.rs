//! Height-map backed terrain in world units

use serde::{Deserialize, Serialize};
use snowline_core::TerrainHeight;

use crate::heightmap::Heightmap;

/// World extent of a height-map terrain
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TerrainConfig {
    /// World-space X extent
    pub width: f32,
    /// World-space Z extent
    pub depth: f32,
    /// Maximum Y height (heightmap 1.0 maps to this)
    pub height_scale: f32,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            width: 100.0,
            depth: 100.0,
            height_scale: 10.0,
        }
    }
}

/// A heightmap stretched over `[-width/2, width/2] x [-depth/2, depth/2]`.
///
/// Samples outside the extent clamp to the border.
#[derive(Debug, Clone)]
pub struct HeightmapTerrain {
    pub heightmap: Heightmap,
    pub config: TerrainConfig,
}

impl HeightmapTerrain {
    pub fn new(heightmap: Heightmap, config: TerrainConfig) -> Self {
        Self { heightmap, config }
    }
}

impl TerrainHeight for HeightmapTerrain {
    fn height_at(&self, x: f32, z: f32) -> f32 {
        let u = x / self.config.width + 0.5;
        let v = z / self.config.depth + 0.5;
        self.heightmap.sample(u, v) * self.config.height_scale
    }
}
