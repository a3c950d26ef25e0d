//! Snowline Terrain - Ground height sources for the track network
//!
//! Every type here implements [`snowline_core::TerrainHeight`]; the network and
//! the vehicle only ever ask for `height_at(x, z)`. Mesh generation belongs to
//! the renderer and is not done here.

pub mod heightmap;
pub mod noise;
pub mod terrain;

pub use heightmap::Heightmap;
pub use noise::{NoiseConfig, NoiseTerrain};
pub use terrain::{HeightmapTerrain, TerrainConfig};
