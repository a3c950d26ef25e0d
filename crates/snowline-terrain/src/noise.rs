//! Procedural rolling terrain

use fastnoise_lite::{FastNoiseLite, FractalType, NoiseType};
use serde::{Deserialize, Serialize};
use snowline_core::TerrainHeight;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseConfig {
    pub seed: i32,
    pub frequency: f32,
    /// Peak-to-valley height in world units
    pub amplitude: f32,
    pub octaves: i32,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            frequency: 0.02,
            amplitude: 4.0,
            octaves: 3,
        }
    }
}

/// OpenSimplex2 fractal noise mapped to `[0, amplitude]`
pub struct NoiseTerrain {
    noise: FastNoiseLite,
    pub config: NoiseConfig,
}

impl NoiseTerrain {
    pub fn new(config: NoiseConfig) -> Self {
        let mut noise = FastNoiseLite::with_seed(config.seed);
        noise.set_noise_type(Some(NoiseType::OpenSimplex2));
        noise.set_fractal_type(Some(FractalType::FBm));
        noise.set_fractal_octaves(Some(config.octaves));
        noise.set_frequency(Some(config.frequency));
        Self { noise, config }
    }
}

impl TerrainHeight for NoiseTerrain {
    fn height_at(&self, x: f32, z: f32) -> f32 {
        let raw = self.noise.get_noise_2d(x, z).clamp(-1.0, 1.0);
        (raw + 1.0) * 0.5 * self.config.amplitude
    }
}
