//! Heightmap loading and sampling

use std::path::Path;

use snowline_core::{Result, SnowlineError};
use tracing::debug;

/// A grayscale heightmap with bilinear sampling
#[derive(Debug, Clone)]
pub struct Heightmap {
    /// Row-major height values normalized to [0..1]
    heights: Vec<f32>,
    /// Width in pixels
    pub width: u32,
    /// Depth (height) in pixels
    pub depth: u32,
}

impl Heightmap {
    /// Load a heightmap from a grayscale image file.
    /// Values are normalized to [0..1] regardless of bit depth.
    pub fn from_png(path: &Path) -> Result<Self> {
        let img = image::open(path).map_err(|e| {
            SnowlineError::Terrain(format!(
                "failed to load heightmap '{}': {}",
                path.display(),
                e
            ))
        })?;

        let gray = img.into_luma16();
        let width = gray.width();
        let depth = gray.height();

        let heights: Vec<f32> = gray
            .pixels()
            .map(|p| p.0[0] as f32 / 65535.0)
            .collect();

        debug!(path = %path.display(), width, depth, "loaded heightmap");
        Self::from_raw(heights, width, depth)
    }

    /// Create a heightmap from raw normalized samples
    pub fn from_raw(heights: Vec<f32>, width: u32, depth: u32) -> Result<Self> {
        if width < 2 || depth < 2 {
            return Err(SnowlineError::Terrain(format!(
                "heightmap must be at least 2x2, got {}x{}",
                width, depth
            )));
        }
        if heights.len() != (width * depth) as usize {
            return Err(SnowlineError::Terrain(format!(
                "heightmap has {} samples, expected {}x{}",
                heights.len(),
                width,
                depth
            )));
        }
        Ok(Self {
            heights,
            width,
            depth,
        })
    }

    /// Bilinear sample at normalized UV coordinates (0..1, 0..1).
    /// Returns interpolated height in [0..1].
    pub fn sample(&self, u: f32, v: f32) -> f32 {
        let u = u.clamp(0.0, 1.0);
        let v = v.clamp(0.0, 1.0);

        let fx = u * (self.width - 1) as f32;
        let fz = v * (self.depth - 1) as f32;

        let x0 = (fx as u32).min(self.width - 2);
        let z0 = (fz as u32).min(self.depth - 2);
        let x1 = x0 + 1;
        let z1 = z0 + 1;

        let tx = fx - x0 as f32;
        let tz = fz - z0 as f32;

        let h00 = self.get(x0, z0);
        let h10 = self.get(x1, z0);
        let h01 = self.get(x0, z1);
        let h11 = self.get(x1, z1);

        let h0 = h00 * (1.0 - tx) + h10 * tx;
        let h1 = h01 * (1.0 - tx) + h11 * tx;

        h0 * (1.0 - tz) + h1 * tz
    }

    fn get(&self, x: u32, z: u32) -> f32 {
        self.heights[(z * self.width + x) as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_mismatched_sample_count() {
        let err = Heightmap::from_raw(vec![0.0; 5], 2, 2).unwrap_err();
        assert!(matches!(err, SnowlineError::Terrain(_)));
    }

    #[test]
    fn rejects_single_row() {
        assert!(Heightmap::from_raw(vec![0.0; 4], 4, 1).is_err());
    }

    #[test]
    fn bilinear_between_samples() {
        let hm = Heightmap::from_raw(vec![0.0, 1.0, 0.0, 1.0], 2, 2).unwrap();
        assert!((hm.sample(0.25, 0.5) - 0.25).abs() < 1e-6);
        assert!((hm.sample(1.0, 0.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn missing_file_is_terrain_error() {
        let err = Heightmap::from_png(Path::new("/nonexistent/height.png")).unwrap_err();
        assert!(matches!(err, SnowlineError::Terrain(_)));
    }
}
