//! The terrain-height collaborator.

/// Height of the ground at a planar coordinate.
///
/// Implementations must be pure for a given terrain state: the network and the
/// vehicle call this whenever they need a vertical coordinate and never cache
/// the result across a terrain change.
pub trait TerrainHeight {
    fn height_at(&self, x: f32, z: f32) -> f32;
}

impl<F> TerrainHeight for F
where
    F: Fn(f32, f32) -> f32,
{
    fn height_at(&self, x: f32, z: f32) -> f32 {
        self(x, z)
    }
}

/// Level ground at a constant height
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FlatTerrain {
    pub height: f32,
}

impl FlatTerrain {
    pub fn new(height: f32) -> Self {
        Self { height }
    }
}

impl TerrainHeight for FlatTerrain {
    fn height_at(&self, _x: f32, _z: f32) -> f32 {
        self.height
    }
}
