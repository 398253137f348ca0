//! Noise-based heightmap fill
//!
//! Illustrative fractal-noise terrain: a 2D FBM heightfield layered as
//! stone, dirt, and grass. Z is up.

use noise::{Fbm, MultiFractal, NoiseFn, Perlin};

use super::TerrainSource;
use crate::voxel::{ChunkCoord, ChunkData, VOXEL_SIZE, Voxel, VoxelMaterial};

/// Parameters controlling the heightmap
#[derive(Clone, Debug)]
pub struct TerrainParams {
    pub seed: u32,
    /// Horizontal noise scale in world units (larger = smoother)
    pub scale: f32,
    /// Maximum terrain height in world units
    pub height_scale: f32,
    pub octaves: u32,
    pub persistence: f32,
    pub lacunarity: f32,
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self {
            seed: 12345,
            scale: 24.0,
            height_scale: 12.0,
            octaves: 4,
            persistence: 0.5,
            lacunarity: 2.0,
        }
    }
}

/// FBM heightfield terrain source
pub struct HeightmapTerrain {
    params: TerrainParams,
    noise: Fbm<Perlin>,
}

impl HeightmapTerrain {
    pub fn new(params: TerrainParams) -> Self {
        let noise = Fbm::<Perlin>::new(params.seed)
            .set_octaves(params.octaves as usize)
            .set_persistence(params.persistence as f64)
            .set_lacunarity(params.lacunarity as f64);
        Self { params, noise }
    }

    pub fn params(&self) -> &TerrainParams {
        &self.params
    }

    /// Terrain surface height at a world (x, y) column
    pub fn height_at(&self, x: f32, y: f32) -> f32 {
        let nx = (x / self.params.scale) as f64;
        let ny = (y / self.params.scale) as f64;
        let value = self.noise.get([nx, ny]);
        (((value + 1.0) / 2.0) * self.params.height_scale as f64) as f32
    }

    fn material_for_depth(depth_below_surface: i32) -> VoxelMaterial {
        match depth_below_surface {
            0 => VoxelMaterial::Grass,
            1..=3 => VoxelMaterial::Dirt,
            _ => VoxelMaterial::Stone,
        }
    }
}

impl TerrainSource for HeightmapTerrain {
    fn fill(&self, coord: ChunkCoord, data: &mut ChunkData) -> bool {
        let size = data.size();
        // Origin derived from the chunk's own dimensions, not the default
        // compile-time extent
        let origin = glam::Vec3::new(
            coord.x as f32 * size.x as f32,
            coord.y as f32 * size.y as f32,
            coord.z as f32 * size.z as f32,
        ) * VOXEL_SIZE;
        let mut wrote = false;

        for y in 0..size.y {
            for x in 0..size.x {
                let wx = origin.x + (x as f32 + 0.5) * VOXEL_SIZE;
                let wy = origin.y + (y as f32 + 0.5) * VOXEL_SIZE;
                let surface = self.height_at(wx, wy);
                // Topmost solid voxel index in this column, world-wide
                let top = (surface / VOXEL_SIZE).floor() as i64;

                for z in 0..size.z {
                    let wz = coord.z as i64 * size.z as i64 + z as i64;
                    if wz > top {
                        break;
                    }
                    let depth = (top - wz) as i32;
                    data.set(x, y, z, Voxel::new(Self::material_for_depth(depth)));
                    wrote = true;
                }
            }
        }
        wrote
    }
}
