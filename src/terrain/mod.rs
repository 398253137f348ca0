//! Terrain sources for filling freshly created chunks

pub mod heightmap;

pub use heightmap::{HeightmapTerrain, TerrainParams};

use crate::voxel::{ChunkCoord, ChunkData};

/// Injectable voxel fill invoked at chunk creation.
///
/// Returns false when the source has nothing for this chunk; the chunk then
/// stays empty until edited.
pub trait TerrainSource: Send + Sync {
    fn fill(&self, coord: ChunkCoord, data: &mut ChunkData) -> bool;
}

/// Uniform slab up to a fixed local height, for tests and demos
pub struct FlatTerrain {
    pub surface_height: i32,
    pub material: crate::voxel::VoxelMaterial,
}

impl TerrainSource for FlatTerrain {
    fn fill(&self, coord: ChunkCoord, data: &mut ChunkData) -> bool {
        if coord.z != 0 {
            return false;
        }
        let size = data.size();
        let top = self.surface_height.min(size.z);
        for z in 0..top {
            for y in 0..size.y {
                for x in 0..size.x {
                    data.set(x, y, z, crate::voxel::Voxel::new(self.material));
                }
            }
        }
        top > 0
    }
}
