//! Voxel data structures and operations

pub mod material;
pub mod chunk;

pub use material::{Voxel, VoxelMaterial};
pub use chunk::{ChunkCoord, ChunkData, ChunkSize, CHUNK_SIZE, VOXEL_SIZE, CHUNK_WORLD_SIZE};
