//! Streaming world configuration

use serde::{Deserialize, Serialize};

use crate::voxel::{CHUNK_SIZE, ChunkSize, VOXEL_SIZE};

/// Tunables for the streaming controller.
///
/// Defaults match a desktop profile; constrained platforms shrink the chunk
/// size via the `small-chunks` feature and lower the memory budget here.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Voxels per chunk side
    pub chunk_size: i32,
    /// Horizontal streaming radius, in chunks
    pub view_distance_chunks: i32,
    /// Vertical streaming radius, in chunks
    pub vertical_range_chunks: i32,
    /// Chunks kept warm in the free pool
    pub pool_size: usize,
    /// Simultaneously in-flight mesh generations
    pub max_concurrent_generations: usize,
    /// New chunk activations per streaming tick
    pub max_chunks_per_tick: usize,
    /// Hard cap on resident chunks; creation returns unavailable beyond it
    pub max_active_chunks: usize,
    /// Resident memory budget in megabytes
    pub memory_budget_mb: usize,
    /// Seconds between streaming scans
    pub update_interval: f32,
    /// Seconds between memory budget checks
    pub memory_check_interval: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            chunk_size: CHUNK_SIZE as i32,
            view_distance_chunks: 4,
            vertical_range_chunks: 2,
            pool_size: 100,
            max_concurrent_generations: 4,
            max_chunks_per_tick: 5,
            max_active_chunks: 4096,
            memory_budget_mb: 512,
            update_interval: 0.1,
            memory_check_interval: 1.0,
        }
    }
}

impl WorldConfig {
    /// Chunk dimensions as a size value
    pub fn chunk_dimensions(&self) -> ChunkSize {
        ChunkSize::cubic(self.chunk_size)
    }

    /// World-space extent of one chunk side at this configuration
    pub fn chunk_world_size(&self) -> f32 {
        self.chunk_size as f32 * VOXEL_SIZE
    }

    /// Memory budget in bytes
    pub fn memory_budget_bytes(&self) -> usize {
        self.memory_budget_mb * 1024 * 1024
    }
}
