//! Pluggable mesh generation strategies

use std::time::Instant;

use super::assembly::build_mesh;
use super::data::MeshData;
use super::{greedy, naive};
use crate::voxel::ChunkData;

/// A complete chunk-to-mesh pipeline.
///
/// Strategies are interchangeable at the streaming layer, which lets LOD
/// levels or simplification passes slot in without touching chunk
/// bookkeeping.
pub trait MeshStrategy: Send + Sync {
    /// Short identifier for logs and stats
    fn name(&self) -> &'static str;

    /// Produce mesh buffers for a chunk at the given voxel scale
    fn build(&self, chunk: &ChunkData, voxel_size: f32) -> MeshData;
}

/// Production mesher: greedy rectangle merging
#[derive(Clone, Copy, Debug, Default)]
pub struct GreedyMesher;

impl MeshStrategy for GreedyMesher {
    fn name(&self) -> &'static str {
        "greedy"
    }

    fn build(&self, chunk: &ChunkData, voxel_size: f32) -> MeshData {
        let start = Instant::now();
        let quads = greedy::generate_quads(chunk);
        let mut mesh = build_mesh(&quads, voxel_size);
        mesh.generation_time_ms = start.elapsed().as_secs_f32() * 1000.0;
        mesh
    }
}

/// Reference mesher: one quad per visible face, no merging
#[derive(Clone, Copy, Debug, Default)]
pub struct NaiveMesher;

impl MeshStrategy for NaiveMesher {
    fn name(&self) -> &'static str {
        "naive"
    }

    fn build(&self, chunk: &ChunkData, voxel_size: f32) -> MeshData {
        let start = Instant::now();
        let quads = naive::naive_quads(chunk);
        let mut mesh = build_mesh(&quads, voxel_size);
        mesh.generation_time_ms = start.elapsed().as_secs_f32() * 1000.0;
        mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voxel::{ChunkCoord, ChunkSize, VOXEL_SIZE, Voxel, VoxelMaterial};

    fn solid_chunk(size: i32) -> ChunkData {
        let mut chunk = ChunkData::new(ChunkCoord::default(), ChunkSize::cubic(size));
        for z in 0..size {
            for y in 0..size {
                for x in 0..size {
                    chunk.set(x, y, z, Voxel::new(VoxelMaterial::Stone));
                }
            }
        }
        chunk
    }

    #[test]
    fn test_greedy_reduces_solid_chunk_to_twelve_triangles() {
        let chunk = solid_chunk(8);
        let mesh = GreedyMesher.build(&chunk, VOXEL_SIZE);
        assert_eq!(mesh.triangle_count(), 12);
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn test_naive_emits_unmerged_faces() {
        let chunk = solid_chunk(8);
        let mesh = NaiveMesher.build(&chunk, VOXEL_SIZE);
        // 6 directions x 8x8 boundary faces, 2 triangles each
        assert_eq!(mesh.triangle_count(), 6 * 64 * 2);
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn test_empty_chunk_builds_empty_mesh() {
        let chunk = ChunkData::new(ChunkCoord::default(), ChunkSize::cubic(8));
        let mesh = GreedyMesher.build(&chunk, VOXEL_SIZE);
        assert!(mesh.is_empty());
        assert_eq!(mesh.triangle_count(), 0);
    }

    #[test]
    fn test_generation_time_recorded() {
        let chunk = solid_chunk(4);
        let mesh = GreedyMesher.build(&chunk, VOXEL_SIZE);
        assert!(mesh.generation_time_ms >= 0.0);
    }
}
