//! Per-chunk streaming state

use crate::mesh::data::{TRIANGLE_BYTES, VERTEX_BYTES};
use crate::voxel::{ChunkCoord, ChunkData, ChunkSize};

/// Fixed per-chunk bookkeeping overhead used in memory estimates
pub const CHUNK_OVERHEAD_BYTES: usize = 1024;

/// Lifecycle state of a streamed chunk
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ChunkState {
    /// Allocated but not yet filled
    #[default]
    Uninitialized,
    /// Voxel data being produced by the terrain source
    Generating,
    /// Mesh generation in flight or queued
    Meshing,
    /// Mesh applied, idle until edited or evicted
    Ready,
}

/// A resident chunk: voxel data plus streaming bookkeeping
pub struct Chunk {
    pub data: ChunkData,
    pub state: ChunkState,
    /// Detail level selected from viewer distance
    pub lod: u32,
    /// Revision of the latest enqueued mesh job, assigned from a world-level
    /// counter; results carrying any other revision are stale and dropped
    pub revision: u64,
    /// True while a mesh job for this chunk is queued or running
    pub generating: bool,
    /// Vertex count of the last applied mesh
    pub mesh_vertices: usize,
    /// Triangle count of the last applied mesh
    pub mesh_triangles: usize,
}

impl Chunk {
    pub fn new(data: ChunkData) -> Self {
        Self {
            data,
            state: ChunkState::Uninitialized,
            lod: 0,
            revision: 0,
            generating: false,
            mesh_vertices: 0,
            mesh_triangles: 0,
        }
    }

    pub fn coord(&self) -> ChunkCoord {
        self.data.position
    }

    pub fn size(&self) -> ChunkSize {
        self.data.size()
    }

    /// Estimated resident bytes: voxel buffer, applied mesh, bookkeeping
    pub fn estimated_bytes(&self) -> usize {
        CHUNK_OVERHEAD_BYTES
            + self.data.size().voxel_count()
            + self.mesh_vertices * VERTEX_BYTES
            + self.mesh_triangles * TRIANGLE_BYTES
    }

    /// Record an applied mesh and settle into the ready state.
    ///
    /// The dirty flag is owned by the enqueue path: it clears when a job
    /// snapshots the voxels, so an edit made while the job ran stays
    /// pending here and the next streaming tick requeues it.
    pub fn mesh_applied(&mut self, vertices: usize, triangles: usize) {
        self.mesh_vertices = vertices;
        self.mesh_triangles = triangles;
        self.state = ChunkState::Ready;
        self.generating = false;
        self.data.last_generated = Some(std::time::Instant::now());
    }
}
