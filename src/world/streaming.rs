//! The streaming voxel world
//!
//! Owns the active chunk map, the free pool, and the mesh worker. A single
//! owning loop drives `update`; mesh generation runs on worker tasks and
//! results are applied here, never on the worker side.

use std::collections::HashMap;
use std::sync::Arc;

use glam::Vec3;

use super::chunk::{Chunk, ChunkState};
use super::config::WorldConfig;
use super::lod::lod_from_distance;
use super::pool::ChunkPool;
use super::priority::{ChunkPriority, ChunkPriorityQueue};
use super::stats::PerfMonitor;
use super::worker::{MeshJob, MeshResult, MeshWorker};
use crate::mesh::{GreedyMesher, MeshData, MeshStrategy};
use crate::terrain::TerrainSource;
use crate::voxel::{ChunkCoord, VOXEL_SIZE, Voxel};

/// Consumer of finished chunk meshes.
///
/// Owns upload to whatever renders the buffers; called once per completed
/// generation, on the owner's thread.
pub trait MeshSink {
    fn apply_mesh(&mut self, coord: ChunkCoord, mesh: &MeshData);
    /// An empty generation result clears whatever was shown for the chunk
    fn clear_mesh(&mut self, coord: ChunkCoord);
}

/// State transitions surfaced to collaborators, drained once per tick
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChunkEvent {
    Loaded(ChunkCoord),
    MeshReady {
        coord: ChunkCoord,
        vertices: usize,
        triangles: usize,
    },
    Unloaded(ChunkCoord),
    Evicted(ChunkCoord),
}

/// Streaming controller over a set of resident chunks
pub struct VoxelWorld {
    config: WorldConfig,
    chunks: HashMap<ChunkCoord, Chunk>,
    pool: ChunkPool,
    worker: MeshWorker,
    terrain: Option<Box<dyn TerrainSource>>,
    stats: PerfMonitor,
    events: Vec<ChunkEvent>,
    viewer_pos: Vec3,
    update_timer: f32,
    memory_timer: f32,
    /// Source of mesh job revisions; never reused, so a result from a
    /// previous incarnation of a coordinate can never match a fresh chunk
    revision_counter: u64,
}

impl VoxelWorld {
    /// Create a world meshing with the greedy strategy
    pub fn new(config: WorldConfig) -> Self {
        Self::with_strategy(config, Arc::new(GreedyMesher))
    }

    /// Create a world with a custom mesh strategy
    pub fn with_strategy(config: WorldConfig, strategy: Arc<dyn MeshStrategy>) -> Self {
        let worker = MeshWorker::new(strategy, config.max_concurrent_generations);
        let pool = ChunkPool::new(config.pool_size);
        Self {
            config,
            chunks: HashMap::new(),
            pool,
            worker,
            terrain: None,
            stats: PerfMonitor::new(),
            events: Vec::new(),
            viewer_pos: Vec3::ZERO,
            update_timer: 0.0,
            memory_timer: 0.0,
            revision_counter: 0,
        }
    }

    /// Install the voxel fill used when chunks are created
    pub fn set_terrain_source(&mut self, source: Box<dyn TerrainSource>) {
        self.terrain = Some(source);
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn stats(&self) -> &PerfMonitor {
        &self.stats
    }

    pub fn active_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn chunk(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.chunks.get(&coord)
    }

    /// Iterate over all resident chunks
    pub fn iter_chunks(&self) -> impl Iterator<Item = (&ChunkCoord, &Chunk)> {
        self.chunks.iter()
    }

    pub fn is_active(&self, coord: ChunkCoord) -> bool {
        self.chunks.contains_key(&coord)
    }

    /// Events accumulated since the last drain
    pub fn take_events(&mut self) -> Vec<ChunkEvent> {
        std::mem::take(&mut self.events)
    }

    /// Activate a chunk, reusing a pooled buffer when possible.
    ///
    /// Returns None when the resident cap is reached; the caller retries on
    /// a later tick.
    pub fn get_or_create(&mut self, coord: ChunkCoord) -> Option<&mut Chunk> {
        if !self.chunks.contains_key(&coord) {
            if self.chunks.len() >= self.config.max_active_chunks {
                log::warn!(
                    "chunk {:?} unavailable: {} resident chunks at cap",
                    coord,
                    self.chunks.len()
                );
                return None;
            }

            let mut data = self.pool.acquire(coord, self.config.chunk_dimensions());
            if let Some(source) = &self.terrain {
                // An empty fill still meshes once, producing a clear
                source.fill(coord, &mut data);
            }
            let mut chunk = Chunk::new(data);
            chunk.state = ChunkState::Generating;
            self.chunks.insert(coord, chunk);
            self.events.push(ChunkEvent::Loaded(coord));
            log::debug!("chunk {coord:?} activated");

            self.enqueue_mesh(coord);
        }
        self.chunks.get_mut(&coord)
    }

    /// Deactivate a chunk and return its buffer to the pool
    pub fn unload(&mut self, coord: ChunkCoord) -> bool {
        self.remove_chunk(coord, ChunkEvent::Unloaded(coord))
    }

    fn remove_chunk(&mut self, coord: ChunkCoord, event: ChunkEvent) -> bool {
        let Some(chunk) = self.chunks.remove(&coord) else {
            return false;
        };
        // A job still in flight delivers a result for a coordinate that is
        // no longer resident; process_results drops it as stale
        self.worker.cancel(coord);
        self.pool.release(chunk.data);
        self.events.push(event);
        log::debug!("chunk {coord:?} deactivated");
        true
    }

    /// Read a voxel at a world position; air when the chunk is not resident
    pub fn get_voxel(&self, pos: Vec3) -> Voxel {
        let (coord, x, y, z) = self.locate(pos);
        match self.chunks.get(&coord) {
            Some(chunk) => chunk.data.get(x, y, z),
            None => Voxel::EMPTY,
        }
    }

    /// Write a voxel at a world position.
    ///
    /// Returns false when the chunk is not resident. Edits re-enqueue the
    /// chunk's mesh, and edits on a chunk boundary also re-enqueue the
    /// neighbors sharing that boundary, since their face visibility depends
    /// on this cell.
    pub fn set_voxel(&mut self, pos: Vec3, voxel: Voxel) -> bool {
        let (coord, x, y, z) = self.locate(pos);
        let Some(chunk) = self.chunks.get_mut(&coord) else {
            return false;
        };
        if !chunk.data.in_bounds(x, y, z) {
            return false;
        }
        chunk.data.set(x, y, z, voxel);
        let size = chunk.size();
        self.regenerate(coord);

        let dx: &[i32] = if x == 0 { &[-1, 0] } else if x == size.x - 1 { &[0, 1] } else { &[0] };
        let dy: &[i32] = if y == 0 { &[-1, 0] } else if y == size.y - 1 { &[0, 1] } else { &[0] };
        let dz: &[i32] = if z == 0 { &[-1, 0] } else if z == size.z - 1 { &[0, 1] } else { &[0] };
        for &ox in dx {
            for &oy in dy {
                for &oz in dz {
                    if ox == 0 && oy == 0 && oz == 0 {
                        continue;
                    }
                    let neighbor = ChunkCoord::new(coord.x + ox, coord.y + oy, coord.z + oz);
                    if self.chunks.contains_key(&neighbor) {
                        self.regenerate(neighbor);
                    }
                }
            }
        }
        true
    }

    fn locate(&self, pos: Vec3) -> (ChunkCoord, i32, i32, i32) {
        let cw = self.config.chunk_world_size();
        let coord = ChunkCoord::from_world_pos_sized(pos, cw);
        let local = (pos - coord.world_origin_sized(cw)) / VOXEL_SIZE;
        (
            coord,
            local.x.floor() as i32,
            local.y.floor() as i32,
            local.z.floor() as i32,
        )
    }

    /// Advance streaming: apply finished meshes, scan around the viewer on
    /// the update interval, and check the memory budget on its own interval
    pub fn update(&mut self, dt: f32, viewer_pos: Vec3, sink: &mut dyn MeshSink) {
        self.viewer_pos = viewer_pos;

        for result in self.worker.poll_results() {
            self.apply_result(result, sink);
        }

        self.update_timer += dt;
        if self.update_timer >= self.config.update_interval {
            self.update_timer = 0.0;
            self.stream();
            self.requeue_dirty();
        }

        self.memory_timer += dt;
        if self.memory_timer >= self.config.memory_check_interval {
            self.memory_timer = 0.0;
            self.enforce_memory_budget();
        }
    }

    /// Align the active set with the viewer position
    fn stream(&mut self) {
        let cw = self.config.chunk_world_size();
        let center = ChunkCoord::from_world_pos_sized(self.viewer_pos, cw);
        let radius = self.config.view_distance_chunks;
        let vertical = self.config.vertical_range_chunks;

        let out_of_range: Vec<ChunkCoord> = self
            .chunks
            .keys()
            .filter(|c| {
                (c.x - center.x).abs() > radius
                    || (c.y - center.y).abs() > radius
                    || (c.z - center.z).abs() > vertical
            })
            .copied()
            .collect();
        for coord in out_of_range {
            self.unload(coord);
        }

        // Queue missing chunks closest-first and activate up to the per-tick
        // cap
        let mut wanted = ChunkPriorityQueue::new();
        for dx in -radius..=radius {
            for dy in -radius..=radius {
                for dz in -vertical..=vertical {
                    let coord = ChunkCoord::new(center.x + dx, center.y + dy, center.z + dz);
                    if !self.chunks.contains_key(&coord) {
                        wanted.push(ChunkPriority::from_viewer(coord, self.viewer_pos, cw));
                    }
                }
            }
        }
        let mut created = 0;
        while created < self.config.max_chunks_per_tick {
            let Some(next) = wanted.pop() else { break };
            if self.get_or_create(next.coord).is_none() {
                break;
            }
            created += 1;
        }
    }

    /// Re-enqueue chunks left dirty by edits or failed generations
    fn requeue_dirty(&mut self) {
        let dirty: Vec<ChunkCoord> = self
            .chunks
            .iter()
            .filter(|(_, c)| c.data.dirty && !c.generating)
            .map(|(coord, _)| *coord)
            .collect();
        for coord in dirty {
            self.enqueue_mesh(coord);
        }
    }

    /// Queue a mesh job for a chunk unless one is already in flight
    fn enqueue_mesh(&mut self, coord: ChunkCoord) {
        if self.worker.is_pending(coord) {
            return;
        }
        if !self.chunks.get(&coord).is_some_and(|c| !c.generating) {
            return;
        }

        let priority =
            ChunkPriority::from_viewer(coord, self.viewer_pos, self.config.chunk_world_size());
        self.revision_counter += 1;
        let revision = self.revision_counter;
        let Some(chunk) = self.chunks.get_mut(&coord) else {
            return;
        };
        chunk.revision = revision;
        chunk.generating = true;
        chunk.state = ChunkState::Meshing;
        chunk.lod = lod_from_distance(priority.distance);

        let job = MeshJob {
            coord,
            revision: chunk.revision,
            priority: priority.priority,
            data: chunk.data.clone(),
            voxel_size: VOXEL_SIZE,
        };
        // The snapshot carries the current voxels; edits after this point
        // re-mark the chunk dirty and requeue_dirty picks them up
        chunk.data.dirty = false;
        self.worker.request(job);
    }

    /// Invalidate any in-flight job for the chunk and queue a fresh one
    pub(crate) fn regenerate(&mut self, coord: ChunkCoord) {
        self.worker.cancel(coord);
        if let Some(chunk) = self.chunks.get_mut(&coord) {
            chunk.generating = false;
        }
        self.enqueue_mesh(coord);
    }

    fn apply_result(&mut self, result: MeshResult, sink: &mut dyn MeshSink) {
        match result {
            MeshResult::Built { coord, revision, mesh } => {
                match self.chunks.get_mut(&coord) {
                    Some(chunk) if chunk.revision == revision => {
                        if mesh.is_empty() {
                            sink.clear_mesh(coord);
                        } else {
                            sink.apply_mesh(coord, &mesh);
                        }
                        chunk.mesh_applied(mesh.vertex_count(), mesh.triangle_count());
                        self.stats.record_generation(
                            mesh.generation_time_ms,
                            mesh.vertex_count(),
                            mesh.triangle_count(),
                        );
                        self.events.push(ChunkEvent::MeshReady {
                            coord,
                            vertices: mesh.vertex_count(),
                            triangles: mesh.triangle_count(),
                        });
                    }
                    _ => {
                        // Evicted or re-enqueued while the job ran
                        self.stats.stale_results += 1;
                        log::debug!("discarding stale mesh for {coord:?} rev {revision}");
                    }
                }
            }
            MeshResult::Failed { coord, revision, error } => {
                self.stats.failed_generations += 1;
                log::warn!("mesh generation failed for {coord:?}: {error}");
                if let Some(chunk) = self.chunks.get_mut(&coord) {
                    if chunk.revision == revision {
                        // Leave the chunk dirty so requeue_dirty retries
                        chunk.generating = false;
                        chunk.data.dirty = true;
                    }
                }
            }
        }
    }

    /// Estimate resident memory and evict the farthest chunks while over
    /// budget.
    ///
    /// One batch of roughly the farthest 10% per check; subsequent checks
    /// keep trimming if still over.
    fn enforce_memory_budget(&mut self) {
        let total: usize = self.chunks.values().map(|c| c.estimated_bytes()).sum();
        self.stats.record_memory(total);
        if total <= self.config.memory_budget_bytes() || self.chunks.is_empty() {
            return;
        }

        let cw = self.config.chunk_world_size();
        let mut by_distance: Vec<(ChunkCoord, f32)> = self
            .chunks
            .keys()
            .map(|c| (*c, c.distance_to_sized(self.viewer_pos, cw)))
            .collect();
        by_distance.sort_by(|a, b| b.1.total_cmp(&a.1));

        let batch = (self.chunks.len() / 10).max(1);
        log::info!(
            "memory estimate {} MB over budget {} MB, evicting {} farthest chunks",
            total / (1024 * 1024),
            self.config.memory_budget_mb,
            batch
        );
        for (coord, _) in by_distance.into_iter().take(batch) {
            self.remove_chunk(coord, ChunkEvent::Evicted(coord));
            self.stats.chunks_evicted += 1;
        }
    }
}
