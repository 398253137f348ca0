//! Distance-based priority for mesh generation ordering

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use glam::Vec3;

use crate::voxel::ChunkCoord;

/// Priority of one chunk's pending work
#[derive(Clone, Copy, Debug)]
pub struct ChunkPriority {
    pub coord: ChunkCoord,
    /// Higher = served first
    pub priority: f32,
    /// Distance from the viewer to the chunk center
    pub distance: f32,
}

impl ChunkPriority {
    /// Derive priority from viewer distance: closer chunks serve first.
    ///
    /// `chunk_world_size` is the configured chunk extent, so distances match
    /// the grid the chunks actually occupy.
    pub fn from_viewer(coord: ChunkCoord, viewer_pos: Vec3, chunk_world_size: f32) -> Self {
        let distance = coord.distance_to_sized(viewer_pos, chunk_world_size);
        Self {
            coord,
            priority: 1.0 / (distance + 1.0),
            distance,
        }
    }
}

impl Eq for ChunkPriority {}

impl PartialEq for ChunkPriority {
    fn eq(&self, other: &Self) -> bool {
        self.coord == other.coord
    }
}

impl Ord for ChunkPriority {
    fn cmp(&self, other: &Self) -> Ordering {
        // total_cmp keeps NaN/infinity from breaking the heap order
        self.priority.total_cmp(&other.priority)
    }
}

impl PartialOrd for ChunkPriority {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Max-heap of pending chunk work, closest first
#[derive(Default)]
pub struct ChunkPriorityQueue {
    heap: BinaryHeap<ChunkPriority>,
}

impl ChunkPriorityQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, priority: ChunkPriority) {
        self.heap.push(priority);
    }

    pub fn pop(&mut self) -> Option<ChunkPriority> {
        self.heap.pop()
    }
}
