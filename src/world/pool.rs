//! Chunk pooling
//!
//! Evicted chunks keep their voxel buffer allocated and return to a free
//! list, so steady-state streaming churns no allocations. The pool hands out
//! reset instances and falls back to fresh allocation when empty.

use crate::voxel::{ChunkCoord, ChunkData, ChunkSize};

/// Free list of reusable chunk buffers
pub struct ChunkPool {
    free: Vec<ChunkData>,
    capacity: usize,
}

impl ChunkPool {
    /// Create a pool that retains at most `capacity` free chunks
    pub fn new(capacity: usize) -> Self {
        Self {
            free: Vec::with_capacity(capacity.min(64)),
            capacity,
        }
    }

    /// Take a chunk for the given position, reusing a pooled buffer when one
    /// of the right size is available
    pub fn acquire(&mut self, position: ChunkCoord, size: ChunkSize) -> ChunkData {
        // Pooled buffers of a different size cannot be reused in place
        if let Some(idx) = self.free.iter().position(|c| c.size() == size) {
            let mut data = self.free.swap_remove(idx);
            data.reset(position);
            return data;
        }
        ChunkData::new(position, size)
    }

    /// Return a chunk's buffer to the free list
    ///
    /// Dropped outright when the pool is full.
    pub fn release(&mut self, mut data: ChunkData) {
        if self.free.len() < self.capacity {
            data.clear();
            self.free.push(data);
        }
    }

    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voxel::{Voxel, VoxelMaterial};

    #[test]
    fn test_acquire_from_empty_pool_allocates() {
        let mut pool = ChunkPool::new(4);
        let data = pool.acquire(ChunkCoord::new(1, 0, 0), ChunkSize::cubic(8));
        assert_eq!(data.position, ChunkCoord::new(1, 0, 0));
        assert_eq!(pool.free_count(), 0);
    }

    #[test]
    fn test_release_then_acquire_reuses() {
        let mut pool = ChunkPool::new(4);
        let mut data = pool.acquire(ChunkCoord::new(0, 0, 0), ChunkSize::cubic(8));
        data.set(1, 1, 1, Voxel::new(VoxelMaterial::Stone));
        pool.release(data);
        assert_eq!(pool.free_count(), 1);

        let reused = pool.acquire(ChunkCoord::new(5, 5, 5), ChunkSize::cubic(8));
        assert_eq!(pool.free_count(), 0);
        assert_eq!(reused.position, ChunkCoord::new(5, 5, 5));
        // Contents were wiped on reuse
        assert_eq!(reused.solid_count(), 0);
    }

    #[test]
    fn test_size_mismatch_allocates_fresh() {
        let mut pool = ChunkPool::new(4);
        pool.release(ChunkData::new(ChunkCoord::default(), ChunkSize::cubic(8)));

        let data = pool.acquire(ChunkCoord::default(), ChunkSize::cubic(16));
        assert_eq!(data.size(), ChunkSize::cubic(16));
        // The mismatched buffer stays pooled
        assert_eq!(pool.free_count(), 1);
    }

    #[test]
    fn test_full_pool_drops_release() {
        let mut pool = ChunkPool::new(1);
        pool.release(ChunkData::new(ChunkCoord::default(), ChunkSize::cubic(4)));
        pool.release(ChunkData::new(ChunkCoord::default(), ChunkSize::cubic(4)));
        assert_eq!(pool.free_count(), 1);
    }
}
