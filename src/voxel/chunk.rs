//! Chunk system for managing cubic regions of voxel space

use super::material::Voxel;
use glam::Vec3;
use std::time::Instant;

/// Number of voxels per chunk side
#[cfg(not(feature = "small-chunks"))]
pub const CHUNK_SIZE: u32 = 32;

/// Number of voxels per chunk side (constrained platforms)
#[cfg(feature = "small-chunks")]
pub const CHUNK_SIZE: u32 = 16;

/// Size of a single voxel in world units (meters)
pub const VOXEL_SIZE: f32 = 0.25;

/// Size of a chunk in world units (meters)
pub const CHUNK_WORLD_SIZE: f32 = CHUNK_SIZE as f32 * VOXEL_SIZE;

/// Integer coordinate identifying a chunk in the world grid
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ChunkCoord {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl ChunkCoord {
    /// Create a new chunk coordinate
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Convert world position to chunk coordinate at the default chunk size
    pub fn from_world_pos(pos: Vec3) -> Self {
        Self::from_world_pos_sized(pos, CHUNK_WORLD_SIZE)
    }

    /// Convert world position to chunk coordinate for a given chunk extent
    ///
    /// The streaming layer passes its configured extent here; chunks
    /// allocated at a non-default size address the same grid their voxels
    /// live in.
    pub fn from_world_pos_sized(pos: Vec3, chunk_world_size: f32) -> Self {
        Self {
            x: (pos.x / chunk_world_size).floor() as i32,
            y: (pos.y / chunk_world_size).floor() as i32,
            z: (pos.z / chunk_world_size).floor() as i32,
        }
    }

    /// Get the world-space origin (minimum corner) of this chunk
    pub fn world_origin(&self) -> Vec3 {
        self.world_origin_sized(CHUNK_WORLD_SIZE)
    }

    /// World-space origin for a given chunk extent
    pub fn world_origin_sized(&self, chunk_world_size: f32) -> Vec3 {
        Vec3::new(
            self.x as f32 * chunk_world_size,
            self.y as f32 * chunk_world_size,
            self.z as f32 * chunk_world_size,
        )
    }

    /// Get the world-space center of this chunk
    pub fn world_center(&self) -> Vec3 {
        self.world_center_sized(CHUNK_WORLD_SIZE)
    }

    /// World-space center for a given chunk extent
    pub fn world_center_sized(&self, chunk_world_size: f32) -> Vec3 {
        self.world_origin_sized(chunk_world_size) + Vec3::splat(chunk_world_size * 0.5)
    }

    /// Distance from the chunk center to a world position
    pub fn distance_to(&self, pos: Vec3) -> f32 {
        self.distance_to_sized(pos, CHUNK_WORLD_SIZE)
    }

    /// Distance from the chunk center to a world position, for a given
    /// chunk extent
    pub fn distance_to_sized(&self, pos: Vec3, chunk_world_size: f32) -> f32 {
        self.world_center_sized(chunk_world_size).distance(pos)
    }

    /// All 26 neighboring chunk coordinates (faces, edges, corners)
    pub fn neighborhood(&self) -> impl Iterator<Item = ChunkCoord> + '_ {
        let center = *self;
        (-1..=1).flat_map(move |dx| {
            (-1..=1).flat_map(move |dy| {
                (-1..=1).filter_map(move |dz| {
                    if dx == 0 && dy == 0 && dz == 0 {
                        None
                    } else {
                        Some(ChunkCoord::new(center.x + dx, center.y + dy, center.z + dz))
                    }
                })
            })
        })
    }
}

/// Per-axis chunk dimensions
///
/// Cubic and power-of-two in practice, but the data model keeps the axes
/// separate so non-cubic grids keep working.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChunkSize {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl ChunkSize {
    /// Create a cubic chunk size
    pub fn cubic(size: i32) -> Self {
        Self { x: size, y: size, z: size }
    }

    /// Total number of voxels in a chunk of this size
    pub fn voxel_count(&self) -> usize {
        (self.x * self.y * self.z) as usize
    }

    /// Extent along an axis index (0 = X, 1 = Y, 2 = Z)
    pub fn axis(&self, axis: usize) -> i32 {
        match axis {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }
}

impl Default for ChunkSize {
    fn default() -> Self {
        Self::cubic(CHUNK_SIZE as i32)
    }
}

/// Voxel grid for a single chunk
///
/// Flat-indexed as `x + y * size.x + z * size.x * size.y`. Out-of-bounds
/// reads return air and out-of-bounds writes are ignored, which keeps
/// face-visibility checks branch-free at chunk edges.
#[derive(Clone)]
pub struct ChunkData {
    voxels: Vec<Voxel>,
    size: ChunkSize,
    /// Position of this chunk in the chunk grid (not world units)
    pub position: ChunkCoord,
    /// Whether voxel data changed since the last mesh generation
    pub dirty: bool,
    /// When the mesh was last generated from this data
    pub last_generated: Option<Instant>,
}

impl ChunkData {
    /// Create a new chunk filled with air
    pub fn new(position: ChunkCoord, size: ChunkSize) -> Self {
        Self {
            voxels: vec![Voxel::EMPTY; size.voxel_count()],
            size,
            position,
            dirty: true,
            last_generated: None,
        }
    }

    /// Chunk dimensions
    pub fn size(&self) -> ChunkSize {
        self.size
    }

    /// Flat index for an in-bounds position
    #[inline]
    pub fn index(&self, x: i32, y: i32, z: i32) -> usize {
        (x + y * self.size.x + z * self.size.x * self.size.y) as usize
    }

    /// Check whether a position is inside the grid
    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32, z: i32) -> bool {
        x >= 0 && x < self.size.x && y >= 0 && y < self.size.y && z >= 0 && z < self.size.z
    }

    /// Get the voxel at a local position; out of bounds reads as air
    #[inline]
    pub fn get(&self, x: i32, y: i32, z: i32) -> Voxel {
        if self.in_bounds(x, y, z) {
            self.voxels[self.index(x, y, z)]
        } else {
            Voxel::EMPTY
        }
    }

    /// Set the voxel at a local position and mark the chunk dirty
    ///
    /// Writes outside the grid are silently ignored.
    #[inline]
    pub fn set(&mut self, x: i32, y: i32, z: i32, voxel: Voxel) {
        if self.in_bounds(x, y, z) {
            let idx = self.index(x, y, z);
            self.voxels[idx] = voxel;
            self.dirty = true;
        }
    }

    /// Reset every voxel to air, keeping the buffer allocated
    pub fn clear(&mut self) {
        self.voxels.fill(Voxel::EMPTY);
        self.dirty = true;
    }

    /// Reassign this chunk to a new grid position, clearing its contents
    ///
    /// Used when a pooled chunk is reused: the voxel buffer is overwritten,
    /// not reallocated.
    pub fn reset(&mut self, position: ChunkCoord) {
        self.position = position;
        self.last_generated = None;
        self.clear();
    }

    /// Raw voxel buffer, for serialization
    pub fn voxels(&self) -> &[Voxel] {
        &self.voxels
    }

    /// Overwrite the voxel buffer from raw bytes
    ///
    /// Returns an error if the byte count does not match the grid size.
    pub fn load_bytes(&mut self, bytes: &[u8]) -> Result<(), crate::core::Error> {
        if bytes.len() != self.voxels.len() {
            return Err(crate::core::Error::Voxel(format!(
                "voxel buffer size mismatch: expected {}, got {}",
                self.voxels.len(),
                bytes.len()
            )));
        }
        for (voxel, &byte) in self.voxels.iter_mut().zip(bytes) {
            *voxel = Voxel::from_raw(byte);
        }
        self.dirty = true;
        Ok(())
    }

    /// Count solid voxels (diagnostics and tests)
    pub fn solid_count(&self) -> usize {
        self.voxels.iter().filter(|v| v.is_solid()).count()
    }
}
