//! Distance-based level-of-detail selection
//!
//! Four bands are defined but only level 0 has a dedicated mesh pipeline
//! today; higher levels run the same greedy pass and exist so simplification
//! strategies can slot in per band later.

use crate::voxel::CHUNK_WORLD_SIZE;

/// Upper distance bound of each LOD band, in world units
pub const LOD_DISTANCES: [f32; 4] = [
    CHUNK_WORLD_SIZE * 4.0,
    CHUNK_WORLD_SIZE * 8.0,
    CHUNK_WORLD_SIZE * 16.0,
    f32::MAX,
];

/// Maximum LOD level
pub const MAX_LOD: u32 = 3;

/// LOD level for a viewer distance
pub fn lod_from_distance(distance: f32) -> u32 {
    for (level, &max_dist) in LOD_DISTANCES.iter().enumerate() {
        if distance < max_dist {
            return level as u32;
        }
    }
    MAX_LOD
}
