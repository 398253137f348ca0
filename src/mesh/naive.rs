//! Reference mesher emitting one quad per visible face
//!
//! No merging, so the output is easy to reason about. It feeds the same quad
//! assembly as the greedy path, which makes the two directly comparable:
//! they must cover exactly the same set of voxel faces.

use super::face::ALL_FACES;
use super::greedy::{GreedyQuad, is_face_visible};
use crate::voxel::ChunkData;

/// Emit a 1x1 quad for every visible face, in face-direction order
pub fn naive_quads(chunk: &ChunkData) -> Vec<GreedyQuad> {
    let size = chunk.size();
    let mut quads = Vec::new();
    for face in ALL_FACES {
        for z in 0..size.z {
            for y in 0..size.y {
                for x in 0..size.x {
                    if is_face_visible(chunk, x, y, z, face) {
                        quads.push(GreedyQuad {
                            position: glam::IVec3::new(x, y, z),
                            width: 1,
                            height: 1,
                            face,
                            material: chunk.get(x, y, z).material(),
                        });
                    }
                }
            }
        }
    }
    quads
}

/// Count visible faces without allocating quads
pub fn count_visible_faces(chunk: &ChunkData) -> usize {
    let size = chunk.size();
    let mut count = 0;
    for face in ALL_FACES {
        for z in 0..size.z {
            for y in 0..size.y {
                for x in 0..size.x {
                    if is_face_visible(chunk, x, y, z, face) {
                        count += 1;
                    }
                }
            }
        }
    }
    count
}
