//! Greedy quad merging
//!
//! For each of the six face directions the mesher walks the chunk slice by
//! slice, builds a 2D visibility mask, and merges runs of identical material
//! into maximal rectangles. The merge grows along U first, then extends along
//! V only by whole rows, so output is deterministic for identical input.

use glam::IVec3;
use rayon::prelude::*;

use super::face::{ALL_FACES, Face};
use crate::voxel::{ChunkData, Voxel, VoxelMaterial};

/// A merged rectangle of same-material faces
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GreedyQuad {
    /// Minimum-corner voxel position of the merged run
    pub position: IVec3,
    /// Extent in voxels along the face's U axis
    pub width: i32,
    /// Extent in voxels along the face's V axis
    pub height: i32,
    pub face: Face,
    pub material: VoxelMaterial,
}

impl GreedyQuad {
    /// Number of voxel faces this quad covers
    pub fn area(&self) -> i32 {
        self.width * self.height
    }
}

/// One cell of the per-slice visibility mask
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct MaskCell {
    material: VoxelMaterial,
    visible: bool,
}

/// Whether the face of the voxel at (x, y, z) toward `face` should render.
///
/// A face renders when its voxel is solid and the neighbor does not occlude
/// it: air neighbors and out-of-bounds neighbors never occlude, and a
/// transparent neighbor only occludes a voxel of the same material (two water
/// voxels share no interior wall, but stone under water still renders).
pub fn is_face_visible(chunk: &ChunkData, x: i32, y: i32, z: i32, face: Face) -> bool {
    let voxel = chunk.get(x, y, z);
    if voxel.is_empty() {
        return false;
    }
    let d = face.direction();
    neighbor_exposes(voxel, chunk.get(x + d.x, y + d.y, z + d.z))
}

#[inline]
fn neighbor_exposes(voxel: Voxel, neighbor: Voxel) -> bool {
    if neighbor.is_empty() {
        return true;
    }
    neighbor.is_transparent() && neighbor.material() != voxel.material()
}

/// Generate merged quads for every face direction of a chunk.
///
/// The six directions are independent, so they run on the rayon pool; results
/// are concatenated in fixed face order to keep output deterministic.
pub fn generate_quads(chunk: &ChunkData) -> Vec<GreedyQuad> {
    let per_face: Vec<Vec<GreedyQuad>> = ALL_FACES
        .par_iter()
        .map(|&face| quads_for_face(chunk, face))
        .collect();
    per_face.into_iter().flatten().collect()
}

fn quads_for_face(chunk: &ChunkData, face: Face) -> Vec<GreedyQuad> {
    let (primary, u_axis, v_axis) = face.axes();
    let size = chunk.size();
    let depth = size.axis(primary);
    let du = size.axis(u_axis);
    let dv = size.axis(v_axis);

    let mut quads = Vec::new();
    let mut mask = vec![MaskCell::default(); (du * dv) as usize];
    for slice in 0..depth {
        build_mask(chunk, face, slice, du, dv, &mut mask);
        extract_quads(&mut mask, face, slice, du, dv, &mut quads);
    }
    quads
}

fn build_mask(chunk: &ChunkData, face: Face, slice: i32, du: i32, dv: i32, mask: &mut [MaskCell]) {
    for v in 0..dv {
        for u in 0..du {
            let pos = face.mask_to_voxel(u, v, slice);
            let voxel = chunk.get(pos.x, pos.y, pos.z);
            let visible = voxel.is_solid() && {
                let d = face.direction();
                neighbor_exposes(voxel, chunk.get(pos.x + d.x, pos.y + d.y, pos.z + d.z))
            };
            mask[(u + v * du) as usize] = MaskCell {
                material: voxel.material(),
                visible,
            };
        }
    }
}

/// Consume the mask into maximal rectangles.
///
/// Scans V-outer, U-inner. Each rectangle first grows along U, then extends
/// along V one whole row at a time; covered cells are cleared so no face is
/// emitted twice.
fn extract_quads(
    mask: &mut [MaskCell],
    face: Face,
    slice: i32,
    du: i32,
    dv: i32,
    quads: &mut Vec<GreedyQuad>,
) {
    for v in 0..dv {
        let mut u = 0;
        while u < du {
            let cell = mask[(u + v * du) as usize];
            if !cell.visible {
                u += 1;
                continue;
            }

            let mut width = 1;
            while u + width < du {
                let next = mask[(u + width + v * du) as usize];
                if !next.visible || next.material != cell.material {
                    break;
                }
                width += 1;
            }

            let mut height = 1;
            'grow_v: while v + height < dv {
                for step in 0..width {
                    let row = mask[(u + step + (v + height) * du) as usize];
                    if !row.visible || row.material != cell.material {
                        break 'grow_v;
                    }
                }
                height += 1;
            }

            for dy in 0..height {
                for dx in 0..width {
                    mask[(u + dx + (v + dy) * du) as usize].visible = false;
                }
            }

            quads.push(GreedyQuad {
                position: face.mask_to_voxel(u, v, slice),
                width,
                height,
                face,
                material: cell.material,
            });
            u += width;
        }
    }
}
