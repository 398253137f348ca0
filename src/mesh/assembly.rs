//! Quad-to-buffer assembly
//!
//! Turns merged quads into vertex/index buffers: corner placement from the
//! per-direction offset tables, vertex welding at a fixed sub-voxel
//! tolerance, UV tiling from world-space tangential coordinates, and
//! tangents from the UV gradient over the quad edges.

use std::collections::HashMap;

use glam::{Vec2, Vec3};

use super::data::MeshData;
use super::greedy::GreedyQuad;
use crate::voxel::VoxelMaterial;

/// Welding tolerance: positions are keyed at 1/100 of a voxel
const WELD_STEPS_PER_VOXEL: f32 = 100.0;

/// Default vertex color
const WHITE: [u8; 4] = [255, 255, 255, 255];

type WeldKey = (i32, i32, i32, VoxelMaterial);

fn weld_key(position: Vec3, voxel_size: f32, material: VoxelMaterial) -> WeldKey {
    let scaled = position / voxel_size * WELD_STEPS_PER_VOXEL;
    (
        scaled.x.round() as i32,
        scaled.y.round() as i32,
        scaled.z.round() as i32,
        material,
    )
}

/// Build mesh buffers from a quad list.
///
/// Vertices weld by rounded position within a material; quads of different
/// materials keep a seam. Triangle winding follows each face's configured
/// order. Quads are consumed in the order given, so a deterministic quad
/// list yields deterministic buffers.
pub fn build_mesh(quads: &[GreedyQuad], voxel_size: f32) -> MeshData {
    let mut mesh = MeshData::new();
    let mut welded: HashMap<WeldKey, u32> = HashMap::with_capacity(quads.len() * 2);

    for quad in quads {
        let base = quad.position.as_vec3() * voxel_size;
        let size_u = quad.width as f32 * voxel_size;
        let size_v = quad.height as f32 * voxel_size;
        let corners = quad.face.corner_offsets(voxel_size, size_u, size_v);
        let normal = quad.face.normal();
        let tangent = quad_tangent(&corners, quad.width as f32, quad.height as f32);

        let mut indices = [0u32; 4];
        for (slot, offset) in corners.iter().enumerate() {
            let position = base + *offset;
            let key = weld_key(position, voxel_size, quad.material);
            let idx = match welded.get(&key) {
                Some(&existing) => existing,
                None => {
                    let uv = tile_uv(quad.face.uv_source(position), voxel_size);
                    let idx = mesh.push_vertex(position, normal, uv, tangent, WHITE);
                    welded.insert(key, idx);
                    idx
                }
            };
            indices[slot] = idx;
        }

        let section = mesh.section_for(quad.material);
        let order: [usize; 6] = if quad.face.reversed_winding() {
            [0, 3, 1, 1, 3, 2]
        } else {
            [0, 1, 2, 0, 2, 3]
        };
        mesh.sections[section]
            .indices
            .extend(order.iter().map(|&i| indices[i]));
    }

    mesh
}

/// Per-voxel texture tiling: tangential world coordinates in voxel units,
/// wrapped into [0, 1)
fn tile_uv((tu, tv): (f32, f32), voxel_size: f32) -> Vec2 {
    Vec2::new(
        (tu / voxel_size).rem_euclid(1.0),
        (tv / voxel_size).rem_euclid(1.0),
    )
}

/// Tangent from the UV gradient across the quad's edge vectors.
///
/// The quad's corners span (du1, dv1) = (w, 0) and (du2, dv2) = (w, h) in
/// UV space, so the divisor is w * h. Quads always have positive extent, but
/// a zero divisor falls back to a zero tangent instead of dividing.
fn quad_tangent(corners: &[Vec3; 4], width: f32, height: f32) -> Vec3 {
    let edge1 = corners[1] - corners[0];
    let edge2 = corners[2] - corners[0];
    let duv1 = Vec2::new(width, 0.0);
    let duv2 = Vec2::new(width, height);
    let div = duv1.x * duv2.y - duv1.y * duv2.x;
    if div.abs() < f32::EPSILON {
        return Vec3::ZERO;
    }
    let tangent = (edge1 * duv2.y - edge2 * duv1.y) / div;
    if tangent.length_squared() < f32::EPSILON {
        Vec3::ZERO
    } else {
        tangent.normalize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::face::{ALL_FACES, Face};
    use glam::IVec3;

    fn quad(face: Face, position: IVec3, width: i32, height: i32, material: VoxelMaterial) -> GreedyQuad {
        GreedyQuad { position, width, height, face, material }
    }

    #[test]
    fn test_single_quad_buffers() {
        for face in ALL_FACES {
            let mesh = build_mesh(&[quad(face, IVec3::ZERO, 1, 1, VoxelMaterial::Stone)], 0.25);
            assert_eq!(mesh.vertex_count(), 4);
            assert_eq!(mesh.triangle_count(), 2);
            assert_eq!(mesh.sections.len(), 1);
            assert!(mesh.validate().is_ok());
            for normal in &mesh.normals {
                assert_eq!(*normal, face.normal());
            }
        }
    }

    #[test]
    fn test_adjacent_quads_weld_shared_edge() {
        // Two coplanar 1x1 top quads side by side share two corner positions
        let quads = [
            quad(Face::Top, IVec3::new(0, 0, 0), 1, 1, VoxelMaterial::Stone),
            quad(Face::Top, IVec3::new(1, 0, 0), 1, 1, VoxelMaterial::Stone),
        ];
        let mesh = build_mesh(&quads, 0.25);
        assert_eq!(mesh.vertex_count(), 6);
        assert_eq!(mesh.triangle_count(), 4);
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn test_material_seam_keeps_duplicates() {
        let quads = [
            quad(Face::Top, IVec3::new(0, 0, 0), 1, 1, VoxelMaterial::Stone),
            quad(Face::Top, IVec3::new(1, 0, 0), 1, 1, VoxelMaterial::Grass),
        ];
        let mesh = build_mesh(&quads, 0.25);
        // No welding across the material boundary
        assert_eq!(mesh.vertex_count(), 8);
        assert_eq!(mesh.sections.len(), 2);
        assert_eq!(mesh.sections[0].material, VoxelMaterial::Stone);
        assert_eq!(mesh.sections[1].material, VoxelMaterial::Grass);
    }

    #[test]
    fn test_merged_quad_scales_with_extent() {
        let mesh = build_mesh(&[quad(Face::Top, IVec3::ZERO, 4, 2, VoxelMaterial::Sand)], 0.25);
        assert_eq!(mesh.vertex_count(), 4);
        let max = mesh
            .positions
            .iter()
            .fold(Vec3::MIN, |acc, p| acc.max(*p));
        assert!((max.x - 1.0).abs() < 1e-6);
        assert!((max.y - 0.5).abs() < 1e-6);
        assert!((max.z - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_uvs_stay_in_unit_range() {
        let quads = [
            quad(Face::Right, IVec3::new(3, 5, 7), 2, 3, VoxelMaterial::Dirt),
            quad(Face::Back, IVec3::new(-4, -2, 0), 1, 1, VoxelMaterial::Dirt),
        ];
        let mesh = build_mesh(&quads, 0.25);
        for uv in &mesh.uvs {
            assert!(uv.x >= 0.0 && uv.x < 1.0, "uv.x = {}", uv.x);
            assert!(uv.y >= 0.0 && uv.y < 1.0, "uv.y = {}", uv.y);
        }
    }

    #[test]
    fn test_tangent_is_unit_or_zero() {
        for face in ALL_FACES {
            let mesh = build_mesh(&[quad(face, IVec3::ZERO, 3, 2, VoxelMaterial::Stone)], 0.25);
            for tangent in &mesh.tangents {
                let len = tangent.length();
                assert!(len < f32::EPSILON || (len - 1.0).abs() < 1e-4);
            }
        }
    }

    #[test]
    fn test_top_face_winding_reversed() {
        let regular = build_mesh(&[quad(Face::Front, IVec3::ZERO, 1, 1, VoxelMaterial::Stone)], 1.0);
        let reversed = build_mesh(&[quad(Face::Top, IVec3::ZERO, 1, 1, VoxelMaterial::Stone)], 1.0);
        assert_eq!(regular.sections[0].indices, vec![0, 1, 2, 0, 2, 3]);
        assert_eq!(reversed.sections[0].indices, vec![0, 3, 1, 1, 3, 2]);
    }

    #[test]
    fn test_deterministic_assembly() {
        let quads = [
            quad(Face::Top, IVec3::new(0, 0, 0), 2, 2, VoxelMaterial::Stone),
            quad(Face::Front, IVec3::new(0, 1, 0), 2, 1, VoxelMaterial::Grass),
            quad(Face::Left, IVec3::new(0, 0, 0), 1, 2, VoxelMaterial::Stone),
        ];
        let a = build_mesh(&quads, 0.25);
        let b = build_mesh(&quads, 0.25);
        assert_eq!(a.positions, b.positions);
        assert_eq!(a.indices_flat(), b.indices_flat());
    }
}
