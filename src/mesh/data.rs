//! Assembled mesh buffers

use std::collections::HashMap;

use glam::{Vec2, Vec3};

use crate::core::Error;
use crate::voxel::VoxelMaterial;

/// Estimated GPU cost of one vertex (position, normal, uv, tangent, color)
pub const VERTEX_BYTES: usize = 32;
/// Estimated GPU cost of one triangle (three u32 indices)
pub const TRIANGLE_BYTES: usize = 12;

/// Index range for a single material
#[derive(Clone, Debug, Default)]
pub struct MeshSection {
    pub material: VoxelMaterial,
    pub indices: Vec<u32>,
}

impl MeshSection {
    pub fn new(material: VoxelMaterial) -> Self {
        Self {
            material,
            indices: Vec::new(),
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Renderable mesh output for one chunk.
///
/// Vertex attributes are parallel arrays sharing one index space; sections
/// partition the index buffer by material so each material can bind its own
/// pipeline state. Sections appear in first-encounter order, which keeps
/// output deterministic for identical input.
#[derive(Clone, Debug, Default)]
pub struct MeshData {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub tangents: Vec<Vec3>,
    pub colors: Vec<[u8; 4]>,
    pub sections: Vec<MeshSection>,
    /// Milliseconds spent producing this mesh, recorded by the strategy
    pub generation_time_ms: f32,
    section_lookup: HashMap<VoxelMaterial, usize>,
}

impl MeshData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all contents but keep the allocations for reuse
    pub fn clear(&mut self) {
        self.positions.clear();
        self.normals.clear();
        self.uvs.clear();
        self.tangents.clear();
        self.colors.clear();
        self.sections.clear();
        self.section_lookup.clear();
        self.generation_time_ms = 0.0;
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn index_count(&self) -> usize {
        self.sections.iter().map(|s| s.indices.len()).sum()
    }

    pub fn triangle_count(&self) -> usize {
        self.index_count() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Section index for a material, creating the section on first use
    pub fn section_for(&mut self, material: VoxelMaterial) -> usize {
        if let Some(&idx) = self.section_lookup.get(&material) {
            return idx;
        }
        let idx = self.sections.len();
        self.sections.push(MeshSection::new(material));
        self.section_lookup.insert(material, idx);
        idx
    }

    /// Section index for a material if one exists
    pub fn section_index(&self, material: VoxelMaterial) -> Option<usize> {
        self.section_lookup.get(&material).copied()
    }

    /// Append one vertex across all attribute arrays, returning its index
    pub fn push_vertex(
        &mut self,
        position: Vec3,
        normal: Vec3,
        uv: Vec2,
        tangent: Vec3,
        color: [u8; 4],
    ) -> u32 {
        let idx = self.positions.len() as u32;
        self.positions.push(position);
        self.normals.push(normal);
        self.uvs.push(uv);
        self.tangents.push(tangent);
        self.colors.push(color);
        idx
    }

    /// All indices concatenated across sections, for collision or debugging
    pub fn indices_flat(&self) -> Vec<u32> {
        let mut out = Vec::with_capacity(self.index_count());
        for section in &self.sections {
            out.extend_from_slice(&section.indices);
        }
        out
    }

    /// Estimated GPU memory footprint in bytes
    pub fn estimated_bytes(&self) -> usize {
        self.vertex_count() * VERTEX_BYTES + self.triangle_count() * TRIANGLE_BYTES
    }

    /// Check structural consistency: parallel attribute lengths, index
    /// triples, and every index referencing an existing vertex
    pub fn validate(&self) -> Result<(), Error> {
        let n = self.positions.len();
        if self.normals.len() != n
            || self.uvs.len() != n
            || self.tangents.len() != n
            || self.colors.len() != n
        {
            return Err(Error::Mesh(format!(
                "attribute arrays disagree: {} positions, {} normals, {} uvs, {} tangents, {} colors",
                n,
                self.normals.len(),
                self.uvs.len(),
                self.tangents.len(),
                self.colors.len()
            )));
        }
        for section in &self.sections {
            if section.indices.len() % 3 != 0 {
                return Err(Error::Mesh(format!(
                    "section {:?} has {} indices, not a multiple of 3",
                    section.material,
                    section.indices.len()
                )));
            }
            if let Some(&bad) = section.indices.iter().find(|&&i| i as usize >= n) {
                return Err(Error::Mesh(format!(
                    "section {:?} references vertex {} of {}",
                    section.material, bad, n
                )));
            }
        }
        Ok(())
    }
}
