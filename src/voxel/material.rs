//! Voxel material type
//!
//! A voxel is a single byte: the material identifier. Material 0 is always
//! air - never rendered, never collides.

use bytemuck::{Pod, Zeroable};

/// Voxel material identifiers - supports up to 256 materials
#[repr(u8)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum VoxelMaterial {
    #[default]
    Air = 0,
    Grass = 1,
    Dirt = 2,
    Stone = 3,
    Wood = 4,
    Leaves = 5,
    Sand = 6,
    Water = 7,
    Snow = 8,
    Ice = 9,
}

impl VoxelMaterial {
    /// Decode a raw material id; unknown ids decode as air
    pub fn from_u8(id: u8) -> Self {
        match id {
            1 => Self::Grass,
            2 => Self::Dirt,
            3 => Self::Stone,
            4 => Self::Wood,
            5 => Self::Leaves,
            6 => Self::Sand,
            7 => Self::Water,
            8 => Self::Snow,
            9 => Self::Ice,
            _ => Self::Air,
        }
    }

    /// Check if this material is air
    pub fn is_air(self) -> bool {
        self == Self::Air
    }

    /// Check if this material occupies space
    pub fn is_solid(self) -> bool {
        self != Self::Air
    }

    /// Transparent materials render interior faces against differing neighbors
    pub fn is_transparent(self) -> bool {
        self == Self::Water || self == Self::Ice
    }
}

/// Single voxel - exactly 1 byte
#[repr(transparent)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct Voxel(u8);

impl Voxel {
    /// Empty/air voxel
    pub const EMPTY: Voxel = Voxel(0);

    /// Create a voxel of the given material
    pub fn new(material: VoxelMaterial) -> Self {
        Self(material as u8)
    }

    /// Get the material of this voxel
    pub fn material(self) -> VoxelMaterial {
        VoxelMaterial::from_u8(self.0)
    }

    /// Get the raw material id
    pub fn raw(self) -> u8 {
        self.0
    }

    /// Reconstruct a voxel from a raw material id
    pub fn from_raw(id: u8) -> Self {
        // Normalize unknown ids to air so raw round-trips stay canonical
        Self(VoxelMaterial::from_u8(id) as u8)
    }

    /// Check if voxel is empty (air)
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Check if voxel occupies space
    pub fn is_solid(self) -> bool {
        self.0 != 0
    }

    /// Check if voxel is transparent (water, ice)
    pub fn is_transparent(self) -> bool {
        self.material().is_transparent()
    }
}

impl From<VoxelMaterial> for Voxel {
    fn from(material: VoxelMaterial) -> Self {
        Self::new(material)
    }
}
