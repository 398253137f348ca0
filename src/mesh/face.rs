//! Voxel face directions and their axis assignments

use glam::{IVec3, Vec3};

/// One of the six axis-aligned voxel face directions
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Face {
    /// +Y
    Front = 0,
    /// -Y
    Back = 1,
    /// +X
    Right = 2,
    /// -X
    Left = 3,
    /// +Z
    Top = 4,
    /// -Z
    Bottom = 5,
}

/// All face directions, in mesh-generation order
pub const ALL_FACES: [Face; 6] = [
    Face::Front,
    Face::Back,
    Face::Right,
    Face::Left,
    Face::Top,
    Face::Bottom,
];

/// Face directions whose triangle winding is emitted reversed.
///
/// This matches the front-face convention of the default rendering backend
/// and is a configuration constant, not an algorithmic invariant: a
/// different backend may need a different table.
pub const WINDING_REVERSED: [bool; 6] = [false, false, false, false, true, false];

impl Face {
    /// Axis indices as (primary, u, v); 0 = X, 1 = Y, 2 = Z
    ///
    /// The primary axis is perpendicular to the face plane; U and V span it.
    pub fn axes(self) -> (usize, usize, usize) {
        match self {
            Face::Front | Face::Back => (1, 0, 2),
            Face::Right | Face::Left => (0, 1, 2),
            Face::Top | Face::Bottom => (2, 0, 1),
        }
    }

    /// Integer offset toward the neighbor this face looks at
    pub fn direction(self) -> IVec3 {
        match self {
            Face::Front => IVec3::new(0, 1, 0),
            Face::Back => IVec3::new(0, -1, 0),
            Face::Right => IVec3::new(1, 0, 0),
            Face::Left => IVec3::new(-1, 0, 0),
            Face::Top => IVec3::new(0, 0, 1),
            Face::Bottom => IVec3::new(0, 0, -1),
        }
    }

    /// Outward unit normal
    pub fn normal(self) -> Vec3 {
        self.direction().as_vec3()
    }

    /// Map 2D mask coordinates plus a slice index back to a voxel position
    pub fn mask_to_voxel(self, u: i32, v: i32, slice: i32) -> IVec3 {
        match self {
            Face::Front | Face::Back => IVec3::new(u, slice, v),
            Face::Right | Face::Left => IVec3::new(slice, u, v),
            Face::Top | Face::Bottom => IVec3::new(u, v, slice),
        }
    }

    /// Whether this direction uses the reversed index order
    pub fn reversed_winding(self) -> bool {
        WINDING_REVERSED[self as usize]
    }

    /// Corner positions of a quad on this face, relative to the base voxel
    ///
    /// `size_u` and `size_v` are the quad extents in world units along the
    /// face's U and V axes. The tables are enumerated per direction rather
    /// than derived from a formula so the corner order (and with it the
    /// outward winding) stays explicit.
    pub fn corner_offsets(self, voxel_size: f32, size_u: f32, size_v: f32) -> [Vec3; 4] {
        let s = voxel_size;
        match self {
            Face::Front => [
                Vec3::new(0.0, s, 0.0),
                Vec3::new(size_u, s, 0.0),
                Vec3::new(size_u, s, size_v),
                Vec3::new(0.0, s, size_v),
            ],
            Face::Back => [
                Vec3::new(size_u, 0.0, 0.0),
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(0.0, 0.0, size_v),
                Vec3::new(size_u, 0.0, size_v),
            ],
            Face::Right => [
                Vec3::new(s, size_u, 0.0),
                Vec3::new(s, 0.0, 0.0),
                Vec3::new(s, 0.0, size_v),
                Vec3::new(s, size_u, size_v),
            ],
            Face::Left => [
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(0.0, size_u, 0.0),
                Vec3::new(0.0, size_u, size_v),
                Vec3::new(0.0, 0.0, size_v),
            ],
            Face::Top => [
                Vec3::new(0.0, 0.0, s),
                Vec3::new(size_u, 0.0, s),
                Vec3::new(size_u, size_v, s),
                Vec3::new(0.0, size_v, s),
            ],
            Face::Bottom => [
                Vec3::new(0.0, size_v, 0.0),
                Vec3::new(size_u, size_v, 0.0),
                Vec3::new(size_u, 0.0, 0.0),
                Vec3::new(0.0, 0.0, 0.0),
            ],
        }
    }

    /// World-space tangential coordinates used for UV tiling on this face
    pub fn uv_source(self, pos: Vec3) -> (f32, f32) {
        match self {
            Face::Front | Face::Back => (pos.x, pos.z),
            Face::Right | Face::Left => (pos.y, pos.z),
            Face::Top | Face::Bottom => (pos.x, pos.y),
        }
    }
}
