//! Mesh extraction from chunk voxel data

pub mod face;
pub mod data;
pub mod greedy;
pub mod naive;
pub mod assembly;
pub mod strategy;

pub use face::Face;
pub use data::{MeshData, MeshSection};
pub use greedy::{GreedyQuad, generate_quads, is_face_visible};
pub use strategy::{MeshStrategy, GreedyMesher, NaiveMesher};
