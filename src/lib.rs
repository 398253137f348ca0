//! Voxterra - a chunked voxel terrain engine with greedy meshing

pub mod core;
pub mod voxel;
pub mod mesh;
pub mod world;
pub mod terrain;
pub mod template;
