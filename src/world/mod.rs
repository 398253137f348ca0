//! Chunk lifecycle, streaming, and memory management

pub mod config;
pub mod chunk;
pub mod pool;
pub mod priority;
pub mod lod;
pub mod stats;
pub mod worker;
pub mod streaming;

pub use config::WorldConfig;
pub use chunk::{Chunk, ChunkState};
pub use pool::ChunkPool;
pub use priority::{ChunkPriority, ChunkPriorityQueue};
pub use lod::{LOD_DISTANCES, MAX_LOD, lod_from_distance};
pub use stats::PerfMonitor;
pub use worker::{MeshJob, MeshResult, MeshWorker};
pub use streaming::{ChunkEvent, MeshSink, VoxelWorld};
