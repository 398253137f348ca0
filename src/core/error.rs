//! Error types for the Voxterra engine

use thiserror::Error;

/// Main error type for the engine
#[derive(Debug, Error)]
pub enum Error {
    #[error("Voxel error: {0}")]
    Voxel(String),

    #[error("Mesh error: {0}")]
    Mesh(String),

    #[error("Streaming error: {0}")]
    Streaming(String),

    #[error("Template error: {0}")]
    Template(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
