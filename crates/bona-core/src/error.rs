//! Error types for the vision engine

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Engine-wide error type
#[derive(Debug, Error)]
pub enum Error {
    #[error("Unknown model category: {0}")]
    UnknownCategory(String),

    #[error("No image provided")]
    MissingImage,

    #[error("Failed to load model: {0}")]
    ModelLoadError(String),

    #[error("Inference failed: {0}")]
    InferenceError(String),

    #[error("Predicted output missing at {}", .0.display())]
    OutputMissing(PathBuf),

    #[error("Result not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
