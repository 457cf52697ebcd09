// src/error.rs
use stencil_jpath::JPathError;
use stencil_math::MathError;
use thiserror::Error;

/// Errors raised at the edges of the engine: reading files, decoding JSON and
/// parsing caller-supplied paths or expressions. Evaluation itself never fails.
#[derive(Error, Debug)]
pub enum StencilError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Dataset must be a JSON object, found {0}")]
    DatasetNotObject(&'static str),

    #[error("Invalid path: {0}")]
    Path(#[from] JPathError),

    #[error("Invalid arithmetic: {0}")]
    Math(#[from] MathError),

    #[error("Invalid override '{0}': {1}")]
    Override(String, String),
}
