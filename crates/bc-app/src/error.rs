//! Error types for the bc-app service layer.

use std::path::PathBuf;

/// Application error type that wraps errors from the backend crates
/// and gives the CLI one error surface.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Failed to read basin file: {path}")]
    BasinFileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {path}")]
    FileWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Unsupported basin file extension: {path} (expected .yaml, .yml or .json)")]
    UnsupportedFormat { path: PathBuf },

    #[error("Basin file error: {0}")]
    Project(String),

    #[error("Basin not found: {0}")]
    BasinNotFound(String),

    #[error("Unit conversion failed: {0}")]
    Units(#[from] bc_core::BcError),

    #[error("Graph construction failed for basin {basin}: {source}")]
    Graph {
        basin: String,
        source: bc_graph::GraphError,
    },

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result type for bc-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl From<bc_project::ProjectError> for AppError {
    fn from(err: bc_project::ProjectError) -> Self {
        AppError::Project(err.to_string())
    }
}
