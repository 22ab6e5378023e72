//! Shared application service layer for basin connectivity.
//!
//! Centralizes basin file loading, basin lookup, graph construction and
//! graph reporting so the CLI stays a thin shell.

pub mod basin_service;
pub mod error;
pub mod hash;
pub mod summary;

// Re-export key types for convenience
pub use basin_service::{
    BasinSummary, build_all, build_graph, find_basin, list_basins, load_basin_file,
};
pub use error::{AppError, AppResult};
pub use hash::graph_fingerprint;
pub use summary::GraphSummary;
