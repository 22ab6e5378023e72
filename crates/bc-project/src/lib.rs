//! bc-project: canonical basin file format and validation.

pub mod schema;
pub mod units;
pub mod validate;

pub use schema::*;
pub use units::convert_basin_units;
pub use validate::{ValidationError, validate_basin, validate_basin_file};

/// Newest basin file version this crate reads and writes.
pub const LATEST_VERSION: u32 = 1;

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Unit conversion error: {0}")]
    Units(#[from] bc_core::BcError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn load_yaml(path: &std::path::Path) -> ProjectResult<BasinFile> {
    let content = std::fs::read_to_string(path)?;
    let file: BasinFile = serde_yaml::from_str(&content)?;
    validate_basin_file(&file)?;
    Ok(file)
}

pub fn save_yaml(path: &std::path::Path, file: &BasinFile) -> ProjectResult<()> {
    validate_basin_file(file)?;
    let content = serde_yaml::to_string(file)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &std::path::Path) -> ProjectResult<BasinFile> {
    let content = std::fs::read_to_string(path)?;
    let file: BasinFile = serde_json::from_str(&content)?;
    validate_basin_file(&file)?;
    Ok(file)
}

pub fn save_json(path: &std::path::Path, file: &BasinFile) -> ProjectResult<()> {
    validate_basin_file(file)?;
    let content = serde_json::to_string_pretty(file)?;
    std::fs::write(path, content)?;
    Ok(())
}
