//! bc-core: stable foundation for basin connectivity.
//!
//! Contains:
//! - ids (case-insensitive stream ids + compact arena ids)
//! - station (station/bank value types and the direction-aware ordering)
//! - units (uom-backed distance/elevation/area conversion)
//! - numeric (Real + tolerances + float helpers)
//! - error (shared error types)

pub mod error;
pub mod ids;
pub mod numeric;
pub mod station;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{BcError, BcResult};
pub use ids::*;
pub use numeric::*;
pub use station::*;
pub use units::*;
