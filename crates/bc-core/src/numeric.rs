//! Float helpers for stations and converted quantities.

use crate::BcError;
use crate::units::DEFAULT_PRECISION;

/// Floating point type used throughout system
pub type Real = f64;

/// Absolute slack for calling two stations close.
///
/// Stations are published with a fixed number of decimal places, so the
/// useful slack is half a step in the last kept place.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StationTolerance {
    pub abs: Real,
}

impl StationTolerance {
    /// Half a unit in the last place at `precision` decimals.
    pub fn half_step(precision: i32) -> Self {
        Self {
            abs: 0.5 * 10.0_f64.powi(-precision),
        }
    }

    pub fn close(self, a: Real, b: Real) -> bool {
        (a - b).abs() <= self.abs
    }
}

impl Default for StationTolerance {
    fn default() -> Self {
        Self::half_step(DEFAULT_PRECISION)
    }
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, BcError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(BcError::NonFinite { what, value: v })
    }
}

/// Round to `precision` decimal places.
pub fn round_to(v: Real, precision: i32) -> Real {
    let factor = 10.0_f64.powi(precision);
    (v * factor).round() / factor
}
