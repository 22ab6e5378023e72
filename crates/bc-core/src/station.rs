//! Station and bank value types.

use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};

use crate::error::BcError;
use crate::numeric::{Real, ensure_finite};

/// Distance along a stream, measured from station 0.
///
/// Equality is exact: two stations are the same only if their `f64` values
/// compare equal. Near-equal stations from upstream data produce distinct nodes.
#[derive(Clone, Copy, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct Station(Real);

impl Station {
    pub const ZERO: Station = Station(0.0);

    pub const fn new(value: Real) -> Self {
        Self(value)
    }

    /// Construct a station, rejecting NaN and infinities.
    pub fn finite(value: Real) -> Result<Self, BcError> {
        ensure_finite(value, "station").map(Self)
    }

    pub const fn value(self) -> Real {
        self.0
    }

    pub fn is_finite(self) -> bool {
        self.0.is_finite()
    }

    /// Direction-aware ordering of two stations on one stream.
    ///
    /// Streams that start downstream number their stations from the mouth, so
    /// their nodes run from the highest station to the lowest.
    pub fn ordering(a: Station, b: Station, starts_downstream: bool) -> Ordering {
        let ascending = a.0.partial_cmp(&b.0).unwrap_or_else(|| a.0.total_cmp(&b.0));
        if starts_downstream {
            ascending.reverse()
        } else {
            ascending
        }
    }

    /// Stations of the first (upstream) and last (downstream) ends of a stream.
    pub fn termini(length: Real, starts_downstream: bool) -> (Station, Station) {
        if starts_downstream {
            (Station(length), Station::ZERO)
        } else {
            (Station::ZERO, Station(length))
        }
    }
}

impl PartialEq for Station {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl PartialOrd for Station {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.0.partial_cmp(&other.0)
    }
}

impl Hash for Station {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // -0.0 == 0.0, so both must hash alike
        let v = if self.0 == 0.0 { 0.0 } else { self.0 };
        v.to_bits().hash(state);
    }
}

impl From<Real> for Station {
    fn from(value: Real) -> Self {
        Self(value)
    }
}

impl fmt::Debug for Station {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Station({:?})", self.0)
    }
}

impl fmt::Display for Station {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // `{:?}` keeps the trailing ".0" on whole numbers
        write!(f, "{:?}", self.0)
    }
}

/// Side of the stream a location sits on, looking downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Bank {
    #[cfg_attr(feature = "serde", serde(rename = "L", alias = "LEFT", alias = "l"))]
    Left,
    #[cfg_attr(feature = "serde", serde(rename = "R", alias = "RIGHT", alias = "r"))]
    Right,
}

impl Bank {
    pub fn code(self) -> &'static str {
        match self {
            Bank::Left => "L",
            Bank::Right => "R",
        }
    }

    pub fn parse(code: &str) -> Option<Bank> {
        match code.trim().to_ascii_uppercase().as_str() {
            "L" | "LEFT" => Some(Bank::Left),
            "R" | "RIGHT" => Some(Bank::Right),
            _ => None,
        }
    }
}

impl fmt::Display for Bank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
