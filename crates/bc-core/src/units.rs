// bc-core/src/units.rs

use core::fmt;

use uom::si::f64::{Area as UomArea, Length as UomLength};

use crate::error::{BcError, BcResult};
use crate::numeric::{Real, round_to};

pub type Area = UomArea;
pub type Length = UomLength;

/// Decimal places kept after a unit conversion.
pub const DEFAULT_PRECISION: i32 = 4;

/// Units that basin data is published in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Unit {
    #[cfg_attr(feature = "serde", serde(rename = "ft"))]
    Foot,
    #[cfg_attr(feature = "serde", serde(rename = "m"))]
    Meter,
    #[cfg_attr(feature = "serde", serde(rename = "mi"))]
    Mile,
    #[cfg_attr(feature = "serde", serde(rename = "km"))]
    Kilometer,
    #[cfg_attr(feature = "serde", serde(rename = "mi2"))]
    SquareMile,
    #[cfg_attr(feature = "serde", serde(rename = "km2"))]
    SquareKilometer,
}

/// Quantity a unit measures. Conversions never cross families.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitFamily {
    Elevation,
    Distance,
    Area,
}

impl fmt::Display for UnitFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            UnitFamily::Elevation => "elevation",
            UnitFamily::Distance => "distance",
            UnitFamily::Area => "area",
        };
        f.write_str(s)
    }
}

impl Unit {
    pub fn code(self) -> &'static str {
        match self {
            Unit::Foot => "ft",
            Unit::Meter => "m",
            Unit::Mile => "mi",
            Unit::Kilometer => "km",
            Unit::SquareMile => "mi2",
            Unit::SquareKilometer => "km2",
        }
    }

    /// Parse a unit code, ignoring case.
    pub fn parse(code: &str) -> BcResult<Unit> {
        match code.trim().to_ascii_lowercase().as_str() {
            "ft" => Ok(Unit::Foot),
            "m" => Ok(Unit::Meter),
            "mi" => Ok(Unit::Mile),
            "km" => Ok(Unit::Kilometer),
            "mi2" => Ok(Unit::SquareMile),
            "km2" => Ok(Unit::SquareKilometer),
            _ => Err(BcError::UnknownUnit {
                unit: code.to_string(),
            }),
        }
    }

    pub fn family(self) -> UnitFamily {
        match self {
            Unit::Foot | Unit::Meter => UnitFamily::Elevation,
            Unit::Mile | Unit::Kilometer => UnitFamily::Distance,
            Unit::SquareMile | Unit::SquareKilometer => UnitFamily::Area,
        }
    }

    fn length(self, v: Real) -> Option<Length> {
        use uom::si::length::{foot, kilometer, meter, mile};
        match self {
            Unit::Foot => Some(Length::new::<foot>(v)),
            Unit::Meter => Some(Length::new::<meter>(v)),
            Unit::Mile => Some(Length::new::<mile>(v)),
            Unit::Kilometer => Some(Length::new::<kilometer>(v)),
            Unit::SquareMile | Unit::SquareKilometer => None,
        }
    }

    fn length_value(self, l: Length) -> Option<Real> {
        use uom::si::length::{foot, kilometer, meter, mile};
        match self {
            Unit::Foot => Some(l.get::<foot>()),
            Unit::Meter => Some(l.get::<meter>()),
            Unit::Mile => Some(l.get::<mile>()),
            Unit::Kilometer => Some(l.get::<kilometer>()),
            Unit::SquareMile | Unit::SquareKilometer => None,
        }
    }

    fn area(self, v: Real) -> Option<Area> {
        use uom::si::area::{square_kilometer, square_mile};
        match self {
            Unit::SquareMile => Some(Area::new::<square_mile>(v)),
            Unit::SquareKilometer => Some(Area::new::<square_kilometer>(v)),
            _ => None,
        }
    }

    fn area_value(self, a: Area) -> Option<Real> {
        use uom::si::area::{square_kilometer, square_mile};
        match self {
            Unit::SquareMile => Some(a.get::<square_mile>()),
            Unit::SquareKilometer => Some(a.get::<square_kilometer>()),
            _ => None,
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Convert `value` between two units of the same family, rounding to `precision` places.
///
/// Converting a unit to itself returns the value untouched.
pub fn convert_with_precision(value: Real, from: Unit, to: Unit, precision: i32) -> BcResult<Real> {
    if from.family() != to.family() {
        return Err(BcError::IncompatibleUnits {
            from: format!("{} ({})", from.family(), from),
            to: format!("{} ({})", to.family(), to),
        });
    }
    if from == to {
        return Ok(value);
    }
    let converted = match from.family() {
        UnitFamily::Elevation | UnitFamily::Distance => from
            .length(value)
            .and_then(|l| to.length_value(l)),
        UnitFamily::Area => from.area(value).and_then(|a| to.area_value(a)),
    };
    converted
        .map(|v| round_to(v, precision))
        .ok_or_else(|| BcError::Invariant {
            what: format!("no conversion from {from} to {to}"),
        })
}

pub fn convert(value: Real, from: Unit, to: Unit) -> BcResult<Real> {
    convert_with_precision(value, from, to, DEFAULT_PRECISION)
}

/// Unit system a basin is requested in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UnitSystem {
    #[cfg_attr(feature = "serde", serde(rename = "EN", alias = "en"))]
    En,
    #[cfg_attr(feature = "serde", serde(rename = "SI", alias = "si"))]
    Si,
}

impl UnitSystem {
    pub fn parse(code: &str) -> BcResult<UnitSystem> {
        match code.trim().to_ascii_uppercase().as_str() {
            "EN" => Ok(UnitSystem::En),
            "SI" => Ok(UnitSystem::Si),
            _ => Err(BcError::UnknownUnit {
                unit: code.to_string(),
            }),
        }
    }

    pub fn distance(self) -> Unit {
        match self {
            UnitSystem::En => Unit::Mile,
            UnitSystem::Si => Unit::Kilometer,
        }
    }

    pub fn elevation(self) -> Unit {
        match self {
            UnitSystem::En => Unit::Foot,
            UnitSystem::Si => Unit::Meter,
        }
    }

    pub fn area(self) -> Unit {
        match self {
            UnitSystem::En => Unit::SquareMile,
            UnitSystem::Si => Unit::SquareKilometer,
        }
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitSystem::En => f.write_str("EN"),
            UnitSystem::Si => f.write_str("SI"),
        }
    }
}
