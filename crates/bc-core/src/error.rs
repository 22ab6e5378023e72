use thiserror::Error;

pub type BcResult<T> = Result<T, BcError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BcError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Unit provided ({unit}) is not supported")]
    UnknownUnit { unit: String },

    #[error("Cannot convert {from} units to {to} units")]
    IncompatibleUnits { from: String, to: String },

    #[error(
        "Locations {first} and {second} on stream {stream} both round to station {station} after unit conversion"
    )]
    StationCollision {
        stream: String,
        first: String,
        second: String,
        station: f64,
    },

    #[error("Invariant violated: {what}")]
    Invariant { what: String },
}
