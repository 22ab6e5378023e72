//! Structural validation of basin files.
//!
//! This only guards the shape of the data (ids, references, finite numbers).
//! Whether stations, lengths and junctions make hydrologic sense is not checked.

use std::collections::HashSet;

use bc_core::{Station, StreamId, eq_ignore_case};

use crate::LATEST_VERSION;
use crate::schema::{Basin, BasinFile, Stream};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Duplicate ID: {id} in {context}")]
    DuplicateId { id: String, context: String },

    #[error("Missing reference: {id} in {context}")]
    MissingReference { id: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

pub fn validate_basin_file(file: &BasinFile) -> Result<(), ValidationError> {
    if file.version == 0 || file.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: file.version,
        });
    }

    let mut basin_names = HashSet::new();
    for basin in &file.basins {
        if !basin_names.insert(basin.name.to_lowercase()) {
            return Err(ValidationError::DuplicateId {
                id: basin.name.clone(),
                context: "basins".to_string(),
            });
        }
        validate_basin(basin)?;
    }

    Ok(())
}

pub fn validate_basin(basin: &Basin) -> Result<(), ValidationError> {
    require_name(&basin.name, "basin name")?;

    for (field, value) in [
        ("sort_order", basin.sort_order),
        ("total_drainage_area", basin.total_drainage_area),
        ("contributing_drainage_area", basin.contributing_drainage_area),
    ] {
        if let Some(v) = value {
            require_finite(&format!("basin {}.{}", basin.name, field), v)?;
        }
    }

    let mut stream_ids: HashSet<&StreamId> = HashSet::new();
    for stream in basin.streams() {
        if !stream_ids.insert(&stream.id) {
            return Err(ValidationError::DuplicateId {
                id: stream.id.to_string(),
                context: format!("streams of basin {}", basin.name),
            });
        }
        validate_stream(stream)?;
    }

    Ok(())
}

fn validate_stream(stream: &Stream) -> Result<(), ValidationError> {
    let sid = stream.id.as_str();
    require_name(sid, "stream id")?;
    require_finite(&format!("stream {sid}.length"), stream.length)?;
    if stream.length < 0.0 {
        return Err(ValidationError::InvalidValue {
            field: format!("stream {sid}.length"),
            value: stream.length.to_string(),
            reason: "must not be negative".to_string(),
        });
    }

    for (field, station) in [
        ("diversion_station", stream.diversion_station),
        ("confluence_station", stream.confluence_station),
    ] {
        if let Some(s) = station {
            require_station(&format!("stream {sid}.{field}"), s)?;
        }
    }
    if let Some(slope) = stream.average_slope {
        require_finite(&format!("stream {sid}.average_slope"), slope)?;
    }

    let mut location_names = HashSet::new();
    for location in &stream.locations {
        require_name(&location.name, "location name")?;
        if !location_names.insert(location.name.to_lowercase()) {
            return Err(ValidationError::DuplicateId {
                id: location.name.clone(),
                context: format!("locations of stream {sid}"),
            });
        }
        require_station(&format!("location {}.station", location.name), location.station)?;
        for s in [location.published_station, location.navigation_station]
            .into_iter()
            .flatten()
        {
            require_station(&format!("location {}", location.name), s)?;
        }
    }

    let mut reach_ids = HashSet::new();
    for reach in &stream.reaches {
        require_name(&reach.id, "reach id")?;
        if !reach_ids.insert(reach.id.to_lowercase()) {
            return Err(ValidationError::DuplicateId {
                id: reach.id.clone(),
                context: format!("reaches of stream {sid}"),
            });
        }
        for endpoint in [&reach.upstream_location, &reach.downstream_location] {
            let known = stream
                .locations
                .iter()
                .any(|l| eq_ignore_case(&l.name, endpoint));
            if !known {
                return Err(ValidationError::MissingReference {
                    id: endpoint.clone(),
                    context: format!("reach {} on stream {sid}", reach.id),
                });
            }
        }
    }

    Ok(())
}

fn require_name(name: &str, field: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            value: format!("{name:?}"),
            reason: "must not be empty".to_string(),
        });
    }
    Ok(())
}

fn require_finite(field: &str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
            reason: "must be finite".to_string(),
        });
    }
    Ok(())
}

fn require_station(field: &str, station: Station) -> Result<(), ValidationError> {
    require_finite(field, station.value())
}
