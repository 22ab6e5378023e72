//! Basin file schema definitions.

use bc_core::{Bank, Station, StreamId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BasinFile {
    pub version: u32,
    #[serde(default)]
    pub basins: Vec<Basin>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Basin {
    pub name: String,
    pub office_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_basin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_drainage_area: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contributing_drainage_area: Option<f64>,
    /// Unit of the drainage areas (`mi2` or `km2`).
    #[serde(default = "default_area_unit")]
    pub area_unit: bc_core::Unit,
    /// Unit of stations and stream lengths (`mi` or `km`).
    #[serde(default = "default_station_unit")]
    pub station_unit: bc_core::Unit,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_stream: Option<Stream>,
}

fn default_area_unit() -> bc_core::Unit {
    bc_core::Unit::SquareMile
}

fn default_station_unit() -> bc_core::Unit {
    bc_core::Unit::Mile
}

impl Basin {
    pub fn new(name: impl Into<String>, office_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            office_id: office_id.into(),
            parent_basin: None,
            sort_order: None,
            total_drainage_area: None,
            contributing_drainage_area: None,
            area_unit: default_area_unit(),
            station_unit: default_station_unit(),
            primary_stream: None,
        }
    }

    pub fn with_primary_stream(mut self, stream: Stream) -> Self {
        self.primary_stream = Some(stream);
        self
    }

    /// Every stream in the basin, depth-first, primary stream first.
    pub fn streams(&self) -> impl Iterator<Item = &Stream> {
        self.primary_stream.iter().flat_map(Stream::walk)
    }
}

/// A stream with its surveyed locations, named reaches and tributaries.
///
/// The junction fields (`diverting_stream_id` .. `confluence_bank`) only carry
/// meaning when the stream is nested as a tributary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Stream {
    pub id: StreamId,
    #[serde(default)]
    pub office_id: String,
    /// Whether station 0 is the downstream end (the mouth).
    #[serde(default)]
    pub starts_downstream: bool,
    pub length: f64,
    #[serde(default)]
    pub locations: Vec<StreamLocation>,
    #[serde(default)]
    pub reaches: Vec<StreamReach>,
    #[serde(default)]
    pub tributaries: Vec<Stream>,
    /// Stream this one draws its flow from; may differ from the stream it is nested under.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diverting_stream_id: Option<StreamId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diversion_station: Option<Station>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diversion_bank: Option<Bank>,
    /// Station on the receiving stream where this stream flows in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confluence_station: Option<Station>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confluence_bank: Option<Bank>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_slope: Option<f64>,
}

impl Stream {
    pub fn new(id: impl Into<StreamId>, length: f64, starts_downstream: bool) -> Self {
        Self {
            id: id.into(),
            office_id: String::new(),
            starts_downstream,
            length,
            locations: Vec::new(),
            reaches: Vec::new(),
            tributaries: Vec::new(),
            diverting_stream_id: None,
            diversion_station: None,
            diversion_bank: None,
            confluence_station: None,
            confluence_bank: None,
            comment: None,
            average_slope: None,
        }
    }

    pub fn with_location(mut self, location: StreamLocation) -> Self {
        self.locations.push(location);
        self
    }

    pub fn with_reach(mut self, reach: StreamReach) -> Self {
        self.reaches.push(reach);
        self
    }

    pub fn with_tributary(mut self, tributary: Stream) -> Self {
        self.tributaries.push(tributary);
        self
    }

    /// Set where this stream joins its receiving stream.
    pub fn joins_at(mut self, station: f64, bank: Bank) -> Self {
        self.confluence_station = Some(Station::new(station));
        self.confluence_bank = Some(bank);
        self
    }

    /// Set the stream (and station on it) this stream diverts from.
    pub fn diverts_from(mut self, stream: impl Into<StreamId>, station: f64, bank: Bank) -> Self {
        self.diverting_stream_id = Some(stream.into());
        self.diversion_station = Some(Station::new(station));
        self.diversion_bank = Some(bank);
        self
    }

    /// Depth-first pre-order walk over this stream and all its descendants.
    pub fn walk(&self) -> StreamWalk<'_> {
        StreamWalk { stack: vec![self] }
    }
}

/// Iterator returned by [`Stream::walk`].
pub struct StreamWalk<'a> {
    stack: Vec<&'a Stream>,
}

impl<'a> Iterator for StreamWalk<'a> {
    type Item = &'a Stream;

    fn next(&mut self) -> Option<&'a Stream> {
        let stream = self.stack.pop()?;
        self.stack.extend(stream.tributaries.iter().rev());
        Some(stream)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StreamLocation {
    pub name: String,
    pub station: Station,
    pub bank: Bank,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_station: Option<Station>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub navigation_station: Option<Station>,
}

impl StreamLocation {
    pub fn new(name: impl Into<String>, station: f64, bank: Bank) -> Self {
        Self {
            name: name.into(),
            station: Station::new(station),
            bank,
            published_station: None,
            navigation_station: None,
        }
    }
}

/// A named span of a stream between two of its locations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StreamReach {
    pub id: String,
    pub upstream_location: String,
    pub downstream_location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configuration: Option<String>,
}

impl StreamReach {
    pub fn new(
        id: impl Into<String>,
        upstream_location: impl Into<String>,
        downstream_location: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            upstream_location: upstream_location.into(),
            downstream_location: downstream_location.into(),
            comment: None,
            configuration: None,
        }
    }
}
