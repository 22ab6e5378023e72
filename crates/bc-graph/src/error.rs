//! Graph-specific error types.

use bc_core::{Station, StreamId};
use thiserror::Error;

pub type GraphResult<T> = Result<T, GraphError>;

/// Graph construction and validation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    /// Two distinct locations on one stream share a station.
    #[error("Stream {stream} has more than one location at station {station}")]
    DuplicateNode { stream: StreamId, station: Station },

    /// A station or stream length is NaN or infinite.
    #[error("Stream {stream} has a non-finite {what}")]
    NonFiniteStation { stream: StreamId, what: String },

    /// A reach could not be traced along its stream's edges.
    #[error("Reach {reach} on stream {stream}: {failure}")]
    ReachWalk {
        reach: String,
        stream: StreamId,
        failure: ReachWalkFailure,
    },

    /// An edge endpoint is missing from the node set.
    #[error("{label} on stream {stream} references node {node} that is not in the graph")]
    DanglingEdge {
        label: &'static str,
        stream: StreamId,
        node: String,
    },

    /// A stream's node list is not strictly ordered by station.
    #[error("Stream {stream} is out of station order at {station}")]
    UnorderedStream { stream: StreamId, station: Station },
}

/// Why a reach walk stopped before reaching its second endpoint.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReachWalkFailure {
    #[error("endpoint location {0} is not on the stream")]
    UnknownEndpoint(String),

    #[error("both endpoints resolve to node {0}")]
    DegenerateReach(String),

    #[error("no stream edge leaves node {0}")]
    NoOutgoingEdge(String),

    #[error("second endpoint not reached within {0} steps")]
    StepLimitExceeded(usize),
}
