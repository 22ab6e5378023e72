//! bc-graph: basin connectivity graph construction.
//!
//! Provides:
//! - Node/edge/graph data structures with a serializable read view
//! - The builder that turns a basin's stream tree into a flow graph
//! - Case-insensitive stream lookup used to resolve diversions
//!
//! # Example
//!
//! ```
//! use bc_core::Bank;
//! use bc_graph::build_basin_graph;
//! use bc_project::{Basin, Stream, StreamLocation};
//!
//! let main = Stream::new("Arkansas", 100.0, false).with_tributary(
//!     Stream::new("Cimarron", 20.0, false)
//!         .joins_at(50.0, Bank::Right)
//!         .with_location(StreamLocation::new("Perkins", 10.0, Bank::Left)),
//! );
//! let basin = Basin::new("Keystone", "SWT").with_primary_stream(main);
//! let graph = build_basin_graph(&basin).unwrap();
//!
//! // Arkansas 0 / 50 / 100, Cimarron 0 / Perkins
//! assert_eq!(graph.nodes().len(), 5);
//! assert_eq!(graph.edges().len(), 4);
//! ```

pub mod builder;
mod edges;
pub mod error;
pub mod graph;
pub mod indexing;
mod junction;
mod stream_tree;
pub(crate) mod validate;

// Re-exports for ergonomics
pub use builder::{BuildOptions, GraphBuilder, build_basin_graph};
pub use error::{GraphError, GraphResult, ReachWalkFailure};
pub use graph::{
    Edge, EdgeView, EmptyNode, Graph, GraphView, LocationNode, Node, NodeView, Properties,
    ReachEdge, StreamEdge,
};
pub use indexing::StreamIndex;
