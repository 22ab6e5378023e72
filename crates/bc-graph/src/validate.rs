//! Post-build invariant checks.

use std::cmp::Ordering;
use std::collections::HashSet;

use bc_core::{Station, StationTolerance};
use tracing::warn;

use crate::error::{GraphError, GraphResult};
use crate::graph::{Graph, Node};
use crate::stream_tree::StreamTree;

/// Every stream's node list must be strictly ordered in its own flow direction.
pub(crate) fn validate_stream_order(tree: &StreamTree<'_>) -> GraphResult<()> {
    for ws in tree.streams() {
        let sd = ws.starts_downstream();
        for pair in ws.nodes.windows(2) {
            if Station::ordering(pair[0].station(), pair[1].station(), sd) != Ordering::Less {
                return Err(GraphError::UnorderedStream {
                    stream: ws.id().clone(),
                    station: pair[1].station(),
                });
            }
        }
    }
    Ok(())
}

/// Every edge endpoint must be a graph node.
pub(crate) fn validate_edges(graph: &Graph) -> GraphResult<()> {
    let nodes: HashSet<&Node> = graph.nodes().iter().collect();
    for edge in graph.edges() {
        for endpoint in [edge.source(), edge.target()] {
            if !nodes.contains(endpoint) {
                return Err(GraphError::DanglingEdge {
                    label: edge.label(),
                    stream: edge.stream_id().clone(),
                    node: endpoint.id(),
                });
            }
        }
    }
    Ok(())
}

/// Stations that differ by rounding noise still make distinct nodes; flag them.
pub(crate) fn warn_near_duplicates(tree: &StreamTree<'_>) {
    let tol = StationTolerance::default();
    for ws in tree.streams() {
        for pair in ws.nodes.windows(2) {
            let (a, b) = (pair[0].station(), pair[1].station());
            if a != b && tol.close(a.value(), b.value()) {
                warn!(
                    stream = %ws.id(),
                    first = %pair[0].id(),
                    second = %pair[1].id(),
                    "nodes at nearly equal stations are treated as distinct"
                );
            }
        }
    }
}
