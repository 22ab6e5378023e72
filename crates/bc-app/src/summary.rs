//! Graph summaries for reporting.

use std::collections::BTreeMap;

use bc_graph::Graph;
use serde::Serialize;

use crate::hash::graph_fingerprint;

/// Counts and connectivity of a built graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphSummary {
    pub name: String,
    pub node_count: usize,
    pub edge_count: usize,
    /// Node count per label (`stream_location`, `empty_stream_node`).
    pub nodes_by_label: BTreeMap<String, usize>,
    /// Edge count per label (`stream_edge`, `reach_edge`).
    pub edges_by_label: BTreeMap<String, usize>,
    pub connected_components: usize,
    pub fingerprint: String,
}

impl GraphSummary {
    pub fn from_graph(graph: &Graph) -> Self {
        let mut nodes_by_label = BTreeMap::new();
        for node in graph.nodes() {
            *nodes_by_label.entry(node.label().to_string()).or_insert(0) += 1;
        }
        let mut edges_by_label = BTreeMap::new();
        for edge in graph.edges() {
            *edges_by_label.entry(edge.label().to_string()).or_insert(0) += 1;
        }

        Self {
            name: graph.name().to_string(),
            node_count: graph.nodes().len(),
            edge_count: graph.edges().len(),
            nodes_by_label,
            edges_by_label,
            connected_components: graph.connected_components(),
            fingerprint: graph_fingerprint(graph),
        }
    }

    /// True when every node can reach every other ignoring direction.
    pub fn is_connected(&self) -> bool {
        self.connected_components <= 1
    }
}
