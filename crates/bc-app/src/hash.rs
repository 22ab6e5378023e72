//! Content-based hashing of built graphs.

use bc_graph::Graph;
use sha2::{Digest, Sha256};

/// SHA-256 over the graph's serialized read view. Identical basins give identical fingerprints.
pub fn graph_fingerprint(graph: &Graph) -> String {
    let mut hasher = Sha256::new();

    let view_json = serde_json::to_string(&graph.to_view()).unwrap_or_default();
    hasher.update(view_json.as_bytes());

    let result = hasher.finalize();
    format!("{:x}", result)
}
