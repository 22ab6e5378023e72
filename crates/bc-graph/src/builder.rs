//! Basin graph builder.

use bc_project::{Basin, Stream};
use tracing::debug;

use crate::edges;
use crate::error::GraphResult;
use crate::graph::Graph;
use crate::junction;
use crate::stream_tree::StreamTree;
use crate::validate;

/// Knobs for one graph construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildOptions {
    /// Maximum stream edges a single reach may span. Defaults to the number
    /// of edges on the reach's stream.
    pub reach_step_limit: Option<usize>,
    /// Run the post-build ordering and dangling-edge checks.
    pub validate: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            reach_step_limit: None,
            validate: true,
        }
    }
}

/// Builds a connectivity `Graph` from a primary stream and its tributaries.
///
/// Each call owns its working node lists exclusively; builders for
/// independent basins can run concurrently.
#[derive(Debug, Clone)]
pub struct GraphBuilder<'a> {
    name: String,
    primary: Option<&'a Stream>,
    options: BuildOptions,
}

impl<'a> GraphBuilder<'a> {
    /// Builder for a basin; the graph is named after the basin.
    pub fn for_basin(basin: &'a Basin) -> Self {
        Self {
            name: basin.name.clone(),
            primary: basin.primary_stream.as_ref(),
            options: BuildOptions::default(),
        }
    }

    /// Builder rooted at an arbitrary stream.
    pub fn for_stream(name: impl Into<String>, primary: &'a Stream) -> Self {
        Self {
            name: name.into(),
            primary: Some(primary),
            options: BuildOptions::default(),
        }
    }

    pub fn with_options(mut self, options: BuildOptions) -> Self {
        self.options = options;
        self
    }

    /// Build the graph. A basin without a primary stream yields an empty graph.
    pub fn build(self) -> GraphResult<Graph> {
        let Some(primary) = self.primary else {
            debug!(basin = %self.name, "no primary stream; returning empty graph");
            return Ok(Graph::empty(self.name));
        };

        let mut tree = StreamTree::build(primary)?;
        junction::insert_synthetic_nodes(&mut tree);
        if self.options.validate {
            validate::validate_stream_order(&tree)?;
            validate::warn_near_duplicates(&tree);
        }

        let stream_edges = edges::assemble_stream_edges(&tree);
        let reach_edges = edges::assemble_reach_edges(&tree, &stream_edges, &self.options)?;
        let graph = edges::flatten(&self.name, &tree, stream_edges, reach_edges);

        if self.options.validate {
            validate::validate_edges(&graph)?;
        }

        debug!(
            basin = %graph.name(),
            streams = tree.len(),
            nodes = graph.nodes().len(),
            edges = graph.edges().len(),
            "built basin graph"
        );
        Ok(graph)
    }
}

/// Build a basin's graph with default options.
pub fn build_basin_graph(basin: &Basin) -> GraphResult<Graph> {
    GraphBuilder::for_basin(basin).build()
}
