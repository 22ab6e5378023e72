//! Core graph data structures.

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::hash::{Hash, Hasher};

use bc_core::{Bank, Station, StreamId, eq_ignore_case, hash_ignore_case};
use petgraph::graph::{DiGraph, NodeIndex};
use serde::Serialize;
use serde_json::Value;

/// Serializable key/value properties attached to nodes and edges.
pub type Properties = BTreeMap<String, Value>;

/// A surveyed location on a stream, built 1:1 from a `StreamLocation`.
#[derive(Debug, Clone)]
pub struct LocationNode {
    pub stream_id: StreamId,
    pub name: String,
    pub station: Station,
    pub bank: Option<Bank>,
}

/// A node the builder had to invent to anchor a terminus or junction.
#[derive(Debug, Clone)]
pub struct EmptyNode {
    pub stream_id: StreamId,
    pub station: Station,
    pub bank: Option<Bank>,
}

/// A point on a stream.
///
/// Two nodes are the same node when their stream ids and names match
/// (ignoring case) and their stations are exactly equal. The variant does not
/// take part in identity.
#[derive(Debug, Clone)]
pub enum Node {
    Location(LocationNode),
    Empty(EmptyNode),
}

impl Node {
    pub fn location(
        stream_id: StreamId,
        name: impl Into<String>,
        station: Station,
        bank: Option<Bank>,
    ) -> Self {
        Node::Location(LocationNode {
            stream_id,
            name: name.into(),
            station,
            bank,
        })
    }

    pub fn empty(stream_id: StreamId, station: Station, bank: Option<Bank>) -> Self {
        Node::Empty(EmptyNode {
            stream_id,
            station,
            bank,
        })
    }

    pub fn stream_id(&self) -> &StreamId {
        match self {
            Node::Location(n) => &n.stream_id,
            Node::Empty(n) => &n.stream_id,
        }
    }

    pub fn station(&self) -> Station {
        match self {
            Node::Location(n) => n.station,
            Node::Empty(n) => n.station,
        }
    }

    pub fn bank(&self) -> Option<Bank> {
        match self {
            Node::Location(n) => n.bank,
            Node::Empty(n) => n.bank,
        }
    }

    pub fn is_synthetic(&self) -> bool {
        matches!(self, Node::Empty(_))
    }

    /// Name used for identity: the location name, or the generated id for synthetic nodes.
    pub fn name(&self) -> Cow<'_, str> {
        match self {
            Node::Location(n) => Cow::Borrowed(n.name.as_str()),
            Node::Empty(_) => Cow::Owned(self.id()),
        }
    }

    /// Stable identifier for serialization.
    pub fn id(&self) -> String {
        match self {
            Node::Location(n) => n.name.clone(),
            Node::Empty(n) => format!("{}-Node-{}", n.stream_id, n.station),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Node::Location(_) => "stream_location",
            Node::Empty(_) => "empty_stream_node",
        }
    }

    pub fn properties(&self) -> Properties {
        let mut props = Properties::new();
        props.insert(
            "stream_id".to_string(),
            Value::from(self.stream_id().to_string()),
        );
        props.insert("station".to_string(), Value::from(self.station().value()));
        if let Some(bank) = self.bank() {
            props.insert("bank".to_string(), Value::from(bank.code()));
        }
        props
    }

    pub fn name_matches(&self, name: &str) -> bool {
        eq_ignore_case(&self.name(), name)
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.stream_id() == other.stream_id()
            && self.station() == other.station()
            && eq_ignore_case(&self.name(), &other.name())
    }
}

impl Eq for Node {}

impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.stream_id().hash(state);
        hash_ignore_case(&self.name(), state);
        self.station().hash(state);
    }
}

/// One flow segment between two consecutive nodes, or a junction/diversion connector.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamEdge {
    pub stream_id: StreamId,
    pub source: Node,
    pub target: Node,
}

/// One stream edge traversed by a named reach.
#[derive(Debug, Clone, PartialEq)]
pub struct ReachEdge {
    pub reach_id: String,
    pub stream_id: StreamId,
    pub source: Node,
    pub target: Node,
}

/// A directed edge of the basin graph.
#[derive(Debug, Clone, PartialEq)]
pub enum Edge {
    Stream(StreamEdge),
    Reach(ReachEdge),
}

impl Edge {
    pub fn source(&self) -> &Node {
        match self {
            Edge::Stream(e) => &e.source,
            Edge::Reach(e) => &e.source,
        }
    }

    pub fn target(&self) -> &Node {
        match self {
            Edge::Stream(e) => &e.target,
            Edge::Reach(e) => &e.target,
        }
    }

    pub fn stream_id(&self) -> &StreamId {
        match self {
            Edge::Stream(e) => &e.stream_id,
            Edge::Reach(e) => &e.stream_id,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Edge::Stream(_) => "stream_edge",
            Edge::Reach(_) => "reach_edge",
        }
    }

    pub fn properties(&self) -> Properties {
        let mut props = Properties::new();
        props.insert(
            "stream_id".to_string(),
            Value::from(self.stream_id().to_string()),
        );
        if let Edge::Reach(e) = self {
            props.insert("reach_id".to_string(), Value::from(e.reach_id.clone()));
        }
        props
    }
}

impl From<StreamEdge> for Edge {
    fn from(edge: StreamEdge) -> Self {
        Edge::Stream(edge)
    }
}

impl From<ReachEdge> for Edge {
    fn from(edge: ReachEdge) -> Self {
        Edge::Reach(edge)
    }
}

/// The basin graph: deduplicated nodes and all stream and reach edges.
///
/// Nodes are grouped by stream in depth-first stream order, and within a
/// stream they keep their station order. Immutable once built.
#[derive(Debug, Clone)]
pub struct Graph {
    pub(crate) name: String,
    pub(crate) nodes: Vec<Node>,
    pub(crate) edges: Vec<Edge>,
}

impl Graph {
    /// A graph with no nodes and no edges (e.g. a basin without a primary stream).
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    /// Return all nodes.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Return all edges, stream edges first.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn stream_edges(&self) -> impl Iterator<Item = &StreamEdge> {
        self.edges.iter().filter_map(|e| match e {
            Edge::Stream(s) => Some(s),
            Edge::Reach(_) => None,
        })
    }

    pub fn reach_edges(&self) -> impl Iterator<Item = &ReachEdge> {
        self.edges.iter().filter_map(|e| match e {
            Edge::Reach(r) => Some(r),
            Edge::Stream(_) => None,
        })
    }

    /// Nodes on one stream, in that stream's flow order.
    pub fn stream_nodes(&self, stream_id: &StreamId) -> Vec<&Node> {
        self.nodes
            .iter()
            .filter(|n| n.stream_id() == stream_id)
            .collect()
    }

    /// Find a node by its serialized id.
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id() == id)
    }

    pub fn contains(&self, node: &Node) -> bool {
        self.nodes.contains(node)
    }

    /// Borrowing petgraph view of the graph. Edges whose endpoints are not
    /// graph nodes are left out.
    pub fn to_digraph(&self) -> DiGraph<&Node, &Edge> {
        let mut digraph = DiGraph::with_capacity(self.nodes.len(), self.edges.len());
        let mut index: HashMap<&Node, NodeIndex> = HashMap::with_capacity(self.nodes.len());
        for node in &self.nodes {
            index.insert(node, digraph.add_node(node));
        }
        for edge in &self.edges {
            if let (Some(&s), Some(&t)) = (index.get(edge.source()), index.get(edge.target())) {
                digraph.add_edge(s, t, edge);
            }
        }
        digraph
    }

    /// Number of weakly connected pieces. A fully linked basin has exactly one.
    pub fn connected_components(&self) -> usize {
        petgraph::algo::connected_components(&self.to_digraph())
    }

    /// Serializable view through the node/edge read interface.
    pub fn to_view(&self) -> GraphView {
        GraphView {
            name: self.name.clone(),
            nodes: self
                .nodes
                .iter()
                .map(|n| NodeView {
                    id: n.id(),
                    label: n.label(),
                    properties: n.properties(),
                })
                .collect(),
            edges: self
                .edges
                .iter()
                .map(|e| EdgeView {
                    source: e.source().id(),
                    target: e.target().id(),
                    label: e.label(),
                    properties: e.properties(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NodeView {
    pub id: String,
    pub label: &'static str,
    pub properties: Properties,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EdgeView {
    pub source: String,
    pub target: String,
    pub label: &'static str,
    pub properties: Properties,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GraphView {
    pub name: String,
    pub nodes: Vec<NodeView>,
    pub edges: Vec<EdgeView>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn sid(s: &str) -> StreamId {
        StreamId::new(s)
    }

    #[test]
    fn empty_node_id_includes_station() {
        let node = Node::empty(sid("Main"), Station::new(100.0), Some(Bank::Left));
        assert_eq!(node.id(), "Main-Node-100.0");
        assert_eq!(node.label(), "empty_stream_node");
        assert!(node.is_synthetic());
    }

    #[test]
    fn identity_ignores_case_and_bank() {
        let a = Node::location(sid("Main"), "Gage", Station::new(10.0), Some(Bank::Left));
        let b = Node::location(sid("MAIN"), "gage", Station::new(10.0), Some(Bank::Right));
        assert_eq!(a, b);

        let mut set = HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
    }

    #[test]
    fn identity_uses_exact_station() {
        let a = Node::location(sid("Main"), "Gage", Station::new(10.0), None);
        let b = Node::location(sid("Main"), "Gage", Station::new(10.0 + 1e-12), None);
        assert_ne!(a, b);
    }

    #[test]
    fn node_properties() {
        let node = Node::location(sid("Main"), "Gage", Station::new(12.5), Some(Bank::Right));
        let props = node.properties();
        assert_eq!(props["stream_id"], Value::from("Main"));
        assert_eq!(props["station"], Value::from(12.5));
        assert_eq!(props["bank"], Value::from("R"));

        let unbanked = Node::empty(sid("Main"), Station::new(1.0), None);
        assert!(!unbanked.properties().contains_key("bank"));
    }

    #[test]
    fn reach_edge_properties_carry_reach_id() {
        let a = Node::location(sid("Main"), "A", Station::new(10.0), None);
        let b = Node::location(sid("Main"), "B", Station::new(30.0), None);
        let edge: Edge = ReachEdge {
            reach_id: "Pool".to_string(),
            stream_id: sid("Main"),
            source: a,
            target: b,
        }
        .into();
        assert_eq!(edge.label(), "reach_edge");
        assert_eq!(edge.properties()["reach_id"], Value::from("Pool"));
        assert_eq!(edge.source().id(), "A");
        assert_eq!(edge.target().id(), "B");
    }

    #[test]
    fn empty_graph() {
        let graph = Graph::empty("Dry Basin");
        assert!(graph.is_empty());
        assert_eq!(graph.name(), "Dry Basin");
        assert_eq!(graph.connected_components(), 0);
    }
}
