//! Edge assembly and graph flattening.
//!
//! Runs after every stream's node list is final. Stream edges are emitted
//! depth-first (each stream, then its tributaries); reach edges are traced
//! along the stream edges of the reach's own stream.

use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use crate::builder::BuildOptions;
use crate::error::{GraphError, GraphResult, ReachWalkFailure};
use crate::graph::{Edge, Graph, Node, ReachEdge, StreamEdge};
use crate::stream_tree::{Reach, StreamTree, WorkStream};

pub(crate) fn assemble_stream_edges(tree: &StreamTree<'_>) -> Vec<StreamEdge> {
    let mut edges = Vec::new();
    for idx in tree.pre_order() {
        let ws = tree.get(idx);
        let confluence = confluence_node(tree, ws);
        let before = edges.len();

        if let Some(diversion) = &ws.diversion_node {
            match ws.nodes.first().or(confluence) {
                Some(target) => edges.push(edge(ws, diversion, target)),
                None => warn!(stream = %ws.id(), "diversion has nothing to connect to"),
            }
        }

        for pair in ws.nodes.windows(2) {
            edges.push(edge(ws, &pair[0], &pair[1]));
        }

        if !ws.is_primary() {
            if let (Some(last), Some(confluence)) = (ws.nodes.last(), confluence) {
                edges.push(edge(ws, last, confluence));
            }
        }

        debug!(stream = %ws.id(), edges = edges.len() - before, "assembled stream edges");
    }
    edges
}

/// The node on the receiving stream where this tributary joins, if any.
fn confluence_node<'t>(tree: &'t StreamTree<'_>, ws: &WorkStream<'_>) -> Option<&'t Node> {
    let receiving = tree.get(ws.receiving?);
    receiving.node_at(ws.stream.confluence_station?)
}

fn edge(ws: &WorkStream<'_>, source: &Node, target: &Node) -> StreamEdge {
    StreamEdge {
        stream_id: ws.id().clone(),
        source: source.clone(),
        target: target.clone(),
    }
}

pub(crate) fn assemble_reach_edges(
    tree: &StreamTree<'_>,
    stream_edges: &[StreamEdge],
    options: &BuildOptions,
) -> GraphResult<Vec<ReachEdge>> {
    let mut out = Vec::new();
    for idx in tree.pre_order() {
        let ws = tree.get(idx);
        if ws.reaches.is_empty() {
            continue;
        }

        // First edge leaving each node on this stream's own edges.
        let mut outgoing: HashMap<&Node, &StreamEdge> = HashMap::new();
        for e in stream_edges.iter().filter(|e| &e.stream_id == ws.id()) {
            outgoing.entry(&e.source).or_insert(e);
        }
        let limit = options.reach_step_limit.unwrap_or(outgoing.len());

        for reach in &ws.reaches {
            let walked = walk_reach(tree.get(reach.stream), reach, &outgoing, limit).map_err(
                |failure| GraphError::ReachWalk {
                    reach: reach.def.id.clone(),
                    stream: ws.id().clone(),
                    failure,
                },
            )?;
            debug!(stream = %ws.id(), reach = %reach.def.id, edges = walked.len(), "traced reach");
            out.extend(walked);
        }
    }
    Ok(out)
}

fn walk_reach(
    ws: &WorkStream<'_>,
    reach: &Reach<'_>,
    outgoing: &HashMap<&Node, &StreamEdge>,
    limit: usize,
) -> Result<Vec<ReachEdge>, ReachWalkFailure> {
    let find = |name: &str| {
        ws.nodes
            .iter()
            .find(|n| n.name_matches(name))
            .ok_or_else(|| ReachWalkFailure::UnknownEndpoint(name.to_string()))
    };
    let mut first = find(&reach.def.upstream_location)?;
    let mut second = find(&reach.def.downstream_location)?;
    if ws.starts_downstream() {
        std::mem::swap(&mut first, &mut second);
    }
    if first == second {
        return Err(ReachWalkFailure::DegenerateReach(first.id()));
    }

    let mut walked = Vec::new();
    let mut current = first;
    loop {
        if walked.len() == limit {
            return Err(ReachWalkFailure::StepLimitExceeded(limit));
        }
        let next = outgoing
            .get(current)
            .ok_or_else(|| ReachWalkFailure::NoOutgoingEdge(current.id()))?;
        walked.push(ReachEdge {
            reach_id: reach.def.id.clone(),
            stream_id: ws.id().clone(),
            source: next.source.clone(),
            target: next.target.clone(),
        });
        if &next.target == second {
            return Ok(walked);
        }
        current = &next.target;
    }
}

/// Union of all stream nodes (first occurrence wins) plus every edge.
pub(crate) fn flatten(
    name: &str,
    tree: &StreamTree<'_>,
    stream_edges: Vec<StreamEdge>,
    reach_edges: Vec<ReachEdge>,
) -> Graph {
    let mut seen: HashSet<&Node> = HashSet::new();
    let mut nodes = Vec::new();
    for idx in tree.pre_order() {
        for node in &tree.get(idx).nodes {
            if seen.insert(node) {
                nodes.push(node.clone());
            }
        }
    }

    let mut edges: Vec<Edge> = Vec::with_capacity(stream_edges.len() + reach_edges.len());
    edges.extend(stream_edges.into_iter().map(Edge::from));
    edges.extend(reach_edges.into_iter().map(Edge::from));

    Graph {
        name: name.to_string(),
        nodes,
        edges,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::junction::insert_synthetic_nodes;
    use bc_core::{Bank, StreamId};
    use bc_project::{Stream, StreamLocation, StreamReach};

    fn ids(edges: &[StreamEdge]) -> Vec<(String, String)> {
        edges
            .iter()
            .map(|e| (e.source.id(), e.target.id()))
            .collect()
    }

    fn pair(a: &str, b: &str) -> (String, String) {
        (a.to_string(), b.to_string())
    }

    fn prepared(primary: &Stream) -> StreamTree<'_> {
        let mut tree = StreamTree::build(primary).unwrap();
        insert_synthetic_nodes(&mut tree);
        tree
    }

    #[test]
    fn tributary_chain_ends_at_confluence() {
        let primary = Stream::new("Main", 100.0, false).with_tributary(
            Stream::new("Creek", 20.0, true)
                .joins_at(50.0, Bank::Right)
                .with_location(StreamLocation::new("Gage", 10.0, Bank::Left)),
        );
        let tree = prepared(&primary);
        let edges = assemble_stream_edges(&tree);
        assert_eq!(
            ids(&edges),
            vec![
                pair("Main-Node-0.0", "Main-Node-50.0"),
                pair("Main-Node-50.0", "Main-Node-100.0"),
                pair("Creek-Node-20.0", "Gage"),
                pair("Gage", "Main-Node-50.0"),
            ]
        );
        assert_eq!(edges[3].stream_id, StreamId::new("Creek"));
    }

    #[test]
    fn diversion_without_nodes_connects_straight_to_confluence() {
        let primary = Stream::new("Main", 200.0, false)
            .with_tributary(Stream::new("Fork", 60.0, false).joins_at(40.0, Bank::Left))
            .with_tributary(
                Stream::new("Canal", 15.0, false)
                    .diverts_from("Fork", 30.0, Bank::Right)
                    .joins_at(120.0, Bank::Right),
            );
        let tree = prepared(&primary);
        let edges = assemble_stream_edges(&tree);
        let canal: Vec<_> = edges
            .iter()
            .filter(|e| e.stream_id == StreamId::new("Canal"))
            .cloned()
            .collect();
        assert_eq!(ids(&canal), vec![pair("Fork-Node-30.0", "Main-Node-120.0")]);
    }

    #[test]
    fn diversion_feeds_first_node() {
        let primary = Stream::new("Main", 200.0, false)
            .with_tributary(Stream::new("Fork", 60.0, false).joins_at(40.0, Bank::Left))
            .with_tributary(
                Stream::new("Canal", 15.0, false)
                    .diverts_from("Fork", 30.0, Bank::Right)
                    .joins_at(120.0, Bank::Right)
                    .with_location(StreamLocation::new("Gate", 5.0, Bank::Left)),
            );
        let tree = prepared(&primary);
        let edges = assemble_stream_edges(&tree);
        let canal: Vec<_> = edges
            .iter()
            .filter(|e| e.stream_id == StreamId::new("Canal"))
            .cloned()
            .collect();
        assert_eq!(
            ids(&canal),
            vec![
                pair("Fork-Node-30.0", "Gate"),
                pair("Gate", "Main-Node-120.0"),
            ]
        );
    }

    #[test]
    fn tributary_without_confluence_is_left_unjoined() {
        let primary =
            Stream::new("Main", 100.0, false).with_tributary(Stream::new("Creek", 20.0, false));
        let tree = prepared(&primary);
        let edges = assemble_stream_edges(&tree);
        assert_eq!(ids(&edges), vec![pair("Main-Node-0.0", "Main-Node-100.0")]);
    }

    fn reach_stream(sd: bool, reach: StreamReach) -> Stream {
        Stream::new("Main", 100.0, sd)
            .with_location(StreamLocation::new("A", 10.0, Bank::Left))
            .with_location(StreamLocation::new("B", 30.0, Bank::Left))
            .with_location(StreamLocation::new("C", 60.0, Bank::Left))
            .with_reach(reach)
    }

    fn reaches(primary: &Stream, options: &BuildOptions) -> GraphResult<Vec<ReachEdge>> {
        let tree = prepared(primary);
        let stream_edges = assemble_stream_edges(&tree);
        assemble_reach_edges(&tree, &stream_edges, options)
    }

    #[test]
    fn reach_spans_consecutive_edges() {
        let primary = reach_stream(false, StreamReach::new("Pool", "a", "C"));
        let edges = reaches(&primary, &BuildOptions::default()).unwrap();
        let got: Vec<_> = edges.iter().map(|e| (e.source.id(), e.target.id())).collect();
        assert_eq!(got, vec![pair("A", "B"), pair("B", "C")]);
        assert!(edges.iter().all(|e| e.reach_id == "Pool"));
    }

    #[test]
    fn reach_endpoints_swap_when_starting_downstream() {
        let primary = reach_stream(true, StreamReach::new("Pool", "A", "C"));
        let edges = reaches(&primary, &BuildOptions::default()).unwrap();
        let got: Vec<_> = edges.iter().map(|e| (e.source.id(), e.target.id())).collect();
        assert_eq!(got, vec![pair("C", "B"), pair("B", "A")]);
    }

    #[test]
    fn reach_with_unknown_endpoint_fails() {
        let primary = reach_stream(false, StreamReach::new("Pool", "A", "Nowhere"));
        let err = reaches(&primary, &BuildOptions::default()).unwrap_err();
        assert_eq!(
            err,
            GraphError::ReachWalk {
                reach: "Pool".to_string(),
                stream: StreamId::new("Main"),
                failure: ReachWalkFailure::UnknownEndpoint("Nowhere".to_string()),
            }
        );
    }

    #[test]
    fn reach_against_flow_runs_off_the_end() {
        let primary = reach_stream(false, StreamReach::new("Back", "C", "A"));
        let err = reaches(&primary, &BuildOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            GraphError::ReachWalk {
                failure: ReachWalkFailure::NoOutgoingEdge(ref node),
                ..
            } if node == "Main-Node-100.0"
        ));
    }

    #[test]
    fn degenerate_reach_fails() {
        let primary = reach_stream(false, StreamReach::new("Point", "B", "b"));
        let err = reaches(&primary, &BuildOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            GraphError::ReachWalk {
                failure: ReachWalkFailure::DegenerateReach(_),
                ..
            }
        ));
    }

    #[test]
    fn step_limit_bounds_the_walk() {
        let primary = reach_stream(false, StreamReach::new("Pool", "A", "C"));
        let options = BuildOptions {
            reach_step_limit: Some(1),
            ..BuildOptions::default()
        };
        let err = reaches(&primary, &options).unwrap_err();
        assert!(matches!(
            err,
            GraphError::ReachWalk {
                failure: ReachWalkFailure::StepLimitExceeded(1),
                ..
            }
        ));
    }

    #[test]
    fn flatten_keeps_stream_order_and_dedupes() {
        let primary = Stream::new("Main", 100.0, false).with_tributary(
            Stream::new("Creek", 20.0, false).joins_at(50.0, Bank::Left),
        );
        let tree = prepared(&primary);
        let stream_edges = assemble_stream_edges(&tree);
        let graph = flatten("Test", &tree, stream_edges, Vec::new());
        let node_ids: Vec<String> = graph.nodes().iter().map(Node::id).collect();
        assert_eq!(
            node_ids,
            vec![
                "Main-Node-0.0",
                "Main-Node-50.0",
                "Main-Node-100.0",
                "Creek-Node-0.0",
            ]
        );
        assert_eq!(graph.edges().len(), 3);
        assert_eq!(graph.name(), "Test");
    }
}
