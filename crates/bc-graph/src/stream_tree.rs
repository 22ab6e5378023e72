//! Stream tree construction.
//!
//! Flattens a primary stream and its nested tributaries into an arena of
//! work-streams, one per stream, each owning its working node list. No edges
//! exist at this stage.

use bc_core::{Station, StreamId, StreamIdx};
use bc_project::{Stream, StreamReach};
use tracing::{debug, warn};

use crate::error::{GraphError, GraphResult};
use crate::graph::Node;
use crate::indexing::StreamIndex;

/// A reach definition bound to the work-stream that owns it.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Reach<'a> {
    pub def: &'a StreamReach,
    pub stream: StreamIdx,
}

/// Per-stream working state while the graph is assembled.
#[derive(Debug)]
pub(crate) struct WorkStream<'a> {
    pub stream: &'a Stream,
    /// Stream this one flows into; `None` for the primary stream.
    pub receiving: Option<StreamIdx>,
    pub tributaries: Vec<StreamIdx>,
    pub nodes: Vec<Node>,
    pub reaches: Vec<Reach<'a>>,
    /// Node on the diverting stream this stream draws from, once resolved.
    pub diversion_node: Option<Node>,
}

impl<'a> WorkStream<'a> {
    pub fn id(&self) -> &'a StreamId {
        &self.stream.id
    }

    pub fn starts_downstream(&self) -> bool {
        self.stream.starts_downstream
    }

    pub fn is_primary(&self) -> bool {
        self.receiving.is_none()
    }

    /// Stations of the upstream and downstream ends.
    pub fn termini(&self) -> (Station, Station) {
        Station::termini(self.stream.length, self.stream.starts_downstream)
    }

    pub fn node_at(&self, station: Station) -> Option<&Node> {
        self.nodes.iter().find(|n| n.station() == station)
    }

    pub fn has_node_at(&self, station: Station) -> bool {
        self.node_at(station).is_some()
    }
}

/// Arena of work-streams in depth-first pre-order; slot 0 is the primary stream.
#[derive(Debug)]
pub(crate) struct StreamTree<'a> {
    streams: Vec<WorkStream<'a>>,
    index: StreamIndex,
}

impl<'a> StreamTree<'a> {
    pub fn build(primary: &'a Stream) -> GraphResult<Self> {
        let mut tree = StreamTree {
            streams: Vec::new(),
            index: StreamIndex::new(),
        };
        tree.add_stream(primary, None)?;
        debug!(
            primary = %primary.id,
            streams = tree.streams.len(),
            "built stream tree"
        );
        Ok(tree)
    }

    fn add_stream(
        &mut self,
        stream: &'a Stream,
        receiving: Option<StreamIdx>,
    ) -> GraphResult<StreamIdx> {
        let (idx, fresh) = self.index.register(&stream.id);
        if !fresh {
            warn!(stream = %stream.id, "stream id appears more than once in basin; diversions resolve to the first");
        }

        ensure_finite(stream, stream.length, || "length".to_string())?;
        for (station, what) in [
            (stream.confluence_station, "confluence station"),
            (stream.diversion_station, "diversion station"),
        ] {
            if let Some(station) = station {
                ensure_finite(stream, station.value(), || what.to_string())?;
            }
        }

        let nodes = location_nodes(stream)?;
        let reaches = stream
            .reaches
            .iter()
            .map(|def| Reach { def, stream: idx })
            .collect();

        self.streams.push(WorkStream {
            stream,
            receiving,
            tributaries: Vec::with_capacity(stream.tributaries.len()),
            nodes,
            reaches,
            diversion_node: None,
        });

        for tributary in &stream.tributaries {
            let child = self.add_stream(tributary, Some(idx))?;
            self.get_mut(idx).tributaries.push(child);
        }

        Ok(idx)
    }

    pub fn get(&self, idx: StreamIdx) -> &WorkStream<'a> {
        &self.streams[idx.index() as usize]
    }

    pub fn get_mut(&mut self, idx: StreamIdx) -> &mut WorkStream<'a> {
        &mut self.streams[idx.index() as usize]
    }

    pub fn resolve(&self, id: &StreamId) -> Option<StreamIdx> {
        self.index.resolve(id)
    }

    pub fn len(&self) -> usize {
        self.streams.len()
    }

    /// Streams in depth-first pre-order (each stream before its tributaries).
    pub fn pre_order(&self) -> impl Iterator<Item = StreamIdx> {
        self.index.slots()
    }

    /// Streams in depth-first post-order (every tributary before the stream it joins).
    pub fn post_order(&self) -> Vec<StreamIdx> {
        let mut out = Vec::with_capacity(self.streams.len());
        if !self.streams.is_empty() {
            self.collect_post_order(StreamIdx::from_index(0), &mut out);
        }
        out
    }

    fn collect_post_order(&self, idx: StreamIdx, out: &mut Vec<StreamIdx>) {
        for &child in &self.get(idx).tributaries {
            self.collect_post_order(child, out);
        }
        out.push(idx);
    }

    pub fn streams(&self) -> &[WorkStream<'a>] {
        &self.streams
    }
}

/// One node per surveyed location. Two locations at one station are rejected.
fn location_nodes(stream: &Stream) -> GraphResult<Vec<Node>> {
    let mut nodes: Vec<Node> = Vec::with_capacity(stream.locations.len());
    for location in &stream.locations {
        ensure_finite(stream, location.station.value(), || {
            format!("station for location {}", location.name)
        })?;
        if nodes.iter().any(|n| n.station() == location.station) {
            return Err(GraphError::DuplicateNode {
                stream: stream.id.clone(),
                station: location.station,
            });
        }
        nodes.push(Node::location(
            stream.id.clone(),
            location.name.clone(),
            location.station,
            Some(location.bank),
        ));
    }
    Ok(nodes)
}

fn ensure_finite(stream: &Stream, value: f64, what: impl FnOnce() -> String) -> GraphResult<()> {
    Station::finite(value)
        .map(|_| ())
        .map_err(|_| GraphError::NonFiniteStation {
            stream: stream.id.clone(),
            what: what(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bc_core::Bank;
    use bc_project::StreamLocation;

    fn basin() -> Stream {
        Stream::new("Main", 100.0, false)
            .with_location(StreamLocation::new("Gage", 10.0, Bank::Left))
            .with_reach(StreamReach::new("R", "Gage", "Gage"))
            .with_tributary(
                Stream::new("A", 20.0, false)
                    .joins_at(50.0, Bank::Left)
                    .with_tributary(Stream::new("A1", 5.0, false).joins_at(3.0, Bank::Right)),
            )
            .with_tributary(Stream::new("B", 30.0, true).joins_at(70.0, Bank::Right))
    }

    #[test]
    fn arena_is_preorder_with_links() {
        let primary = basin();
        let tree = StreamTree::build(&primary).unwrap();
        assert_eq!(tree.len(), 4);

        let ids: Vec<&str> = tree.pre_order().map(|i| tree.get(i).id().as_str()).collect();
        assert_eq!(ids, vec!["Main", "A", "A1", "B"]);

        let main = StreamIdx::from_index(0);
        let a = tree.resolve(&StreamId::new("a")).unwrap();
        let a1 = tree.resolve(&StreamId::new("A1")).unwrap();
        assert!(tree.get(main).is_primary());
        assert_eq!(tree.get(a).receiving, Some(main));
        assert_eq!(tree.get(a1).receiving, Some(a));
        assert_eq!(tree.get(main).tributaries.len(), 2);
    }

    #[test]
    fn post_order_visits_tributaries_first() {
        let primary = basin();
        let tree = StreamTree::build(&primary).unwrap();
        let ids: Vec<&str> = tree
            .post_order()
            .into_iter()
            .map(|i| tree.get(i).id().as_str())
            .collect();
        assert_eq!(ids, vec!["A1", "A", "B", "Main"]);
    }

    #[test]
    fn materializes_location_nodes_and_reaches_only() {
        let primary = basin();
        let tree = StreamTree::build(&primary).unwrap();
        let main = tree.get(StreamIdx::from_index(0));
        assert_eq!(main.nodes.len(), 1);
        assert!(!main.nodes[0].is_synthetic());
        assert_eq!(main.reaches.len(), 1);
        assert_eq!(main.reaches[0].def.id, "R");
        assert!(main.diversion_node.is_none());
    }

    #[test]
    fn duplicate_station_is_rejected() {
        let primary = Stream::new("Main", 100.0, false)
            .with_location(StreamLocation::new("A", 10.0, Bank::Left))
            .with_location(StreamLocation::new("B", 10.0, Bank::Right));
        let err = StreamTree::build(&primary).unwrap_err();
        assert_eq!(
            err,
            GraphError::DuplicateNode {
                stream: StreamId::new("Main"),
                station: Station::new(10.0),
            }
        );
    }

    #[test]
    fn non_finite_length_is_rejected() {
        let primary = Stream::new("Main", f64::NAN, false);
        assert!(matches!(
            StreamTree::build(&primary),
            Err(GraphError::NonFiniteStation { .. })
        ));
    }

    #[test]
    fn non_finite_confluence_station_is_rejected() {
        let primary = Stream::new("Main", 100.0, false)
            .with_tributary(Stream::new("Creek", 10.0, false).joins_at(f64::NAN, Bank::Right));
        assert_eq!(
            StreamTree::build(&primary).unwrap_err(),
            GraphError::NonFiniteStation {
                stream: StreamId::new("Creek"),
                what: "confluence station".to_string(),
            }
        );
    }

    #[test]
    fn non_finite_diversion_station_is_rejected() {
        let primary = Stream::new("Main", 100.0, false)
            .with_tributary(Stream::new("S", 40.0, false).joins_at(80.0, Bank::Left))
            .with_tributary(
                Stream::new("Canal", 10.0, false)
                    .joins_at(20.0, Bank::Right)
                    .diverts_from("S", f64::INFINITY, Bank::Left),
            );
        assert_eq!(
            StreamTree::build(&primary).unwrap_err(),
            GraphError::NonFiniteStation {
                stream: StreamId::new("Canal"),
                what: "diversion station".to_string(),
            }
        );
    }
}
