//! Synthetic node insertion.
//!
//! Before any edge is built every stream needs well-defined ends and a node
//! at each junction. Streams are processed tributaries-first; for each one:
//!
//! 1. terminal nodes at the upstream end (and, for the primary stream only,
//!    the downstream end; a tributary's downstream end is its confluence),
//! 2. confluence nodes on this stream for every direct tributary, and
//!    diversion nodes on whichever stream each tributary draws from,
//! 3. a direction-aware sort of the node list.

use std::cmp::Ordering;

use bc_core::{Bank, Station, StreamIdx};
use tracing::{debug, warn};

use crate::graph::Node;
use crate::stream_tree::{StreamTree, WorkStream};

/// Bank recorded on synthetic terminal nodes.
const TERMINAL_BANK: Bank = Bank::Left;

pub(crate) fn insert_synthetic_nodes(tree: &mut StreamTree<'_>) {
    for idx in tree.post_order() {
        add_terminal_nodes(tree.get_mut(idx));
        add_junction_nodes(tree, idx);
        sort_nodes(tree.get_mut(idx));
    }
}

fn add_terminal_nodes(ws: &mut WorkStream<'_>) {
    let (first, last) = ws.termini();
    if !ws.has_node_at(first) {
        debug!(stream = %ws.id(), station = %first, "adding upstream terminal node");
        ws.nodes
            .push(Node::empty(ws.id().clone(), first, Some(TERMINAL_BANK)));
    }
    if ws.is_primary() && !ws.has_node_at(last) {
        debug!(stream = %ws.id(), station = %last, "adding downstream terminal node");
        ws.nodes
            .push(Node::empty(ws.id().clone(), last, Some(TERMINAL_BANK)));
    }
}

fn add_junction_nodes(tree: &mut StreamTree<'_>, idx: StreamIdx) {
    let tributaries = tree.get(idx).tributaries.clone();
    for trib in tributaries {
        add_confluence_node(tree, idx, trib);
        add_diversion_node(tree, trib);
    }
}

fn add_confluence_node(tree: &mut StreamTree<'_>, idx: StreamIdx, trib: StreamIdx) {
    let t = tree.get(trib).stream;
    let Some(station) = t.confluence_station else {
        warn!(tributary = %t.id, "no confluence station; tributary will not be connected");
        return;
    };
    let ws = tree.get_mut(idx);
    if !ws.has_node_at(station) {
        debug!(stream = %ws.id(), tributary = %t.id, %station, "adding confluence node");
        ws.nodes
            .push(Node::empty(ws.id().clone(), station, t.confluence_bank));
    }
}

fn add_diversion_node(tree: &mut StreamTree<'_>, trib: StreamIdx) {
    let t = tree.get(trib).stream;
    let Some(diverting_id) = t.diverting_stream_id.as_ref() else {
        return;
    };
    let Some(from) = tree.resolve(diverting_id) else {
        warn!(tributary = %t.id, diverts_from = %diverting_id, "diverting stream is not in this basin");
        return;
    };
    if from == trib {
        warn!(tributary = %t.id, "stream diverts from itself; ignoring diversion");
        return;
    }
    let Some(station) = t.diversion_station else {
        warn!(tributary = %t.id, diverts_from = %diverting_id, "no diversion station; diversion will not be connected");
        return;
    };

    let existing = tree.get(from).node_at(station).cloned();
    let node = match existing {
        Some(node) => node,
        None => {
            let ws = tree.get_mut(from);
            let node = Node::empty(ws.id().clone(), station, t.diversion_bank);
            debug!(stream = %ws.id(), tributary = %t.id, %station, "adding diversion node");
            insert_sorted(ws, node.clone());
            remove_upstream_placeholder(tree, trib);
            node
        }
    };
    tree.get_mut(trib).diversion_node = Some(node);
}

/// Insert keeping the list in flow order (binary search on the same comparator as the final sort).
fn insert_sorted(ws: &mut WorkStream<'_>, node: Node) {
    let sd = ws.starts_downstream();
    let station = node.station();
    let pos = ws
        .nodes
        .partition_point(|n| Station::ordering(n.station(), station, sd) == Ordering::Less);
    ws.nodes.insert(pos, node);
}

/// Drop the synthetic upstream terminal of a diverted stream; the diversion
/// node takes its place as the stream's effective start. Real locations are
/// kept, as are placeholders that anchor a confluence or feed another diversion.
fn remove_upstream_placeholder(tree: &mut StreamTree<'_>, trib: StreamIdx) {
    let ws = tree.get(trib);
    let (first, _) = ws.termini();
    let Some(pos) = ws
        .nodes
        .iter()
        .position(|n| n.is_synthetic() && n.station() == first)
    else {
        return;
    };
    let placeholder = &ws.nodes[pos];
    let anchors_confluence = ws
        .stream
        .tributaries
        .iter()
        .any(|c| c.confluence_station == Some(first));
    let feeds_diversion = tree
        .streams()
        .iter()
        .any(|other| other.diversion_node.as_ref() == Some(placeholder));
    if anchors_confluence || feeds_diversion {
        debug!(stream = %ws.id(), station = %first, "keeping upstream terminal; another junction uses it");
        return;
    }
    debug!(stream = %ws.id(), station = %first, "removing upstream terminal replaced by diversion");
    tree.get_mut(trib).nodes.remove(pos);
}

fn sort_nodes(ws: &mut WorkStream<'_>) {
    let sd = ws.starts_downstream();
    ws.nodes
        .sort_by(|a, b| Station::ordering(a.station(), b.station(), sd));
}
