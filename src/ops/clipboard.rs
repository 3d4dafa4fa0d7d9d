// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindweave-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindweave and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::{EditRejected, GraphIndex};
use crate::model::{Connection, ConnectionId, Node, NodeId, Point, Snapshot};

/// Offset applied to pasted nodes so they do not cover the originals.
pub const PASTE_OFFSET: Point = Point { x: 50.0, y: 50.0 };

/// Copied nodes plus the connections whose both ends were copied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Clipboard {
    pub nodes: Vec<Node>,
    pub connections: Vec<Connection>,
}

impl Clipboard {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Copies the listed nodes in document order. `None` when no id resolves.
pub fn copy_nodes(snapshot: &Snapshot, node_ids: &[NodeId]) -> Option<Clipboard> {
    let index = GraphIndex::new(&snapshot.nodes);
    let mut positions = node_ids
        .iter()
        .filter_map(|id| index.position(id))
        .collect::<Vec<_>>();
    if positions.is_empty() {
        return None;
    }
    positions.sort_unstable();
    positions.dedup();

    let nodes = positions
        .into_iter()
        .map(|idx| snapshot.nodes[idx].clone())
        .collect::<Vec<_>>();
    let copied = nodes.iter().map(|n| n.id.as_str()).collect::<HashSet<_>>();
    let connections = snapshot
        .connections
        .iter()
        .filter(|conn| copied.contains(conn.from.as_str()) && copied.contains(conn.to.as_str()))
        .cloned()
        .collect();

    Some(Clipboard { nodes, connections })
}

/// Inserts a copy of `clipboard` with fresh ids, shifted by `offset`.
///
/// Parent links between pasted nodes are rewired to the new ids; a pasted node whose parent
/// was not copied becomes parent-less. Returns the new node ids in clipboard order.
pub fn paste(
    snapshot: &Snapshot,
    clipboard: &Clipboard,
    offset: Point,
) -> Result<(Snapshot, Vec<NodeId>), EditRejected> {
    if clipboard.is_empty() {
        return Err(EditRejected::EmptySelection);
    }

    let remap = clipboard
        .nodes
        .iter()
        .map(|node| (node.id.as_str(), NodeId::generate()))
        .collect::<HashMap<_, _>>();
    let fresh_id = |old: &NodeId| remap.get(old.as_str()).cloned();

    let mut nodes = snapshot.nodes.clone();
    let mut created = Vec::with_capacity(clipboard.nodes.len());
    for original in &clipboard.nodes {
        let Some(node_id) = fresh_id(&original.id) else {
            continue;
        };
        let mut node = original.clone();
        node.id = node_id.clone();
        node.parent_id = original.parent_id.as_ref().and_then(fresh_id);
        node.set_position(original.position() + offset);
        nodes.push(node);
        created.push(node_id);
    }

    let mut connections = snapshot.connections.clone();
    for original in &clipboard.connections {
        let (Some(from), Some(to)) = (fresh_id(&original.from), fresh_id(&original.to)) else {
            continue;
        };
        let mut conn = original.clone();
        conn.id = ConnectionId::generate();
        conn.from = from;
        conn.to = to;
        connections.push(conn);
    }

    Ok((Snapshot::new(nodes, connections), created))
}

#[cfg(test)]
mod tests {
    use super::{copy_nodes, paste, Clipboard, PASTE_OFFSET};
    use crate::model::{Connection, ConnectionId, Node, NodeId, Point, Snapshot};
    use crate::ops::EditRejected;

    fn id(raw: &str) -> NodeId {
        NodeId::new(raw).expect("id")
    }

    fn sample() -> Snapshot {
        let nodes = vec![
            Node::new(id("r"), "root", Point::ORIGIN),
            Node::new(id("a"), "a", Point::new(10.0, 0.0)).with_parent(Some(id("r"))),
            Node::new(id("b"), "b", Point::new(20.0, 5.0)).with_parent(Some(id("a"))),
        ];
        let connections = vec![
            Connection::new(ConnectionId::new("ab").expect("id"), id("a"), id("b")),
            Connection::new(ConnectionId::new("rb").expect("id"), id("r"), id("b")),
        ];
        Snapshot::new(nodes, connections)
    }

    #[test]
    fn copy_keeps_document_order_and_inner_connections() {
        let clipboard = copy_nodes(&sample(), &[id("b"), id("a"), id("b")]).expect("copied");
        let copied = clipboard
            .nodes
            .iter()
            .map(|n| n.id.as_str())
            .collect::<Vec<_>>();
        assert_eq!(copied, vec!["a", "b"]);
        assert_eq!(clipboard.connections.len(), 1);
        assert_eq!(clipboard.connections[0].id.as_str(), "ab");

        assert_eq!(copy_nodes(&sample(), &[id("zzz")]), None);
    }

    #[test]
    fn paste_remaps_ids_parents_and_connections() {
        let snapshot = sample();
        let clipboard = copy_nodes(&snapshot, &[id("a"), id("b")]).expect("copied");
        let (next, created) = paste(&snapshot, &clipboard, PASTE_OFFSET).expect("paste");

        assert_eq!(next.nodes.len(), 5);
        assert_eq!(created.len(), 2);
        assert!(created.iter().all(|new| snapshot.node(new).is_none()));

        let pasted_a = next.node(&created[0]).expect("pasted a");
        let pasted_b = next.node(&created[1]).expect("pasted b");
        assert_eq!(pasted_a.parent_id, None, "parent was not copied");
        assert_eq!(pasted_b.parent_id.as_ref(), Some(&created[0]));
        assert_eq!(pasted_a.position(), Point::new(60.0, 50.0));
        assert_eq!(pasted_b.position(), Point::new(70.0, 55.0));

        assert_eq!(next.connections.len(), 3);
        let pasted_conn = &next.connections[2];
        assert_ne!(pasted_conn.id.as_str(), "ab");
        assert_eq!(pasted_conn.from, created[0]);
        assert_eq!(pasted_conn.to, created[1]);
    }

    #[test]
    fn pasting_nothing_is_rejected() {
        assert_eq!(
            paste(&sample(), &Clipboard::default(), PASTE_OFFSET),
            Err(EditRejected::EmptySelection)
        );
    }
}
