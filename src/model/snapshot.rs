// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindweave-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindweave and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use serde::{Deserialize, Serialize};

use super::connection::Connection;
use super::geometry::Point;
use super::ids::NodeId;
use super::node::Node;
use super::style::{root_node_style, DEFAULT_ROOT_TEXT};

/// Where the root of a fresh document is placed when no viewport is known.
pub const DEFAULT_ROOT_POSITION: Point = Point { x: 400.0, y: 300.0 };

/// One point in history: the full node and connection arrays of a document.
///
/// Snapshots are values. Edits build a new snapshot and never mutate one that has been handed
/// to the history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub nodes: Vec<Node>,
    pub connections: Vec<Connection>,
}

impl Snapshot {
    pub fn new(nodes: Vec<Node>, connections: Vec<Connection>) -> Self {
        Self { nodes, connections }
    }

    /// A fresh document: a single root node at `position`.
    pub fn with_root(text: impl Into<String>, position: Point) -> Self {
        let root = Node::new(NodeId::generate(), text, position).with_style(root_node_style());
        Self {
            nodes: vec![root],
            connections: Vec::new(),
        }
    }

    pub fn fresh(position: Point) -> Self {
        Self::with_root(DEFAULT_ROOT_TEXT, position)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The document root: the first node without a parent.
    pub fn root(&self) -> Option<&Node> {
        self.nodes.iter().find(|n| n.is_root())
    }

    pub fn node(&self, node_id: &NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| &n.id == node_id)
    }

    pub fn with_nodes(&self, nodes: Vec<Node>) -> Self {
        Self {
            nodes,
            connections: self.connections.clone(),
        }
    }

    pub fn with_connections(&self, connections: Vec<Connection>) -> Self {
        Self {
            nodes: self.nodes.clone(),
            connections,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Snapshot;
    use crate::model::Point;

    #[test]
    fn fresh_snapshot_has_a_single_styled_root() {
        let snapshot = Snapshot::fresh(Point::new(400.0, 300.0));
        assert_eq!(snapshot.nodes.len(), 1);
        assert!(snapshot.connections.is_empty());

        let root = snapshot.root().expect("root");
        assert_eq!(root.parent_id, None);
        assert_eq!(root.text, "Central topic");
        assert_eq!(root.x, 400.0);
        assert!(root.style.contains_key("backgroundColor"));
    }
}
