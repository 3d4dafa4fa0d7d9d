// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindweave-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindweave and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Edit operations on a document snapshot.
//!
//! Every operation is pure: it reads a [`Snapshot`] and returns a new one, leaving the input
//! untouched. Edits that make no sense for the current document come back as
//! [`EditRejected`]; callers treat a rejection as "nothing happened".
//!
//! [`apply`] runs a [`GraphOp`] and reports which nodes and connections changed, so command
//! layers can drive edits as data.

use std::collections::HashMap;
use std::fmt;

use crate::model::{
    Connection, ConnectionId, ConnectionPatch, Node, NodeId, NodePatch, Point, Snapshot, Style,
};

mod clipboard;
mod hierarchy;
mod index;

pub use clipboard::{copy_nodes, paste, Clipboard, PASTE_OFFSET};
pub use hierarchy::{
    auto_layout, descendants, neighbor, path_to_root, reorder_sibling, Direction,
    LayoutSpacing, SiblingMove,
};
pub use index::GraphIndex;

/// Horizontal offset used when a child is created without an explicit position.
pub const PARENT_OFFSET_X: f64 = 200.0;

/// Radial placement of new children around their parent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChildPlacement {
    pub distance: f64,
    pub angle_step_deg: f64,
}

impl Default for ChildPlacement {
    fn default() -> Self {
        Self {
            distance: 150.0,
            angle_step_deg: 45.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GraphOp {
    AddNode {
        parent_id: Option<NodeId>,
        text: String,
        position: Option<Point>,
    },
    AddChildNode {
        parent_id: NodeId,
        text: String,
        placement: ChildPlacement,
    },
    UpdateNode {
        node_id: NodeId,
        patch: NodePatch,
    },
    UpdateNodesStyle {
        node_ids: Vec<NodeId>,
        style: Style,
    },
    DeleteNodes {
        node_ids: Vec<NodeId>,
    },
    ToggleDetached {
        node_id: NodeId,
    },
    AddConnection {
        from: NodeId,
        to: NodeId,
    },
    UpdateConnection {
        connection_id: ConnectionId,
        patch: ConnectionPatch,
    },
    DeleteConnection {
        connection_id: ConnectionId,
    },
    ReorderSibling {
        node_id: NodeId,
        direction: SiblingMove,
    },
    AutoLayout {
        root_id: NodeId,
        spacing: LayoutSpacing,
    },
    Paste {
        clipboard: Clipboard,
        offset: Point,
    },
    /// Swap in a whole document, e.g. an imported file.
    Replace {
        snapshot: Snapshot,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Applied {
    pub snapshot: Snapshot,
    /// Nodes created by the op, in creation order (the new selection).
    pub created: Vec<NodeId>,
    pub delta: EditDelta,
}

/// Which objects differ between the snapshots before and after an edit. Ids are sorted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EditDelta {
    pub added_nodes: Vec<NodeId>,
    pub removed_nodes: Vec<NodeId>,
    pub updated_nodes: Vec<NodeId>,
    pub added_connections: Vec<ConnectionId>,
    pub removed_connections: Vec<ConnectionId>,
    pub updated_connections: Vec<ConnectionId>,
}

impl EditDelta {
    pub fn between(before: &Snapshot, after: &Snapshot) -> Self {
        let (added_nodes, removed_nodes, updated_nodes) =
            diff_by_id(&before.nodes, &after.nodes, |node: &Node| &node.id);
        let (added_connections, removed_connections, updated_connections) = diff_by_id(
            &before.connections,
            &after.connections,
            |conn: &Connection| &conn.id,
        );

        Self {
            added_nodes,
            removed_nodes,
            updated_nodes,
            added_connections,
            removed_connections,
            updated_connections,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.added_nodes.is_empty()
            && self.removed_nodes.is_empty()
            && self.updated_nodes.is_empty()
            && self.added_connections.is_empty()
            && self.removed_connections.is_empty()
            && self.updated_connections.is_empty()
    }
}

type Diff<I> = (Vec<I>, Vec<I>, Vec<I>);

fn diff_by_id<T, I>(before: &[T], after: &[T], id_of: impl Fn(&T) -> &I) -> Diff<I>
where
    T: PartialEq,
    I: Clone + Ord + AsRef<str>,
{
    let old = before
        .iter()
        .map(|item| (id_of(item).as_ref(), item))
        .collect::<HashMap<_, _>>();
    let new = after
        .iter()
        .map(|item| (id_of(item).as_ref(), item))
        .collect::<HashMap<_, _>>();

    let mut added = Vec::new();
    let mut updated = Vec::new();
    for item in after {
        let id = id_of(item);
        match old.get(id.as_ref()) {
            None => added.push(id.clone()),
            Some(previous) if *previous != item => updated.push(id.clone()),
            Some(_) => {}
        }
    }
    let mut removed = Vec::new();
    for item in before {
        let id = id_of(item);
        if !new.contains_key(id.as_ref()) {
            removed.push(id.clone());
        }
    }

    added.sort();
    removed.sort();
    updated.sort();
    (added, removed, updated)
}

/// Runs one op against `snapshot`.
pub fn apply(snapshot: &Snapshot, op: &GraphOp) -> Result<Applied, EditRejected> {
    let (next, created) = match op {
        GraphOp::AddNode {
            parent_id,
            text,
            position,
        } => {
            let (next, node_id) = add_node(snapshot, parent_id.as_ref(), text.clone(), *position)?;
            (next, vec![node_id])
        }
        GraphOp::AddChildNode {
            parent_id,
            text,
            placement,
        } => {
            let (next, node_id) = add_child_node(snapshot, parent_id, text.clone(), *placement)?;
            (next, vec![node_id])
        }
        GraphOp::UpdateNode { node_id, patch } => (update_node(snapshot, node_id, patch)?, vec![]),
        GraphOp::UpdateNodesStyle { node_ids, style } => {
            (update_nodes_style(snapshot, node_ids, style)?, vec![])
        }
        GraphOp::DeleteNodes { node_ids } => (delete_selected(snapshot, node_ids)?, vec![]),
        GraphOp::ToggleDetached { node_id } => (toggle_detached(snapshot, node_id)?, vec![]),
        GraphOp::AddConnection { from, to } => {
            let (next, _) = add_connection(snapshot, from, to)?;
            (next, vec![])
        }
        GraphOp::UpdateConnection {
            connection_id,
            patch,
        } => (update_connection(snapshot, connection_id, patch)?, vec![]),
        GraphOp::DeleteConnection { connection_id } => {
            (delete_connection(snapshot, connection_id)?, vec![])
        }
        GraphOp::ReorderSibling { node_id, direction } => {
            (reorder_sibling(snapshot, node_id, *direction)?, vec![])
        }
        GraphOp::AutoLayout { root_id, spacing } => {
            (auto_layout(snapshot, root_id, *spacing)?, vec![])
        }
        GraphOp::Paste { clipboard, offset } => paste(snapshot, clipboard, *offset)?,
        GraphOp::Replace { snapshot: next } => {
            if next.is_empty() {
                return Err(EditRejected::EmptySelection);
            }
            (next.clone(), vec![])
        }
    };

    let delta = EditDelta::between(snapshot, &next);
    Ok(Applied {
        snapshot: next,
        created,
        delta,
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditRejected {
    SoleRoot { node_id: NodeId },
    SelfLoop { node_id: NodeId },
    DuplicateConnection { from: NodeId, to: NodeId },
    UnknownNode { node_id: NodeId },
    UnknownConnection { connection_id: ConnectionId },
    EmptySelection,
    ParentCycle { node_id: NodeId, parent_id: NodeId },
    AtSiblingBoundary { node_id: NodeId },
}

impl fmt::Display for EditRejected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SoleRoot { node_id } => write!(f, "the root node cannot be deleted (id={node_id})"),
            Self::SelfLoop { node_id } => {
                write!(f, "a node cannot be connected to itself (id={node_id})")
            }
            Self::DuplicateConnection { from, to } => {
                write!(f, "nodes are already connected (from={from}, to={to})")
            }
            Self::UnknownNode { node_id } => write!(f, "node not found (id={node_id})"),
            Self::UnknownConnection { connection_id } => {
                write!(f, "connection not found (id={connection_id})")
            }
            Self::EmptySelection => f.write_str("nothing to act on"),
            Self::ParentCycle { node_id, parent_id } => {
                write!(f, "node {node_id} cannot be placed under its own subtree ({parent_id})")
            }
            Self::AtSiblingBoundary { node_id } => {
                write!(f, "node cannot move further among its siblings (id={node_id})")
            }
        }
    }
}

impl std::error::Error for EditRejected {}

fn unknown_node(node_id: &NodeId) -> EditRejected {
    EditRejected::UnknownNode {
        node_id: node_id.clone(),
    }
}

// Single-snapshot node and connection edits.
include!("ops_impl.rs");
