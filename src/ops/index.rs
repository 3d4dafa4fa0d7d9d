// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindweave-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindweave and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::HashMap;

use smallvec::SmallVec;

use crate::model::{Node, NodeId};

type Slots = SmallVec<[usize; 4]>;

/// Id lookups over a node array: id → position, and parent id → child positions.
///
/// Built once per operation so every lookup inside the operation is a hash probe instead of an
/// array scan. Child positions keep array order. Parent keys need not resolve: children of a
/// missing parent are still grouped under that id.
#[derive(Debug)]
pub struct GraphIndex<'a> {
    nodes: &'a [Node],
    positions: HashMap<&'a str, usize>,
    children: HashMap<&'a str, Slots>,
}

impl<'a> GraphIndex<'a> {
    pub fn new(nodes: &'a [Node]) -> Self {
        let mut positions = HashMap::with_capacity(nodes.len());
        let mut children: HashMap<&'a str, Slots> = HashMap::new();
        for (idx, node) in nodes.iter().enumerate() {
            positions.insert(node.id.as_str(), idx);
            if let Some(parent_id) = &node.parent_id {
                children.entry(parent_id.as_str()).or_default().push(idx);
            }
        }

        Self {
            nodes,
            positions,
            children,
        }
    }

    pub fn nodes(&self) -> &'a [Node] {
        self.nodes
    }

    pub fn position(&self, node_id: &NodeId) -> Option<usize> {
        self.positions.get(node_id.as_str()).copied()
    }

    pub fn node(&self, node_id: &NodeId) -> Option<&'a Node> {
        self.position(node_id).map(|idx| &self.nodes[idx])
    }

    pub fn contains(&self, node_id: &NodeId) -> bool {
        self.positions.contains_key(node_id.as_str())
    }

    /// Positions of the direct children of `node_id` (detached ones included), in array order.
    pub fn child_positions(&self, node_id: &NodeId) -> &[usize] {
        self.children
            .get(node_id.as_str())
            .map(|slots| slots.as_slice())
            .unwrap_or(&[])
    }

    pub fn children(&self, node_id: &NodeId) -> impl Iterator<Item = &'a Node> + '_ {
        let nodes = self.nodes;
        self.child_positions(node_id).iter().map(move |&idx| &nodes[idx])
    }

    /// Children that follow their parent: everything but detached nodes.
    pub fn attached_children(&self, node_id: &NodeId) -> impl Iterator<Item = &'a Node> + '_ {
        self.children(node_id).filter(|child| !child.is_detached)
    }

    /// The document root: the first node without a parent.
    pub fn primary_root(&self) -> Option<&'a Node> {
        self.nodes.iter().find(|node| node.is_root())
    }

    /// Positions of every node below `node_id`, depth-first pre-order. Safe against parent
    /// cycles; `node_id` itself is never part of the result.
    pub fn descendant_positions(&self, node_id: &NodeId) -> Vec<usize> {
        let mut seen = vec![false; self.nodes.len()];
        if let Some(start) = self.position(node_id) {
            seen[start] = true;
        }

        let mut out = Vec::new();
        let mut stack = self
            .child_positions(node_id)
            .iter()
            .rev()
            .copied()
            .collect::<Vec<_>>();
        while let Some(idx) = stack.pop() {
            if seen[idx] {
                continue;
            }
            seen[idx] = true;
            out.push(idx);
            stack.extend(self.child_positions(&self.nodes[idx].id).iter().rev().copied());
        }
        out
    }

    /// Ids from the topmost reachable ancestor down to `node_id`. Empty when `node_id` is
    /// unknown. A parent cycle stops the walk at the first repeated node.
    pub fn path_to_root(&self, node_id: &NodeId) -> Vec<NodeId> {
        let mut seen = vec![false; self.nodes.len()];
        let mut path = Vec::new();
        let mut current = self.position(node_id);
        while let Some(idx) = current {
            if seen[idx] {
                break;
            }
            seen[idx] = true;
            let node = &self.nodes[idx];
            path.push(node.id.clone());
            current = node.parent_id.as_ref().and_then(|parent| self.position(parent));
        }
        path.reverse();
        path
    }

    /// True if `candidate` is `node_id` or lies below it.
    pub fn is_self_or_descendant(&self, node_id: &NodeId, candidate: &NodeId) -> bool {
        if node_id == candidate {
            return true;
        }
        self.path_to_root(candidate).iter().any(|id| id == node_id)
    }
}
