// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindweave-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindweave and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Conversion between the flat runtime node array and the nested tree used for storage.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::model::{Node, NodeId};

/// A node plus its nested children, as written to the persisted `tree` array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeNode {
    #[serde(flatten)]
    pub node: Node,
    #[serde(default)]
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn leaf(node: Node) -> Self {
        Self {
            node,
            children: Vec::new(),
        }
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn subtree_size(&self) -> usize {
        1 + self.children.iter().map(TreeNode::subtree_size).sum::<usize>()
    }
}

type ChildSlots = SmallVec<[usize; 4]>;

struct Grouping {
    roots: Vec<usize>,
    children: HashMap<usize, ChildSlots>,
}

/// Groups node positions by parent. A node whose parent id is absent or does not resolve in
/// `nodes` becomes a root; children keep input order.
fn group_by_parent(nodes: &[Node]) -> Grouping {
    let mut position_by_id = HashMap::with_capacity(nodes.len());
    for (idx, node) in nodes.iter().enumerate() {
        position_by_id.insert(node.id.as_str(), idx);
    }

    let mut roots = Vec::new();
    let mut children: HashMap<usize, ChildSlots> = HashMap::new();
    for (idx, node) in nodes.iter().enumerate() {
        match node
            .parent_id
            .as_ref()
            .and_then(|parent| position_by_id.get(parent.as_str()))
        {
            Some(&parent_idx) => children.entry(parent_idx).or_default().push(idx),
            None => roots.push(idx),
        }
    }

    Grouping { roots, children }
}

fn build_subtree(nodes: &[Node], grouping: &Grouping, idx: usize, placed: &mut [bool]) -> TreeNode {
    placed[idx] = true;
    let mut children = Vec::new();
    if let Some(slots) = grouping.children.get(&idx) {
        for &child in slots {
            if !placed[child] {
                children.push(build_subtree(nodes, grouping, child, placed));
            }
        }
    }

    TreeNode {
        node: nodes[idx].clone(),
        children,
    }
}

/// Flat → nested.
///
/// Nodes that cannot be reached from any root (a parent cycle) are not part of the result;
/// see [`unreachable_nodes`].
pub fn to_tree(nodes: &[Node]) -> Vec<TreeNode> {
    let grouping = group_by_parent(nodes);
    let mut placed = vec![false; nodes.len()];

    let roots = grouping
        .roots
        .iter()
        .map(|&idx| build_subtree(nodes, &grouping, idx, &mut placed))
        .collect::<Vec<_>>();

    let dropped = placed.iter().filter(|p| !**p).count();
    if dropped > 0 {
        tracing::warn!(dropped, total = nodes.len(), "nodes unreachable from any root were dropped");
    }

    roots
}

/// Ids of nodes that [`to_tree`] would drop because no root reaches them.
pub fn unreachable_nodes(nodes: &[Node]) -> Vec<NodeId> {
    let grouping = group_by_parent(nodes);
    let mut reached = vec![false; nodes.len()];
    let mut stack = grouping.roots.clone();
    while let Some(idx) = stack.pop() {
        if reached[idx] {
            continue;
        }
        reached[idx] = true;
        if let Some(children) = grouping.children.get(&idx) {
            stack.extend(children.iter().copied());
        }
    }

    nodes
        .iter()
        .zip(reached)
        .filter(|(_, reached)| !reached)
        .map(|(node, _)| node.id.clone())
        .collect()
}

/// Nested → flat, in pre-order. Each node's `parent_id` is stamped from the subtree it was
/// found in; roots get none.
pub fn to_flat(roots: &[TreeNode]) -> Vec<Node> {
    let mut out = Vec::with_capacity(roots.iter().map(TreeNode::subtree_size).sum());
    let mut stack: Vec<(&TreeNode, Option<&NodeId>)> =
        roots.iter().rev().map(|root| (root, None)).collect();

    while let Some((tree_node, parent_id)) = stack.pop() {
        let mut node = tree_node.node.clone();
        node.parent_id = parent_id.cloned();
        out.push(node);

        for child in tree_node.children.iter().rev() {
            stack.push((child, Some(&tree_node.node.id)));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{to_flat, to_tree, unreachable_nodes, TreeNode};
    use crate::model::{Node, NodeId, Point};

    fn node(id: &str, parent: Option<&str>) -> Node {
        Node::new(NodeId::new(id).expect("node id"), id, Point::new(1.0, 2.0))
            .with_parent(parent.map(|p| NodeId::new(p).expect("parent id")))
    }

    fn pairs(nodes: &[Node]) -> Vec<(String, Option<String>)> {
        let mut pairs = nodes
            .iter()
            .map(|n| (n.id.to_string(), n.parent_id.as_ref().map(ToString::to_string)))
            .collect::<Vec<_>>();
        pairs.sort();
        pairs
    }

    #[test]
    fn single_tree_round_trips() {
        let nodes = vec![
            node("root", None),
            node("a", Some("root")),
            node("b", Some("a")),
            node("c", Some("root")),
            node("d", Some("b")),
        ];

        let tree = to_tree(&nodes);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].subtree_size(), 5);

        let flat = to_flat(&tree);
        assert_eq!(pairs(&flat), pairs(&nodes));
        for original in &nodes {
            let restored = flat.iter().find(|n| n.id == original.id).expect("restored");
            assert_eq!(restored, original);
        }
    }

    #[test]
    fn children_keep_input_order_not_order_field() {
        let mut second = node("second", Some("root"));
        second.order = 0;
        let mut first = node("first", Some("root"));
        first.order = 5;
        let nodes = vec![node("root", None), first, second];

        let tree = to_tree(&nodes);
        let child_ids = tree[0]
            .children
            .iter()
            .map(|c| c.node.id.as_str())
            .collect::<Vec<_>>();
        assert_eq!(child_ids, vec!["first", "second"]);
    }

    #[test]
    fn flat_output_is_pre_order() {
        let tree = to_tree(&[
            node("root", None),
            node("a", Some("root")),
            node("b", Some("root")),
            node("a1", Some("a")),
        ]);
        let order = to_flat(&tree)
            .into_iter()
            .map(|n| n.id.into_string())
            .collect::<Vec<_>>();
        assert_eq!(order, vec!["root", "a", "a1", "b"]);
    }

    #[rstest]
    #[case::missing_parent(vec![node("root", None), node("orphan", Some("gone"))], 2)]
    #[case::two_floating_roots(vec![node("root", None), node("floating", None)], 2)]
    #[case::single_root(vec![node("root", None), node("a", Some("root"))], 1)]
    fn dangling_parents_become_roots(#[case] nodes: Vec<Node>, #[case] expected_roots: usize) {
        let tree = to_tree(&nodes);
        assert_eq!(tree.len(), expected_roots);
        assert!(unreachable_nodes(&nodes).is_empty());

        let flat = to_flat(&tree);
        assert_eq!(flat.len(), nodes.len());
    }

    #[test]
    fn dangling_parent_is_cleared_on_round_trip() {
        let nodes = vec![node("root", None), node("orphan", Some("gone"))];
        let flat = to_flat(&to_tree(&nodes));
        let orphan = flat.iter().find(|n| n.id.as_str() == "orphan").expect("orphan");
        assert_eq!(orphan.parent_id, None);
    }

    #[test]
    fn parent_cycles_are_dropped_and_reported() {
        let nodes = vec![
            node("root", None),
            node("x", Some("y")),
            node("y", Some("x")),
            node("self", Some("self")),
        ];

        let unreachable = unreachable_nodes(&nodes)
            .into_iter()
            .map(NodeId::into_string)
            .collect::<Vec<_>>();
        assert_eq!(unreachable, vec!["x", "y", "self"]);

        let flat = to_flat(&to_tree(&nodes));
        assert_eq!(flat.len(), 1);
        assert_eq!(flat[0].id.as_str(), "root");
    }

    #[test]
    fn tree_json_nests_children_and_drops_key_on_flatten() {
        let tree = to_tree(&[node("root", None), node("a", Some("root"))]);
        let json = serde_json::to_value(&tree).expect("serialize");
        assert_eq!(json[0]["id"], "root");
        assert_eq!(json[0]["children"][0]["id"], "a");

        let decoded: Vec<TreeNode> = serde_json::from_value(json).expect("deserialize");
        let flat = to_flat(&decoded);
        let value = serde_json::to_value(&flat[1]).expect("serialize node");
        assert!(value.get("children").is_none());
        assert_eq!(value["parentId"], "root");
    }
}
