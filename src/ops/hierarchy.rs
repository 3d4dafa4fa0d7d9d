// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindweave-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindweave and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Queries and edits that follow parent links: subtree walks, sibling order, tree layout and
//! keyboard navigation.

use super::{unknown_node, EditRejected, GraphIndex};
use crate::model::{Node, NodeId, Point, Snapshot};

/// Every node below `node_id`, depth-first pre-order.
pub fn descendants(nodes: &[Node], node_id: &NodeId) -> Vec<NodeId> {
    GraphIndex::new(nodes)
        .descendant_positions(node_id)
        .into_iter()
        .map(|idx| nodes[idx].id.clone())
        .collect()
}

/// Ancestor chain of `node_id`, topmost ancestor first, ending with `node_id` itself.
pub fn path_to_root(nodes: &[Node], node_id: &NodeId) -> Vec<NodeId> {
    GraphIndex::new(nodes).path_to_root(node_id)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiblingMove {
    Earlier,
    Later,
}

/// Swaps `order` with the neighbouring sibling, then stably sorts all nodes by `order`.
pub fn reorder_sibling(
    snapshot: &Snapshot,
    node_id: &NodeId,
    direction: SiblingMove,
) -> Result<Snapshot, EditRejected> {
    let index = GraphIndex::new(&snapshot.nodes);
    let node = index.node(node_id).ok_or_else(|| unknown_node(node_id))?;
    let boundary = || EditRejected::AtSiblingBoundary {
        node_id: node_id.clone(),
    };
    let Some(parent_id) = &node.parent_id else {
        return Err(boundary());
    };

    let siblings = index.child_positions(parent_id);
    let Some(current) = siblings.iter().position(|&idx| snapshot.nodes[idx].id == *node_id) else {
        return Err(boundary());
    };
    let target = match direction {
        SiblingMove::Earlier => current.checked_sub(1),
        SiblingMove::Later => Some(current + 1).filter(|&next| next < siblings.len()),
    }
    .ok_or_else(boundary)?;

    let mut nodes = snapshot.nodes.clone();
    nodes[siblings[current]].order = target as i64;
    nodes[siblings[target]].order = current as i64;
    nodes.sort_by_key(|node| node.order);
    Ok(snapshot.with_nodes(nodes))
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutSpacing {
    pub horizontal: f64,
    pub vertical: f64,
}

impl Default for LayoutSpacing {
    fn default() -> Self {
        Self {
            horizontal: 200.0,
            vertical: 120.0,
        }
    }
}

/// Lays out the attached subtree of `root_id` as a left-to-right tree. The root keeps its
/// position; each depth level sits `horizontal` further right and every leaf gets its own
/// `vertical` band, with parents centered on their children. Detached nodes and everything
/// below them keep their positions.
pub fn auto_layout(
    snapshot: &Snapshot,
    root_id: &NodeId,
    spacing: LayoutSpacing,
) -> Result<Snapshot, EditRejected> {
    let index = GraphIndex::new(&snapshot.nodes);
    let root_idx = index.position(root_id).ok_or_else(|| unknown_node(root_id))?;

    let mut layout = Layout {
        index: &index,
        spacing,
        visited: vec![false; snapshot.nodes.len()],
        weights: vec![0; snapshot.nodes.len()],
        positions: vec![None; snapshot.nodes.len()],
    };
    let weight = layout.weigh(root_idx);
    layout.visited.fill(false);

    let origin = snapshot.nodes[root_idx].position();
    let top = origin.y - (weight as f64 - 1.0) * spacing.vertical / 2.0;
    layout.place(root_idx, 0, top, origin.x);

    let mut nodes = snapshot.nodes.clone();
    for (node, position) in nodes.iter_mut().zip(layout.positions) {
        if let Some(position) = position {
            node.set_position(position);
        }
    }
    Ok(snapshot.with_nodes(nodes))
}

struct Layout<'i, 'a> {
    index: &'i GraphIndex<'a>,
    spacing: LayoutSpacing,
    visited: Vec<bool>,
    /// Leaf count of each subtree, at least 1.
    weights: Vec<usize>,
    positions: Vec<Option<Point>>,
}

impl Layout<'_, '_> {
    fn attached_children(&self, idx: usize) -> Vec<usize> {
        let nodes = self.index.nodes();
        self.index
            .child_positions(&nodes[idx].id)
            .iter()
            .copied()
            .filter(|&child| !nodes[child].is_detached)
            .collect()
    }

    fn weigh(&mut self, idx: usize) -> usize {
        self.visited[idx] = true;
        let mut weight = 0;
        for child in self.attached_children(idx) {
            if !self.visited[child] {
                weight += self.weigh(child);
            }
        }
        self.weights[idx] = weight.max(1);
        self.weights[idx]
    }

    fn place(&mut self, idx: usize, depth: usize, top: f64, origin_x: f64) {
        self.visited[idx] = true;
        let weight = self.weights[idx] as f64;
        let y = top + (weight - 1.0) * self.spacing.vertical / 2.0;
        self.positions[idx] = Some(Point::new(
            origin_x + depth as f64 * self.spacing.horizontal,
            y,
        ));

        let mut band_top = top;
        for child in self.attached_children(idx) {
            if self.visited[child] {
                continue;
            }
            self.place(child, depth + 1, band_top, origin_x);
            band_top += self.weights[child] as f64 * self.spacing.vertical;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Arrow-key navigation from `node_id`.
///
/// - `Right`: the topmost attached child.
/// - `Left`: the parent, unless the node is detached.
/// - `Up` / `Down`: the previous / next sibling by `y`, wrapping around. Parent-less nodes are
///   siblings of each other.
pub fn neighbor(nodes: &[Node], node_id: &NodeId, direction: Direction) -> Option<NodeId> {
    let index = GraphIndex::new(nodes);
    let current = index.node(node_id)?;

    match direction {
        Direction::Right => index
            .attached_children(node_id)
            .min_by(|a, b| a.y.total_cmp(&b.y))
            .map(|child| child.id.clone()),
        Direction::Left => {
            if current.is_detached {
                return None;
            }
            current
                .parent_id
                .as_ref()
                .and_then(|parent_id| index.node(parent_id))
                .map(|parent| parent.id.clone())
        }
        Direction::Up | Direction::Down => {
            let mut siblings = nodes
                .iter()
                .filter(|node| node.parent_id == current.parent_id && node.id != *node_id)
                .collect::<Vec<_>>();
            siblings.sort_by(|a, b| a.y.total_cmp(&b.y));
            let first = siblings.first()?;
            let last = siblings.last()?;

            let picked = if direction == Direction::Down {
                siblings.iter().find(|s| s.y > current.y).unwrap_or(first)
            } else {
                match siblings.iter().position(|s| s.y >= current.y) {
                    Some(at) if at > 0 => &siblings[at - 1],
                    _ => last,
                }
            };
            Some(picked.id.clone())
        }
    }
}
