// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindweave-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindweave and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Transient pointer drag of a node.
//!
//! A session keeps the node array from when the drag began and a preview copy. Each move
//! rewrites only the dragged node and its direct children in the preview, always relative to
//! the baseline, so repeated moves never accumulate error. Nothing is committed until
//! [`DragSession::end`].

use smallvec::SmallVec;

use crate::model::{Node, NodeId, Point, Snapshot};
use crate::ops::GraphIndex;

#[derive(Debug, Clone)]
pub struct DragSession {
    node_id: NodeId,
    start_pointer: Point,
    dragged: usize,
    /// Direct children of the dragged node; empty when the dragged node is detached.
    followers: SmallVec<[usize; 8]>,
    baseline: Vec<Node>,
    preview: Vec<Node>,
}

impl DragSession {
    /// Starts dragging `node_id`. `None` if the node is not in `snapshot`.
    pub fn begin(node_id: &NodeId, pointer: Point, snapshot: &Snapshot) -> Option<Self> {
        let index = GraphIndex::new(&snapshot.nodes);
        let dragged = index.position(node_id)?;
        let followers = if snapshot.nodes[dragged].is_detached {
            SmallVec::new()
        } else {
            index.child_positions(node_id).iter().copied().collect()
        };

        Some(Self {
            node_id: node_id.clone(),
            start_pointer: pointer,
            dragged,
            followers,
            baseline: snapshot.nodes.clone(),
            preview: snapshot.nodes.clone(),
        })
    }

    pub fn node_id(&self) -> &NodeId {
        &self.node_id
    }

    /// Moves the dragged node to follow `pointer`. The pointer delta is divided by the viewport
    /// `scale`; a non-positive or non-finite scale counts as 1. With `propagate`, direct
    /// children move by the same offset.
    pub fn move_to(&mut self, pointer: Point, scale: f64, propagate: bool) -> &[Node] {
        let scale = if scale.is_finite() && scale > 0.0 {
            scale
        } else {
            1.0
        };
        let offset = (pointer - self.start_pointer).scaled(1.0 / scale);

        let origin = self.baseline[self.dragged].position();
        self.preview[self.dragged].set_position(origin + offset);
        for &child in &self.followers {
            let base = self.baseline[child].position();
            let target = if propagate { base + offset } else { base };
            self.preview[child].set_position(target);
        }

        &self.preview
    }

    /// Current node positions, including the in-flight move.
    pub fn preview(&self) -> &[Node] {
        &self.preview
    }

    pub fn has_moved(&self) -> bool {
        self.preview[self.dragged].position() != self.baseline[self.dragged].position()
            || self
                .followers
                .iter()
                .any(|&child| self.preview[child].position() != self.baseline[child].position())
    }

    /// Finishes the drag. Returns `current` with the previewed nodes, or `None` when nothing
    /// moved (a click, or a drag back to the start).
    pub fn end(self, current: &Snapshot) -> Option<Snapshot> {
        if !self.has_moved() {
            return None;
        }
        Some(current.with_nodes(self.preview))
    }
}

#[cfg(test)]
mod tests {
    use super::DragSession;
    use crate::model::{Node, NodeId, Point, Snapshot};

    fn id(raw: &str) -> NodeId {
        NodeId::new(raw).expect("id")
    }

    fn at(raw: &str, parent: Option<&str>, x: f64, y: f64) -> Node {
        Node::new(id(raw), raw, Point::new(x, y)).with_parent(parent.map(id))
    }

    fn doc() -> Snapshot {
        Snapshot::new(
            vec![
                at("r", None, 0.0, 0.0),
                at("a", Some("r"), 100.0, 0.0),
                at("a1", Some("a"), 200.0, 0.0),
                at("a2", Some("a"), 200.0, 50.0),
                at("a11", Some("a1"), 300.0, 0.0),
            ],
            vec![],
        )
    }

    fn position(nodes: &[Node], raw: &str) -> Point {
        nodes
            .iter()
            .find(|n| n.id.as_str() == raw)
            .map(Node::position)
            .expect("node")
    }

    #[test]
    fn unknown_node_cannot_be_dragged() {
        assert!(DragSession::begin(&id("ghost"), Point::ORIGIN, &doc()).is_none());
    }

    #[test]
    fn click_without_move_commits_nothing() {
        let snapshot = doc();
        let session = DragSession::begin(&id("a"), Point::new(5.0, 5.0), &snapshot).expect("begin");
        assert_eq!(session.end(&snapshot), None);
    }

    #[test]
    fn drag_moves_node_and_direct_children_only() {
        let snapshot = doc();
        let mut session =
            DragSession::begin(&id("a"), Point::new(10.0, 10.0), &snapshot).expect("begin");
        let preview = session.move_to(Point::new(30.0, 50.0), 2.0, true);

        assert_eq!(position(preview, "a"), Point::new(110.0, 20.0));
        assert_eq!(position(preview, "a1"), Point::new(210.0, 20.0));
        assert_eq!(position(preview, "a2"), Point::new(210.0, 70.0));
        assert_eq!(position(preview, "a11"), Point::new(300.0, 0.0));
        assert_eq!(position(preview, "r"), Point::ORIGIN);

        let committed = session.end(&snapshot).expect("moved");
        assert_eq!(position(&committed.nodes, "a1"), Point::new(210.0, 20.0));
    }

    #[test]
    fn moves_are_relative_to_the_baseline() {
        let snapshot = doc();
        let mut session = DragSession::begin(&id("a"), Point::ORIGIN, &snapshot).expect("begin");
        session.move_to(Point::new(40.0, 0.0), 1.0, true);
        session.move_to(Point::new(10.0, 0.0), 1.0, false);

        let preview = session.preview();
        assert_eq!(position(preview, "a"), Point::new(110.0, 0.0));
        assert_eq!(position(preview, "a1"), Point::new(200.0, 0.0), "children reset");
    }

    #[test]
    fn detached_node_leaves_children_behind() {
        let mut snapshot = doc();
        snapshot.nodes[1].is_detached = true;
        let mut session = DragSession::begin(&id("a"), Point::ORIGIN, &snapshot).expect("begin");
        let preview = session.move_to(Point::new(5.0, 5.0), 1.0, true);

        assert_eq!(position(preview, "a"), Point::new(105.0, 5.0));
        assert_eq!(position(preview, "a1"), Point::new(200.0, 0.0));
    }

    #[test]
    fn dragging_back_to_start_is_a_no_op() {
        let snapshot = doc();
        let mut session = DragSession::begin(&id("a"), Point::ORIGIN, &snapshot).expect("begin");
        session.move_to(Point::new(25.0, 25.0), 1.0, true);
        session.move_to(Point::ORIGIN, 1.0, true);
        assert!(!session.has_moved());
        assert_eq!(session.end(&snapshot), None);
    }

    #[test]
    fn invalid_scale_counts_as_one() {
        let snapshot = doc();
        let mut session = DragSession::begin(&id("r"), Point::ORIGIN, &snapshot).expect("begin");
        let preview = session.move_to(Point::new(4.0, 4.0), 0.0, false);
        assert_eq!(position(preview, "r"), Point::new(4.0, 4.0));
    }
}
