// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindweave-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindweave and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

#![allow(dead_code)]

// Shared deterministic benchmark fixtures (no RNG).

use mindweave::model::{Connection, ConnectionId, Node, NodeId, Point, Snapshot};

#[derive(Debug, Clone, Copy)]
pub enum Case {
    /// 1 + 4 + 16 nodes.
    Small,
    /// 1 + 6 + 36 + 216 nodes.
    Medium,
    /// 1 + 8 + 64 + 512 + 4096 nodes.
    Large,
}

impl Case {
    pub fn id(self) -> &'static str {
        match self {
            Case::Small => "small",
            Case::Medium => "medium",
            Case::Large => "large",
        }
    }

    fn shape(self) -> (usize, usize) {
        match self {
            Case::Small => (4, 2),
            Case::Medium => (6, 3),
            Case::Large => (8, 4),
        }
    }
}

pub fn node_id(idx: usize) -> NodeId {
    NodeId::new(format!("n{idx:06}")).expect("node id")
}

/// A full tree with `fanout` children per node down to `depth`, plus one free connection per
/// ten nodes. Every fifth node is detached.
pub fn tree(case: Case) -> Snapshot {
    let (fanout, depth) = case.shape();
    let mut nodes = vec![Node::new(node_id(0), "root", Point::new(400.0, 300.0))];
    let mut level = vec![0usize];

    for generation in 1..=depth {
        let mut next = Vec::with_capacity(level.len() * fanout);
        for &parent in &level {
            for slot in 0..fanout {
                let idx = nodes.len();
                let parent_pos = nodes[parent].position();
                let mut node = Node::new(
                    node_id(idx),
                    format!("node {idx}"),
                    parent_pos + Point::new(200.0, (slot as f64 - fanout as f64 / 2.0) * 40.0),
                )
                .with_parent(Some(node_id(parent)));
                node.order = slot as i64;
                node.is_detached = idx % 5 == 0 && generation > 1;
                nodes.push(node);
                next.push(idx);
            }
        }
        level = next;
    }

    let connections = (0..nodes.len() / 10)
        .map(|idx| {
            let from = node_id(idx * 7 % nodes.len());
            let to = node_id((idx * 7 + 3) % nodes.len());
            Connection::new(
                ConnectionId::new(format!("c{idx:06}")).expect("connection id"),
                from,
                to,
            )
        })
        .collect();

    Snapshot::new(nodes, connections)
}

/// First child of the root; it has children in every case.
pub fn first_branch() -> NodeId {
    node_id(1)
}
