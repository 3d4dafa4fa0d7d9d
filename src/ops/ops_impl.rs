// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindweave-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindweave and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

// Node and connection edits used by `apply`.
// Keeps `ops::mod` focused on op types and dispatch.

/// Adds a node. With a parent and no explicit position the node lands `PARENT_OFFSET_X` to the
/// right of the parent; a parent-less node without a position lands at the origin.
pub fn add_node(
    snapshot: &Snapshot,
    parent_id: Option<&NodeId>,
    text: impl Into<String>,
    position: Option<Point>,
) -> Result<(Snapshot, NodeId), EditRejected> {
    let index = GraphIndex::new(&snapshot.nodes);
    let (position, order) = match parent_id {
        Some(parent_id) => {
            let parent = index.node(parent_id).ok_or_else(|| unknown_node(parent_id))?;
            let position = position
                .unwrap_or_else(|| parent.position() + Point::new(PARENT_OFFSET_X, 0.0));
            (position, index.child_positions(parent_id).len())
        }
        None => (position.unwrap_or_default(), 0),
    };

    let node_id = NodeId::generate();
    let mut node = Node::new(node_id.clone(), text, position).with_parent(parent_id.cloned());
    node.order = order as i64;

    let mut nodes = snapshot.nodes.clone();
    nodes.push(node);
    Ok((snapshot.with_nodes(nodes), node_id))
}

/// Adds a child on a ring around its parent. The k-th attached child (detached ones do not
/// count) sits at `k * angle_step_deg` degrees, `distance` away.
pub fn add_child_node(
    snapshot: &Snapshot,
    parent_id: &NodeId,
    text: impl Into<String>,
    placement: ChildPlacement,
) -> Result<(Snapshot, NodeId), EditRejected> {
    let index = GraphIndex::new(&snapshot.nodes);
    let parent = index.node(parent_id).ok_or_else(|| unknown_node(parent_id))?;
    let slot = index.attached_children(parent_id).count();
    let position = parent
        .position()
        .polar_offset(slot as f64 * placement.angle_step_deg, placement.distance);

    add_node(snapshot, Some(parent_id), text, Some(position))
}

pub fn update_node(
    snapshot: &Snapshot,
    node_id: &NodeId,
    patch: &NodePatch,
) -> Result<Snapshot, EditRejected> {
    let index = GraphIndex::new(&snapshot.nodes);
    let position = index.position(node_id).ok_or_else(|| unknown_node(node_id))?;

    if let Some(Some(parent_id)) = &patch.parent_id {
        if !index.contains(parent_id) {
            return Err(unknown_node(parent_id));
        }
        if index.is_self_or_descendant(node_id, parent_id) {
            return Err(EditRejected::ParentCycle {
                node_id: node_id.clone(),
                parent_id: parent_id.clone(),
            });
        }
    }

    let mut nodes = snapshot.nodes.clone();
    nodes[position].apply_patch(patch);
    Ok(snapshot.with_nodes(nodes))
}

/// Merges `style` into each listed node's style. Unknown ids are skipped; if none resolve the
/// edit is rejected.
pub fn update_nodes_style(
    snapshot: &Snapshot,
    node_ids: &[NodeId],
    style: &Style,
) -> Result<Snapshot, EditRejected> {
    if node_ids.is_empty() {
        return Err(EditRejected::EmptySelection);
    }
    let index = GraphIndex::new(&snapshot.nodes);
    let positions = node_ids
        .iter()
        .filter_map(|id| index.position(id))
        .collect::<Vec<_>>();
    if positions.is_empty() {
        return Err(unknown_node(&node_ids[0]));
    }

    let mut nodes = snapshot.nodes.clone();
    for position in positions {
        nodes[position].merge_style(style);
    }
    Ok(snapshot.with_nodes(nodes))
}

/// Removes the selection together with every descendant, and every connection touching a
/// removed node. Selecting the document root rejects the whole edit.
pub fn delete_selected(snapshot: &Snapshot, node_ids: &[NodeId]) -> Result<Snapshot, EditRejected> {
    if node_ids.is_empty() {
        return Err(EditRejected::EmptySelection);
    }
    let index = GraphIndex::new(&snapshot.nodes);
    if let Some(root) = index.primary_root() {
        if node_ids.contains(&root.id) {
            return Err(EditRejected::SoleRoot {
                node_id: root.id.clone(),
            });
        }
    }

    let mut doomed = vec![false; snapshot.nodes.len()];
    let mut resolved = false;
    for node_id in node_ids {
        let Some(position) = index.position(node_id) else {
            continue;
        };
        resolved = true;
        doomed[position] = true;
        for below in index.descendant_positions(node_id) {
            doomed[below] = true;
        }
    }
    if !resolved {
        return Err(unknown_node(&node_ids[0]));
    }

    let removed = snapshot
        .nodes
        .iter()
        .zip(&doomed)
        .filter(|(_, doomed)| **doomed)
        .map(|(node, _)| node.id.as_str())
        .collect::<std::collections::HashSet<_>>();

    let nodes = snapshot
        .nodes
        .iter()
        .zip(&doomed)
        .filter(|(_, doomed)| !**doomed)
        .map(|(node, _)| node.clone())
        .collect();
    let connections = snapshot
        .connections
        .iter()
        .filter(|conn| {
            !removed.contains(conn.from.as_str()) && !removed.contains(conn.to.as_str())
        })
        .cloned()
        .collect();

    Ok(Snapshot::new(nodes, connections))
}

pub fn toggle_detached(snapshot: &Snapshot, node_id: &NodeId) -> Result<Snapshot, EditRejected> {
    let position = GraphIndex::new(&snapshot.nodes)
        .position(node_id)
        .ok_or_else(|| unknown_node(node_id))?;

    let mut nodes = snapshot.nodes.clone();
    nodes[position].is_detached = !nodes[position].is_detached;
    Ok(snapshot.with_nodes(nodes))
}

/// Links two nodes. At most one connection exists per unordered pair.
pub fn add_connection(
    snapshot: &Snapshot,
    from: &NodeId,
    to: &NodeId,
) -> Result<(Snapshot, ConnectionId), EditRejected> {
    if from == to {
        return Err(EditRejected::SelfLoop {
            node_id: from.clone(),
        });
    }
    let index = GraphIndex::new(&snapshot.nodes);
    for endpoint in [from, to] {
        if !index.contains(endpoint) {
            return Err(unknown_node(endpoint));
        }
    }
    if snapshot.connections.iter().any(|conn| conn.joins(from, to)) {
        return Err(EditRejected::DuplicateConnection {
            from: from.clone(),
            to: to.clone(),
        });
    }

    let connection_id = ConnectionId::generate();
    let mut connections = snapshot.connections.clone();
    connections.push(Connection::new(connection_id.clone(), from.clone(), to.clone()));
    Ok((snapshot.with_connections(connections), connection_id))
}

fn connection_position(
    snapshot: &Snapshot,
    connection_id: &ConnectionId,
) -> Result<usize, EditRejected> {
    snapshot
        .connections
        .iter()
        .position(|conn| conn.id == *connection_id)
        .ok_or_else(|| EditRejected::UnknownConnection {
            connection_id: connection_id.clone(),
        })
}

pub fn update_connection(
    snapshot: &Snapshot,
    connection_id: &ConnectionId,
    patch: &ConnectionPatch,
) -> Result<Snapshot, EditRejected> {
    let position = connection_position(snapshot, connection_id)?;
    let mut connections = snapshot.connections.clone();
    connections[position].apply_patch(patch);
    Ok(snapshot.with_connections(connections))
}

pub fn delete_connection(
    snapshot: &Snapshot,
    connection_id: &ConnectionId,
) -> Result<Snapshot, EditRejected> {
    let position = connection_position(snapshot, connection_id)?;
    let mut connections = snapshot.connections.clone();
    connections.remove(position);
    Ok(snapshot.with_connections(connections))
}
