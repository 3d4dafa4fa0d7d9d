// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindweave-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindweave and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::geometry::Point;
use super::ids::NodeId;
use super::style::{merge_style, Style};

/// A positioned, styled document element.
///
/// `parent_id` defines the tree overlay. A detached node keeps its parent for lineage but is
/// skipped by drag propagation and the drawn hierarchy edge.
///
/// Fields this engine does not know about are kept in `extra` so documents written by newer
/// clients survive a load/save cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: NodeId,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub parent_id: Option<NodeId>,
    #[serde(default)]
    pub is_detached: bool,
    #[serde(default)]
    pub collapsed: bool,
    #[serde(default)]
    pub order: i64,
    #[serde(default)]
    pub style: Style,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Node {
    pub fn new(id: NodeId, text: impl Into<String>, position: Point) -> Self {
        Self {
            id,
            text: text.into(),
            x: position.x,
            y: position.y,
            parent_id: None,
            is_detached: false,
            collapsed: false,
            order: 0,
            style: Style::new(),
            extra: Map::new(),
        }
    }

    pub fn with_parent(mut self, parent_id: Option<NodeId>) -> Self {
        self.parent_id = parent_id;
        self
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn set_position(&mut self, position: Point) {
        self.x = position.x;
        self.y = position.y;
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    pub fn apply_patch(&mut self, patch: &NodePatch) {
        if let Some(text) = &patch.text {
            self.text = text.clone();
        }
        if let Some(x) = patch.x {
            self.x = x;
        }
        if let Some(y) = patch.y {
            self.y = y;
        }
        if let Some(parent_id) = &patch.parent_id {
            self.parent_id = parent_id.clone();
        }
        if let Some(is_detached) = patch.is_detached {
            self.is_detached = is_detached;
        }
        if let Some(collapsed) = patch.collapsed {
            self.collapsed = collapsed;
        }
        if let Some(order) = patch.order {
            self.order = order;
        }
        if let Some(style) = &patch.style {
            self.style = style.clone();
        }
    }

    pub fn merge_style(&mut self, patch: &Style) {
        merge_style(&mut self.style, patch);
    }
}

/// Shallow field update for [`Node`]. `None` leaves a field untouched; `style` replaces the
/// whole style object (use a style merge for per-key updates).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodePatch {
    pub text: Option<String>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub parent_id: Option<Option<NodeId>>,
    pub is_detached: Option<bool>,
    pub collapsed: Option<bool>,
    pub order: Option<i64>,
    pub style: Option<Style>,
}

impl NodePatch {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn position(position: Point) -> Self {
        Self {
            x: Some(position.x),
            y: Some(position.y),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{Node, NodePatch};
    use crate::model::{NodeId, Point};

    #[test]
    fn node_keeps_unknown_fields() {
        let raw = json!({
            "id": "n1",
            "text": "Hello",
            "x": 10,
            "y": 20.5,
            "parentId": null,
            "isDetached": false,
            "order": 0,
            "style": { "color": "#fff" },
            "icon": "star"
        });

        let node: Node = serde_json::from_value(raw).expect("node");
        assert_eq!(node.x, 10.0);
        assert_eq!(node.extra.get("icon"), Some(&json!("star")));

        let back = serde_json::to_value(&node).expect("serialize");
        assert_eq!(back.get("icon"), Some(&json!("star")));
        assert_eq!(back.get("parentId"), Some(&json!(null)));
        assert_eq!(back.get("isDetached"), Some(&json!(false)));
    }

    #[test]
    fn patch_only_touches_given_fields() {
        let mut node = Node::new(NodeId::new("n1").expect("id"), "a", Point::new(1.0, 2.0));
        node.apply_patch(&NodePatch::text("b"));
        assert_eq!(node.text, "b");
        assert_eq!(node.position(), Point::new(1.0, 2.0));

        node.apply_patch(&NodePatch::position(Point::new(5.0, 6.0)));
        assert_eq!(node.text, "b");
        assert_eq!(node.position(), Point::new(5.0, 6.0));

        assert!(NodePatch::default().is_empty());
    }
}
