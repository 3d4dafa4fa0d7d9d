// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindweave-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindweave and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::ids::{ConnectionId, NodeId};
use super::style::{default_connection_style, Style};

/// A free-form labeled edge between two nodes, independent of the parent/child hierarchy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub id: ConnectionId,
    pub from: NodeId,
    pub to: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default)]
    pub style: Style,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Connection {
    pub fn new(id: ConnectionId, from: NodeId, to: NodeId) -> Self {
        Self {
            id,
            from,
            to,
            text: None,
            style: default_connection_style(),
            extra: Map::new(),
        }
    }

    /// True when this connection joins `a` and `b` in either direction.
    pub fn joins(&self, a: &NodeId, b: &NodeId) -> bool {
        (&self.from == a && &self.to == b) || (&self.from == b && &self.to == a)
    }

    pub fn touches(&self, node_id: &NodeId) -> bool {
        &self.from == node_id || &self.to == node_id
    }

    pub fn apply_patch(&mut self, patch: &ConnectionPatch) {
        if let Some(text) = &patch.text {
            self.text = text.clone();
        }
        if let Some(style) = &patch.style {
            self.style = style.clone();
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConnectionPatch {
    pub text: Option<Option<String>>,
    pub style: Option<Style>,
}

impl ConnectionPatch {
    pub fn label(text: Option<String>) -> Self {
        Self {
            text: Some(text),
            style: None,
        }
    }
}
