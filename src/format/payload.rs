// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindweave-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindweave and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The persisted document payload (`version: "2.0"`).
//!
//! ```json
//! { "version": "2.0", "timestamp": "...", "tree": [...], "connections": [...],
//!   "metadata": { "nodeCount": 3, "connectionCount": 1 } }
//! ```
//!
//! Loading never fails outright: a legacy bare node array is accepted as-is and anything
//! unreadable is reported as [`LoadOutcome::Corrupt`] so the caller can fall back to a fresh
//! document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::tree::{to_flat, to_tree, TreeNode};
use crate::model::{Connection, Node, Snapshot};

pub const PAYLOAD_VERSION: &str = "2.0";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentPayload {
    pub version: String,
    pub timestamp: DateTime<Utc>,
    pub tree: Vec<TreeNode>,
    pub connections: Vec<Connection>,
    pub metadata: PayloadMetadata,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayloadMetadata {
    pub node_count: usize,
    pub connection_count: usize,
}

impl DocumentPayload {
    pub fn encode(snapshot: &Snapshot, now: DateTime<Utc>) -> Self {
        Self {
            version: PAYLOAD_VERSION.to_owned(),
            timestamp: now,
            tree: to_tree(&snapshot.nodes),
            connections: snapshot.connections.clone(),
            metadata: PayloadMetadata {
                node_count: snapshot.nodes.len(),
                connection_count: snapshot.connections.len(),
            },
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn to_snapshot(&self) -> Snapshot {
        Snapshot::new(to_flat(&self.tree), self.connections.clone())
    }
}

/// Which on-disk shape a payload was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    /// `{version, tree, connections, ...}`.
    Tree,
    /// A bare array of flat nodes written before the tree format existed.
    LegacyFlat,
}

#[derive(Debug, thiserror::Error)]
pub enum PayloadError {
    #[error("payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("payload has no `tree` array")]
    MissingTree,
    #[error("payload must be a JSON object or a legacy node array")]
    UnexpectedShape,
    #[error("invalid `{field}` in payload: {source}")]
    InvalidField {
        field: &'static str,
        source: serde_json::Error,
    },
}

/// Strict decode: any structural problem is an error.
pub fn parse_payload(raw: &str) -> Result<(Snapshot, PayloadKind), PayloadError> {
    let value: Value = serde_json::from_str(raw)?;
    match value {
        Value::Array(_) => {
            let nodes: Vec<Node> = serde_json::from_value(value)
                .map_err(|source| PayloadError::InvalidField { field: "nodes", source })?;
            Ok((Snapshot::new(nodes, Vec::new()), PayloadKind::LegacyFlat))
        }
        Value::Object(mut object) => {
            let tree = match object.remove("tree") {
                Some(tree @ Value::Array(_)) => tree,
                _ => return Err(PayloadError::MissingTree),
            };
            let tree: Vec<TreeNode> = serde_json::from_value(tree)
                .map_err(|source| PayloadError::InvalidField { field: "tree", source })?;

            let connections = match object.remove("connections") {
                None | Some(Value::Null) => Vec::new(),
                Some(raw) => serde_json::from_value(raw).map_err(|source| {
                    PayloadError::InvalidField {
                        field: "connections",
                        source,
                    }
                })?,
            };

            Ok((Snapshot::new(to_flat(&tree), connections), PayloadKind::Tree))
        }
        _ => Err(PayloadError::UnexpectedShape),
    }
}

/// Result of reading a stored document.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    Loaded(Snapshot),
    Legacy(Snapshot),
    /// Nothing stored under the key.
    Missing,
    /// Stored but unreadable. The stored bytes are left alone.
    Corrupt { reason: String },
}

impl LoadOutcome {
    /// The loaded document, if there is one with at least one node.
    pub fn into_snapshot(self) -> Option<Snapshot> {
        match self {
            Self::Loaded(snapshot) | Self::Legacy(snapshot) if !snapshot.is_empty() => {
                Some(snapshot)
            }
            _ => None,
        }
    }

    pub fn is_corrupt(&self) -> bool {
        matches!(self, Self::Corrupt { .. })
    }
}

/// Lenient decode used by loads: never fails, classifies instead.
pub fn decode_payload(raw: Option<&str>) -> LoadOutcome {
    let Some(raw) = raw else {
        return LoadOutcome::Missing;
    };

    match parse_payload(raw) {
        Ok((snapshot, PayloadKind::Tree)) => LoadOutcome::Loaded(snapshot),
        Ok((snapshot, PayloadKind::LegacyFlat)) => LoadOutcome::Legacy(snapshot),
        Err(err) => {
            tracing::warn!(error = %err, "stored document payload is unreadable");
            LoadOutcome::Corrupt {
                reason: err.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rstest::rstest;
    use serde_json::json;

    use super::{decode_payload, parse_payload, DocumentPayload, LoadOutcome, PayloadKind};
    use crate::model::{Connection, ConnectionId, Node, NodeId, Point, Snapshot};

    fn sample() -> Snapshot {
        let root = Node::new(NodeId::new("root").expect("id"), "Root", Point::ORIGIN);
        let child = Node::new(NodeId::new("child").expect("id"), "Child", Point::new(150.0, 0.0))
            .with_parent(Some(root.id.clone()));
        let conn = Connection::new(
            ConnectionId::new("c1").expect("id"),
            root.id.clone(),
            child.id.clone(),
        );
        Snapshot::new(vec![root, child], vec![conn])
    }

    #[test]
    fn encode_writes_version_tree_and_metadata() {
        let payload = DocumentPayload::encode(&sample(), Utc::now());
        let json = serde_json::to_value(&payload).expect("serialize");

        assert_eq!(json["version"], "2.0");
        assert_eq!(json["tree"][0]["id"], "root");
        assert_eq!(json["tree"][0]["children"][0]["id"], "child");
        assert_eq!(json["metadata"]["nodeCount"], 2);
        assert_eq!(json["metadata"]["connectionCount"], 1);
        assert!(json["timestamp"].as_str().is_some());
    }

    #[test]
    fn encoded_payload_decodes_back() {
        let snapshot = sample();
        let raw = DocumentPayload::encode(&snapshot, Utc::now())
            .to_json()
            .expect("json");

        let LoadOutcome::Loaded(decoded) = decode_payload(Some(&raw)) else {
            panic!("expected a tree payload");
        };
        assert_eq!(decoded, snapshot);
    }

    #[test]
    fn bare_array_is_read_as_legacy_flat_nodes() {
        let raw = json!([
            { "id": "root", "text": "Root", "x": 0, "y": 0, "parentId": null },
            { "id": "a", "text": "A", "x": 5, "y": 5, "parentId": "root" }
        ])
        .to_string();

        let (snapshot, kind) = parse_payload(&raw).expect("parse");
        assert_eq!(kind, PayloadKind::LegacyFlat);
        assert_eq!(snapshot.nodes.len(), 2);
        assert!(snapshot.connections.is_empty());
        assert_eq!(
            snapshot.nodes[1].parent_id.as_ref().map(|p| p.as_str()),
            Some("root")
        );
    }

    #[test]
    fn missing_connections_default_to_empty() {
        let raw = json!({ "version": "2.0", "tree": [{ "id": "r", "children": [] }] }).to_string();
        let (snapshot, kind) = parse_payload(&raw).expect("parse");
        assert_eq!(kind, PayloadKind::Tree);
        assert_eq!(snapshot.nodes.len(), 1);
        assert!(snapshot.connections.is_empty());
    }

    #[rstest]
    #[case::not_json("{ this is not json")]
    #[case::no_tree(r#"{ "version": "2.0", "connections": [] }"#)]
    #[case::tree_not_array(r#"{ "version": "2.0", "tree": { "id": "r" } }"#)]
    #[case::scalar("42")]
    #[case::bad_node(r#"{ "tree": [{ "text": "no id" }] }"#)]
    fn malformed_payloads_are_corrupt(#[case] raw: &str) {
        let outcome = decode_payload(Some(raw));
        assert!(outcome.is_corrupt(), "expected corrupt, got {outcome:?}");
        assert_eq!(outcome.into_snapshot(), None);
    }

    #[test]
    fn missing_and_empty_documents_yield_no_snapshot() {
        assert_eq!(decode_payload(None), LoadOutcome::Missing);

        let empty = json!({ "version": "2.0", "tree": [], "connections": [] }).to_string();
        assert_eq!(decode_payload(Some(&empty)).into_snapshot(), None);
    }
}
