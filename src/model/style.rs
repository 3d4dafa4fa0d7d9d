// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindweave-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindweave and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Presentation attributes.
//!
//! The engine never interprets styles; they are open JSON objects carried through edits and
//! persistence unchanged. The defaults below are what a fresh document is seeded with.

use serde_json::{json, Map, Value};

/// Open mapping of presentation attributes (color, shape, size, font, ...).
pub type Style = Map<String, Value>;

pub const DEFAULT_NODE_TEXT: &str = "New node";
pub const DEFAULT_ROOT_TEXT: &str = "Central topic";

fn object(value: Value) -> Style {
    match value {
        Value::Object(map) => map,
        _ => Style::new(),
    }
}

/// Renderer defaults for a regular node. Nodes themselves start with an empty style and the
/// renderer falls back to these.
pub fn default_node_style() -> Style {
    object(json!({
        "backgroundColor": "#1e293b",
        "borderColor": "#3b82f6",
        "borderWidth": 2,
        "borderRadius": 8,
        "color": "#ffffff",
        "fontSize": 14,
        "fontWeight": "normal",
        "fontStyle": "normal",
        "textDecoration": "none",
        "fontFamily": "Inter",
        "shape": "rectangle",
        "width": 140,
        "padding": 12
    }))
}

/// Style stamped on the root node of a fresh document.
pub fn root_node_style() -> Style {
    object(json!({
        "backgroundColor": "#3b82f6",
        "borderColor": "#60a5fa",
        "width": 180,
        "fontSize": 16,
        "fontWeight": "600"
    }))
}

pub fn default_connection_style() -> Style {
    object(json!({
        "color": "#f59e0b",
        "width": 2,
        "dashed": true
    }))
}

/// Shallow merge: every key of `patch` overwrites the same key of `base`.
pub fn merge_style(base: &mut Style, patch: &Style) {
    for (key, value) in patch {
        base.insert(key.clone(), value.clone());
    }
}
