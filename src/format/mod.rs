// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindweave-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindweave and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Serialization formats: tree codec, persisted payload, file export/import.

pub mod file;
pub mod payload;
pub mod tree;

pub use file::{default_export_filename, export_json, import_json, ImportError};
pub use payload::{
    decode_payload, parse_payload, DocumentPayload, LoadOutcome, PayloadError, PayloadKind,
    PayloadMetadata, PAYLOAD_VERSION,
};
pub use tree::{to_flat, to_tree, unreachable_nodes, TreeNode};
