// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindweave-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindweave and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model.
//!
//! A document is a [`Snapshot`]: flat node and connection arrays, parents referenced by id.
//! Maps are described by [`MapEntry`] records kept in the per-owner catalog.

pub mod connection;
pub mod geometry;
pub mod ids;
pub mod map_entry;
pub mod node;
pub mod snapshot;
pub mod style;

pub use connection::{Connection, ConnectionPatch};
pub use geometry::Point;
pub use ids::{ConnectionId, Id, IdError, MapId, NodeId, OwnerId};
pub use map_entry::MapEntry;
pub use node::{Node, NodePatch};
pub use snapshot::{Snapshot, DEFAULT_ROOT_POSITION};
pub use style::{Style, DEFAULT_NODE_TEXT, DEFAULT_ROOT_TEXT};
