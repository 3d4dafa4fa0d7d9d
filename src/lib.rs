// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindweave-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindweave and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Mindweave: mind-map document engine.
//!
//! Documents are flat node and connection arrays ([`model`]) converted to and from nested trees
//! and versioned payloads ([`format`]). Edits are pure snapshot transforms ([`ops`]) recorded in
//! a bounded undo stack ([`history`]); pointer drags are previewed without touching history
//! ([`drag`]). Maps live in a per-owner catalog ([`catalog`]) over a string key-value
//! [`store`]. [`editor`] ties these into one session and [`shell`] drives it from text.

pub mod autosave;
pub mod catalog;
pub mod config;
pub mod drag;
pub mod editor;
pub mod format;
pub mod history;
pub mod model;
pub mod ops;
pub mod shell;
pub mod store;
