// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindweave-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindweave and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{MapId, OwnerId};

/// Catalog metadata for one stored map. The document payload lives under its own key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapEntry {
    pub id: MapId,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub owner_id: OwnerId,
}

impl MapEntry {
    pub fn new(id: MapId, name: impl Into<String>, owner_id: OwnerId, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: name.into(),
            created_at: now,
            updated_at: now,
            owner_id,
        }
    }

    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}
