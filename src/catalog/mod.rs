// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindweave-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindweave and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Per-owner list of maps and the active map.
//!
//! Storage layout (one key each):
//!
//! - `mindmap_catalog_<owner>`: `{ "maps": [...], "currentMapId": "...", "updatedAt": "..." }`
//! - `mindmap_map_<owner>_<mapId>`: the document payload of one map
//! - `mindmap_data_<owner>`: a single-document payload from before catalogs existed; adopted
//!   and removed when a catalog is first created
//!
//! The catalog is read once in [`MapCatalog::open`] and written back after every change. It is
//! never empty: the last remaining map cannot be deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::format::{decode_payload, DocumentPayload, LoadOutcome};
use crate::model::{MapEntry, MapId, OwnerId, Snapshot, DEFAULT_ROOT_POSITION};
use crate::store::{Storage, StoreError};

pub const MIGRATED_MAP_NAME: &str = "My first map";
pub const NEW_MAP_NAME: &str = "New map";

pub fn catalog_key(owner: &OwnerId) -> String {
    format!("mindmap_catalog_{owner}")
}

pub fn map_key(owner: &OwnerId, map_id: &MapId) -> String {
    format!("mindmap_map_{owner}_{map_id}")
}

pub fn legacy_key(owner: &OwnerId) -> String {
    format!("mindmap_data_{owner}")
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("map name must not be empty")]
    EmptyName,
    #[error("the last remaining map cannot be deleted")]
    LastMap,
    #[error("map not found ({map_id})")]
    UnknownMap { map_id: MapId },
    #[error("cannot encode {what}: {source}")]
    Encode {
        what: &'static str,
        source: serde_json::Error,
    },
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// The stored catalog record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogPayload {
    #[serde(default)]
    pub maps: Vec<MapEntry>,
    #[serde(default)]
    pub current_map_id: Option<MapId>,
    #[serde(default)]
    pub updated_at: DateTime<Utc>,
}

/// How [`MapCatalog::open`] found the owner's catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogInit {
    Existing,
    /// No catalog; the legacy single document was adopted as the first map.
    Migrated { map_id: MapId },
    /// No catalog and nothing to migrate; a fresh first map was created.
    Created { map_id: MapId },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LegacyMigration {
    Adopted(MapEntry),
    NothingToMigrate,
}

/// Moves a pre-catalog document under a new map key and removes the legacy key. The stored
/// bytes are copied verbatim; they are decoded like any other map payload when loaded.
pub fn migrate_legacy<S: Storage>(
    storage: &mut S,
    owner: &OwnerId,
) -> Result<LegacyMigration, CatalogError> {
    let legacy = legacy_key(owner);
    let Some(raw) = storage.get(&legacy)? else {
        return Ok(LegacyMigration::NothingToMigrate);
    };

    let entry = MapEntry::new(MapId::generate(), MIGRATED_MAP_NAME, owner.clone(), Utc::now());
    storage.set(&map_key(owner, &entry.id), &raw)?;
    storage.remove(&legacy)?;
    tracing::info!(owner = %owner, map_id = %entry.id, "migrated legacy document into catalog");
    Ok(LegacyMigration::Adopted(entry))
}

/// Where a loaded document came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentSource {
    Stored,
    LegacyFlat,
    /// Nothing (or an empty document) was stored; a fresh document was substituted.
    Missing,
    /// The stored payload was unreadable and left in place; a fresh document was substituted.
    Corrupt { reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadedDocument {
    pub snapshot: Snapshot,
    pub source: DocumentSource,
}

impl LoadedDocument {
    pub fn is_fallback(&self) -> bool {
        matches!(
            self.source,
            DocumentSource::Missing | DocumentSource::Corrupt { .. }
        )
    }

    fn from_outcome(outcome: LoadOutcome) -> Self {
        let fresh = || Snapshot::fresh(DEFAULT_ROOT_POSITION);
        match outcome {
            LoadOutcome::Loaded(snapshot) if !snapshot.is_empty() => Self {
                snapshot,
                source: DocumentSource::Stored,
            },
            LoadOutcome::Legacy(snapshot) if !snapshot.is_empty() => Self {
                snapshot,
                source: DocumentSource::LegacyFlat,
            },
            LoadOutcome::Corrupt { reason } => Self {
                snapshot: fresh(),
                source: DocumentSource::Corrupt { reason },
            },
            LoadOutcome::Loaded(_) | LoadOutcome::Legacy(_) | LoadOutcome::Missing => Self {
                snapshot: fresh(),
                source: DocumentSource::Missing,
            },
        }
    }
}

#[derive(Debug)]
pub struct MapCatalog<S> {
    storage: S,
    owner: OwnerId,
    maps: Vec<MapEntry>,
    current_map_id: MapId,
}

impl<S: Storage> MapCatalog<S> {
    /// Loads the owner's catalog. Without a usable catalog (missing, unreadable or empty) the
    /// legacy document is migrated if present, else a fresh first map is created.
    pub fn open(mut storage: S, owner: OwnerId) -> Result<(Self, CatalogInit), CatalogError> {
        if let Some(payload) = read_catalog(&storage, &owner)? {
            let maps = payload.maps;
            let current_map_id = payload
                .current_map_id
                .filter(|id| maps.iter().any(|m| m.id == *id))
                .unwrap_or_else(|| maps[0].id.clone());
            let catalog = Self {
                storage,
                owner,
                maps,
                current_map_id,
            };
            return Ok((catalog, CatalogInit::Existing));
        }

        let (entry, init) = match migrate_legacy(&mut storage, &owner)? {
            LegacyMigration::Adopted(entry) => {
                let map_id = entry.id.clone();
                (entry, CatalogInit::Migrated { map_id })
            }
            LegacyMigration::NothingToMigrate => {
                let entry = MapEntry::new(MapId::generate(), NEW_MAP_NAME, owner.clone(), Utc::now());
                write_document(
                    &mut storage,
                    &owner,
                    &entry.id,
                    &Snapshot::fresh(DEFAULT_ROOT_POSITION),
                )?;
                let map_id = entry.id.clone();
                tracing::info!(owner = %owner, map_id = %map_id, "created first map");
                (entry, CatalogInit::Created { map_id })
            }
        };

        let mut catalog = Self {
            storage,
            owner,
            current_map_id: entry.id.clone(),
            maps: vec![entry],
        };
        catalog.persist()?;
        Ok((catalog, init))
    }

    pub fn owner(&self) -> &OwnerId {
        &self.owner
    }

    pub fn maps(&self) -> &[MapEntry] {
        &self.maps
    }

    pub fn entry(&self, map_id: &MapId) -> Option<&MapEntry> {
        self.maps.iter().find(|m| m.id == *map_id)
    }

    pub fn current_map_id(&self) -> &MapId {
        &self.current_map_id
    }

    pub fn current_entry(&self) -> Option<&MapEntry> {
        self.entry(&self.current_map_id)
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Creates a map holding a fresh single-root document and makes it active.
    pub fn create_map(&mut self, name: &str) -> Result<MapId, CatalogError> {
        self.create_map_with_payload(name, &Snapshot::fresh(DEFAULT_ROOT_POSITION))
    }

    /// Creates a map holding `snapshot` and makes it active.
    pub fn create_map_with_payload(
        &mut self,
        name: &str,
        snapshot: &Snapshot,
    ) -> Result<MapId, CatalogError> {
        let name = non_empty_name(name)?;
        let entry = MapEntry::new(MapId::generate(), name, self.owner.clone(), Utc::now());
        write_document(&mut self.storage, &self.owner, &entry.id, snapshot)?;

        let map_id = entry.id.clone();
        self.maps.push(entry);
        self.current_map_id = map_id.clone();
        self.persist()?;
        tracing::info!(owner = %self.owner, map_id = %map_id, "created map");
        Ok(map_id)
    }

    /// Removes a map and its document. If it was active, the first remaining map becomes
    /// active.
    pub fn delete_map(&mut self, map_id: &MapId) -> Result<(), CatalogError> {
        if self.maps.len() <= 1 {
            return Err(CatalogError::LastMap);
        }
        let position = self.position(map_id)?;

        self.storage.remove(&map_key(&self.owner, map_id))?;
        self.maps.remove(position);
        if self.current_map_id == *map_id {
            self.current_map_id = self.maps[0].id.clone();
        }
        self.persist()?;
        tracing::info!(owner = %self.owner, map_id = %map_id, "deleted map");
        Ok(())
    }

    pub fn rename_map(&mut self, map_id: &MapId, name: &str) -> Result<(), CatalogError> {
        let name = non_empty_name(name)?;
        let position = self.position(map_id)?;
        let entry = &mut self.maps[position];
        entry.name = name.to_owned();
        entry.touch(Utc::now());
        self.persist()
    }

    /// Makes `map_id` the active map. Documents are not touched.
    pub fn switch_map(&mut self, map_id: &MapId) -> Result<(), CatalogError> {
        self.position(map_id)?;
        if self.current_map_id != *map_id {
            self.current_map_id = map_id.clone();
            self.persist()?;
        }
        Ok(())
    }

    /// Reads a map's document, substituting a fresh document when nothing usable is stored.
    pub fn load_map_payload(&self, map_id: &MapId) -> Result<LoadedDocument, CatalogError> {
        self.position(map_id)?;
        let raw = self.storage.get(&map_key(&self.owner, map_id))?;
        let loaded = LoadedDocument::from_outcome(decode_payload(raw.as_deref()));
        if let DocumentSource::Corrupt { reason } = &loaded.source {
            tracing::warn!(map_id = %map_id, %reason, "map document unreadable; using a fresh document");
        }
        Ok(loaded)
    }

    pub fn save_map_payload(
        &mut self,
        map_id: &MapId,
        snapshot: &Snapshot,
    ) -> Result<(), CatalogError> {
        let position = self.position(map_id)?;
        write_document(&mut self.storage, &self.owner, map_id, snapshot)?;
        self.maps[position].touch(Utc::now());
        self.persist()
    }

    fn position(&self, map_id: &MapId) -> Result<usize, CatalogError> {
        self.maps
            .iter()
            .position(|m| m.id == *map_id)
            .ok_or_else(|| CatalogError::UnknownMap {
                map_id: map_id.clone(),
            })
    }

    fn persist(&mut self) -> Result<(), CatalogError> {
        let payload = CatalogPayload {
            maps: self.maps.clone(),
            current_map_id: Some(self.current_map_id.clone()),
            updated_at: Utc::now(),
        };
        let raw = serde_json::to_string(&payload).map_err(|source| CatalogError::Encode {
            what: "catalog",
            source,
        })?;
        self.storage.set(&catalog_key(&self.owner), &raw)?;
        Ok(())
    }
}

fn non_empty_name(name: &str) -> Result<&str, CatalogError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(CatalogError::EmptyName);
    }
    Ok(name)
}

/// `None` when there is no usable catalog: missing, unreadable or without maps.
fn read_catalog<S: Storage>(
    storage: &S,
    owner: &OwnerId,
) -> Result<Option<CatalogPayload>, CatalogError> {
    let Some(raw) = storage.get(&catalog_key(owner))? else {
        return Ok(None);
    };
    match serde_json::from_str::<CatalogPayload>(&raw) {
        Ok(payload) if !payload.maps.is_empty() => Ok(Some(payload)),
        Ok(_) => {
            tracing::warn!(owner = %owner, "catalog has no maps; starting over");
            Ok(None)
        }
        Err(err) => {
            tracing::warn!(owner = %owner, error = %err, "catalog is unreadable; starting over");
            Ok(None)
        }
    }
}

fn write_document<S: Storage>(
    storage: &mut S,
    owner: &OwnerId,
    map_id: &MapId,
    snapshot: &Snapshot,
) -> Result<(), CatalogError> {
    let raw = DocumentPayload::encode(snapshot, Utc::now())
        .to_json()
        .map_err(|source| CatalogError::Encode {
            what: "document",
            source,
        })?;
    storage.set(&map_key(owner, map_id), &raw)?;
    Ok(())
}
