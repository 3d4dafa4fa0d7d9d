// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindweave-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindweave and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use mindweave::catalog::{catalog_key, legacy_key, map_key, DocumentSource, MIGRATED_MAP_NAME};
use mindweave::config::EditorConfig;
use mindweave::editor::Editor;
use mindweave::model::{NodeId, OwnerId};
use mindweave::store::{DirStorage, Storage};
use rstest::{fixture, rstest};

static TEMP_DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

struct TempDir {
    path: PathBuf,
}

impl TempDir {
    fn new(prefix: &str) -> Self {
        let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_nanos();
        let counter = TEMP_DIR_COUNTER.fetch_add(1, Ordering::Relaxed);
        let mut path = env::temp_dir();
        path.push(format!("mindweave-{prefix}-{}-{nanos}-{counter}", std::process::id()));
        fs::create_dir_all(&path).unwrap();
        Self { path }
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

fn fixture_text(name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures").join(name);
    fs::read_to_string(&path).unwrap_or_else(|err| panic!("failed to read {path:?}: {err}"))
}

fn owner(raw: &str) -> OwnerId {
    OwnerId::new(raw).unwrap()
}

fn node_id(raw: &str) -> NodeId {
    NodeId::new(raw).unwrap()
}

#[fixture]
fn tmp() -> TempDir {
    TempDir::new("persistence")
}

fn storage(tmp: &TempDir) -> DirStorage {
    DirStorage::new(tmp.path().join("store"))
}

fn open(tmp: &TempDir, who: &str) -> Editor<DirStorage> {
    Editor::open(storage(tmp), owner(who), EditorConfig::default()).unwrap()
}

#[rstest]
fn edits_survive_a_restart(tmp: TempDir) {
    let map_id = {
        let mut editor = open(&tmp, "u1");
        let child = editor.insert_child().unwrap();
        editor.update_node(&child, mindweave::model::NodePatch::text("Persisted")).unwrap();
        editor.flush().unwrap();
        editor.current_map_id().clone()
    };

    let store_root = tmp.path().join("store");
    assert!(store_root.join(format!("{}.json", catalog_key(&owner("u1")))).is_file());
    assert!(store_root.join(format!("{}.json", map_key(&owner("u1"), &map_id))).is_file());

    let editor = open(&tmp, "u1");
    assert_eq!(editor.current_map_id(), &map_id);
    assert_eq!(editor.document_source(), &DocumentSource::Stored);
    assert!(editor.snapshot().nodes.iter().any(|node| node.text == "Persisted"));
    assert!(!editor.can_undo(), "history is not persisted");
}

#[rstest]
fn unflushed_edits_are_not_written(tmp: TempDir) {
    {
        let mut editor = open(&tmp, "u1");
        editor.insert_child().unwrap();
        assert!(editor.is_dirty());
    }

    let editor = open(&tmp, "u1");
    assert_eq!(editor.snapshot().nodes.len(), 1);
}

#[rstest]
fn legacy_document_is_migrated_on_first_open(tmp: TempDir) {
    let mut store = storage(&tmp);
    store.set(&legacy_key(&owner("u1")), &fixture_text("legacy_flat.json")).unwrap();

    let editor = open(&tmp, "u1");
    assert_eq!(editor.catalog().maps().len(), 1);
    assert_eq!(editor.catalog().maps()[0].name, MIGRATED_MAP_NAME);
    assert_eq!(editor.document_source(), &DocumentSource::LegacyFlat);
    assert_eq!(editor.snapshot().nodes.len(), 3);
    assert_eq!(editor.snapshot().root().unwrap().text, "Ideas");

    let store = storage(&tmp);
    assert_eq!(store.get(&legacy_key(&owner("u1"))).unwrap(), None);
}

#[rstest]
fn owners_do_not_see_each_other(tmp: TempDir) {
    let mut alice = open(&tmp, "alice");
    alice.create_map("Alice only").unwrap();
    alice.flush().unwrap();

    let bob = open(&tmp, "bob");
    assert_eq!(bob.catalog().maps().len(), 1);
    assert!(bob.catalog().maps().iter().all(|entry| entry.name != "Alice only"));
}

#[rstest]
fn corrupt_map_file_is_left_alone_on_open(tmp: TempDir) {
    let map_id = {
        let editor = open(&tmp, "u1");
        editor.current_map_id().clone()
    };
    let mut store = storage(&tmp);
    let key = map_key(&owner("u1"), &map_id);
    store.set(&key, "{\"tree\": 42").unwrap();

    let editor = open(&tmp, "u1");
    assert!(matches!(editor.document_source(), DocumentSource::Corrupt { .. }));
    assert_eq!(editor.snapshot().nodes.len(), 1);
    assert!(!editor.is_dirty());
    assert_eq!(storage(&tmp).get(&key).unwrap().as_deref(), Some("{\"tree\": 42"));
}

#[rstest]
fn import_keeps_structure_and_unknown_fields(tmp: TempDir) {
    let mut editor = open(&tmp, "u1");
    editor.import_document(&fixture_text("export_v2.json")).unwrap();

    let snapshot = editor.snapshot().clone();
    assert_eq!(snapshot.nodes.len(), 4);
    let ids: Vec<&str> = snapshot.nodes.iter().map(|node| node.id.as_str()).collect();
    assert_eq!(ids, ["root", "design", "mockups", "docs"]);

    let docs = snapshot.node(&node_id("docs")).unwrap();
    assert!(docs.is_detached);
    assert_eq!(docs.parent_id.as_ref(), Some(&node_id("root")));
    assert_eq!(docs.extra["pinned"], serde_json::json!(true));
    assert_eq!(snapshot.connections[0].text.as_deref(), Some("feeds"));

    let exported = editor.export_document().unwrap();
    assert!(exported.contains("\"pinned\": true"));
    editor.flush().unwrap();
    drop(editor);

    let reopened = open(&tmp, "u1");
    assert_eq!(reopened.snapshot(), &snapshot);
}
