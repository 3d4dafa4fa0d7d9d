// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindweave-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindweave and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::env;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use rstest::{fixture, rstest};

use super::{encode_key_segment, DirStorage, WriteDurability};
use crate::store::{Storage, StoreError};

static TEMP_DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

struct TempDir {
    path: std::path::PathBuf,
}

impl TempDir {
    fn new(prefix: &str) -> Self {
        let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_nanos();
        let counter = TEMP_DIR_COUNTER.fetch_add(1, Ordering::Relaxed);
        let mut path = env::temp_dir();
        path.push(format!("mindweave-{prefix}-{}-{nanos}-{counter}", std::process::id()));
        std::fs::create_dir_all(&path).unwrap();
        Self { path }
    }

    fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}

struct DirStorageTestCtx {
    tmp: TempDir,
    storage: DirStorage,
}

#[fixture]
fn ctx() -> DirStorageTestCtx {
    let tmp = TempDir::new("dir-storage");
    let storage = DirStorage::new(tmp.path().join("store"));
    DirStorageTestCtx { tmp, storage }
}

#[rstest]
fn missing_key_reads_as_none(ctx: DirStorageTestCtx) {
    assert_eq!(ctx.storage.get("mindmap_catalog_u1").unwrap(), None);
    assert!(!ctx.storage.root().exists(), "reads do not create the root");
}

#[rstest]
fn set_then_get_round_trips_and_overwrites(mut ctx: DirStorageTestCtx) {
    ctx.storage.set("mindmap_catalog_u1", r#"{"maps":[]}"#).unwrap();
    ctx.storage.set("mindmap_catalog_u1", r#"{"maps":[1]}"#).unwrap();

    assert_eq!(
        ctx.storage.get("mindmap_catalog_u1").unwrap().as_deref(),
        Some(r#"{"maps":[1]}"#)
    );
    assert!(ctx.storage.path_for("mindmap_catalog_u1").is_file());

    let leftovers = std::fs::read_dir(ctx.storage.root())
        .unwrap()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_name().to_string_lossy().starts_with(".mindweave.tmp."))
        .count();
    assert_eq!(leftovers, 0);
}

#[rstest]
fn remove_is_idempotent(mut ctx: DirStorageTestCtx) {
    ctx.storage.set("k", "v").unwrap();
    ctx.storage.remove("k").unwrap();
    ctx.storage.remove("k").unwrap();
    assert_eq!(ctx.storage.get("k").unwrap(), None);
}

#[rstest]
fn durable_writes_land_on_disk(ctx: DirStorageTestCtx) {
    let mut storage = DirStorage::new(ctx.tmp.path().join("durable"))
        .with_durability(WriteDurability::Durable);
    assert_eq!(storage.durability(), WriteDurability::Durable);

    storage.set("k", "v").unwrap();
    assert_eq!(storage.get("k").unwrap().as_deref(), Some("v"));
}

#[rstest]
#[case::plain("mindmap_map_u1_abc", "mindmap_map_u1_abc")]
#[case::slash("a/b", "~612f62")]
#[case::tilde("~x", "~7e78")]
#[case::device("con", "~636f6e")]
#[case::dot_prefix(".hidden", "~2e68696464656e")]
fn unsafe_keys_are_hex_encoded(#[case] key: &str, #[case] expected: &str) {
    assert_eq!(encode_key_segment(key), expected);
}

#[rstest]
fn keys_with_separators_stay_inside_root(mut ctx: DirStorageTestCtx) {
    ctx.storage.set("../escape", "v").unwrap();
    let path = ctx.storage.path_for("../escape");
    assert_eq!(path.parent(), Some(ctx.storage.root()));
    assert_eq!(ctx.storage.get("../escape").unwrap().as_deref(), Some("v"));
}

#[cfg(unix)]
#[rstest]
fn writes_through_symlinks_are_refused(mut ctx: DirStorageTestCtx) {
    let target = ctx.tmp.path().join("outside.json");
    std::fs::write(&target, "original").unwrap();
    std::fs::create_dir_all(ctx.storage.root()).unwrap();
    std::os::unix::fs::symlink(&target, ctx.storage.path_for("k")).unwrap();

    let err = ctx.storage.set("k", "new").unwrap_err();
    assert!(matches!(err, StoreError::SymlinkRefused { .. }));
    assert_eq!(std::fs::read_to_string(&target).unwrap(), "original");
}
