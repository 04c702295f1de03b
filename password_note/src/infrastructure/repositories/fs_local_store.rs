// /////////////////////////////////////////////////////////////////////////////
// Password Note
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Filesystem Local Store
//!
//! [`LocalBlobStore`] over a namespaced directory: each slot is one JSON
//! file under `<base>/<namespace>/`. Writes land in a temp file first and
//! are renamed into place so a crash mid-write never leaves a truncated
//! blob behind.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

use password_note_domain::repositories::{LocalBlobStore, StorageSlot};
use password_note_domain::VaultError;

/// Filesystem-backed blob store.
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    /// Creates a store rooted at `<base>/<namespace>`.
    pub fn new(base: impl AsRef<Path>, namespace: &str) -> Self {
        Self {
            root: base.as_ref().join(namespace),
        }
    }

    fn slot_path(&self, slot: StorageSlot) -> PathBuf {
        self.root.join(format!("{}.json", slot.key()))
    }
}

#[async_trait]
impl LocalBlobStore for FsBlobStore {
    async fn read(&self, slot: StorageSlot) -> Result<Option<Vec<u8>>, VaultError> {
        match fs::read(self.slot_path(slot)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(VaultError::storage_io(format!("read {}: {}", slot.key(), e))),
        }
    }

    async fn write(&self, slot: StorageSlot, bytes: &[u8]) -> Result<(), VaultError> {
        fs::create_dir_all(&self.root)
            .await
            .map_err(|e| VaultError::storage_io(format!("create {}: {}", self.root.display(), e)))?;

        let target = self.slot_path(slot);
        let staging = target.with_extension("json.tmp");
        fs::write(&staging, bytes)
            .await
            .map_err(|e| VaultError::storage_io(format!("write {}: {}", slot.key(), e)))?;
        fs::rename(&staging, &target)
            .await
            .map_err(|e| VaultError::storage_io(format!("commit {}: {}", slot.key(), e)))?;
        Ok(())
    }

    async fn remove(&self, slot: StorageSlot) -> Result<(), VaultError> {
        match fs::remove_file(self.slot_path(slot)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(VaultError::storage_io(format!("remove {}: {}", slot.key(), e))),
        }
    }

    async fn contains(&self, slot: StorageSlot) -> Result<bool, VaultError> {
        match fs::metadata(self.slot_path(slot)).await {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(VaultError::storage_io(format!("stat {}: {}", slot.key(), e))),
        }
    }
}
