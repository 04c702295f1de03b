// /////////////////////////////////////////////////////////////////////////////
// Password Note
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # In-Memory Stores
//!
//! Process-local implementations of both persistence ports. Embedders use
//! them for ephemeral vaults; the test suites use `MemoryRemoteStore` as
//! the shared remote between two simulated clients, with an `offline`
//! switch to exercise transport-failure paths.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use password_note_domain::entities::WebDavConfig;
use password_note_domain::repositories::{LocalBlobStore, RemoteStoreFactory, RemoteVaultStore, StorageSlot};
use password_note_domain::VaultError;

/// In-memory `LocalBlobStore`.
#[derive(Default)]
pub struct MemoryBlobStore {
    blobs: Mutex<HashMap<&'static str, Vec<u8>>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LocalBlobStore for MemoryBlobStore {
    async fn read(&self, slot: StorageSlot) -> Result<Option<Vec<u8>>, VaultError> {
        Ok(self.blobs.lock().expect("store mutex poisoned").get(slot.key()).cloned())
    }

    async fn write(&self, slot: StorageSlot, bytes: &[u8]) -> Result<(), VaultError> {
        self.blobs
            .lock()
            .expect("store mutex poisoned")
            .insert(slot.key(), bytes.to_vec());
        Ok(())
    }

    async fn remove(&self, slot: StorageSlot) -> Result<(), VaultError> {
        self.blobs.lock().expect("store mutex poisoned").remove(slot.key());
        Ok(())
    }
}

/// In-memory `RemoteVaultStore`; sharable between clients via `Arc`.
#[derive(Default)]
pub struct MemoryRemoteStore {
    blobs: Mutex<HashMap<String, Vec<u8>>>,
    offline: AtomicBool,
}

impl MemoryRemoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulates a transport outage: every subsequent operation fails
    /// with `RemoteUnreachable` until switched back.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn check_online(&self) -> Result<(), VaultError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(VaultError::remote_unreachable("remote store is offline"));
        }
        Ok(())
    }
}

#[async_trait]
impl RemoteVaultStore for MemoryRemoteStore {
    async fn exists(&self, path: &str) -> Result<bool, VaultError> {
        self.check_online()?;
        Ok(self.blobs.lock().expect("store mutex poisoned").contains_key(path))
    }

    async fn get(&self, path: &str) -> Result<Option<Vec<u8>>, VaultError> {
        self.check_online()?;
        Ok(self.blobs.lock().expect("store mutex poisoned").get(path).cloned())
    }

    async fn put(&self, path: &str, bytes: &[u8]) -> Result<(), VaultError> {
        self.check_online()?;
        self.blobs
            .lock()
            .expect("store mutex poisoned")
            .insert(path.to_string(), bytes.to_vec());
        Ok(())
    }

    async fn mkdir_parents(&self, _path: &str) -> Result<(), VaultError> {
        self.check_online()
    }

    async fn delete(&self, path: &str) -> Result<(), VaultError> {
        self.check_online()?;
        self.blobs.lock().expect("store mutex poisoned").remove(path);
        Ok(())
    }
}

/// Factory yielding the same shared in-memory remote for any
/// configuration; this is how two facade instances end up talking to one
/// "server" in tests.
pub struct MemoryRemoteFactory {
    store: Arc<MemoryRemoteStore>,
}

impl MemoryRemoteFactory {
    pub fn new(store: Arc<MemoryRemoteStore>) -> Self {
        Self { store }
    }
}

impl RemoteStoreFactory for MemoryRemoteFactory {
    fn open(&self, _config: &WebDavConfig) -> Result<Arc<dyn RemoteVaultStore>, VaultError> {
        Ok(self.store.clone())
    }
}
