// /////////////////////////////////////////////////////////////////////////////
// Password Note
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Local Blob Store Port
//!
//! Infrastructure port for local persistence. The core persists exactly
//! two named blobs - the user profile and the vault - under a
//! caller-chosen namespace; everything else (paths, directories, browser
//! storage vs. filesystem) is the adapter's concern.
//!
//! Operations are independently idempotent per slot.

use async_trait::async_trait;

use crate::VaultError;

/// The two persisted blobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageSlot {
    UserProfile,
    VaultData,
}

impl StorageSlot {
    /// Stable storage key of the slot.
    pub fn key(&self) -> &'static str {
        match self {
            StorageSlot::UserProfile => "user-profile",
            StorageSlot::VaultData => "vault-data",
        }
    }
}

/// Namespaced local byte-blob storage.
#[async_trait]
pub trait LocalBlobStore: Send + Sync {
    /// Reads a slot; `None` when it has never been written.
    async fn read(&self, slot: StorageSlot) -> Result<Option<Vec<u8>>, VaultError>;

    /// Writes a slot, replacing any previous content.
    async fn write(&self, slot: StorageSlot, bytes: &[u8]) -> Result<(), VaultError>;

    /// Removes a slot; succeeds when it is already absent.
    async fn remove(&self, slot: StorageSlot) -> Result<(), VaultError>;

    /// True when the slot holds data.
    async fn contains(&self, slot: StorageSlot) -> Result<bool, VaultError> {
        Ok(self.read(slot).await?.is_some())
    }
}
