// /////////////////////////////////////////////////////////////////////////////
// Password Note
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Remote Blob Store Port
//!
//! Infrastructure port for the remote side of sync. The engine needs
//! nothing more than blob-level get/put plus directory creation; WebDAV
//! is one instantiation, an in-memory store is another (tests, embedded
//! two-client fixtures).
//!
//! Put is last-write-wins at the blob level; no remote locking is
//! assumed. Transport failures surface as `RemoteUnreachable`.

use async_trait::async_trait;
use std::sync::Arc;

use crate::entities::WebDavConfig;
use crate::VaultError;

/// Blob-level remote storage.
#[async_trait]
pub trait RemoteVaultStore: Send + Sync {
    /// True when a blob exists at `path`.
    async fn exists(&self, path: &str) -> Result<bool, VaultError>;

    /// Fetches the blob at `path`; `None` when absent.
    async fn get(&self, path: &str) -> Result<Option<Vec<u8>>, VaultError>;

    /// Stores the blob at `path`, replacing any previous content.
    async fn put(&self, path: &str, bytes: &[u8]) -> Result<(), VaultError>;

    /// Creates the parent collections of `path`, recursively; succeeds
    /// when they already exist.
    async fn mkdir_parents(&self, path: &str) -> Result<(), VaultError>;

    /// Deletes the blob at `path`; succeeds when it is already absent.
    async fn delete(&self, path: &str) -> Result<(), VaultError>;
}

/// Opens remote stores from a WebDAV configuration.
///
/// The facade resolves its stored configuration through this factory on
/// every push/pull, which is the seam test fixtures use to substitute an
/// in-memory remote.
pub trait RemoteStoreFactory: Send + Sync {
    fn open(&self, config: &WebDavConfig) -> Result<Arc<dyn RemoteVaultStore>, VaultError>;
}
