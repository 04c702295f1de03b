// /////////////////////////////////////////////////////////////////////////////
// Password Note
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Vault Aggregate
//!
//! The vault is the root aggregate of the domain: every record, label,
//! and template lives in one of its UUID-keyed maps, and the `kdf`
//! configuration it carries is authoritative for every ciphertext inside
//! the same vault value. The data graph is a forest - inter-entity
//! references (record to template, record to labels) are by id, never by
//! pointer, and unresolved references degrade gracefully at render time.
//!
//! ## Invariants
//!
//! - `kdf` is the KDF for every envelope in this vault value; changing it
//!   requires re-encrypting everything within one atomic update
//! - `sentinel` decrypts under the current master key to
//!   [`SENTINEL_VALUE`]; this is the canonical master-key test
//! - `local_only` records never appear in the remote view
//! - `history` is append-only: one opaque sync-version id per push
//!
//! ## Wire Format
//!
//! The JSON field names below are the on-disk and on-wire contract; all
//! binary payloads are standard base64 with padding.
//!
//! ```json
//! {
//!   "records": { "<uuid>": { ... } },
//!   "labels": { "<uuid>": { ...EncryptedData... } },
//!   "templates": { "<uuid>": { ...EncryptedData... } },
//!   "history": ["<version>", ...],
//!   "kdf": { "algorithm": "argon2id", "params": { ... } },
//!   "sentinel": { ...EncryptedData... }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::entities::record::VaultRecord;
use crate::services::EnvelopeService;
use crate::value_objects::{EncryptedData, KdfConfig, LabelId, MasterKey, RecordId, TemplateId};
use crate::VaultError;

/// Fixed plaintext the sentinel encrypts. The exact byte sequence is part
/// of the on-disk format compatibility contract; changing it orphans
/// every existing vault.
pub const SENTINEL_VALUE: &str = "password-note-sentinel-v1";

/// The vault aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vault {
    #[serde(default)]
    pub records: HashMap<RecordId, VaultRecord>,
    #[serde(default)]
    pub labels: HashMap<LabelId, EncryptedData>,
    #[serde(default)]
    pub templates: HashMap<TemplateId, EncryptedData>,
    #[serde(default)]
    pub history: Vec<String>,
    pub kdf: KdfConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentinel: Option<EncryptedData>,
}

impl Vault {
    /// Creates an empty vault governed by `kdf`.
    pub fn new(kdf: KdfConfig) -> Self {
        Self {
            records: HashMap::new(),
            labels: HashMap::new(),
            templates: HashMap::new(),
            history: Vec::new(),
            kdf,
            sentinel: None,
        }
    }

    /// Iterates over non-tombstoned records.
    pub fn live_records(&self) -> impl Iterator<Item = (&RecordId, &VaultRecord)> {
        self.records.iter().filter(|(_, r)| !r.is_tombstone())
    }

    /// Returns the vault as it may appear on a remote: `local_only`
    /// records are stripped, everything else is carried unchanged
    /// (including tombstones, which is how deletions propagate).
    pub fn remote_view(&self) -> Vault {
        let mut view = self.clone();
        view.records.retain(|_, r| !r.local_only);
        view
    }

    /// Installs a sentinel for `key`.
    pub fn install_sentinel(&mut self, envelope: &dyn EnvelopeService, key: &MasterKey) -> Result<(), VaultError> {
        self.sentinel = Some(envelope.encrypt(SENTINEL_VALUE.as_bytes(), key)?);
        Ok(())
    }

    /// Canonical master-key test: decrypts the sentinel and compares it
    /// to [`SENTINEL_VALUE`]. Any failure - missing sentinel, AEAD
    /// failure, value mismatch - reports `InvalidCredentials`.
    pub fn verify_master_key(&self, envelope: &dyn EnvelopeService, key: &MasterKey) -> Result<(), VaultError> {
        let sentinel = self.sentinel.as_ref().ok_or(VaultError::InvalidCredentials)?;
        let plaintext = envelope
            .decrypt(sentinel, key)
            .map_err(|_| VaultError::InvalidCredentials)?;
        if plaintext != SENTINEL_VALUE.as_bytes() {
            return Err(VaultError::InvalidCredentials);
        }
        Ok(())
    }

    /// Re-encrypts every ciphertext from `old_key` to `new_key` and
    /// stamps the vault with `new_kdf`, returning the rebuilt vault.
    ///
    /// Tombstoned records carry no ciphertexts and pass through
    /// untouched. Any decrypt failure aborts the walk, leaving `self`
    /// unchanged - callers swap the returned value in only on success,
    /// which is what makes KDF rotation and sync alignment atomic.
    pub fn reencrypted(
        &self,
        envelope: &dyn EnvelopeService,
        old_key: &MasterKey,
        new_key: &MasterKey,
        new_kdf: KdfConfig,
    ) -> Result<Vault, VaultError> {
        self.verify_master_key(envelope, old_key)?;

        let reseal = |data: &EncryptedData| -> Result<EncryptedData, VaultError> {
            let plaintext = envelope.decrypt(data, old_key)?;
            envelope.encrypt(&plaintext, new_key)
        };

        let mut rebuilt = self.clone();
        for record in rebuilt.records.values_mut() {
            if record.is_tombstone() {
                continue;
            }
            if let Some(title) = &record.title {
                record.title = Some(reseal(title)?);
            }
            for data in record.fields.values_mut() {
                *data = reseal(data)?;
            }
        }
        for data in rebuilt.labels.values_mut() {
            *data = reseal(data)?;
        }
        for data in rebuilt.templates.values_mut() {
            *data = reseal(data)?;
        }

        rebuilt.install_sentinel(envelope, new_key)?;
        rebuilt.kdf = new_kdf;
        Ok(rebuilt)
    }

    /// Serializes the vault to its wire JSON.
    pub fn to_json_bytes(&self) -> Result<Vec<u8>, VaultError> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Deserializes and validates a vault from wire JSON.
    pub fn from_json_bytes(bytes: &[u8]) -> Result<Self, VaultError> {
        let vault: Vault = serde_json::from_slice(bytes)?;
        vault.validate()?;
        Ok(vault)
    }

    /// Structural validation of a vault from an untrusted source: KDF
    /// parameter ranges and nonce lengths of every envelope.
    pub fn validate(&self) -> Result<(), VaultError> {
        self.kdf.validate()?;
        for record in self.records.values() {
            record.validate()?;
        }
        for data in self.labels.values().chain(self.templates.values()) {
            data.validate()?;
        }
        if let Some(sentinel) = &self.sentinel {
            sentinel.validate()?;
        }
        Ok(())
    }
}
