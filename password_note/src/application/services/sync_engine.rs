// /////////////////////////////////////////////////////////////////////////////
// Password Note
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Sync Engine
//!
//! Push/pull synchronization of two vaults through a remote blob store.
//! The remote protocol is a single JSON blob at a configured path; put is
//! last-write-wins at the blob level and no remote locking is assumed.
//!
//! ## Merge Semantics
//!
//! Per-map, last-writer-wins per record. For every UUID on either side:
//! one side only takes it; both sides compare `last_modified` as UTC
//! instants and the strictly newer one wins - a tombstone with a later
//! timestamp beats a live record, which is how deletions propagate. Ties
//! break toward the remote on pull and toward the local on push. Labels
//! and templates carry no timestamp on the wire, so a both-sides
//! difference resolves to the preferred side. `conflicts_resolved` counts
//! the keys where both sides held differing values.
//!
//! ## KDF Alignment
//!
//! When the two vaults' KDF configurations drift, ciphertexts are not
//! interchangeable. The engine then needs the master password: it derives
//! one short-lived key per side, proves each against the corresponding
//! sentinel, and re-encrypts one side wholesale before merging - local to
//! the remote's key on push (the peer already on the remote wins on KDF),
//! remote to the local's key on pull. Without a password the operation
//! fails with `PasswordRequired`. Any decrypt failure after alignment
//! fails the whole operation; no record is silently dropped.
//!
//! ## Local-Only Records
//!
//! Records flagged `local_only` never appear in any written remote blob
//! and survive any pull untouched.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use password_note_domain::entities::{Vault, VaultRecord};
use password_note_domain::repositories::RemoteVaultStore;
use password_note_domain::services::EnvelopeService;
use password_note_domain::value_objects::{KdfConfig, RecordId};
use password_note_domain::VaultError;

use crate::infrastructure::crypto::AsyncKdfAdapter;

/// Which side wins when both changed and timestamps cannot decide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MergePreference {
    Local,
    Remote,
}

/// Outcome of a successful push.
#[derive(Debug, Clone)]
pub struct PushReport {
    /// Records in the written blob that are new or changed versus the
    /// previous remote content.
    pub records_pushed: usize,
    pub conflicts_resolved: usize,
    pub timestamp: DateTime<Utc>,
    /// Sync-version identifier appended to the blob's history.
    pub version: String,
}

/// Outcome of a successful pull.
#[derive(Debug, Clone)]
pub struct PullReport {
    /// True when the merged vault differs from the local one.
    pub vault_updated: bool,
    /// Records in the merged vault that are new or changed versus local.
    pub records_pulled: usize,
    pub conflicts_resolved: usize,
    /// True when the remote KDF differed and entities were re-encrypted.
    pub kdf_updated: bool,
    /// The remote's KDF configuration when it differed, so callers can
    /// persist the observation.
    pub remote_kdf: Option<KdfConfig>,
    /// The merged vault to adopt locally; `None` when no remote exists.
    pub merged: Option<Vault>,
    pub timestamp: DateTime<Utc>,
}

/// Push/pull engine over a remote blob store.
pub struct SyncEngine {
    remote: Arc<dyn RemoteVaultStore>,
    path: String,
    envelope: Arc<dyn EnvelopeService>,
    kdf: AsyncKdfAdapter,
}

impl SyncEngine {
    pub fn new(
        remote: Arc<dyn RemoteVaultStore>,
        path: String,
        envelope: Arc<dyn EnvelopeService>,
        kdf: AsyncKdfAdapter,
    ) -> Self {
        Self {
            remote,
            path,
            envelope,
            kdf,
        }
    }

    /// Pushes the local vault to the remote, merging with whatever is
    /// already there. The local vault itself is never modified.
    pub async fn push(&self, local: &Vault, password: Option<&str>) -> Result<PushReport, VaultError> {
        let timestamp = Utc::now();
        let filtered = local.remote_view();

        self.remote.mkdir_parents(&self.path).await?;
        let version = Uuid::new_v4().to_string();

        let Some(remote_bytes) = self.remote.get(&self.path).await? else {
            // First push: the filtered local vault becomes the remote.
            let mut blob = filtered;
            blob.history.push(version.clone());
            self.remote.put(&self.path, &blob.to_json_bytes()?).await?;
            info!(records = blob.records.len(), "initial push wrote remote vault");
            return Ok(PushReport {
                records_pushed: blob.records.len(),
                conflicts_resolved: 0,
                timestamp,
                version,
            });
        };
        let remote_vault = Vault::from_json_bytes(&remote_bytes)?;

        // Align the local ciphertexts to the remote's KDF when they
        // drifted; the merged blob must carry a single consistent KDF.
        let effective_local = if remote_vault.kdf.is_compatible(&filtered.kdf) {
            filtered
        } else {
            let password = password.ok_or(VaultError::PasswordRequired)?;
            let local_key = self.kdf.derive_key(password, &filtered.kdf).await?;
            let remote_key = self.kdf.derive_key(password, &remote_vault.kdf).await?;
            remote_vault.verify_master_key(self.envelope.as_ref(), &remote_key)?;
            debug!("push re-encrypting local vault to remote KDF");
            filtered.reencrypted(self.envelope.as_ref(), &local_key, &remote_key, remote_vault.kdf.clone())?
        };

        let (mut merged, conflicts_resolved) = merge_vaults(&effective_local, &remote_vault, MergePreference::Local);
        merged.kdf = remote_vault.kdf.clone();
        merged.sentinel = remote_vault.sentinel.clone().or(effective_local.sentinel.clone());
        merged.history.push(version.clone());

        let records_pushed = changed_keys(&merged.records, &remote_vault.records);
        self.remote.put(&self.path, &merged.to_json_bytes()?).await?;
        info!(records = records_pushed, conflicts = conflicts_resolved, "push complete");

        Ok(PushReport {
            records_pushed,
            conflicts_resolved,
            timestamp,
            version,
        })
    }

    /// Pulls the remote vault and merges it into the local one, returning
    /// the merged result for the caller to adopt.
    pub async fn pull(&self, local: &Vault, password: Option<&str>) -> Result<PullReport, VaultError> {
        let timestamp = Utc::now();

        let Some(remote_bytes) = self.remote.get(&self.path).await? else {
            return Ok(PullReport {
                vault_updated: false,
                records_pulled: 0,
                conflicts_resolved: 0,
                kdf_updated: false,
                remote_kdf: None,
                merged: None,
                timestamp,
            });
        };
        let remote_vault = Vault::from_json_bytes(&remote_bytes)?;

        // Re-encrypt the remote entities to the local key when the KDFs
        // drifted; the merged vault keeps the local KDF.
        let (effective_remote, kdf_updated, remote_kdf) = if remote_vault.kdf.is_compatible(&local.kdf) {
            (remote_vault, false, None)
        } else {
            let password = password.ok_or(VaultError::PasswordRequired)?;
            let remote_key = self.kdf.derive_key(password, &remote_vault.kdf).await?;
            let local_key = self.kdf.derive_key(password, &local.kdf).await?;
            local.verify_master_key(self.envelope.as_ref(), &local_key)?;
            let observed_kdf = remote_vault.kdf.clone();
            debug!("pull re-encrypting remote vault to local KDF");
            let realigned =
                remote_vault.reencrypted(self.envelope.as_ref(), &remote_key, &local_key, local.kdf.clone())?;
            (realigned, true, Some(observed_kdf))
        };

        let filtered_local = local.remote_view();
        let (mut merged, conflicts_resolved) =
            merge_vaults(&filtered_local, &effective_remote, MergePreference::Remote);
        merged.kdf = local.kdf.clone();
        merged.sentinel = local.sentinel.clone();

        // Local-only records survive any pull untouched.
        for (id, record) in &local.records {
            if record.local_only {
                merged.records.insert(*id, record.clone());
            }
        }

        let records_pulled = changed_keys(&merged.records, &local.records);
        let vault_updated = merged != *local;
        info!(records = records_pulled, conflicts = conflicts_resolved, "pull complete");

        Ok(PullReport {
            vault_updated,
            records_pulled,
            conflicts_resolved,
            kdf_updated,
            remote_kdf,
            merged: Some(merged),
            timestamp,
        })
    }
}

/// Merges two vaults map by map. Returns the merged vault (kdf, sentinel,
/// and history base taken from neither side in particular - the caller
/// stamps those) and the number of resolved conflicts.
fn merge_vaults(local: &Vault, remote: &Vault, prefer: MergePreference) -> (Vault, usize) {
    let mut conflicts = 0usize;

    let records = merge_map(&local.records, &remote.records, prefer, &mut conflicts, |l, r| {
        match l.last_modified.cmp(&r.last_modified) {
            std::cmp::Ordering::Greater => Some(MergePreference::Local),
            std::cmp::Ordering::Less => Some(MergePreference::Remote),
            std::cmp::Ordering::Equal => None,
        }
    });
    // No timestamp on the wire for labels/templates; the preferred side
    // wins outright.
    let labels = merge_map(&local.labels, &remote.labels, prefer, &mut conflicts, |_, _| None);
    let templates = merge_map(&local.templates, &remote.templates, prefer, &mut conflicts, |_, _| None);

    let mut merged = Vault::new(remote.kdf.clone());
    merged.records = records;
    merged.labels = labels;
    merged.templates = templates;
    merged.history = merge_history(&remote.history, &local.history);
    merged.sentinel = remote.sentinel.clone();
    (merged, conflicts)
}

/// Generic per-map merge. `newer` decides a both-sides conflict from the
/// values; `None` falls back to the side preference.
fn merge_map<K, V, F>(
    local: &HashMap<K, V>,
    remote: &HashMap<K, V>,
    prefer: MergePreference,
    conflicts: &mut usize,
    newer: F,
) -> HashMap<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone + PartialEq,
    F: Fn(&V, &V) -> Option<MergePreference>,
{
    let mut merged = HashMap::with_capacity(local.len().max(remote.len()));
    for (key, local_value) in local {
        match remote.get(key) {
            None => {
                merged.insert(key.clone(), local_value.clone());
            }
            Some(remote_value) if remote_value == local_value => {
                merged.insert(key.clone(), local_value.clone());
            }
            Some(remote_value) => {
                *conflicts += 1;
                let winner = match newer(local_value, remote_value).unwrap_or(prefer) {
                    MergePreference::Local => local_value,
                    MergePreference::Remote => remote_value,
                };
                merged.insert(key.clone(), winner.clone());
            }
        }
    }
    for (key, remote_value) in remote {
        if !local.contains_key(key) {
            merged.insert(key.clone(), remote_value.clone());
        }
    }
    merged
}

/// Unions two histories preserving first-seen order, base side first.
fn merge_history(base: &[String], additions: &[String]) -> Vec<String> {
    let mut merged: Vec<String> = base.to_vec();
    for version in additions {
        if !merged.contains(version) {
            merged.push(version.clone());
        }
    }
    merged
}

/// Counts keys in `new` that are absent from `old` or hold a different
/// value.
fn changed_keys(new: &HashMap<RecordId, VaultRecord>, old: &HashMap<RecordId, VaultRecord>) -> usize {
    new.iter()
        .filter(|(key, value)| old.get(*key).map(|previous| previous != *value).unwrap_or(true))
        .count()
}
