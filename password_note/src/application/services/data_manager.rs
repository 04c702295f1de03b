// /////////////////////////////////////////////////////////////////////////////
// Password Note
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Data Manager
//!
//! The data manager owns the three pieces of state the rest of the system
//! is forbidden to touch directly: the in-memory vault, the user profile,
//! and the master key. Every encrypt/decrypt boundary of the CRUD surface
//! runs here, and the vault is persisted after every mutation.
//!
//! ## Master-Key Custody
//!
//! The key is derived on authenticate, held only in memory, and zeroized
//! on lock or reset. No other component may read the raw key bytes; sync
//! alignment derives its own short-lived keys from the password instead.
//!
//! ## Authentication Protocol
//!
//! Derive a candidate key from the vault's own KDF configuration and
//! decrypt the sentinel with it; success is the canonical proof the
//! password is right. Decrypt failure surfaces as `InvalidCredentials`,
//! never as `DecryptFailed`.
//!
//! ## Tombstones
//!
//! Deletion never removes a map entry. Records tombstone in place
//! (ciphertexts discarded); templates and labels re-encrypt with a
//! deleted marker inside the plaintext. Sync depends on these stones to
//! propagate deletions, so list/get operations filter them instead.
//!
//! ## KDF Rotation
//!
//! `update_kdf_config` performs the whole re-encryption walk on a
//! working copy - records, labels, templates, sentinel, WebDAV blob -
//! and swaps references only when every step succeeded, which is what
//! makes the rotation atomic. A decrypt failure anywhere aborts with
//! both memory and persisted state untouched.

use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

use password_note_domain::entities::{
    DecryptedField, DecryptedRecord, Label, RecordDraft, RecordListEntry, RecordPatch, Template, TemplateField,
    UserProfile, Vault, VaultRecord, WebDavConfig, WebDavProfileSlot,
};
use password_note_domain::repositories::{LocalBlobStore, StorageSlot};
use password_note_domain::services::{EnvelopeService, RandomSource};
use password_note_domain::value_objects::{EncryptedData, FieldId, KdfConfig, LabelId, MasterKey, RecordId, TemplateId};
use password_note_domain::VaultError;

use crate::infrastructure::crypto::AsyncKdfAdapter;

/// Encrypted CRUD over the vault, plus master-key and profile custody.
pub struct DataManager {
    store: Arc<dyn LocalBlobStore>,
    envelope: Arc<dyn EnvelopeService>,
    kdf: AsyncKdfAdapter,
    random: Arc<dyn RandomSource>,
    vault: Option<Vault>,
    profile: UserProfile,
    master_key: Option<MasterKey>,
}

impl DataManager {
    pub fn new(
        store: Arc<dyn LocalBlobStore>,
        envelope: Arc<dyn EnvelopeService>,
        kdf: AsyncKdfAdapter,
        random: Arc<dyn RandomSource>,
    ) -> Self {
        Self {
            store,
            envelope,
            kdf,
            random,
            vault: None,
            profile: UserProfile::default(),
            master_key: None,
        }
    }

    // ------------------------------------------------------------------
    // Master-key custody and lifecycle
    // ------------------------------------------------------------------

    pub fn is_unlocked(&self) -> bool {
        self.master_key.is_some()
    }

    /// Zeroizes and drops the in-memory key. The vault stays loaded but
    /// unreadable.
    pub fn lock(&mut self) {
        if let Some(key) = self.master_key.take() {
            drop(key); // MasterKey zeroizes on drop
        }
        debug!("master key cleared");
    }

    /// True when both persisted blobs exist.
    pub async fn is_persisted(&self) -> Result<bool, VaultError> {
        Ok(self.store.contains(StorageSlot::VaultData).await?
            && self.store.contains(StorageSlot::UserProfile).await?)
    }

    /// Loads both blobs, derives a key from the vault's own KDF, and
    /// proves it against the sentinel.
    pub async fn authenticate(&mut self, password: &str) -> Result<(), VaultError> {
        let vault_bytes = self
            .store
            .read(StorageSlot::VaultData)
            .await?
            .ok_or(VaultError::NotInitialized)?;
        let vault = Vault::from_json_bytes(&vault_bytes)?;

        let profile = match self.store.read(StorageSlot::UserProfile).await? {
            Some(bytes) => UserProfile::from_json_bytes(&bytes)?,
            None => UserProfile::default(),
        };

        let key = self.kdf.derive_key(password, &vault.kdf).await?;
        vault.verify_master_key(self.envelope.as_ref(), &key)?;

        self.vault = Some(vault);
        self.profile = profile;
        self.master_key = Some(key);
        debug!("vault unlocked");
        Ok(())
    }

    /// Creates a fresh empty vault: new salt, default Argon2id
    /// configuration, sentinel installed, both blobs persisted.
    pub async fn initialize_new_vault(&mut self, password: &str) -> Result<(), VaultError> {
        let kdf_config = KdfConfig::generate(self.random.as_ref())?;
        let key = self.kdf.derive_key(password, &kdf_config).await?;

        let mut vault = Vault::new(kdf_config);
        vault.install_sentinel(self.envelope.as_ref(), &key)?;

        self.vault = Some(vault);
        self.profile = UserProfile::default();
        self.master_key = Some(key);
        self.save_vault().await?;
        self.save_profile().await?;
        debug!("new vault initialized");
        Ok(())
    }

    /// Adopts a vault fetched from the remote during first-run
    /// initialization. The caller has already proven `key` against the
    /// vault's sentinel.
    pub async fn adopt_remote_vault(&mut self, vault: Vault, key: MasterKey) -> Result<(), VaultError> {
        self.vault = Some(vault);
        self.profile = UserProfile::default();
        self.master_key = Some(key);
        self.save_vault().await?;
        self.save_profile().await?;
        debug!("remote vault adopted");
        Ok(())
    }

    /// Replaces the vault with a merged result from pull and persists.
    pub async fn adopt_merged_vault(&mut self, merged: Vault) -> Result<(), VaultError> {
        self.ensure_unlocked()?;
        self.vault = Some(merged);
        self.save_vault().await
    }

    /// Wipes persistence and every piece of in-memory state.
    pub async fn reset(&mut self) -> Result<(), VaultError> {
        self.store.remove(StorageSlot::VaultData).await?;
        self.store.remove(StorageSlot::UserProfile).await?;
        self.vault = None;
        self.profile = UserProfile::default();
        self.lock();
        Ok(())
    }

    /// Read access to the current vault (sync engine, export).
    pub fn vault(&self) -> Result<&Vault, VaultError> {
        self.vault.as_ref().ok_or(VaultError::NotInitialized)
    }

    // ------------------------------------------------------------------
    // Record operations
    // ------------------------------------------------------------------

    pub async fn create_record(&mut self, template_id: TemplateId, draft: RecordDraft) -> Result<RecordId, VaultError> {
        let template = self.live_template(&template_id)?;
        let title = self.encrypt_str(&draft.title)?;
        let fields = self.encrypt_fields(&template, &draft.values)?;
        let labels = self.retain_known_labels(draft.labels)?;

        let id = RecordId::new();
        let mut record = VaultRecord::new(template_id, title, fields, labels, Utc::now());
        record.local_only = draft.local_only;

        self.vault_mut()?.records.insert(id, record);
        self.save_vault().await?;
        debug!(record = %id, "record created");
        Ok(id)
    }

    /// Returns the decrypted record, or `None` when it is missing or
    /// tombstoned. Field names and kinds are recovered through the
    /// record's template; field ids the template no longer knows are
    /// silently dropped (render-time graceful degrade).
    pub fn get_record(&self, id: &RecordId) -> Result<Option<DecryptedRecord>, VaultError> {
        let vault = self.vault()?;
        self.ensure_unlocked()?;
        let Some(record) = vault.records.get(id) else {
            return Ok(None);
        };
        if record.is_tombstone() {
            return Ok(None);
        }

        let title = match &record.title {
            Some(data) => self.decrypt_str(data)?,
            None => String::new(),
        };

        let mut fields = Vec::new();
        if let Some(template) = self.decrypt_template_entry(&record.template)? {
            for field in &template.fields {
                if let Some(data) = record.fields.get(&field.id) {
                    fields.push(DecryptedField {
                        id: field.id.clone(),
                        name: field.name.clone(),
                        kind: field.kind,
                        value: self.decrypt_str(data)?,
                    });
                }
            }
        }

        Ok(Some(DecryptedRecord {
            id: *id,
            title,
            fields,
            template: record.template,
            labels: record.labels.clone(),
            last_modified: record.last_modified,
            deleted: record.deleted,
            local_only: record.local_only,
        }))
    }

    pub async fn update_record(&mut self, id: &RecordId, patch: RecordPatch) -> Result<(), VaultError> {
        let existing = self
            .vault()?
            .records
            .get(id)
            .filter(|r| !r.is_tombstone())
            .ok_or_else(|| VaultError::RecordNotFound(id.to_string()))?
            .clone();

        let mut updated = existing;
        if let Some(title) = &patch.title {
            updated.title = Some(self.encrypt_str(title)?);
        }
        if let Some(values) = &patch.values {
            let template = self.live_template(&updated.template)?;
            for (field_id, data) in self.encrypt_fields(&template, values)? {
                updated.fields.insert(field_id, data);
            }
        }
        if let Some(labels) = patch.labels {
            updated.labels = self.retain_known_labels(labels)?;
        }
        if let Some(local_only) = patch.local_only {
            updated.local_only = local_only;
        }
        updated.last_modified = Utc::now();

        self.vault_mut()?.records.insert(*id, updated);
        self.save_vault().await?;
        debug!(record = %id, "record updated");
        Ok(())
    }

    /// Tombstones the record; the entry stays in the map so the deletion
    /// replicates through sync.
    pub async fn delete_record(&mut self, id: &RecordId) -> Result<(), VaultError> {
        self.ensure_unlocked()?;
        let record = self
            .vault_mut()?
            .records
            .get_mut(id)
            .ok_or_else(|| VaultError::RecordNotFound(id.to_string()))?;
        record.tombstone(Utc::now());
        self.save_vault().await?;
        debug!(record = %id, "record tombstoned");
        Ok(())
    }

    /// Decrypted titles of non-tombstoned records. Records whose title
    /// fails to decrypt are skipped and counted, not fatal to the list.
    pub fn get_record_list(&self) -> Result<Vec<RecordListEntry>, VaultError> {
        let vault = self.vault()?;
        self.ensure_unlocked()?;
        let mut entries = Vec::new();
        let mut unreadable = 0usize;
        for (id, record) in vault.live_records() {
            let title = match &record.title {
                Some(data) => match self.decrypt_str(data) {
                    Ok(title) => title,
                    Err(_) => {
                        unreadable += 1;
                        continue;
                    }
                },
                None => String::new(),
            };
            entries.push(RecordListEntry {
                id: *id,
                title,
                template: record.template,
                labels: record.labels.clone(),
                last_modified: record.last_modified,
            });
        }
        if unreadable > 0 {
            warn!(count = unreadable, "skipped unreadable records in list");
        }
        entries.sort_by(|a, b| b.last_modified.cmp(&a.last_modified));
        Ok(entries)
    }

    // ------------------------------------------------------------------
    // Template operations
    // ------------------------------------------------------------------

    pub async fn create_template(
        &mut self,
        name: &str,
        fields: Vec<TemplateField>,
    ) -> Result<TemplateId, VaultError> {
        let sealed = self.encrypt_template(&Template::new(name, fields))?;
        let id = TemplateId::new();
        self.vault_mut()?.templates.insert(id, sealed);
        self.save_vault().await?;
        debug!(template = %id, "template created");
        Ok(id)
    }

    /// Returns the decrypted template, or `None` when missing or
    /// tombstoned.
    pub fn get_template(&self, id: &TemplateId) -> Result<Option<Template>, VaultError> {
        self.ensure_unlocked()?;
        self.decrypt_template_entry(id)
    }

    pub async fn update_template(
        &mut self,
        id: &TemplateId,
        name: &str,
        fields: Vec<TemplateField>,
    ) -> Result<(), VaultError> {
        self.live_template(id)?;
        let sealed = self.encrypt_template(&Template::new(name, fields))?;
        self.vault_mut()?.templates.insert(*id, sealed);
        self.save_vault().await?;
        debug!(template = %id, "template updated");
        Ok(())
    }

    /// Tombstones a template. Refused while any live record still
    /// references it.
    pub async fn delete_template(&mut self, id: &TemplateId) -> Result<(), VaultError> {
        let template = self.live_template(id)?;
        let referenced = self.vault()?.live_records().any(|(_, r)| r.template == *id);
        if referenced {
            return Err(VaultError::TemplateInUse(id.to_string()));
        }
        let sealed = self.encrypt_template(&Template::tombstone(template.name))?;
        self.vault_mut()?.templates.insert(*id, sealed);
        self.save_vault().await?;
        debug!(template = %id, "template tombstoned");
        Ok(())
    }

    /// Decrypted live templates; unreadable entries are skipped and
    /// logged.
    pub fn get_template_list(&self) -> Result<Vec<(TemplateId, Template)>, VaultError> {
        let vault = self.vault()?;
        self.ensure_unlocked()?;
        let mut entries = Vec::new();
        let mut unreadable = 0usize;
        for (id, data) in &vault.templates {
            match self.decrypt_template(data) {
                Ok(template) if !template.deleted => entries.push((*id, template)),
                Ok(_) => {}
                Err(_) => unreadable += 1,
            }
        }
        if unreadable > 0 {
            warn!(count = unreadable, "skipped unreadable templates in list");
        }
        entries.sort_by(|a, b| a.1.name.cmp(&b.1.name));
        Ok(entries)
    }

    // ------------------------------------------------------------------
    // Label operations
    // ------------------------------------------------------------------

    pub async fn create_label(&mut self, name: &str) -> Result<LabelId, VaultError> {
        let sealed = self.encrypt_label(&Label::new(name))?;
        let id = LabelId::new();
        self.vault_mut()?.labels.insert(id, sealed);
        self.save_vault().await?;
        debug!(label = %id, "label created");
        Ok(id)
    }

    pub fn get_label(&self, id: &LabelId) -> Result<Option<Label>, VaultError> {
        self.ensure_unlocked()?;
        let Some(data) = self.vault()?.labels.get(id) else {
            return Ok(None);
        };
        let label = self.decrypt_label(data)?;
        Ok(if label.deleted { None } else { Some(label) })
    }

    pub async fn update_label(&mut self, id: &LabelId, name: &str) -> Result<(), VaultError> {
        if self.get_label(id)?.is_none() {
            return Err(VaultError::LabelNotFound(id.to_string()));
        }
        let sealed = self.encrypt_label(&Label::new(name))?;
        self.vault_mut()?.labels.insert(*id, sealed);
        self.save_vault().await?;
        debug!(label = %id, "label updated");
        Ok(())
    }

    /// Tombstones a label. Records referencing it keep the stale id;
    /// reads degrade gracefully.
    pub async fn delete_label(&mut self, id: &LabelId) -> Result<(), VaultError> {
        let label = self
            .get_label(id)?
            .ok_or_else(|| VaultError::LabelNotFound(id.to_string()))?;
        let sealed = self.encrypt_label(&Label::tombstone(label.name))?;
        self.vault_mut()?.labels.insert(*id, sealed);
        self.save_vault().await?;
        debug!(label = %id, "label tombstoned");
        Ok(())
    }

    pub fn get_label_list(&self) -> Result<Vec<(LabelId, Label)>, VaultError> {
        let vault = self.vault()?;
        self.ensure_unlocked()?;
        let mut entries = Vec::new();
        let mut unreadable = 0usize;
        for (id, data) in &vault.labels {
            match self.decrypt_label(data) {
                Ok(label) if !label.deleted => entries.push((*id, label)),
                Ok(_) => {}
                Err(_) => unreadable += 1,
            }
        }
        if unreadable > 0 {
            warn!(count = unreadable, "skipped unreadable labels in list");
        }
        entries.sort_by(|a, b| a.1.name.cmp(&b.1.name));
        Ok(entries)
    }

    // ------------------------------------------------------------------
    // WebDAV config custody
    // ------------------------------------------------------------------

    pub async fn set_webdav_config(&mut self, config: &WebDavConfig) -> Result<(), VaultError> {
        let sealed = self.envelope.encrypt(&serde_json::to_vec(config)?, self.key()?)?;
        self.profile.webdav_config = Some(WebDavProfileSlot { encrypted_data: sealed });
        self.save_profile().await
    }

    pub fn get_webdav_config(&self) -> Result<Option<WebDavConfig>, VaultError> {
        let Some(slot) = &self.profile.webdav_config else {
            return Ok(None);
        };
        let plaintext = self.envelope.decrypt(&slot.encrypted_data, self.key()?)?;
        Ok(Some(serde_json::from_slice(&plaintext)?))
    }

    /// Replaces the stored configuration with an encryption of the
    /// empty-field form.
    pub async fn clear_webdav_config(&mut self) -> Result<(), VaultError> {
        self.set_webdav_config(&WebDavConfig::default()).await
    }

    // ------------------------------------------------------------------
    // KDF rotation
    // ------------------------------------------------------------------

    /// Changes the KDF and re-encrypts every ciphertext in the vault and
    /// profile under the newly derived key, atomically.
    pub async fn update_kdf_config(&mut self, new_config: KdfConfig, password: &str) -> Result<(), VaultError> {
        new_config.validate()?;
        self.ensure_unlocked()?;
        let vault = self.vault()?.clone();

        if vault.kdf.is_compatible(&new_config) {
            return Err(VaultError::kdf_validation("identical configuration"));
        }

        let old_key = self.kdf.derive_key(password, &vault.kdf).await?;
        let new_key = self.kdf.derive_key(password, &new_config).await?;

        // Whole-vault walk on the working copy; verifies the sentinel
        // under the old key first.
        let rebuilt = vault.reencrypted(self.envelope.as_ref(), &old_key, &new_key, new_config)?;

        let mut profile = self.profile.clone();
        if let Some(slot) = &profile.webdav_config {
            let plaintext = self.envelope.decrypt(&slot.encrypted_data, &old_key)?;
            profile.webdav_config = Some(WebDavProfileSlot {
                encrypted_data: self.envelope.encrypt(&plaintext, &new_key)?,
            });
        }

        // Every decrypt succeeded: swap references, then persist.
        self.vault = Some(rebuilt);
        self.profile = profile;
        self.master_key = Some(new_key);
        self.save_vault().await?;
        self.save_profile().await?;
        debug!("KDF configuration rotated");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    pub async fn save_vault(&self) -> Result<(), VaultError> {
        let bytes = self.vault()?.to_json_bytes()?;
        self.store.write(StorageSlot::VaultData, &bytes).await
    }

    pub async fn save_profile(&self) -> Result<(), VaultError> {
        let bytes = self.profile.to_json_bytes()?;
        self.store.write(StorageSlot::UserProfile, &bytes).await
    }

    // ------------------------------------------------------------------
    // Internal helpers
    // ------------------------------------------------------------------

    fn ensure_unlocked(&self) -> Result<(), VaultError> {
        self.key().map(|_| ())
    }

    fn key(&self) -> Result<&MasterKey, VaultError> {
        self.master_key.as_ref().ok_or(VaultError::Locked)
    }

    fn vault_mut(&mut self) -> Result<&mut Vault, VaultError> {
        self.vault.as_mut().ok_or(VaultError::NotInitialized)
    }

    fn encrypt_str(&self, value: &str) -> Result<EncryptedData, VaultError> {
        self.envelope.encrypt(value.as_bytes(), self.key()?)
    }

    fn decrypt_str(&self, data: &EncryptedData) -> Result<String, VaultError> {
        let plaintext = self.envelope.decrypt(data, self.key()?)?;
        String::from_utf8(plaintext).map_err(|_| VaultError::decrypt_failed("value is not valid UTF-8"))
    }

    fn encrypt_template(&self, template: &Template) -> Result<EncryptedData, VaultError> {
        self.envelope.encrypt(&template.to_plaintext()?, self.key()?)
    }

    fn decrypt_template(&self, data: &EncryptedData) -> Result<Template, VaultError> {
        Template::from_plaintext(&self.envelope.decrypt(data, self.key()?)?)
    }

    fn encrypt_label(&self, label: &Label) -> Result<EncryptedData, VaultError> {
        self.envelope.encrypt(&label.to_plaintext()?, self.key()?)
    }

    fn decrypt_label(&self, data: &EncryptedData) -> Result<Label, VaultError> {
        Label::from_plaintext(&self.envelope.decrypt(data, self.key()?)?)
    }

    /// Decrypts a template entry if present and live.
    fn decrypt_template_entry(&self, id: &TemplateId) -> Result<Option<Template>, VaultError> {
        let Some(data) = self.vault()?.templates.get(id) else {
            return Ok(None);
        };
        let template = self.decrypt_template(data)?;
        Ok(if template.deleted { None } else { Some(template) })
    }

    /// Looks up a template that must exist and be live.
    fn live_template(&self, id: &TemplateId) -> Result<Template, VaultError> {
        self.decrypt_template_entry(id)?
            .ok_or_else(|| VaultError::TemplateNotFound(id.to_string()))
    }

    /// Maps field names to ids through the template and encrypts the
    /// values. Names the template does not know are dropped.
    fn encrypt_fields(
        &self,
        template: &Template,
        values: &HashMap<String, String>,
    ) -> Result<HashMap<FieldId, EncryptedData>, VaultError> {
        let mut fields = HashMap::new();
        for (name, value) in values {
            let Some(field) = template.field_by_name(name) else {
                debug!(field = %name, "dropping value for unknown template field");
                continue;
            };
            fields.insert(field.id.clone(), self.encrypt_str(value)?);
        }
        Ok(fields)
    }

    /// Keeps only label ids present in the vault's label map, preserving
    /// the referencing invariant.
    fn retain_known_labels(&self, labels: Vec<LabelId>) -> Result<Vec<LabelId>, VaultError> {
        let vault = self.vault()?;
        Ok(labels.into_iter().filter(|id| vault.labels.contains_key(id)).collect())
    }
}
