// /////////////////////////////////////////////////////////////////////////////
// Password Note
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Vault Facade
//!
//! The only public surface of the system. The facade drives the data
//! manager for every data operation and the sync engine for push/pull,
//! and enforces the lifecycle preconditions: every data API fails with
//! `NotInitialized` before `initialize` and with `Locked` until
//! `authenticate` succeeds.
//!
//! ## Lifecycle
//!
//! ```text
//! Uninitialized --initialize--> Unlocked (fresh or adopted vault)
//! Uninitialized --initialize--> Locked   (persisted vault found)
//! Locked --authenticate--> Unlocked
//! Unlocked --lock--> Locked
//! any --reset--> Uninitialized (persistence wiped)
//! ```
//!
//! The facade is an explicit handle rather than a process-wide global;
//! operations take `&mut self`, so one instance serializes its callers by
//! construction. Embedders that want a singleton wrap it in their own
//! `Mutex`.
//!
//! ## Structured Results
//!
//! Authentication and sync return structured result objects with
//! `success`/`error` instead of bare `Result`s, mirroring what UI
//! consumers need to localize failures; CRUD operations return typed
//! errors directly.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{info, warn};

use password_note_domain::entities::{
    DecryptedRecord, Label, RecordDraft, RecordListEntry, RecordPatch, Template, TemplateField, WebDavConfig,
};
use password_note_domain::repositories::{LocalBlobStore, RemoteStoreFactory};
use password_note_domain::services::{
    EnvelopeService, KdfService, PasswordStrengthService, RandomSource,
};
use password_note_domain::value_objects::{KdfConfig, LabelId, RecordId, StrengthReport, TemplateId};
use password_note_domain::{Vault, VaultError};

use crate::application::services::data_manager::DataManager;
use crate::application::services::sync_engine::{PullReport, PushReport, SyncEngine};
use crate::infrastructure::crypto::{Argon2Kdf, AsyncKdfAdapter, ChaChaEnvelope, SystemRandomSource, ZxcvbnStrength};
use crate::infrastructure::remote::WebDavStoreFactory;

/// Facade lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Uninitialized,
    Locked,
    Unlocked,
}

/// Options for [`VaultFacade::initialize`].
#[derive(Debug, Clone)]
pub struct InitializeOptions {
    pub master_password: String,
    /// Remote configuration to store (encrypted) after initialization.
    pub webdav: Option<WebDavConfig>,
    /// When a remote is configured, try to adopt an existing remote
    /// vault before creating a fresh local one.
    pub pull_remote_vault: bool,
}

impl InitializeOptions {
    pub fn with_password(master_password: impl Into<String>) -> Self {
        Self {
            master_password: master_password.into(),
            webdav: None,
            pull_remote_vault: false,
        }
    }
}

/// Structured authentication outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthOutcome {
    pub success: bool,
    pub error: Option<VaultError>,
}

/// Structured push outcome.
#[derive(Debug, Clone)]
pub struct PushOutcome {
    pub success: bool,
    pub password_required: bool,
    pub records_pushed: usize,
    pub conflicts_resolved: usize,
    pub timestamp: DateTime<Utc>,
    pub error: Option<VaultError>,
}

/// Structured pull outcome.
#[derive(Debug, Clone)]
pub struct PullOutcome {
    pub success: bool,
    pub password_required: bool,
    pub vault_updated: bool,
    pub records_pulled: usize,
    pub conflicts_resolved: usize,
    pub kdf_updated: bool,
    pub remote_kdf: Option<KdfConfig>,
    pub timestamp: DateTime<Utc>,
    pub error: Option<VaultError>,
}

/// Current synchronization posture.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncStatus {
    pub configured: bool,
    pub remote_path: Option<String>,
    pub last_push: Option<DateTime<Utc>>,
    pub last_pull: Option<DateTime<Utc>>,
    pub history_length: usize,
}

/// The public vault handle.
pub struct VaultFacade {
    data: DataManager,
    envelope: Arc<dyn EnvelopeService>,
    kdf: AsyncKdfAdapter,
    strength: Arc<dyn PasswordStrengthService>,
    remote_factory: Arc<dyn RemoteStoreFactory>,
    lifecycle: Lifecycle,
    last_push: Option<DateTime<Utc>>,
    last_pull: Option<DateTime<Utc>>,
}

impl VaultFacade {
    /// Full dependency injection; the seams tests use.
    pub fn with_services(
        store: Arc<dyn LocalBlobStore>,
        remote_factory: Arc<dyn RemoteStoreFactory>,
        envelope: Arc<dyn EnvelopeService>,
        kdf_service: Arc<dyn KdfService>,
        strength: Arc<dyn PasswordStrengthService>,
        random: Arc<dyn RandomSource>,
    ) -> Self {
        let kdf = AsyncKdfAdapter::new(kdf_service);
        Self {
            data: DataManager::new(store, envelope.clone(), kdf.clone(), random),
            envelope,
            kdf,
            strength,
            remote_factory,
            lifecycle: Lifecycle::Uninitialized,
            last_push: None,
            last_pull: None,
        }
    }

    /// Production wiring: system randomness, ChaCha envelope, Argon2id,
    /// zxcvbn, WebDAV remote.
    pub fn new(store: Arc<dyn LocalBlobStore>) -> Self {
        let random: Arc<dyn RandomSource> = Arc::new(SystemRandomSource::new());
        Self::with_services(
            store,
            Arc::new(WebDavStoreFactory::new()),
            Arc::new(ChaChaEnvelope::new(random.clone())),
            Arc::new(Argon2Kdf::new()),
            Arc::new(ZxcvbnStrength::new()),
            random,
        )
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// True when both persisted blobs exist.
    pub async fn is_initialized(&self) -> Result<bool, VaultError> {
        self.data.is_persisted().await
    }

    /// Sets up the vault. With existing persistence this only marks the
    /// handle initialized (authentication happens via `authenticate`);
    /// otherwise it checks password strength, optionally adopts a remote
    /// vault, and falls back to creating a fresh local one.
    pub async fn initialize(&mut self, options: InitializeOptions) -> Result<(), VaultError> {
        if self.lifecycle != Lifecycle::Uninitialized {
            return Ok(());
        }
        if self.data.is_persisted().await? {
            self.lifecycle = Lifecycle::Locked;
            info!("existing vault found; facade locked");
            return Ok(());
        }

        let report = self.strength.score(&options.master_password);
        if !report.is_acceptable() {
            let detail = report
                .warnings
                .first()
                .cloned()
                .unwrap_or_else(|| format!("strength score {} is below the acceptable threshold", report.score));
            return Err(VaultError::WeakPassword(detail));
        }

        if let Some(webdav) = &options.webdav {
            if options.pull_remote_vault {
                match self.try_adopt_remote(webdav, &options.master_password).await {
                    Ok(true) => {
                        self.lifecycle = Lifecycle::Unlocked;
                        self.data.set_webdav_config(webdav).await?;
                        info!("initialized from remote vault");
                        return Ok(());
                    }
                    Ok(false) => {}
                    Err(VaultError::InvalidCredentials) => return Err(VaultError::InvalidCredentials),
                    Err(e) => {
                        warn!(error = %e, "remote vault unavailable; falling back to local initialization");
                    }
                }
            }
        }

        self.data.initialize_new_vault(&options.master_password).await?;
        self.lifecycle = Lifecycle::Unlocked;
        if let Some(webdav) = &options.webdav {
            self.data.set_webdav_config(webdav).await?;
        }
        info!("initialized fresh local vault");
        Ok(())
    }

    /// Loads persistence, derives a key from the vault's KDF, and proves
    /// it against the sentinel.
    pub async fn authenticate(&mut self, password: &str) -> AuthOutcome {
        if self.lifecycle == Lifecycle::Uninitialized {
            return AuthOutcome {
                success: false,
                error: Some(VaultError::NotInitialized),
            };
        }
        match self.data.authenticate(password).await {
            Ok(()) => {
                self.lifecycle = Lifecycle::Unlocked;
                AuthOutcome {
                    success: true,
                    error: None,
                }
            }
            Err(e) => AuthOutcome {
                success: false,
                error: Some(e),
            },
        }
    }

    /// Clears the master key; the persisted vault is untouched.
    pub fn lock(&mut self) {
        if self.lifecycle == Lifecycle::Unlocked {
            self.data.lock();
            self.lifecycle = Lifecycle::Locked;
        }
    }

    pub fn is_unlocked(&self) -> bool {
        self.lifecycle == Lifecycle::Unlocked
    }

    /// Wipes persistence and returns the handle to `Uninitialized`.
    pub async fn reset(&mut self) -> Result<(), VaultError> {
        self.data.reset().await?;
        self.lifecycle = Lifecycle::Uninitialized;
        self.last_push = None;
        self.last_pull = None;
        info!("vault reset");
        Ok(())
    }

    /// Scores a candidate master password; stateless.
    pub fn check_password_complexity(&self, password: &str) -> StrengthReport {
        self.strength.score(password)
    }

    /// Exports the vault in its encrypted wire form.
    pub fn export_vault(&self) -> Result<String, VaultError> {
        self.ensure_unlocked()?;
        serde_json::to_string_pretty(self.data.vault()?).map_err(VaultError::from)
    }

    // ------------------------------------------------------------------
    // Record operations
    // ------------------------------------------------------------------

    pub async fn create_record(
        &mut self,
        template: TemplateId,
        draft: RecordDraft,
    ) -> Result<RecordId, VaultError> {
        self.ensure_unlocked()?;
        self.data.create_record(template, draft).await
    }

    pub fn get_record(&self, id: &RecordId) -> Result<Option<DecryptedRecord>, VaultError> {
        self.ensure_unlocked()?;
        self.data.get_record(id)
    }

    pub async fn update_record(&mut self, id: &RecordId, patch: RecordPatch) -> Result<(), VaultError> {
        self.ensure_unlocked()?;
        self.data.update_record(id, patch).await
    }

    pub async fn delete_record(&mut self, id: &RecordId) -> Result<(), VaultError> {
        self.ensure_unlocked()?;
        self.data.delete_record(id).await
    }

    pub fn get_record_list(&self) -> Result<Vec<RecordListEntry>, VaultError> {
        self.ensure_unlocked()?;
        self.data.get_record_list()
    }

    // ------------------------------------------------------------------
    // Template operations
    // ------------------------------------------------------------------

    pub async fn create_template(&mut self, name: &str, fields: Vec<TemplateField>) -> Result<TemplateId, VaultError> {
        self.ensure_unlocked()?;
        self.data.create_template(name, fields).await
    }

    pub fn get_template(&self, id: &TemplateId) -> Result<Option<Template>, VaultError> {
        self.ensure_unlocked()?;
        self.data.get_template(id)
    }

    pub async fn update_template(
        &mut self,
        id: &TemplateId,
        name: &str,
        fields: Vec<TemplateField>,
    ) -> Result<(), VaultError> {
        self.ensure_unlocked()?;
        self.data.update_template(id, name, fields).await
    }

    /// Tombstones a template; refused with `TemplateInUse` while a live
    /// record references it.
    pub async fn delete_template(&mut self, id: &TemplateId) -> Result<(), VaultError> {
        self.ensure_unlocked()?;
        self.data.delete_template(id).await
    }

    pub fn get_template_list(&self) -> Result<Vec<(TemplateId, Template)>, VaultError> {
        self.ensure_unlocked()?;
        self.data.get_template_list()
    }

    // ------------------------------------------------------------------
    // Label operations
    // ------------------------------------------------------------------

    pub async fn create_label(&mut self, name: &str) -> Result<LabelId, VaultError> {
        self.ensure_unlocked()?;
        self.data.create_label(name).await
    }

    pub fn get_label(&self, id: &LabelId) -> Result<Option<Label>, VaultError> {
        self.ensure_unlocked()?;
        self.data.get_label(id)
    }

    pub async fn update_label(&mut self, id: &LabelId, name: &str) -> Result<(), VaultError> {
        self.ensure_unlocked()?;
        self.data.update_label(id, name).await
    }

    pub async fn delete_label(&mut self, id: &LabelId) -> Result<(), VaultError> {
        self.ensure_unlocked()?;
        self.data.delete_label(id).await
    }

    pub fn get_label_list(&self) -> Result<Vec<(LabelId, Label)>, VaultError> {
        self.ensure_unlocked()?;
        self.data.get_label_list()
    }

    // ------------------------------------------------------------------
    // WebDAV configuration
    // ------------------------------------------------------------------

    pub async fn configure_webdav(&mut self, config: &WebDavConfig) -> Result<(), VaultError> {
        self.ensure_unlocked()?;
        self.data.set_webdav_config(config).await
    }

    pub async fn clear_webdav_config(&mut self) -> Result<(), VaultError> {
        self.ensure_unlocked()?;
        self.data.clear_webdav_config().await
    }

    /// The stored configuration, or `None` when absent or cleared.
    pub fn get_webdav_config(&self) -> Result<Option<WebDavConfig>, VaultError> {
        self.ensure_unlocked()?;
        Ok(self.data.get_webdav_config()?.filter(|cfg| !cfg.is_empty()))
    }

    /// Probes the configured (or provided) remote.
    pub async fn test_webdav_connection(&self, config: Option<&WebDavConfig>) -> Result<(), VaultError> {
        let owned;
        let config = match config {
            Some(cfg) => cfg,
            None => {
                self.ensure_unlocked()?;
                owned = self
                    .get_webdav_config()?
                    .ok_or_else(|| VaultError::remote_unreachable("WebDAV is not configured"))?;
                &owned
            }
        };
        let store = self.remote_factory.open(config)?;
        // Exercise the transport end to end; a missing blob is fine.
        store.exists(&config.vault_path).await.map(|_| ())
    }

    // ------------------------------------------------------------------
    // Sync
    // ------------------------------------------------------------------

    /// Pushes the local vault to the configured remote.
    pub async fn push(&mut self, password: Option<&str>) -> PushOutcome {
        let timestamp = Utc::now();
        match self.push_inner(password).await {
            Ok(report) => {
                self.last_push = Some(report.timestamp);
                PushOutcome {
                    success: true,
                    password_required: false,
                    records_pushed: report.records_pushed,
                    conflicts_resolved: report.conflicts_resolved,
                    timestamp: report.timestamp,
                    error: None,
                }
            }
            Err(VaultError::PasswordRequired) => PushOutcome {
                success: false,
                password_required: true,
                records_pushed: 0,
                conflicts_resolved: 0,
                timestamp,
                error: Some(VaultError::PasswordRequired),
            },
            Err(e) => PushOutcome {
                success: false,
                password_required: false,
                records_pushed: 0,
                conflicts_resolved: 0,
                timestamp,
                error: Some(e),
            },
        }
    }

    async fn push_inner(&self, password: Option<&str>) -> Result<PushReport, VaultError> {
        self.ensure_unlocked()?;
        let engine = self.sync_engine()?;
        engine.push(self.data.vault()?, password).await
    }

    /// Pulls the remote vault, merges, and adopts the result.
    pub async fn pull(&mut self, password: Option<&str>) -> PullOutcome {
        let timestamp = Utc::now();
        match self.pull_inner(password).await {
            Ok(report) => {
                self.last_pull = Some(report.timestamp);
                PullOutcome {
                    success: true,
                    password_required: false,
                    vault_updated: report.vault_updated,
                    records_pulled: report.records_pulled,
                    conflicts_resolved: report.conflicts_resolved,
                    kdf_updated: report.kdf_updated,
                    remote_kdf: report.remote_kdf,
                    timestamp: report.timestamp,
                    error: None,
                }
            }
            Err(VaultError::PasswordRequired) => PullOutcome {
                success: false,
                password_required: true,
                vault_updated: false,
                records_pulled: 0,
                conflicts_resolved: 0,
                kdf_updated: false,
                remote_kdf: None,
                timestamp,
                error: Some(VaultError::PasswordRequired),
            },
            Err(e) => PullOutcome {
                success: false,
                password_required: false,
                vault_updated: false,
                records_pulled: 0,
                conflicts_resolved: 0,
                kdf_updated: false,
                remote_kdf: None,
                timestamp,
                error: Some(e),
            },
        }
    }

    async fn pull_inner(&mut self, password: Option<&str>) -> Result<PullReport, VaultError> {
        self.ensure_unlocked()?;
        let engine = self.sync_engine()?;
        let report = engine.pull(self.data.vault()?, password).await?;
        if let Some(merged) = report.merged.clone() {
            self.data.adopt_merged_vault(merged).await?;
        }
        Ok(report)
    }

    /// Current sync posture.
    pub fn get_sync_status(&self) -> Result<SyncStatus, VaultError> {
        self.ensure_unlocked()?;
        let config = self.get_webdav_config()?;
        Ok(SyncStatus {
            configured: config.is_some(),
            remote_path: config.map(|cfg| cfg.vault_path),
            last_push: self.last_push,
            last_pull: self.last_pull,
            history_length: self.data.vault()?.history.len(),
        })
    }

    // ------------------------------------------------------------------
    // KDF rotation
    // ------------------------------------------------------------------

    /// Rotates the KDF configuration, re-encrypting the whole vault.
    pub async fn update_kdf_config(&mut self, new_config: KdfConfig, password: &str) -> Result<(), VaultError> {
        self.ensure_unlocked()?;
        self.data.update_kdf_config(new_config, password).await
    }

    // ------------------------------------------------------------------
    // Internal
    // ------------------------------------------------------------------

    fn ensure_unlocked(&self) -> Result<(), VaultError> {
        match self.lifecycle {
            Lifecycle::Uninitialized => Err(VaultError::NotInitialized),
            Lifecycle::Locked => Err(VaultError::Locked),
            Lifecycle::Unlocked => Ok(()),
        }
    }

    fn sync_engine(&self) -> Result<SyncEngine, VaultError> {
        let config = self
            .get_webdav_config()?
            .ok_or_else(|| VaultError::remote_unreachable("WebDAV is not configured"))?;
        let remote = self.remote_factory.open(&config)?;
        Ok(SyncEngine::new(
            remote,
            config.vault_path,
            self.envelope.clone(),
            self.kdf.clone(),
        ))
    }

    /// Attempts to adopt an existing remote vault during first-run
    /// initialization. `Ok(false)` means no remote blob exists.
    async fn try_adopt_remote(&mut self, webdav: &WebDavConfig, password: &str) -> Result<bool, VaultError> {
        let store = self.remote_factory.open(webdav)?;
        let Some(bytes) = store.get(&webdav.vault_path).await? else {
            return Ok(false);
        };
        let vault = Vault::from_json_bytes(&bytes)?;
        let key = self.kdf.derive_key(password, &vault.kdf).await?;
        vault.verify_master_key(self.envelope.as_ref(), &key)?;
        self.data.adopt_remote_vault(vault, key).await?;
        Ok(true)
    }
}
