// /////////////////////////////////////////////////////////////////////////////
// Password Note
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Common Test Helpers
//!
//! Shared fixtures for the facade integration tests: an in-memory wiring
//! of the whole stack and a KDF that honors the configuration's salt and
//! key length while pinning the cost parameters low, so the suites spend
//! their time on vault semantics instead of memory-hard derivation.

use std::sync::Arc;

use password_note::infrastructure::crypto::{ChaChaEnvelope, SystemRandomSource, ZxcvbnStrength};
use password_note::infrastructure::repositories::{MemoryBlobStore, MemoryRemoteFactory, MemoryRemoteStore};
use password_note::{InitializeOptions, VaultFacade};
use password_note_domain::entities::WebDavConfig;
use password_note_domain::services::{KdfService, RandomSource};
use password_note_domain::value_objects::{FieldId, KdfConfig, MasterKey};
use password_note_domain::{FieldKind, TemplateField, VaultError};

/// The acceptance-scenario master password (clears the FAIR threshold).
pub const MASTER_PASSWORD: &str = "Correct-Horse-Battery-Staple-42";

/// Argon2id with the configuration's salt and key length but fixed
/// minimal cost, keeping derivation deterministic per (password, salt)
/// while staying fast.
pub struct FastKdf;

impl KdfService for FastKdf {
    fn derive_key(&self, password: &str, config: &KdfConfig) -> Result<MasterKey, VaultError> {
        config.validate()?;
        let KdfConfig::Argon2id(params) = config;
        let salt = params.salt_bytes()?;
        let argon_params = argon2::Params::new(8 * 1024, 1, 1, Some(params.key_length as usize))
            .map_err(|e| VaultError::kdf_validation(e.to_string()))?;
        let argon2 = argon2::Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, argon_params);
        let mut out = vec![0u8; params.key_length as usize];
        argon2
            .hash_password_into(password.as_bytes(), &salt, &mut out)
            .map_err(|e| VaultError::kdf_validation(e.to_string()))?;
        Ok(MasterKey::new(out))
    }
}

/// Installs the test log subscriber once; `RUST_LOG`-style filtering is
/// not needed here, the default level keeps failures readable.
fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// Builds a facade wired entirely in memory, sharing `remote` as its
/// remote store. Two facades built over the same remote simulate two
/// clients syncing through one server.
pub fn memory_facade(remote: Arc<MemoryRemoteStore>) -> VaultFacade {
    init_tracing();
    let random: Arc<dyn RandomSource> = Arc::new(SystemRandomSource::new());
    VaultFacade::with_services(
        Arc::new(MemoryBlobStore::new()),
        Arc::new(MemoryRemoteFactory::new(remote)),
        Arc::new(ChaChaEnvelope::new(random.clone())),
        Arc::new(FastKdf),
        Arc::new(ZxcvbnStrength::new()),
        random,
    )
}

/// Builds a facade over a caller-provided local store (lock/unlock and
/// restart scenarios re-open the same store).
pub fn memory_facade_with_store(
    store: Arc<MemoryBlobStore>,
    remote: Arc<MemoryRemoteStore>,
) -> VaultFacade {
    init_tracing();
    let random: Arc<dyn RandomSource> = Arc::new(SystemRandomSource::new());
    VaultFacade::with_services(
        store,
        Arc::new(MemoryRemoteFactory::new(remote)),
        Arc::new(ChaChaEnvelope::new(random.clone())),
        Arc::new(FastKdf),
        Arc::new(ZxcvbnStrength::new()),
        random,
    )
}

/// Initializes a fresh vault with the scenario password.
pub async fn initialized_facade(remote: Arc<MemoryRemoteStore>) -> VaultFacade {
    let mut facade = memory_facade(remote);
    facade
        .initialize(InitializeOptions::with_password(MASTER_PASSWORD))
        .await
        .expect("initialize");
    facade
}

/// WebDAV settings pointing at the in-memory remote (the factory ignores
/// the endpoint, the path matters).
pub fn webdav_config() -> WebDavConfig {
    WebDavConfig {
        url: "https://dav.example.org/remote.php/webdav".to_string(),
        username: "note".to_string(),
        password: "app-password".to_string(),
        vault_path: "/password-note/vault.json".to_string(),
    }
}

/// The "Login" template schema used by the acceptance scenarios.
pub fn login_fields() -> Vec<TemplateField> {
    vec![
        TemplateField {
            id: FieldId::new("f1").expect("field id"),
            name: "username".to_string(),
            kind: FieldKind::Text,
            optional: false,
        },
        TemplateField {
            id: FieldId::new("f2").expect("field id"),
            name: "password".to_string(),
            kind: FieldKind::Password,
            optional: false,
        },
    ]
}
