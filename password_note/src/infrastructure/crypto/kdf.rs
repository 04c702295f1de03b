// /////////////////////////////////////////////////////////////////////////////
// Password Note
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # KDF Service Implementation
//!
//! Argon2id v1.3 key derivation with explicit cost parameters, plus the
//! async adapter that keeps the derivation off the async executor.
//!
//! ## Parameter Mapping
//!
//! The vault format carries `memlimit` in bytes and `opslimit` as pass
//! count; the argon2 crate takes memory in KiB:
//!
//! - `m_cost = memlimit / 1024`
//! - `t_cost = opslimit`
//! - `p_cost = 1`
//! - `output = keyLength` raw bytes (not a PHC hash string)
//!
//! ## Execution Model
//!
//! `Argon2Kdf` is synchronous and CPU-bound (memory-hard by design).
//! [`AsyncKdfAdapter`] wraps it in `tokio::task::spawn_blocking`; only
//! the derived key crosses back to the caller, and vault state is never
//! touched from the worker.

use argon2::{Algorithm, Argon2, Params, Version};
use std::sync::Arc;

use password_note_domain::services::KdfService;
use password_note_domain::value_objects::{KdfConfig, MasterKey};
use password_note_domain::VaultError;

/// Argon2id implementation of the KDF contract.
pub struct Argon2Kdf;

impl Argon2Kdf {
    pub fn new() -> Self {
        Self
    }
}

impl Default for Argon2Kdf {
    fn default() -> Self {
        Self::new()
    }
}

impl KdfService for Argon2Kdf {
    fn derive_key(&self, password: &str, config: &KdfConfig) -> Result<MasterKey, VaultError> {
        config.validate()?;
        match config {
            KdfConfig::Argon2id(params) => {
                let salt = params.salt_bytes()?;
                let argon_params = Params::new(
                    params.memlimit / 1024,
                    params.opslimit,
                    1,
                    Some(params.key_length as usize),
                )
                .map_err(|e| VaultError::kdf_validation(format!("argon2 parameters rejected: {}", e)))?;

                let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, argon_params);
                let mut out = vec![0u8; params.key_length as usize];
                argon2
                    .hash_password_into(password.as_bytes(), &salt, &mut out)
                    .map_err(|e| VaultError::kdf_validation(format!("argon2 derivation failed: {}", e)))?;
                Ok(MasterKey::new(out))
            }
        }
    }
}

/// Async adapter for [`KdfService`].
///
/// Executes the synchronous derivation in the blocking task pool so the
/// caller's executor stays responsive during the memory-hard work.
#[derive(Clone)]
pub struct AsyncKdfAdapter {
    inner: Arc<dyn KdfService>,
}

impl AsyncKdfAdapter {
    pub fn new(service: Arc<dyn KdfService>) -> Self {
        Self { inner: service }
    }

    /// Derives the master key on a blocking worker.
    pub async fn derive_key(&self, password: &str, config: &KdfConfig) -> Result<MasterKey, VaultError> {
        let service = self.inner.clone();
        let password = password.to_owned();
        let config = config.clone();

        tokio::task::spawn_blocking(move || service.derive_key(&password, &config))
            .await
            .map_err(|e| VaultError::internal(format!("task join error: {}", e)))?
    }
}
