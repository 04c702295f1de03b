// /////////////////////////////////////////////////////////////////////////////
// Password Note
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Key Derivation Configuration
//!
//! This module provides the algorithm-tagged key derivation configuration
//! stored inside every vault. The KDF named here is authoritative for
//! every ciphertext in the same vault value; changing it requires the
//! atomic re-encryption walk implemented by the data manager.
//!
//! ## Wire Format
//!
//! ```json
//! {
//!   "algorithm": "argon2id",
//!   "params": {
//!     "salt": "<base64 of exactly 16 bytes>",
//!     "keyLength": 32,
//!     "opslimit": 3,
//!     "memlimit": 67108864
//!   }
//! }
//! ```
//!
//! `opslimit` and `memlimit` may be omitted on the wire; they default to
//! 3 and 64 MiB respectively.
//!
//! ## Validation Rules
//!
//! - `opslimit` in `[1, 10]`
//! - `memlimit` in `[8 MiB, 512 MiB]` (bytes)
//! - `keyLength` in `[16, 64]` (bytes)
//! - `salt` decodes to exactly 16 bytes
//!
//! ## Compatibility
//!
//! Two configurations are compatible iff they are structurally identical -
//! algorithm, cost parameters, key length, and **salt**. Any drift forces
//! key re-derivation during sync; compatibility is what lets push and pull
//! move ciphertexts between vaults without touching the plaintext.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::services::RandomSource;
use crate::VaultError;

/// Salt length before base64 encoding, in bytes.
pub const SALT_LEN: usize = 16;

/// Default Argon2id passes.
pub const DEFAULT_OPSLIMIT: u32 = 3;

/// Default Argon2id memory, in bytes (64 MiB).
pub const DEFAULT_MEMLIMIT: u32 = 64 * 1024 * 1024;

/// Default derived key length, in bytes.
pub const DEFAULT_KEY_LENGTH: u32 = 32;

fn default_opslimit() -> u32 {
    DEFAULT_OPSLIMIT
}

fn default_memlimit() -> u32 {
    DEFAULT_MEMLIMIT
}

/// Argon2id cost parameters and salt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Argon2idParams {
    /// Standard base64 of exactly 16 salt bytes
    pub salt: String,
    #[serde(rename = "keyLength")]
    pub key_length: u32,
    #[serde(default = "default_opslimit")]
    pub opslimit: u32,
    #[serde(default = "default_memlimit")]
    pub memlimit: u32,
}

impl Argon2idParams {
    /// Decodes and length-checks the salt
    pub fn salt_bytes(&self) -> Result<Vec<u8>, VaultError> {
        let bytes = STANDARD
            .decode(self.salt.as_bytes())
            .map_err(|e| VaultError::kdf_validation(format!("salt is not valid base64: {}", e)))?;
        if bytes.len() != SALT_LEN {
            return Err(VaultError::kdf_validation(format!(
                "salt must be {} bytes, got {}",
                SALT_LEN,
                bytes.len()
            )));
        }
        Ok(bytes)
    }
}

/// Key derivation configuration, dispatched by algorithm tag.
///
/// Modeled as a closed enumeration rather than per-algorithm strategy
/// objects; a single function dispatches by tag. Only Argon2id exists
/// today.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "algorithm", content = "params", rename_all = "lowercase")]
pub enum KdfConfig {
    Argon2id(Argon2idParams),
}

impl KdfConfig {
    /// Builds a default-cost Argon2id configuration around a fresh salt.
    pub fn generate(random: &dyn RandomSource) -> Result<Self, VaultError> {
        let mut salt = [0u8; SALT_LEN];
        random.fill(&mut salt)?;
        Ok(Self::Argon2id(Argon2idParams {
            salt: STANDARD.encode(salt),
            key_length: DEFAULT_KEY_LENGTH,
            opslimit: DEFAULT_OPSLIMIT,
            memlimit: DEFAULT_MEMLIMIT,
        }))
    }

    /// Validates the parameters against the vault format ranges.
    pub fn validate(&self) -> Result<(), VaultError> {
        match self {
            KdfConfig::Argon2id(params) => {
                if !(1..=10).contains(&params.opslimit) {
                    return Err(VaultError::kdf_validation(format!(
                        "opslimit {} out of range [1, 10]",
                        params.opslimit
                    )));
                }
                let (min_mem, max_mem) = (8 * 1024 * 1024, 512 * 1024 * 1024);
                if !(min_mem..=max_mem).contains(&params.memlimit) {
                    return Err(VaultError::kdf_validation(format!(
                        "memlimit {} out of range [{}, {}]",
                        params.memlimit, min_mem, max_mem
                    )));
                }
                if !(16..=64).contains(&params.key_length) {
                    return Err(VaultError::kdf_validation(format!(
                        "keyLength {} out of range [16, 64]",
                        params.key_length
                    )));
                }
                params.salt_bytes()?;
                Ok(())
            }
        }
    }

    /// Returns true iff both configs would derive the identical key for
    /// the same password: same algorithm, cost parameters, key length,
    /// and salt.
    pub fn is_compatible(&self, other: &KdfConfig) -> bool {
        self == other
    }
}
