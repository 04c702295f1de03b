// /////////////////////////////////////////////////////////////////////////////
// Password Note
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # KDF Service
//!
//! Domain contract for master-key derivation. Dispatch is by the
//! algorithm tag carried in [`KdfConfig`]; implementations must validate
//! the configuration before deriving and reject unsupported algorithms.
//!
//! Derivation is deliberately expensive (memory-hard Argon2id), so the
//! trait is synchronous and infrastructure offloads it to a blocking
//! worker; only the derived key crosses back to the caller.

use crate::value_objects::{KdfConfig, MasterKey};
use crate::VaultError;

/// Domain service interface for password-based key derivation.
pub trait KdfService: Send + Sync {
    /// Derives the master key for `password` under `config`.
    ///
    /// Validates `config` first; an invalid configuration fails with
    /// `KdfValidation` before any expensive work happens.
    fn derive_key(&self, password: &str, config: &KdfConfig) -> Result<MasterKey, VaultError>;
}
