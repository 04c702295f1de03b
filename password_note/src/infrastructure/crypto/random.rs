// /////////////////////////////////////////////////////////////////////////////
// Password Note
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! System randomness source and the fresh-nonce / fresh-salt helpers
//! built on it. Nonces must never be reused; both helpers draw fresh
//! bytes on every call.

use ring::rand::{SecureRandom, SystemRandom};

use password_note_domain::services::RandomSource;
use password_note_domain::value_objects::{NONCE_LEN, SALT_LEN};
use password_note_domain::VaultError;

/// `RandomSource` backed by the operating system CSPRNG.
pub struct SystemRandomSource {
    rng: SystemRandom,
}

impl SystemRandomSource {
    pub fn new() -> Self {
        Self {
            rng: SystemRandom::new(),
        }
    }
}

impl Default for SystemRandomSource {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource for SystemRandomSource {
    fn fill(&self, dest: &mut [u8]) -> Result<(), VaultError> {
        self.rng
            .fill(dest)
            .map_err(|e| VaultError::internal(format!("system rng failure: {:?}", e)))
    }
}

/// Returns 12 fresh random bytes for an AEAD nonce.
pub fn fresh_nonce(random: &dyn RandomSource) -> Result<Vec<u8>, VaultError> {
    random.bytes(NONCE_LEN)
}

/// Returns 16 fresh random bytes for a KDF salt.
pub fn fresh_salt(random: &dyn RandomSource) -> Result<Vec<u8>, VaultError> {
    random.bytes(SALT_LEN)
}
