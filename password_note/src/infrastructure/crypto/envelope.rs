// /////////////////////////////////////////////////////////////////////////////
// Password Note
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Envelope Service Implementation
//!
//! Concrete [`EnvelopeService`] over ChaCha20-Poly1305-IETF. Every value
//! in the vault - titles, field values, labels, templates, the sentinel,
//! the WebDAV credential blob - passes through this module.
//!
//! ## Pipeline
//!
//! - **encrypt**: bucket-pad the plaintext, draw a fresh 12-byte nonce,
//!   seal with the first 32 bytes of the master key, no associated data
//! - **decrypt**: check the algorithm tag and nonce length, open, unpad
//!
//! Authentication failures never distinguish "wrong key" from "tampered
//! ciphertext"; both surface as `DecryptFailed` and the message carries
//! no plaintext.
//!
//! ## Algorithm Support
//!
//! Only `ChaCha20-Poly1305-IETF` is written or opened. The `AES-GCM` wire
//! tag deserializes (future-proofing) but decryption rejects it with
//! `UnsupportedAlgorithm` until a writer exists.

use chacha20poly1305::aead::AeadInPlace;
use chacha20poly1305::{ChaCha20Poly1305, Key as ChaChaKey, KeyInit, Nonce as ChaChaNonce};
use std::sync::Arc;

use password_note_domain::services::{EnvelopeService, RandomSource};
use password_note_domain::value_objects::{EncryptedData, EnvelopeAlgorithm, MasterKey, AEAD_KEY_LEN};
use password_note_domain::VaultError;

use crate::infrastructure::crypto::padding;
use crate::infrastructure::crypto::random::fresh_nonce;

/// ChaCha20-Poly1305-IETF envelope with length-normalization padding.
pub struct ChaChaEnvelope {
    random: Arc<dyn RandomSource>,
}

impl ChaChaEnvelope {
    pub fn new(random: Arc<dyn RandomSource>) -> Self {
        Self { random }
    }

    fn cipher_for(key: &MasterKey) -> Result<ChaCha20Poly1305, VaultError> {
        if key.len() < AEAD_KEY_LEN {
            return Err(VaultError::kdf_validation(format!(
                "derived key is {} bytes; the envelope needs at least {}",
                key.len(),
                AEAD_KEY_LEN
            )));
        }
        Ok(ChaCha20Poly1305::new(ChaChaKey::from_slice(
            &key.as_bytes()[..AEAD_KEY_LEN],
        )))
    }
}

impl EnvelopeService for ChaChaEnvelope {
    fn encrypt(&self, plaintext: &[u8], key: &MasterKey) -> Result<EncryptedData, VaultError> {
        let cipher = Self::cipher_for(key)?;
        let nonce = fresh_nonce(self.random.as_ref())?;

        let mut buffer = padding::pad(plaintext, self.random.as_ref())?;
        cipher
            .encrypt_in_place(ChaChaNonce::from_slice(&nonce), b"", &mut buffer)
            .map_err(|_| VaultError::internal("ChaCha20-Poly1305 encryption failed"))?;

        EncryptedData::chacha20(buffer, nonce)
    }

    fn decrypt(&self, data: &EncryptedData, key: &MasterKey) -> Result<Vec<u8>, VaultError> {
        data.validate()?;
        if data.algorithm != EnvelopeAlgorithm::ChaCha20Poly1305Ietf {
            return Err(VaultError::UnsupportedAlgorithm(format!(
                "no decryption path for {}",
                data.algorithm
            )));
        }

        let cipher = Self::cipher_for(key)?;
        let mut buffer = data.ciphertext.clone();
        cipher
            .decrypt_in_place(ChaChaNonce::from_slice(&data.nonce), b"", &mut buffer)
            .map_err(|_| VaultError::decrypt_failed("authentication failed"))?;

        Ok(padding::unpad(&buffer)?.to_vec())
    }
}
