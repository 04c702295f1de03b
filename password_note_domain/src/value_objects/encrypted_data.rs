// /////////////////////////////////////////////////////////////////////////////
// Password Note
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Encrypted Data Envelope
//!
//! This module provides the typed envelope for every ciphertext stored in
//! the vault: record titles, record fields, labels, templates, the
//! sentinel, and the WebDAV credential blob.
//!
//! ## Wire Format
//!
//! An envelope is a three-tuple serialized as:
//!
//! ```json
//! {
//!   "ciphertext": "<base64, standard alphabet, padded>",
//!   "nonce": "<base64, standard alphabet, padded>",
//!   "algorithm": "ChaCha20-Poly1305-IETF"
//! }
//! ```
//!
//! The byte sequences are part of the on-disk compatibility contract and
//! must survive round-trips through other implementations unchanged.
//!
//! ## Invariants
//!
//! - The nonce is exactly 12 bytes for either algorithm; any other length
//!   is a decoding error (`InvalidNonceLength`)
//! - New envelopes are produced with ChaCha20-Poly1305-IETF exclusively.
//!   `AES-GCM` is accepted as a typed tag for future-proofing, but no
//!   constructor in this crate produces it and decryption rejects it
//!
//! ## Security Properties
//!
//! The envelope itself carries no key material. Semantic security comes
//! from the fresh 12-byte nonce per encryption; length hiding comes from
//! the bucket padding applied before encryption (an infrastructure
//! concern - see the envelope service implementation).

use serde::{Deserialize, Serialize};

use crate::VaultError;

/// AEAD nonce length shared by both envelope algorithms, in bytes.
pub const NONCE_LEN: usize = 12;

/// AEAD algorithms understood by the vault format.
///
/// The runtime tag matches the on-wire `algorithm` field exactly. Only
/// `ChaCha20Poly1305Ietf` has a writer today; `AesGcm` is reserved so that
/// vaults produced by a future writer still deserialize into a typed
/// value instead of failing at the serde layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnvelopeAlgorithm {
    #[serde(rename = "ChaCha20-Poly1305-IETF")]
    ChaCha20Poly1305Ietf,
    #[serde(rename = "AES-GCM")]
    AesGcm,
}

impl std::fmt::Display for EnvelopeAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnvelopeAlgorithm::ChaCha20Poly1305Ietf => write!(f, "ChaCha20-Poly1305-IETF"),
            EnvelopeAlgorithm::AesGcm => write!(f, "AES-GCM"),
        }
    }
}

/// An individually encrypted value.
///
/// Construction goes through [`EncryptedData::chacha20`] so that the
/// nonce-length invariant holds for every value in memory; blobs read from
/// disk or the remote are validated by [`EncryptedData::validate`] before
/// use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedData {
    #[serde(with = "base64_bytes")]
    pub ciphertext: Vec<u8>,
    #[serde(with = "base64_bytes")]
    pub nonce: Vec<u8>,
    pub algorithm: EnvelopeAlgorithm,
}

impl EncryptedData {
    /// Builds a ChaCha20-Poly1305-IETF envelope, enforcing the 12-byte
    /// nonce invariant.
    pub fn chacha20(ciphertext: Vec<u8>, nonce: Vec<u8>) -> Result<Self, VaultError> {
        if nonce.len() != NONCE_LEN {
            return Err(VaultError::InvalidNonceLength(nonce.len()));
        }
        Ok(Self {
            ciphertext,
            nonce,
            algorithm: EnvelopeAlgorithm::ChaCha20Poly1305Ietf,
        })
    }

    /// Validates an envelope deserialized from an untrusted source.
    pub fn validate(&self) -> Result<(), VaultError> {
        if self.nonce.len() != NONCE_LEN {
            return Err(VaultError::InvalidNonceLength(self.nonce.len()));
        }
        Ok(())
    }
}

/// Standard base64 (with padding) serde for binary wire fields.
pub(crate) mod base64_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        STANDARD.decode(s.as_bytes()).map_err(serde::de::Error::custom)
    }
}
