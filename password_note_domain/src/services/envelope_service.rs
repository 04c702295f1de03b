// /////////////////////////////////////////////////////////////////////////////
// Password Note
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Envelope Service
//!
//! Domain contract for the cryptographic envelope: length-hiding,
//! authenticated encryption of individual vault values under the master
//! key.
//!
//! ## Contract
//!
//! - `encrypt` applies length-normalization padding, generates a fresh
//!   12-byte nonce, and seals with ChaCha20-Poly1305-IETF using the first
//!   32 bytes of the master key, with no associated data
//! - `decrypt` accepts only `ChaCha20-Poly1305-IETF` envelopes with a
//!   12-byte nonce, opens them, and removes the padding
//! - `decrypt(encrypt(p, k), k) == p` for every plaintext that fits the
//!   largest padding bucket (4095 bytes)
//!
//! The trait is synchronous: sealing a single field is cheap, CPU-bound
//! work. Callers that batch large vault re-encryptions off the async
//! executor wrap implementations in `spawn_blocking` at the
//! infrastructure layer.
//!
//! ## Thread Safety
//!
//! Implementations are stateless apart from their randomness source and
//! must be `Send + Sync`.

use crate::value_objects::{EncryptedData, MasterKey};
use crate::VaultError;

/// Domain service interface for the per-value cryptographic envelope.
pub trait EnvelopeService: Send + Sync {
    /// Pads and seals a plaintext under the master key.
    fn encrypt(&self, plaintext: &[u8], key: &MasterKey) -> Result<EncryptedData, VaultError>;

    /// Opens an envelope and strips the padding.
    fn decrypt(&self, data: &EncryptedData, key: &MasterKey) -> Result<Vec<u8>, VaultError>;
}
