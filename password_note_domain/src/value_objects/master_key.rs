// /////////////////////////////////////////////////////////////////////////////
// Password Note
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Master Key Material
//!
//! Secure container for the derived master key. The key exists only in
//! memory: it is derived on authenticate, cleared on lock or reset, and
//! never serialized.
//!
//! ## Memory Security
//!
//! - **Zeroization**: the byte buffer is wiped when cleared or dropped
//! - **Redacted Debug**: the bytes never reach log output
//! - **No Serde**: the type deliberately implements neither `Serialize`
//!   nor `Deserialize`

use zeroize::{Zeroize, ZeroizeOnDrop};

/// AEAD key length consumed by the envelope service, in bytes.
pub const AEAD_KEY_LEN: usize = 32;

/// Derived master key bytes with automatic zeroization.
#[derive(Clone, PartialEq, Eq)]
pub struct MasterKey {
    bytes: Vec<u8>,
}

impl MasterKey {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl Zeroize for MasterKey {
    fn zeroize(&mut self) {
        self.bytes.zeroize();
    }
}

impl ZeroizeOnDrop for MasterKey {}

impl Drop for MasterKey {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl std::fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "MasterKey({} bytes, redacted)", self.bytes.len())
    }
}
