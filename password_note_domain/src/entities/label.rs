// /////////////////////////////////////////////////////////////////////////////
// Password Note
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Label entity. On disk a label is the encryption of `{"name": ...}`;
//! deletion writes the same tombstone-inside-ciphertext marker templates
//! use.

use serde::{Deserialize, Serialize};

use crate::VaultError;

fn is_false(v: &bool) -> bool {
    !v
}

/// Decrypted label form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub name: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub deleted: bool,
}

impl Label {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            deleted: false,
        }
    }

    pub fn tombstone(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            deleted: true,
        }
    }

    pub fn to_plaintext(&self) -> Result<Vec<u8>, VaultError> {
        Ok(serde_json::to_vec(self)?)
    }

    pub fn from_plaintext(bytes: &[u8]) -> Result<Self, VaultError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}
