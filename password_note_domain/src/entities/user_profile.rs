// /////////////////////////////////////////////////////////////////////////////
// Password Note
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # User Profile
//!
//! The user profile is the second locally persisted blob, next to the
//! vault itself. Today it carries one thing: the WebDAV configuration,
//! encrypted under the master key so the UI can restore its remote
//! settings across sessions without re-prompting.

use serde::{Deserialize, Serialize};

use crate::value_objects::EncryptedData;
use crate::VaultError;

/// Default remote path of the vault blob.
pub const DEFAULT_VAULT_PATH: &str = "/password-note/vault.json";

fn default_vault_path() -> String {
    DEFAULT_VAULT_PATH.to_string()
}

/// WebDAV remote configuration (plaintext form; encrypted at rest).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebDavConfig {
    pub url: String,
    pub username: String,
    pub password: String,
    #[serde(default = "default_vault_path")]
    pub vault_path: String,
}

impl WebDavConfig {
    /// True when the config carries no usable endpoint (the cleared
    /// form).
    pub fn is_empty(&self) -> bool {
        self.url.is_empty()
    }
}

impl Default for WebDavConfig {
    /// The empty-field form written by `clear_webdav_config`.
    fn default() -> Self {
        Self {
            url: String::new(),
            username: String::new(),
            password: String::new(),
            vault_path: default_vault_path(),
        }
    }
}

/// Wire wrapper for the encrypted WebDAV blob.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebDavProfileSlot {
    pub encrypted_data: EncryptedData,
}

/// The persisted user profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webdav_config: Option<WebDavProfileSlot>,
}

impl UserProfile {
    pub fn to_json_bytes(&self) -> Result<Vec<u8>, VaultError> {
        Ok(serde_json::to_vec(self)?)
    }

    pub fn from_json_bytes(bytes: &[u8]) -> Result<Self, VaultError> {
        let profile: UserProfile = serde_json::from_slice(bytes)?;
        if let Some(slot) = &profile.webdav_config {
            slot.encrypted_data.validate()?;
        }
        Ok(profile)
    }
}
