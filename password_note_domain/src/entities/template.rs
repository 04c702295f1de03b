// /////////////////////////////////////////////////////////////////////////////
// Password Note
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Record Template
//!
//! Templates define the field schema of records: each field has an
//! author-chosen id, a display name, a closed field kind, and an optional
//! flag. On disk a template is one JSON blob encrypted as a single
//! envelope under the master key:
//!
//! ```json
//! {"name": "Login", "fields": [{"id": "f1", "name": "username",
//!  "type": "text", "optional": false}]}
//! ```
//!
//! Deletion is a tombstone written *inside* the plaintext (`"deleted":
//! true`) because the vault wire format keys templates directly by
//! `EncryptedData`; list and lookup operations treat marked entries as
//! absent.

use serde::{Deserialize, Serialize};

use crate::value_objects::FieldId;
use crate::VaultError;

/// Closed enumeration of field kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Password,
    Email,
    Url,
    Number,
    Textarea,
}

/// One field of a template's schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateField {
    pub id: FieldId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: FieldKind,
    #[serde(default)]
    pub optional: bool,
}

fn is_false(v: &bool) -> bool {
    !v
}

/// Decrypted template form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<TemplateField>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub deleted: bool,
}

impl Template {
    pub fn new(name: impl Into<String>, fields: Vec<TemplateField>) -> Self {
        Self {
            name: name.into(),
            fields,
            deleted: false,
        }
    }

    /// Builds the tombstone form that replaces a deleted template.
    pub fn tombstone(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            deleted: true,
        }
    }

    pub fn field_by_id(&self, id: &FieldId) -> Option<&TemplateField> {
        self.fields.iter().find(|f| &f.id == id)
    }

    pub fn field_by_name(&self, name: &str) -> Option<&TemplateField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Serializes to the plaintext bytes that get encrypted.
    pub fn to_plaintext(&self) -> Result<Vec<u8>, VaultError> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Parses the decrypted plaintext bytes.
    pub fn from_plaintext(bytes: &[u8]) -> Result<Self, VaultError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}
