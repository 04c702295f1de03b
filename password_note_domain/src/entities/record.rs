// /////////////////////////////////////////////////////////////////////////////
// Password Note
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Vault Record
//!
//! The on-disk record entity and its decrypted view. A record stores its
//! title and every field value as an individually encrypted envelope; the
//! field map is keyed by the template's field ids so that only the
//! template knows display names and kinds.
//!
//! ## Lifecycle
//!
//! Records are created by the data manager (fresh UUID,
//! `last_modified = now`, `deleted = false`), mutated only through update
//! operations that bump `last_modified`, and deleted by tombstoning -
//! never by map removal - because sync depends on tombstones to propagate
//! deletions. A tombstone keeps only its identity, timestamp, and flags
//! as semantically meaningful; its ciphertexts are discarded.
//!
//! ## Wire Format
//!
//! ```json
//! {
//!   "template": "<uuid>",
//!   "labels": ["<uuid>", ...],
//!   "title": { ...EncryptedData... },
//!   "fields": { "<field-id>": { ...EncryptedData... } },
//!   "last_modified": "2025-06-01T12:30:45Z",
//!   "deleted": false,
//!   "local_only": false
//! }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::entities::template::FieldKind;
use crate::services::datetime_serde;
use crate::value_objects::{EncryptedData, FieldId, LabelId, RecordId, TemplateId};
use crate::VaultError;

/// A record as stored inside the vault (everything sensitive encrypted).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VaultRecord {
    pub template: TemplateId,
    #[serde(default)]
    pub labels: Vec<LabelId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<EncryptedData>,
    #[serde(default)]
    pub fields: HashMap<FieldId, EncryptedData>,
    #[serde(with = "datetime_serde")]
    pub last_modified: DateTime<Utc>,
    #[serde(default)]
    pub deleted: bool,
    #[serde(default)]
    pub local_only: bool,
}

impl VaultRecord {
    /// Creates a live record with encrypted title and fields.
    pub fn new(
        template: TemplateId,
        title: EncryptedData,
        fields: HashMap<FieldId, EncryptedData>,
        labels: Vec<LabelId>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            template,
            labels,
            title: Some(title),
            fields,
            last_modified: now,
            deleted: false,
            local_only: false,
        }
    }

    /// Turns the record into a tombstone, discarding its ciphertexts.
    pub fn tombstone(&mut self, now: DateTime<Utc>) {
        self.deleted = true;
        self.title = None;
        self.fields.clear();
        self.labels.clear();
        self.last_modified = now;
    }

    pub fn is_tombstone(&self) -> bool {
        self.deleted
    }

    /// Validates every envelope in the record (wire ingestion).
    pub fn validate(&self) -> Result<(), VaultError> {
        if let Some(title) = &self.title {
            title.validate()?;
        }
        for data in self.fields.values() {
            data.validate()?;
        }
        Ok(())
    }
}

/// A decrypted field, ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecryptedField {
    pub id: FieldId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: FieldKind,
    pub value: String,
}

/// A fully decrypted record as returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecryptedRecord {
    pub id: RecordId,
    pub title: String,
    pub fields: Vec<DecryptedField>,
    pub template: TemplateId,
    pub labels: Vec<LabelId>,
    #[serde(with = "datetime_serde")]
    pub last_modified: DateTime<Utc>,
    pub deleted: bool,
    pub local_only: bool,
}

/// A record list entry: decrypted title plus metadata, no field values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordListEntry {
    pub id: RecordId,
    pub title: String,
    pub template: TemplateId,
    pub labels: Vec<LabelId>,
    #[serde(with = "datetime_serde")]
    pub last_modified: DateTime<Utc>,
}

/// Input for record creation. Field values are keyed by field *name*;
/// the data manager resolves names to ids through the template and drops
/// unknown names.
#[derive(Debug, Clone, Default)]
pub struct RecordDraft {
    pub title: String,
    pub values: HashMap<String, String>,
    pub labels: Vec<LabelId>,
    pub local_only: bool,
}

/// Partial update for a record; only supplied parts are mutated.
#[derive(Debug, Clone, Default)]
pub struct RecordPatch {
    pub title: Option<String>,
    pub values: Option<HashMap<String, String>>,
    pub labels: Option<Vec<LabelId>>,
    pub local_only: Option<bool>,
}
