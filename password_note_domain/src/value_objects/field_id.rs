// /////////////////////////////////////////////////////////////////////////////
// Password Note
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Field Identifier
//!
//! String-backed identifier for a template field. Unlike record, template,
//! and label ids - which the core generates as UUIDs - field ids are chosen
//! by the template author and are opaque to the vault. A record's encrypted
//! `fields` map is keyed by these ids.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

use crate::VaultError;

/// Identifier of a field within a template.
///
/// Field ids are opaque non-empty strings. They key both the template's
/// field list and the per-record encrypted field map, which is what makes
/// field renames cheap: the display name lives in the template, the id is
/// stable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldId(String);

impl FieldId {
    /// Creates a field id, rejecting empty strings
    pub fn new(id: impl Into<String>) -> Result<Self, VaultError> {
        let id = id.into();
        if id.is_empty() {
            return Err(VaultError::internal("field id cannot be empty"));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
