// /////////////////////////////////////////////////////////////////////////////
// Password Note
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Typed Entity Identifiers
//!
//! This module provides the generic, phantom-typed identifier that all
//! vault entity ids build upon. The vault wire format keys every map
//! (records, templates, labels) by UUID string, so the generic id wraps a
//! `uuid::Uuid` and serializes as a plain string.
//!
//! ## Design Principles
//!
//! - **Type Safety**: A `RecordId` cannot be passed where a `TemplateId`
//!   is expected, even though both are UUIDs on the wire
//! - **Validation**: Nil UUIDs are rejected at parse time
//! - **Serialization**: Uniform JSON representation (plain UUID string),
//!   usable as a JSON object key
//! - **Zero-Cost**: The phantom marker has no runtime representation
//!
//! ## Usage
//!
//! ```
//! use password_note_domain::value_objects::RecordId;
//!
//! let id = RecordId::new();
//! let parsed: RecordId = id.to_string().parse().unwrap();
//! assert_eq!(id, parsed);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::str::FromStr;
use uuid::Uuid;

use crate::VaultError;

/// Id category trait for type-specific naming in diagnostics.
pub trait IdKind {
    /// Gets the category name for this id type
    fn kind_name() -> &'static str;
}

/// Generic identifier value object for vault entities.
///
/// This is the base implementation that the specific id types compose.
/// It should not be used directly - use `RecordId`, `TemplateId`, or
/// `LabelId` instead.
pub struct EntityId<T: IdKind> {
    value: Uuid,
    _phantom: PhantomData<T>,
}

impl<T: IdKind> EntityId<T> {
    /// Generates a fresh random (v4) identifier
    pub fn new() -> Self {
        Self {
            value: Uuid::new_v4(),
            _phantom: PhantomData,
        }
    }

    /// Wraps an existing UUID, rejecting the nil value
    pub fn from_uuid(value: Uuid) -> Result<Self, VaultError> {
        if value.is_nil() {
            return Err(VaultError::internal(format!("{} id cannot be nil", T::kind_name())));
        }
        Ok(Self {
            value,
            _phantom: PhantomData,
        })
    }

    /// Returns the underlying UUID
    pub fn as_uuid(&self) -> Uuid {
        self.value
    }
}

impl<T: IdKind> Default for EntityId<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: IdKind> Clone for EntityId<T> {
    fn clone(&self) -> Self {
        Self {
            value: self.value,
            _phantom: PhantomData,
        }
    }
}

impl<T: IdKind> Copy for EntityId<T> {}

impl<T: IdKind> PartialEq for EntityId<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T: IdKind> Eq for EntityId<T> {}

impl<T: IdKind> PartialOrd for EntityId<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: IdKind> Ord for EntityId<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.value.cmp(&other.value)
    }
}

impl<T: IdKind> Hash for EntityId<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<T: IdKind> fmt::Debug for EntityId<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", T::kind_name(), self.value)
    }
}

impl<T: IdKind> Display for EntityId<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.value.fmt(f)
    }
}

impl<T: IdKind> FromStr for EntityId<T> {
    type Err = VaultError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = Uuid::parse_str(s)
            .map_err(|e| VaultError::internal(format!("invalid {} id '{}': {}", T::kind_name(), s, e)))?;
        Self::from_uuid(value)
    }
}

// Serialize as a bare UUID string so the id can key JSON objects.
impl<T: IdKind> Serialize for EntityId<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(&self.value)
    }
}

impl<'de, T: IdKind> Deserialize<'de> for EntityId<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Marker for record identifiers
#[derive(Debug, Clone, Copy)]
pub struct RecordKind;

impl IdKind for RecordKind {
    fn kind_name() -> &'static str {
        "Record"
    }
}

/// Marker for template identifiers
#[derive(Debug, Clone, Copy)]
pub struct TemplateKind;

impl IdKind for TemplateKind {
    fn kind_name() -> &'static str {
        "Template"
    }
}

/// Marker for label identifiers
#[derive(Debug, Clone, Copy)]
pub struct LabelKind;

impl IdKind for LabelKind {
    fn kind_name() -> &'static str {
        "Label"
    }
}

/// Identifier of a vault record
pub type RecordId = EntityId<RecordKind>;

/// Identifier of a record template
pub type TemplateId = EntityId<TemplateKind>;

/// Identifier of a label
pub type LabelId = EntityId<LabelKind>;
