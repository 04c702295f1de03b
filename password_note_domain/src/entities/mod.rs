// /////////////////////////////////////////////////////////////////////////////
// Password Note
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Domain entities: the vault aggregate and the things that live inside
//! it (records, templates, labels), plus the locally persisted user
//! profile.

pub mod label;
pub mod record;
pub mod template;
pub mod user_profile;
pub mod vault;

pub use label::Label;
pub use record::{DecryptedField, DecryptedRecord, RecordDraft, RecordListEntry, RecordPatch, VaultRecord};
pub use template::{FieldKind, Template, TemplateField};
pub use user_profile::{UserProfile, WebDavConfig, WebDavProfileSlot, DEFAULT_VAULT_PATH};
pub use vault::{Vault, SENTINEL_VALUE};
