// /////////////////////////////////////////////////////////////////////////////
// Password Note
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Value objects of the vault domain: typed ids, the encrypted-data
//! envelope, KDF configuration, master key material, and the password
//! strength report.

pub mod encrypted_data;
pub mod entity_id;
pub mod field_id;
pub mod kdf_config;
pub mod master_key;
pub mod password_strength;

pub use encrypted_data::{EncryptedData, EnvelopeAlgorithm, NONCE_LEN};
pub use entity_id::{EntityId, IdKind, LabelId, RecordId, TemplateId};
pub use field_id::FieldId;
pub use kdf_config::{Argon2idParams, KdfConfig, DEFAULT_KEY_LENGTH, DEFAULT_MEMLIMIT, DEFAULT_OPSLIMIT, SALT_LEN};
pub use master_key::{MasterKey, AEAD_KEY_LEN};
pub use password_strength::{StrengthReport, FAIR_SCORE};
