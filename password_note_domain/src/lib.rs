// /////////////////////////////////////////////////////////////////////////////
// Password Note
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Password Note Domain
//!
//! The domain layer of the password-note vault: pure business logic,
//! completely independent of external concerns like file systems, HTTP
//! transports, or cipher implementations. It follows Domain-Driven Design
//! patterns:
//!
//! - **Entities** - the [`entities::Vault`] aggregate and the objects it
//!   contains: [`entities::VaultRecord`] (tombstone lifecycle),
//!   [`entities::Template`], [`entities::Label`], and the persisted
//!   [`entities::UserProfile`]
//! - **Value Objects** - [`value_objects::EncryptedData`] (the envelope
//!   three-tuple), [`value_objects::KdfConfig`] (algorithm-tagged key
//!   derivation parameters), [`value_objects::MasterKey`] (zeroized key
//!   material), typed entity ids, and the password
//!   [`value_objects::StrengthReport`]
//! - **Domain Services** - synchronous crypto contracts
//!   ([`services::EnvelopeService`], [`services::KdfService`],
//!   [`services::PasswordStrengthService`], [`services::RandomSource`])
//!   whose implementations live in the application crate's
//!   infrastructure layer
//! - **Repositories** - async persistence ports
//!   ([`repositories::LocalBlobStore`],
//!   [`repositories::RemoteVaultStore`])
//! - **Errors** - the closed [`VaultError`] taxonomy
//!
//! ## Layering
//!
//! Core crypto services are sync and CPU-bound; the execution model
//! (blocking worker offload for KDF derivation, async storage I/O) is an
//! infrastructure decision. The domain crate therefore depends on neither
//! tokio nor any cipher crate - only on the contracts.

pub mod entities;
pub mod error;
pub mod repositories;
pub mod services;
pub mod value_objects;

pub use error::VaultError;

// Flat re-exports for the common types, mirroring the module docs above.
pub use entities::{
    DecryptedField, DecryptedRecord, FieldKind, Label, RecordDraft, RecordListEntry, RecordPatch, Template,
    TemplateField, UserProfile, Vault, VaultRecord, WebDavConfig, WebDavProfileSlot, DEFAULT_VAULT_PATH,
    SENTINEL_VALUE,
};
pub use repositories::{LocalBlobStore, RemoteStoreFactory, RemoteVaultStore, StorageSlot};
pub use services::{EnvelopeService, KdfService, PasswordStrengthService, RandomSource};
pub use value_objects::{
    EncryptedData, EnvelopeAlgorithm, FieldId, KdfConfig, LabelId, MasterKey, RecordId, StrengthReport, TemplateId,
};
