// /////////////////////////////////////////////////////////////////////////////
// Password Note
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Domain Error System
//!
//! This module provides the closed error taxonomy for the vault domain.
//! Every fallible operation in the workspace surfaces one of these kinds,
//! which lets consumers (a browser extension, a web app) localize failures
//! without string matching.
//!
//! ## Error Architecture
//!
//! The kinds fall into a few logical groups:
//!
//! - **Lifecycle**: `NotInitialized`, `Locked`
//! - **Authentication**: `InvalidCredentials`, `WeakPassword`,
//!   `PasswordRequired`
//! - **Cryptography**: `KdfValidation`, `UnsupportedAlgorithm`,
//!   `InvalidNonceLength`, `DecryptFailed`, `PaddingInvalid`,
//!   `PlaintextTooLarge`
//! - **Data**: `RecordNotFound`, `TemplateNotFound`, `LabelNotFound`,
//!   `TemplateInUse`
//! - **Sync and persistence**: `RemoteUnreachable`, `MergeConflict`,
//!   `StorageIo`, `Serialization`
//! - **System**: `InternalError`
//!
//! ## Propagation Rules
//!
//! A `DecryptFailed` raised while checking the vault sentinel is mapped to
//! `InvalidCredentials` at the authentication boundary. A `DecryptFailed`
//! on an individual record during a local read is fatal to that record
//! only; during a pull after KDF alignment it fails the whole pull.
//!
//! Error messages never contain plaintext record values, passwords, or key
//! bytes.

use thiserror::Error;

/// Domain-specific errors for the vault system.
///
/// Each variant represents one failure kind from the closed taxonomy. The
/// message payloads carry diagnostic context only; sensitive material is
/// never embedded in them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VaultError {
    #[error("Vault is not initialized")]
    NotInitialized,

    #[error("Vault is locked")]
    Locked,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password is too weak: {0}")]
    WeakPassword(String),

    #[error("KDF validation failed: {0}")]
    KdfValidation(String),

    #[error("Unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("Invalid nonce length: {0} bytes (expected 12)")]
    InvalidNonceLength(usize),

    #[error("Decryption failed: {0}")]
    DecryptFailed(String),

    #[error("Invalid padding: {0}")]
    PaddingInvalid(String),

    #[error("Plaintext too large for padding: {0} bytes")]
    PlaintextTooLarge(usize),

    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    #[error("Record not found: {0}")]
    RecordNotFound(String),

    #[error("Label not found: {0}")]
    LabelNotFound(String),

    #[error("Template is referenced by a live record: {0}")]
    TemplateInUse(String),

    #[error("Remote unreachable: {0}")]
    RemoteUnreachable(String),

    #[error("Password required")]
    PasswordRequired,

    #[error("Merge conflict: {0}")]
    MergeConflict(String),

    #[error("Storage IO error: {0}")]
    StorageIo(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl VaultError {
    /// Creates a new KDF validation error
    pub fn kdf_validation(msg: impl Into<String>) -> Self {
        Self::KdfValidation(msg.into())
    }

    /// Creates a new decryption error
    pub fn decrypt_failed(msg: impl Into<String>) -> Self {
        Self::DecryptFailed(msg.into())
    }

    /// Creates a new storage IO error
    pub fn storage_io(msg: impl Into<String>) -> Self {
        Self::StorageIo(msg.into())
    }

    /// Creates a new remote transport error
    pub fn remote_unreachable(msg: impl Into<String>) -> Self {
        Self::RemoteUnreachable(msg.into())
    }

    /// Creates a new serialization error
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }

    /// Creates a new internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::InternalError(msg.into())
    }

    /// Checks if the error indicates a transient condition worth retrying
    pub fn is_recoverable(&self) -> bool {
        matches!(self, VaultError::RemoteUnreachable(_) | VaultError::StorageIo(_))
    }

    /// Checks if the error should surface as a credentials problem to UIs
    pub fn is_credentials(&self) -> bool {
        matches!(self, VaultError::InvalidCredentials | VaultError::PasswordRequired)
    }
}

impl From<std::io::Error> for VaultError {
    fn from(error: std::io::Error) -> Self {
        VaultError::StorageIo(error.to_string())
    }
}

impl From<serde_json::Error> for VaultError {
    fn from(error: serde_json::Error) -> Self {
        VaultError::Serialization(error.to_string())
    }
}
