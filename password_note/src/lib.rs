// /////////////////////////////////////////////////////////////////////////////
// Password Note
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Password Note
//!
//! Core of a single-user encrypted password vault with a remote
//! synchronization layer. Three responsibilities make up the system:
//!
//! 1. A **cryptographic envelope**: length-hiding, authenticated
//!    encryption over individually encrypted fields of a structured
//!    record store, with master-key derivation and sentinel validation
//! 2. A **vault data model** with tombstones, last-writer-wins
//!    per-record semantics, and the invariants that make per-field
//!    re-encryption safe under master-key rotation
//! 3. A **remote sync engine** (push/pull) that merges two vaults while
//!    preserving ciphertext identity where possible and correctness when
//!    the master key changes
//!
//! ## Architecture
//!
//! The workspace splits along a strict domain/infrastructure boundary:
//!
//! - `password-note-domain` - entities, value objects, service and
//!   repository contracts, errors; no I/O, no cipher crates
//! - this crate - `infrastructure/` (ChaCha20-Poly1305 envelope, Argon2id
//!   KDF, bucket padding, filesystem and in-memory blob stores, WebDAV
//!   transport) and `application/` (data manager, sync engine, and the
//!   [`VaultFacade`] public surface)
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use password_note::{InitializeOptions, VaultFacade};
//! use password_note::infrastructure::repositories::FsBlobStore;
//!
//! # async fn demo() -> Result<(), password_note::domain::VaultError> {
//! let store = Arc::new(FsBlobStore::new("/var/lib/password-note", "default"));
//! let mut vault = VaultFacade::new(store);
//! vault
//!     .initialize(InitializeOptions::with_password("Correct-Horse-Battery-Staple-42"))
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Concurrency Model
//!
//! Single-owner cooperative: one facade instance mutates one vault, and
//! operations take `&mut self` so callers serialize by construction. The
//! only heavy CPU work - Argon2id derivation - runs on the blocking pool
//! behind [`infrastructure::crypto::AsyncKdfAdapter`]; vault state is
//! never touched from a worker.

pub mod application;
pub mod infrastructure;

pub use application::{AuthOutcome, InitializeOptions, PullOutcome, PushOutcome, SyncStatus, VaultFacade};
pub use password_note_domain as domain;
