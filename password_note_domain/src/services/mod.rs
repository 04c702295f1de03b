// /////////////////////////////////////////////////////////////////////////////
// Password Note
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Domain service contracts. Core crypto services are synchronous and
//! CPU-bound; infrastructure decides the execution model (see the async
//! adapters in the application crate).

pub mod datetime_serde;
pub mod envelope_service;
pub mod kdf_service;
pub mod password_strength_service;
pub mod random_source;

pub use envelope_service::EnvelopeService;
pub use kdf_service::KdfService;
pub use password_strength_service::PasswordStrengthService;
pub use random_source::RandomSource;
