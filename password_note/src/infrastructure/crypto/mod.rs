// /////////////////////////////////////////////////////////////////////////////
// Password Note
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Cryptographic adapters: system randomness, bucket padding, the
//! ChaCha20-Poly1305 envelope, Argon2id derivation, and zxcvbn scoring.

pub mod envelope;
pub mod kdf;
pub mod padding;
pub mod random;
pub mod strength;

pub use envelope::ChaChaEnvelope;
pub use kdf::{Argon2Kdf, AsyncKdfAdapter};
pub use random::SystemRandomSource;
pub use strength::ZxcvbnStrength;
