// /////////////////////////////////////////////////////////////////////////////
// Password Note
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Domain contract for master-password strength estimation.

use crate::value_objects::StrengthReport;

/// Scores candidate master passwords on the 0..=4 scale.
///
/// The report's acceptance threshold (FAIR) is what `initialize` enforces;
/// `authenticate` never re-scores an existing password.
pub trait PasswordStrengthService: Send + Sync {
    fn score(&self, password: &str) -> StrengthReport;
}
