// /////////////////////////////////////////////////////////////////////////////
// Password Note
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Password Strength Report
//!
//! Result object produced by the password strength service. The scale is
//! the zxcvbn one: 0 (trivially guessable) through 4 (very strong). A
//! password is acceptable for vault initialization at FAIR (score 2) or
//! better.

use serde::{Deserialize, Serialize};

/// Minimum acceptable score (FAIR).
pub const FAIR_SCORE: u8 = 2;

/// Outcome of scoring a candidate master password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrengthReport {
    /// 0..=4, higher is stronger
    pub score: u8,
    /// Human-readable warnings about the password's structure
    pub warnings: Vec<String>,
    /// Suggestions for improving the password
    pub suggestions: Vec<String>,
}

impl StrengthReport {
    pub fn new(score: u8, warnings: Vec<String>, suggestions: Vec<String>) -> Self {
        Self {
            score: score.min(4),
            warnings,
            suggestions,
        }
    }

    /// True iff the score clears the FAIR threshold.
    pub fn is_acceptable(&self) -> bool {
        self.score >= FAIR_SCORE
    }
}
