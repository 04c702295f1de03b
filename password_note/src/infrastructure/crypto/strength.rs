// /////////////////////////////////////////////////////////////////////////////
// Password Note
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! zxcvbn-backed password strength scoring. The estimator returns the
//! standard 0..=4 scale along with its structural warnings and
//! improvement suggestions; the FAIR acceptance threshold lives in the
//! domain report.

use password_note_domain::services::PasswordStrengthService;
use password_note_domain::value_objects::StrengthReport;

/// `PasswordStrengthService` over the zxcvbn estimator.
pub struct ZxcvbnStrength;

impl ZxcvbnStrength {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ZxcvbnStrength {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordStrengthService for ZxcvbnStrength {
    fn score(&self, password: &str) -> StrengthReport {
        match zxcvbn::zxcvbn(password, &[]) {
            Ok(estimate) => {
                let (warnings, suggestions) = match estimate.feedback() {
                    Some(feedback) => (
                        feedback.warning().map(|w| w.to_string()).into_iter().collect(),
                        feedback.suggestions().iter().map(|s| s.to_string()).collect(),
                    ),
                    None => (Vec::new(), Vec::new()),
                };
                StrengthReport::new(estimate.score(), warnings, suggestions)
            }
            // zxcvbn rejects the empty password outright; score it as the
            // weakest possible instead of failing the caller.
            Err(_) => StrengthReport::new(0, vec!["Password is empty".to_string()], Vec::new()),
        }
    }
}
