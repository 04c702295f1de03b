// /////////////////////////////////////////////////////////////////////////////
// Password Note
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Length-Normalization Padding
//!
//! Every plaintext is padded into one of seven fixed buckets before
//! encryption so that ciphertext lengths reveal nothing beyond the bucket.
//!
//! ## Encoding
//!
//! Pick the smallest bucket `b` with `b >= len + 1`; the padded form is
//! `plaintext || 0x80 || filler`, where the filler is `b - len - 1` random
//! bytes guaranteed to contain no `0x80`. Decoding scans from the end for
//! the first `0x80`; the plaintext is everything before it. A plaintext
//! larger than 4095 bytes does not fit the largest bucket and is
//! rejected.
//!
//! ## Clean Filler Generation
//!
//! The filler is drawn by rejection sampling: draw `2k`, then `4k`, then
//! `8k` bytes and keep the non-`0x80` ones. If three rounds still come up
//! short (each byte fails with probability 1/256, so this is effectively
//! unreachable), a byte-at-a-time rejection loop finishes the job and is
//! guaranteed to terminate.

use password_note_domain::services::RandomSource;
use password_note_domain::VaultError;

/// Fixed plaintext buckets, in bytes.
pub const BUCKETS: [usize; 7] = [64, 128, 256, 512, 1024, 2048, 4096];

/// Terminator byte between plaintext and filler.
const PAD_MARKER: u8 = 0x80;

/// Largest plaintext that fits any bucket.
pub const MAX_PLAINTEXT_LEN: usize = 4095;

fn bucket_for(len: usize) -> Option<usize> {
    BUCKETS.iter().copied().find(|&b| b >= len + 1)
}

/// Pads `plaintext` into its bucket.
pub fn pad(plaintext: &[u8], random: &dyn RandomSource) -> Result<Vec<u8>, VaultError> {
    let bucket = bucket_for(plaintext.len()).ok_or(VaultError::PlaintextTooLarge(plaintext.len()))?;
    let filler_len = bucket - plaintext.len() - 1;

    let mut padded = Vec::with_capacity(bucket);
    padded.extend_from_slice(plaintext);
    padded.push(PAD_MARKER);
    padded.extend_from_slice(&clean_filler(filler_len, random)?);
    Ok(padded)
}

/// Strips the padding, returning the plaintext prefix.
pub fn unpad(padded: &[u8]) -> Result<&[u8], VaultError> {
    let marker = padded
        .iter()
        .rposition(|&b| b == PAD_MARKER)
        .ok_or_else(|| VaultError::PaddingInvalid("missing terminator".into()))?;
    Ok(&padded[..marker])
}

/// Generates `k` random bytes none of which is `0x80`.
fn clean_filler(k: usize, random: &dyn RandomSource) -> Result<Vec<u8>, VaultError> {
    if k == 0 {
        return Ok(Vec::new());
    }

    let mut filler = Vec::with_capacity(k);
    for factor in [2usize, 4, 8] {
        let draw = random.bytes(factor * k)?;
        filler.extend(draw.into_iter().filter(|&b| b != PAD_MARKER));
        if filler.len() >= k {
            filler.truncate(k);
            return Ok(filler);
        }
        filler.clear();
    }

    // Guaranteed to terminate: each draw fails with probability 1/256.
    let mut byte = [0u8; 1];
    while filler.len() < k {
        random.fill(&mut byte)?;
        if byte[0] != PAD_MARKER {
            filler.push(byte[0]);
        }
    }
    Ok(filler)
}
