// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document integrity: SHA-256 digest of the generated PDF.

use sha2::{Digest, Sha256};

/// Number of hex characters shown before the ellipsis in the UI.
pub const DISPLAY_HASH_LEN: usize = 32;

/// Compute the SHA-256 hash of `data` and return it as a lowercase hex string.
pub fn hash_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();
    hex::encode(result)
}

/// Shortened digest for the signing summary, e.g. `"3a7bd3e2...."`.
///
/// Derived from the output bytes, so it changes whenever the content does.
pub fn display_hash(data: &[u8]) -> String {
    let mut digest = hash_bytes(data);
    digest.truncate(DISPLAY_HASH_LEN);
    digest.push_str("...");
    digest
}
