// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Non-cryptographic string checksums.
//
// These are display identifiers only. They are trivially forgeable and must
// never be used where tampering matters; see `integrity` for that.

/// Classic 32-bit shift-and-subtract string hash (`h = h * 31 + c`) over the
/// UTF-16 code units of `input`, returned as its absolute value.
pub fn string_hash32(input: &str) -> u32 {
    let hash = input.encode_utf16().fold(0i32, |hash, unit| {
        (hash << 5).wrapping_sub(hash).wrapping_add(i32::from(unit))
    });
    hash.unsigned_abs()
}

/// 32-bit FNV-1a over the UTF-8 bytes of `input`.
pub fn fnv1a32(input: &str) -> u32 {
    const OFFSET_BASIS: u32 = 0x811c_9dc5;
    const PRIME: u32 = 0x0100_0193;
    input.bytes().fold(OFFSET_BASIS, |hash, byte| {
        (hash ^ u32::from(byte)).wrapping_mul(PRIME)
    })
}

/// 16 lowercase hex characters combining both checksums.
///
/// Deterministic for a given input.
pub fn fingerprint_hex(input: &str) -> String {
    format!("{:08x}{:08x}", string_hash32(input), fnv1a32(input))
}
