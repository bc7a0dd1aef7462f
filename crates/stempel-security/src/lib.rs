// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// stempel-security: device fingerprinting and document digests.
//
// Two deliberately separate kinds of hashing live here:
// - `checksum`: fast non-cryptographic string hashes, used only to derive a
//   short display identifier for the device. Not a security primitive.
// - `integrity`: SHA-256 over the generated PDF, shown to the user so the
//   downloaded file can be compared against what was produced.

pub mod checksum;
pub mod fingerprint;
pub mod integrity;

pub use checksum::fingerprint_hex;
pub use fingerprint::{classify_device_type, generate_device_id, generate_device_info};
pub use integrity::{display_hash, hash_bytes};
