// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF building blocks used by the stamper: font metrics, image XObjects and
// page-level edits on a loaded document.

pub mod embed;
pub mod metrics;
pub mod page;

pub use embed::PreparedImage;
