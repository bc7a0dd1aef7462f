// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// stempel-document: the PDF side of the Stempel signing wizard.
//
// Stamps a source PDF with a diagonal watermark on every page and a row of
// attestation blocks (ID image, selfie, device details) on selected pages,
// and prepares captured stills for storage and embedding.

pub mod image;
pub mod pdf;
pub mod stamp;

// Re-export the primary types so callers can use `stempel_document::SignatureStamper` etc.
pub use crate::image::processor::ImageProcessor;
pub use pdf::embed::PreparedImage;
pub use stamp::{SignatureStamper, StampRequest};
