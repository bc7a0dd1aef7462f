// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Stempel.

use std::fmt;

use thiserror::Error;

/// Why the camera could not be opened.
///
/// `Overconstrained` and `NotFound` are the two causes that warrant a single
/// retry with relaxed constraints; the others are reported straight away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraFailure {
    /// The requested facing/resolution cannot be satisfied by any device.
    Overconstrained,
    /// No video input device exists.
    NotFound,
    /// The user or the OS refused camera access.
    PermissionDenied,
    /// The device exists but failed to start or deliver frames.
    Hardware,
}

impl CameraFailure {
    /// Whether a retry with unconstrained settings is worthwhile.
    pub fn allows_fallback(self) -> bool {
        matches!(self, Self::Overconstrained | Self::NotFound)
    }
}

impl fmt::Display for CameraFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Overconstrained => "constraints not satisfiable",
            Self::NotFound => "no camera found",
            Self::PermissionDenied => "permission denied",
            Self::Hardware => "hardware failure",
        };
        f.write_str(label)
    }
}

/// Top-level error type for all Stempel operations.
#[derive(Debug, Error)]
pub enum StempelError {
    // -- Input validation --
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("session incomplete: {0}")]
    IncompleteSession(&'static str),

    // -- Capture --
    #[error("camera unavailable ({failure}): {detail}")]
    CameraAccess {
        failure: CameraFailure,
        detail: String,
    },

    #[error("no active camera stream")]
    NoActiveStream,

    #[error("no camera backend on this platform")]
    PlatformUnavailable,

    // -- Document --
    #[error("PDF operation failed: {0}")]
    PdfError(String),

    #[error("image processing failed: {0}")]
    ImageError(String),

    #[error("PDF generation failed: {0}")]
    GenerationFailed(String),

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

}

impl StempelError {
    /// Shorthand for a camera acquisition failure.
    pub fn camera(failure: CameraFailure, detail: impl Into<String>) -> Self {
        Self::CameraAccess {
            failure,
            detail: detail.into(),
        }
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, StempelError>;
