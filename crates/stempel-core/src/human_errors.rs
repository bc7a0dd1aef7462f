// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for the signing wizard.
//
// Every technical error is mapped to plain English with a clear suggestion.
// The four severity levels follow the wizard's error taxonomy and drive how
// the UI presents the message.

use crate::error::{CameraFailure, StempelError};

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Wrong file or image type. Reported immediately, nothing changes.
    InputRejected,
    /// Camera could not be opened. Upload stays available as a fallback.
    AcquisitionFailed,
    /// Something went missing from the output but the operation continued.
    Degraded,
    /// The whole operation was abandoned. The user may try again.
    Fatal,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone, PartialEq)]
pub struct HumanError {
    /// Plain English summary (shown as a heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    /// Whether the user can retry the same action.
    pub retriable: bool,
    /// Severity level (drives icon/colour in UI).
    pub severity: Severity,
}

/// Convert a `StempelError` into a `HumanError` suitable for display.
pub fn humanize_error(err: &StempelError) -> HumanError {
    match err {
        // -- Input validation --
        StempelError::InvalidInput(detail) => HumanError {
            message: "That file can't be used here.".into(),
            suggestion: format!("Please choose a different file. ({detail})"),
            retriable: false,
            severity: Severity::InputRejected,
        },

        StempelError::IncompleteSession(missing) => HumanError {
            message: "Please complete all required steps first.".into(),
            suggestion: format!("Still missing: {missing}."),
            retriable: false,
            severity: Severity::InputRejected,
        },

        // -- Capture --
        StempelError::CameraAccess { failure, .. } => humanize_camera_error(*failure),

        StempelError::NoActiveStream => HumanError {
            message: "The camera isn't running.".into(),
            suggestion: "Start the camera first, then take the photo.".into(),
            retriable: true,
            severity: Severity::AcquisitionFailed,
        },

        StempelError::PlatformUnavailable => HumanError {
            message: "No camera is available on this device.".into(),
            suggestion: "Use the upload option to choose an existing photo instead.".into(),
            retriable: false,
            severity: Severity::AcquisitionFailed,
        },

        // -- Document --
        StempelError::ImageError(_) => HumanError {
            message: "One of the photos couldn't be added to the document.".into(),
            suggestion: "Its box was left empty. Retake or re-upload the photo as a JPEG or PNG if you need it.".into(),
            retriable: true,
            severity: Severity::Degraded,
        },

        StempelError::PdfError(_) | StempelError::GenerationFailed(_) => HumanError {
            message: "Error generating signed PDF.".into(),
            suggestion: "The PDF may be damaged. Please try again, or choose a different PDF.".into(),
            retriable: true,
            severity: Severity::Fatal,
        },

        // -- Storage --
        StempelError::Io(io_err) => {
            if io_err.kind() == std::io::ErrorKind::NotFound {
                HumanError {
                    message: "The file couldn't be found.".into(),
                    suggestion: "It may have been moved or deleted. Try choosing the file again.".into(),
                    retriable: false,
                    severity: Severity::InputRejected,
                }
            } else if io_err.kind() == std::io::ErrorKind::PermissionDenied {
                HumanError {
                    message: "The app doesn't have permission to use that file.".into(),
                    suggestion: "Check the file permissions, or pick a different location.".into(),
                    retriable: false,
                    severity: Severity::InputRejected,
                }
            } else {
                HumanError {
                    message: "There was a problem reading or writing a file.".into(),
                    suggestion: "Try again. If this keeps happening, your device's storage may be full.".into(),
                    retriable: true,
                    severity: Severity::Fatal,
                }
            }
        }

        StempelError::Serialization(_) => HumanError {
            message: "The app had an internal data problem.".into(),
            suggestion: "Try again. If this keeps happening, please report it.".into(),
            retriable: true,
            severity: Severity::Fatal,
        },
    }
}

fn humanize_camera_error(failure: CameraFailure) -> HumanError {
    match failure {
        CameraFailure::PermissionDenied => HumanError {
            message: "Unable to access camera.".into(),
            suggestion: "Please ensure camera permissions are granted, or try uploading a photo.".into(),
            retriable: true,
            severity: Severity::AcquisitionFailed,
        },
        CameraFailure::NotFound | CameraFailure::Overconstrained => HumanError {
            message: "No suitable camera was found.".into(),
            suggestion: "Connect a camera and try again, or upload a photo instead.".into(),
            retriable: true,
            severity: Severity::AcquisitionFailed,
        },
        CameraFailure::Hardware => HumanError {
            message: "The camera stopped working.".into(),
            suggestion: "Close other apps that might be using the camera, then try again.".into(),
            retriable: true,
            severity: Severity::AcquisitionFailed,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrong_file_type_is_input_rejected() {
        let err = StempelError::InvalidInput("text/plain is not a PDF".into());
        let human = humanize_error(&err);
        assert_eq!(human.severity, Severity::InputRejected);
        assert!(!human.retriable);
    }

    #[test]
    fn permission_denied_keeps_upload_open() {
        let err = StempelError::camera(CameraFailure::PermissionDenied, "denied by user");
        let human = humanize_error(&err);
        assert_eq!(human.severity, Severity::AcquisitionFailed);
        assert!(human.suggestion.contains("upload"));
    }

    #[test]
    fn missing_camera_backend_points_to_upload() {
        let human = humanize_error(&StempelError::PlatformUnavailable);
        assert_eq!(human.severity, Severity::AcquisitionFailed);
        assert!(!human.retriable);
        assert!(human.suggestion.contains("upload"));
    }

    #[test]
    fn embedding_failure_is_degraded() {
        let human = humanize_error(&StempelError::ImageError("bad SOI marker".into()));
        assert_eq!(human.severity, Severity::Degraded);
    }

    #[test]
    fn generation_failure_is_fatal_but_retriable() {
        let human = humanize_error(&StempelError::GenerationFailed("no trailer".into()));
        assert_eq!(human.severity, Severity::Fatal);
        assert!(human.retriable);
        assert_eq!(human.message, "Error generating signed PDF.");
    }
}
