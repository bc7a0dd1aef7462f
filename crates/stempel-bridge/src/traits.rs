// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-agnostic trait definitions for the host capabilities the wizard
// consumes: live video and environment introspection.

use image::DynamicImage;
use stempel_core::error::Result;
use stempel_core::types::EnvironmentSignals;

/// Unified bridge that groups all native capabilities.
pub trait PlatformBridge: MediaDevices + NativeEnvironment + Send + Sync {
    /// Human-readable platform name (e.g. "Desktop (stub)").
    fn platform_name(&self) -> &str;
}

/// Which way a camera points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facing {
    /// Towards the user (selfie camera).
    User,
    /// Away from the user (rear camera, for documents).
    Environment,
}

/// What a caller asks for when opening a video stream. `None` means "any".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VideoConstraints {
    pub facing: Option<Facing>,
    pub ideal_width: Option<u32>,
    pub ideal_height: Option<u32>,
}

impl VideoConstraints {
    /// A facing preference plus a target resolution.
    pub fn preferred(facing: Facing, width: u32, height: u32) -> Self {
        Self {
            facing: Some(facing),
            ideal_width: Some(width),
            ideal_height: Some(height),
        }
    }

    /// The second attempt after the preferred constraints could not be met:
    /// front camera, any resolution.
    pub fn relaxed() -> Self {
        Self {
            facing: Some(Facing::User),
            ideal_width: None,
            ideal_height: None,
        }
    }
}

/// Opens live video streams.
pub trait MediaDevices {
    /// Start a stream matching `constraints` as closely as the device allows.
    ///
    /// Failures are `StempelError::CameraAccess` with a `CameraFailure`
    /// describing the cause, or `StempelError::PlatformUnavailable` when the
    /// platform has no camera backend at all.
    fn open_video(&self, constraints: &VideoConstraints) -> Result<Box<dyn VideoTrack>>;
}

/// One live video stream. The hardware stays busy until [`stop`](Self::stop).
pub trait VideoTrack: Send {
    /// The most recent frame at source resolution.
    fn grab_frame(&mut self) -> Result<DynamicImage>;

    /// Release the device. Idempotent.
    fn stop(&mut self);

    fn is_live(&self) -> bool;

    /// Device label for logs.
    fn label(&self) -> &str {
        "camera"
    }
}

/// Reads the environment the device fingerprint is derived from.
pub trait NativeEnvironment {
    /// Current readings; any that cannot be determined are `None`.
    fn signals(&self) -> EnvironmentSignals;
}
