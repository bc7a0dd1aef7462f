// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Capture controller: one camera-or-upload acquisition flow.
//
// The wizard owns two independent controllers, one for the ID document and
// one for the selfie. Each holds at most one live stream. The stream is a
// `CaptureStream` handle that releases the hardware when dropped, so every
// exit path (capture, retake, stop, upload, teardown) frees the camera.

use std::sync::Arc;

use chrono::{DateTime, Local};
use image::DynamicImage;
use stempel_bridge::{Facing, PlatformBridge, VideoConstraints, VideoTrack};
use stempel_core::error::{Result, StempelError};
use stempel_core::types::{CaptureKind, ImageArtifact, ImageEncoding};
use stempel_core::CameraConfig;
use stempel_document::ImageProcessor;
use stempel_security::fingerprint::TIMESTAMP_FORMAT;
use tracing::{debug, info, warn};

/// What differs between the ID and selfie flows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureSettings {
    pub kind: CaptureKind,
    pub constraints: VideoConstraints,
    pub jpeg_quality: u8,
    /// Burn the capture time into the lower-left corner of the still.
    pub timestamp_overlay: bool,
}

impl CaptureSettings {
    pub fn for_kind(kind: CaptureKind, camera: &CameraConfig) -> Self {
        match kind {
            CaptureKind::IdDocument => Self {
                kind,
                constraints: VideoConstraints::preferred(
                    Facing::Environment,
                    camera.ideal_width,
                    camera.ideal_height,
                ),
                jpeg_quality: camera.id_jpeg_quality,
                timestamp_overlay: false,
            },
            CaptureKind::Selfie => Self {
                kind,
                constraints: VideoConstraints::preferred(
                    Facing::User,
                    camera.ideal_width,
                    camera.ideal_height,
                ),
                jpeg_quality: camera.selfie_jpeg_quality,
                timestamp_overlay: true,
            },
        }
    }
}

/// A live video stream that is stopped when the handle goes away.
pub struct CaptureStream {
    track: Box<dyn VideoTrack>,
}

impl CaptureStream {
    fn new(track: Box<dyn VideoTrack>) -> Self {
        Self { track }
    }

    fn grab_frame(&mut self) -> Result<DynamicImage> {
        self.track.grab_frame()
    }

    pub fn label(&self) -> &str {
        self.track.label()
    }
}

impl Drop for CaptureStream {
    fn drop(&mut self) {
        if self.track.is_live() {
            debug!(device = %self.track.label(), "releasing camera stream");
        }
        self.track.stop();
    }
}

/// Acquisition state for one image artifact.
pub struct CaptureController {
    devices: Arc<dyn PlatformBridge>,
    settings: CaptureSettings,
    stream: Option<CaptureStream>,
    artifact: Option<ImageArtifact>,
}

impl CaptureController {
    pub fn new(devices: Arc<dyn PlatformBridge>, settings: CaptureSettings) -> Self {
        Self {
            devices,
            settings,
            stream: None,
            artifact: None,
        }
    }

    pub fn kind(&self) -> CaptureKind {
        self.settings.kind
    }

    // -- Camera ---------------------------------------------------------------

    /// Open the camera for a new capture cycle.
    ///
    /// Any previous stream is released first. If the preferred constraints
    /// cannot be met, or no matching device exists, one retry is made with
    /// relaxed constraints. On success a previously stored artifact is
    /// discarded; on failure it is kept and no stream is left open.
    pub fn start_camera(&mut self) -> Result<()> {
        self.stop();

        let kind = self.settings.kind.label();
        let track = match self.devices.open_video(&self.settings.constraints) {
            Ok(track) => track,
            Err(StempelError::CameraAccess { failure, detail }) if failure.allows_fallback() => {
                warn!(capture = kind, %failure, %detail, "preferred camera unavailable, retrying relaxed");
                self.devices
                    .open_video(&VideoConstraints::relaxed())
                    .inspect_err(|e| warn!(capture = kind, error = %e, "camera fallback failed"))?
            }
            Err(e) => {
                warn!(capture = kind, error = %e, "camera access failed");
                return Err(e);
            }
        };

        info!(capture = kind, device = %track.label(), "camera stream started");
        self.stream = Some(CaptureStream::new(track));
        self.artifact = None;
        Ok(())
    }

    /// Latest frame from the live stream, for the preview.
    pub fn preview_frame(&mut self) -> Result<DynamicImage> {
        self.stream
            .as_mut()
            .ok_or(StempelError::NoActiveStream)?
            .grab_frame()
    }

    /// Take a still from the live stream and store it as this flow's artifact.
    ///
    /// The stream is released whether or not the grab succeeds.
    pub fn capture_photo(&mut self, now: DateTime<Local>) -> Result<ImageArtifact> {
        let mut stream = self.stream.take().ok_or(StempelError::NoActiveStream)?;
        let frame = stream.grab_frame();
        drop(stream);
        let frame = frame?;

        let mut processor = ImageProcessor::from_dynamic(frame);
        if self.settings.timestamp_overlay {
            processor = processor.stamp_timestamp(&now.format(TIMESTAMP_FORMAT).to_string());
        }
        let bytes = processor.to_jpeg_bytes(self.settings.jpeg_quality)?;

        info!(
            capture = self.settings.kind.label(),
            width = processor.width(),
            height = processor.height(),
            bytes = bytes.len(),
            "photo captured"
        );
        let artifact = ImageArtifact::new(bytes, ImageEncoding::Jpeg);
        self.artifact = Some(artifact.clone());
        Ok(artifact)
    }

    /// Drop the stored artifact and open the camera again.
    pub fn retake(&mut self) -> Result<()> {
        debug!(capture = self.settings.kind.label(), "retake");
        self.artifact = None;
        self.start_camera()
    }

    /// Release the camera if it is running. Safe to call repeatedly.
    pub fn stop(&mut self) {
        if let Some(stream) = self.stream.take() {
            info!(capture = self.settings.kind.label(), device = %stream.label(), "camera stream stopped");
        }
    }

    /// Use an uploaded file instead of the camera.
    ///
    /// A non-image MIME type is rejected before anything changes. Otherwise
    /// any live stream for this flow is stopped, and the file must decode
    /// before it replaces the stored artifact. The bytes are kept in their
    /// original encoding.
    pub fn upload_image(&mut self, bytes: Vec<u8>, mime_type: &str) -> Result<ImageArtifact> {
        let artifact = ImageArtifact::from_upload(bytes, mime_type)?;
        self.stop();

        let decoded = ImageProcessor::from_bytes(&artifact.bytes)
            .map_err(|e| StempelError::InvalidInput(e.to_string()))?;
        info!(
            capture = self.settings.kind.label(),
            mime = %mime_type,
            width = decoded.width(),
            height = decoded.height(),
            "image uploaded"
        );
        self.artifact = Some(artifact.clone());
        Ok(artifact)
    }

    pub fn is_streaming(&self) -> bool {
        self.stream.is_some()
    }

    pub fn artifact(&self) -> Option<&ImageArtifact> {
        self.artifact.as_ref()
    }
}

impl Drop for CaptureController {
    fn drop(&mut self) {
        self.stop();
    }
}
