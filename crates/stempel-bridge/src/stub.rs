// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stub bridge for desktop/CI builds where no native camera API is wired up.
//
// Video requests fail with `PlatformUnavailable` unless the synthetic
// camera is enabled. Environment signals come from the process environment.

use stempel_core::error::{Result, StempelError};
use stempel_core::types::EnvironmentSignals;

use crate::environment;
use crate::synthetic::SyntheticCamera;
use crate::traits::*;

/// Bridge returned on platforms without a native implementation.
pub struct StubBridge {
    synthetic_camera: bool,
}

impl StubBridge {
    pub fn new(synthetic_camera: bool) -> Self {
        Self { synthetic_camera }
    }
}

impl PlatformBridge for StubBridge {
    fn platform_name(&self) -> &str {
        if self.synthetic_camera {
            "Desktop (synthetic camera)"
        } else {
            "Desktop (stub)"
        }
    }
}

impl MediaDevices for StubBridge {
    fn open_video(&self, constraints: &VideoConstraints) -> Result<Box<dyn VideoTrack>> {
        if self.synthetic_camera {
            return Ok(Box::new(SyntheticCamera::open(constraints)));
        }
        tracing::warn!("MediaDevices::open_video called on stub bridge");
        Err(StempelError::PlatformUnavailable)
    }
}

impl NativeEnvironment for StubBridge {
    fn signals(&self) -> EnvironmentSignals {
        environment::probe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn without_synthetic_camera_video_is_unavailable() {
        let bridge = StubBridge::new(false);
        match bridge.open_video(&VideoConstraints::default()) {
            Err(StempelError::PlatformUnavailable) => {}
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("stub bridge must not open a camera"),
        }
    }

    #[test]
    fn synthetic_camera_opens_live_track() {
        let bridge = StubBridge::new(true);
        let track = bridge.open_video(&VideoConstraints::default()).unwrap();
        assert!(track.is_live());
        assert_eq!(bridge.platform_name(), "Desktop (synthetic camera)");
    }
}
