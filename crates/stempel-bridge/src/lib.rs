// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// stempel-bridge: host capability abstractions.
//
// The wizard talks to cameras and reads environment signals only through the
// traits in `traits`, so a native backend can be dropped in per platform.

pub mod environment;
pub mod stub;
pub mod synthetic;
pub mod traits;

pub use traits::{Facing, MediaDevices, NativeEnvironment, PlatformBridge, VideoConstraints, VideoTrack};

/// The bridge implementation for this build.
///
/// `synthetic_camera` swaps in the test-pattern camera when no native
/// backend exists.
pub fn platform_bridge(synthetic_camera: bool) -> Box<dyn PlatformBridge> {
    tracing::debug!(synthetic_camera, "Creating platform bridge");
    Box::new(stub::StubBridge::new(synthetic_camera))
}
