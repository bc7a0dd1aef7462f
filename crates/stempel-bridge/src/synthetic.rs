// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Synthetic camera: a test-pattern video track for machines without a usable
// camera (desktop demos, CI).

use image::{DynamicImage, Rgb, RgbImage};
use stempel_core::error::{Result, StempelError};
use tracing::{debug, info};

use crate::traits::{Facing, VideoConstraints, VideoTrack};

const DEFAULT_WIDTH: u32 = 640;
const DEFAULT_HEIGHT: u32 = 480;

/// Colour bars, left to right.
const BARS: [[u8; 3]; 7] = [
    [192, 192, 192],
    [192, 192, 0],
    [0, 192, 192],
    [0, 192, 0],
    [192, 0, 192],
    [192, 0, 0],
    [0, 0, 192],
];

/// Colour bars with a white sweep line that advances every frame, so
/// successive frames are distinguishable.
pub struct SyntheticCamera {
    width: u32,
    height: u32,
    facing: Facing,
    frames: u64,
    live: bool,
}

impl SyntheticCamera {
    /// Start a track honouring the requested resolution, 640x480 otherwise.
    pub fn open(constraints: &VideoConstraints) -> Self {
        let camera = Self {
            width: constraints.ideal_width.unwrap_or(DEFAULT_WIDTH).max(1),
            height: constraints.ideal_height.unwrap_or(DEFAULT_HEIGHT).max(1),
            facing: constraints.facing.unwrap_or(Facing::User),
            frames: 0,
            live: true,
        };
        info!(width = camera.width, height = camera.height, facing = ?camera.facing, "Synthetic camera started");
        camera
    }

    fn render(&self) -> RgbImage {
        let sweep = (self.frames % u64::from(self.width)) as u32;
        let bar_width = self.width.div_ceil(BARS.len() as u32);
        RgbImage::from_fn(self.width, self.height, |x, _| {
            if x == sweep {
                return Rgb([255, 255, 255]);
            }
            let bar = ((x / bar_width) as usize).min(BARS.len() - 1);
            Rgb(BARS[bar])
        })
    }
}

impl VideoTrack for SyntheticCamera {
    fn grab_frame(&mut self) -> Result<DynamicImage> {
        if !self.live {
            return Err(StempelError::NoActiveStream);
        }
        let frame = self.render();
        self.frames += 1;
        Ok(DynamicImage::ImageRgb8(frame))
    }

    fn stop(&mut self) {
        if self.live {
            self.live = false;
            debug!(frames = self.frames, "Synthetic camera stopped");
        }
    }

    fn is_live(&self) -> bool {
        self.live
    }

    fn label(&self) -> &str {
        match self.facing {
            Facing::User => "synthetic (front)",
            Facing::Environment => "synthetic (rear)",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_match_requested_resolution() {
        let mut camera = SyntheticCamera::open(&VideoConstraints::preferred(Facing::Environment, 320, 240));
        let frame = camera.grab_frame().unwrap();
        assert_eq!((frame.width(), frame.height()), (320, 240));
        assert_eq!(camera.label(), "synthetic (rear)");
    }

    #[test]
    fn relaxed_constraints_use_default_size() {
        let mut camera = SyntheticCamera::open(&VideoConstraints::relaxed());
        let frame = camera.grab_frame().unwrap();
        assert_eq!((frame.width(), frame.height()), (640, 480));
    }

    #[test]
    fn successive_frames_differ() {
        let mut camera = SyntheticCamera::open(&VideoConstraints::default());
        let first = camera.grab_frame().unwrap();
        let second = camera.grab_frame().unwrap();
        assert_ne!(first.as_bytes(), second.as_bytes());
    }

    #[test]
    fn stopped_track_refuses_frames() {
        let mut camera = SyntheticCamera::open(&VideoConstraints::default());
        camera.stop();
        camera.stop();
        assert!(!camera.is_live());
        assert!(matches!(camera.grab_frame(), Err(StempelError::NoActiveStream)));
    }
}
