// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image processor: decode captured or uploaded stills, burn the capture
// timestamp into selfies, and encode the result for storage and embedding.

use ab_glyph::{Font, FontRef, PxScale, ScaleFont};
use image::{DynamicImage, Rgba};
use imageproc::drawing::{Blend, draw_filled_rect_mut, draw_text_mut, text_size};
use imageproc::rect::Rect;
use stempel_core::error::StempelError;
use tracing::{debug, instrument, warn};

/// DejaVu Sans, bundled so the overlay looks the same on every machine.
static OVERLAY_FONT: &[u8] = include_bytes!("../../assets/DejaVuSans.ttf");

/// Distance of the timestamp backdrop from the left edge.
const OVERLAY_LEFT: i32 = 10;
/// Distance of the backdrop's top edge above the bottom of the frame.
const OVERLAY_RISE: i32 = 40;
const OVERLAY_HEIGHT: u32 = 30;
/// Horizontal padding between backdrop edge and text.
const OVERLAY_PAD_X: u32 = 10;
/// Distance of the text baseline above the bottom of the frame.
const TEXT_BASELINE_RISE: f32 = 20.0;
const TEXT_SIZE_PX: f32 = 16.0;
/// White at 70% opacity.
const BACKDROP: Rgba<u8> = Rgba([255, 255, 255, 179]);
const TEXT_COLOR: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Image pipeline operating on a single in-memory image.
///
/// Methods that transform consume `self` and return a new processor, so a
/// capture reads as a chain:
///
/// ```ignore
/// let jpeg = ImageProcessor::from_dynamic(frame)
///     .stamp_timestamp("2026-10-17 14:03:22")
///     .to_jpeg_bytes(80)?;
/// ```
pub struct ImageProcessor {
    image: DynamicImage,
}

impl ImageProcessor {
    // -- Construction ---------------------------------------------------------

    /// Create a processor from encoded bytes (JPEG, PNG, etc.).
    #[instrument(skip(data), fields(data_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self, StempelError> {
        let img = image::load_from_memory(data).map_err(|err| {
            StempelError::ImageError(format!("failed to decode image: {}", err))
        })?;
        debug!(
            width = img.width(),
            height = img.height(),
            "Image decoded from bytes"
        );
        Ok(Self { image: img })
    }

    /// Wrap an already-decoded frame.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self { image }
    }

    // -- Accessors ------------------------------------------------------------

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    // -- Transformations ------------------------------------------------------

    /// Burn `text` into the lower-left corner over a translucent white
    /// backdrop.
    ///
    /// The backdrop sits 10 px from the left edge and its top 40 px above the
    /// bottom edge; it is as wide as the text plus 10 px either side. The
    /// text is 16 px high with its baseline 20 px above the bottom. Frames
    /// too small for the overlay are clipped, never rejected.
    #[instrument(skip(self), fields(width = self.image.width(), height = self.image.height()))]
    pub fn stamp_timestamp(self, text: &str) -> Self {
        let font = match FontRef::try_from_slice(OVERLAY_FONT) {
            Ok(font) => font,
            Err(e) => {
                warn!(error = %e, "overlay font unreadable, timestamp skipped");
                return self;
            }
        };
        let scale = PxScale::from(TEXT_SIZE_PX);
        let height = self.image.height() as i32;
        let (text_width, _) = text_size(scale, &font, text);

        let backdrop = Rect::at(OVERLAY_LEFT, height - OVERLAY_RISE)
            .of_size(text_width + 2 * OVERLAY_PAD_X, OVERLAY_HEIGHT);
        let mut blended = Blend(self.image.to_rgba8());
        draw_filled_rect_mut(&mut blended, backdrop, BACKDROP);
        let mut canvas = blended.0;

        // `draw_text_mut` positions the top of the ascender at `y`.
        let ascent = font.as_scaled(scale).ascent();
        let text_top = (height as f32 - TEXT_BASELINE_RISE - ascent).round() as i32;
        draw_text_mut(
            &mut canvas,
            TEXT_COLOR,
            OVERLAY_LEFT + OVERLAY_PAD_X as i32,
            text_top,
            scale,
            &font,
            text,
        );
        debug!(text_width, "Timestamp overlay applied");

        Self {
            image: DynamicImage::ImageRgba8(canvas),
        }
    }

    // -- Output ---------------------------------------------------------------

    /// Encode the current image as JPEG bytes with the given quality (1-100).
    ///
    /// Alpha is dropped; JPEG has no transparency.
    pub fn to_jpeg_bytes(&self, quality: u8) -> Result<Vec<u8>, StempelError> {
        let mut buffer = Vec::new();
        let rgb = self.image.to_rgb8();
        let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buffer, quality);
        rgb.write_with_encoder(encoder).map_err(|err| {
            StempelError::ImageError(format!("JPEG encoding failed: {}", err))
        })?;
        Ok(buffer)
    }
}
