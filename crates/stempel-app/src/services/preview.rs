// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Inline image previews for the webview.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::DynamicImage;
use stempel_core::error::Result;
use stempel_core::types::ImageArtifact;
use stempel_document::ImageProcessor;

/// JPEG quality for live preview frames. Never stored.
const PREVIEW_QUALITY: u8 = 60;

pub fn data_url(mime_type: &str, bytes: &[u8]) -> String {
    format!("data:{mime_type};base64,{}", STANDARD.encode(bytes))
}

/// Stored artifact as an `<img src>` value, in its own encoding.
pub fn artifact_data_url(artifact: &ImageArtifact) -> String {
    data_url(artifact.encoding.mime_type(), &artifact.bytes)
}

/// One live camera frame as an `<img src>` value.
pub fn frame_data_url(frame: DynamicImage) -> Result<String> {
    let bytes = ImageProcessor::from_dynamic(frame).to_jpeg_bytes(PREVIEW_QUALITY)?;
    Ok(data_url("image/jpeg", &bytes))
}

#[cfg(test)]
mod tests {
    use image::{Rgb, RgbImage};
    use stempel_core::types::ImageEncoding;

    use super::*;

    #[test]
    fn artifact_url_keeps_mime_type() {
        let artifact = ImageArtifact::new(vec![1, 2, 3], ImageEncoding::Png);
        assert_eq!(artifact_data_url(&artifact), "data:image/png;base64,AQID");
    }

    #[test]
    fn frame_url_is_jpeg() {
        let frame = DynamicImage::ImageRgb8(RgbImage::from_pixel(16, 16, Rgb([0, 0, 0])));
        let url = frame_data_url(frame).unwrap();
        assert!(url.starts_with("data:image/jpeg;base64,/9j/"));
    }
}
