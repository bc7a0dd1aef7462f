// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application configuration.

use serde::{Deserialize, Serialize};

use crate::types::PageSelection;

/// Persistent application settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Geometry and styling of the watermark and attestation blocks.
    pub layout: StampLayout,
    /// Camera request and still-encoding parameters.
    pub camera: CameraConfig,
    /// Which pages receive attestation blocks unless the user picks otherwise.
    pub default_page_selection: PageSelection,
    /// Use the generated test-pattern camera instead of a native one.
    pub synthetic_camera: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            layout: StampLayout::default(),
            camera: CameraConfig::default(),
            default_page_selection: PageSelection::All,
            synthetic_camera: false,
        }
    }
}

/// Layout constants for the stamped output, in PDF points unless noted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StampLayout {
    /// Distance of the block row from the page's left, right and bottom edges.
    pub margin: f32,
    /// Inset of images and text inside a block.
    pub block_padding: f32,
    pub title_font_size: f32,
    pub content_font_size: f32,
    /// Height of each block's bordered content area.
    pub block_height: f32,
    /// Gap between a block's top border and its title baseline.
    pub title_gap: f32,
    /// Horizontal gap between neighbouring blocks.
    pub block_spacing: f32,
    /// Extra leading between device-info lines.
    pub line_gap: f32,
    pub border_width: f32,
    /// Dash pattern (on, off) for block borders.
    pub dash: [f32; 2],
    pub watermark_font_size: f32,
    /// Fill opacity of the watermark, 0.0..=1.0.
    pub watermark_opacity: f32,
    /// Counter-clockwise rotation of the watermark baseline.
    pub watermark_rotation_degrees: f32,
    pub watermark_gray: f32,
    pub border_gray: f32,
    pub text_gray: f32,
    /// JPEG quality (1-100) for images re-encoded before embedding.
    pub fallback_jpeg_quality: u8,
}

impl Default for StampLayout {
    fn default() -> Self {
        Self {
            margin: 20.0,
            block_padding: 5.0,
            title_font_size: 10.0,
            content_font_size: 8.0,
            block_height: 80.0,
            title_gap: 2.0,
            block_spacing: 10.0,
            line_gap: 3.0,
            border_width: 1.0,
            dash: [5.0, 5.0],
            watermark_font_size: 24.0,
            watermark_opacity: 0.3,
            watermark_rotation_degrees: 315.0,
            watermark_gray: 0.8,
            border_gray: 0.8,
            text_gray: 0.2,
            fallback_jpeg_quality: 80,
        }
    }
}

/// Camera request and still-image encoding parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Preferred frame width in pixels.
    pub ideal_width: u32,
    /// Preferred frame height in pixels.
    pub ideal_height: u32,
    /// JPEG quality for ID document stills (1-100).
    pub id_jpeg_quality: u8,
    /// JPEG quality for selfie stills (1-100).
    pub selfie_jpeg_quality: u8,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            ideal_width: 640,
            ideal_height: 480,
            id_jpeg_quality: 90,
            selfie_jpeg_quality: 80,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{ "layout": { "margin": 36.0 }, "synthetic_camera": true }"#)
                .unwrap();
        assert_eq!(config.layout.margin, 36.0);
        assert_eq!(config.layout.block_height, 80.0);
        assert_eq!(config.camera, CameraConfig::default());
        assert!(config.synthetic_camera);
    }

    #[test]
    fn config_round_trips_through_json() {
        let config = AppConfig {
            default_page_selection: PageSelection::LastOnly,
            ..AppConfig::default()
        };
        let json = serde_json::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }
}
