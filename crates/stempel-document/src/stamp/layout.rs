// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page geometry for the watermark and the attestation block row.
//
// All coordinates are PDF user space: points, origin bottom-left.

use stempel_core::config::StampLayout;
use stempel_core::types::DeviceInfo;

use crate::pdf::metrics;

/// Shown in the device block for any field that is empty or missing.
pub const NOT_AVAILABLE: &str = "N/A";

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Frame {
    pub fn top(&self) -> f32 {
        self.y + self.height
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }
}

/// The three attestation blocks, left to right.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    IdDocument,
    Selfie,
    DeviceVerification,
}

impl BlockKind {
    pub const ALL: [BlockKind; 3] = [Self::IdDocument, Self::Selfie, Self::DeviceVerification];

    pub fn title(&self) -> &'static str {
        match self {
            Self::IdDocument => "ID Document:",
            Self::Selfie => "Selfie:",
            Self::DeviceVerification => "Device Verification:",
        }
    }
}

/// A block's bordered area and where its title label sits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockFrame {
    pub kind: BlockKind,
    pub frame: Frame,
    pub title_x: f32,
    pub title_y: f32,
}

/// One device-info line that fits inside its block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedLine {
    /// Index into the line list passed to [`device_line_positions`].
    pub index: usize,
    pub x: f32,
    pub y: f32,
}

/// Three equal-width blocks along the bottom margin of a page `page_width`
/// points wide.
///
/// Block width is whatever remains after both side margins and the two
/// inter-block gaps; on pages too narrow for that it goes negative and the
/// blocks overlap, exactly as the arithmetic says.
pub fn block_frames(page_width: f32, layout: &StampLayout) -> [BlockFrame; 3] {
    let count = BlockKind::ALL.len() as f32;
    let available = page_width - 2.0 * layout.margin;
    let width = (available - (count - 1.0) * layout.block_spacing) / count;
    let title_y = layout.margin + layout.block_height + layout.title_gap;

    BlockKind::ALL.map(|kind| {
        let column = kind as usize as f32;
        let x = layout.margin + column * (width + layout.block_spacing);
        BlockFrame {
            kind,
            frame: Frame {
                x,
                y: layout.margin,
                width,
                height: layout.block_height,
            },
            title_x: x + layout.block_padding,
            title_y,
        }
    })
}

/// Scale `image_width` x `image_height` to the largest size that fits the
/// block's padded content area, preserving aspect ratio, and centre it in the
/// block.
///
/// Small images are scaled up.
pub fn fit_image(image_width: u32, image_height: u32, block: &Frame, layout: &StampLayout) -> Frame {
    let box_width = block.width - 2.0 * layout.block_padding;
    let box_height = block.height - 2.0 * layout.block_padding;
    let (iw, ih) = (image_width.max(1) as f32, image_height.max(1) as f32);
    let scale = (box_width / iw).min(box_height / ih);
    let (width, height) = (iw * scale, ih * scale);
    Frame {
        x: block.x + (block.width - width) / 2.0,
        y: block.y + (block.height - height) / 2.0,
        width,
        height,
    }
}

fn or_not_available(value: Option<&str>) -> &str {
    value.filter(|v| !v.is_empty()).unwrap_or(NOT_AVAILABLE)
}

/// The four lines printed in the device-verification block.
pub fn device_lines(info: Option<&DeviceInfo>) -> [String; 4] {
    let id = info.map(|i| i.device_id.as_str());
    let kind = info.map(|i| i.device_type.as_str());
    let ip = info.and_then(|i| i.ip_address.as_deref());
    let time = info.map(|i| i.timestamp.as_str());
    [
        format!("Device ID: {}", or_not_available(id)),
        format!("Type: {}", or_not_available(kind)),
        format!("IP: {}", or_not_available(ip)),
        format!("Time: {}", or_not_available(time)),
    ]
}

/// Baseline positions of `lines` inside `block`.
///
/// The lines are centred vertically as a group and each one horizontally.
/// A line whose baseline would fall outside the padded content area is
/// skipped; the lines below it keep their positions.
pub fn device_line_positions(block: &Frame, lines: &[String], layout: &StampLayout) -> Vec<PlacedLine> {
    let size = layout.content_font_size;
    let spacing = size + layout.line_gap;
    let count = lines.len() as f32;
    let total_height = count * spacing - layout.line_gap;
    let first_y = block.y + (block.height - total_height) / 2.0 + (count - 1.0) * spacing;
    let lowest = block.y + layout.block_padding;
    let highest = block.top() - layout.block_padding;

    lines
        .iter()
        .enumerate()
        .filter_map(|(index, line)| {
            let y = first_y - index as f32 * spacing;
            (lowest..=highest).contains(&y).then(|| PlacedLine {
                index,
                x: block.x + (block.width - metrics::text_width(line, size)) / 2.0,
                y,
            })
        })
        .collect()
}

/// Watermark string for a document signed at `signed_at`.
pub fn watermark_text(signed_at: &str, file_name: &str) -> String {
    format!("Signed: {signed_at} | File: {file_name}")
}

/// Start of the watermark baseline: roughly centred on the page by
/// character count, at mid-height.
pub fn watermark_origin(page_width: f32, page_height: f32, text: &str, layout: &StampLayout) -> (f32, f32) {
    let estimate = text.chars().count() as f32 * layout.watermark_font_size / 4.0;
    (page_width / 2.0 - estimate, page_height / 2.0)
}
