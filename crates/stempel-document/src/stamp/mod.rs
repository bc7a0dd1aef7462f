// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Signature stamper: watermark every page of a PDF and draw the ID, selfie
// and device-verification blocks on the selected pages.

pub mod layout;

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, ObjectId, StringFormat, dictionary};
use stempel_core::config::StampLayout;
use stempel_core::error::StempelError;
use stempel_core::types::{CaptureKind, DeviceInfo, ImageArtifact, PageSelection};
use tracing::{debug, info, instrument, warn};

pub use layout::{
    BlockFrame, BlockKind, Frame, PlacedLine, block_frames, device_line_positions, device_lines,
    fit_image, watermark_origin, watermark_text,
};

use crate::pdf::embed::PreparedImage;
use crate::pdf::metrics;
use crate::pdf::page::{self, ResourceKind};

/// Everything one stamping run needs. The source bytes are only read.
#[derive(Debug, Clone)]
pub struct StampRequest {
    pub source: Vec<u8>,
    /// Original file name, shown in the watermark.
    pub file_name: String,
    pub id_image: Option<ImageArtifact>,
    pub selfie_image: Option<ImageArtifact>,
    pub device_info: Option<DeviceInfo>,
    pub page_selection: PageSelection,
    /// Signing time as printed in the watermark.
    pub signed_at: String,
}

/// An image added to the document once, drawn on every target page.
#[derive(Debug, Clone, Copy)]
struct EmbeddedImage {
    object: ObjectId,
    width: u32,
    height: u32,
}

/// Object ids shared by every page of one run.
struct SharedObjects {
    font: ObjectId,
    watermark_state: ObjectId,
    id_image: Option<EmbeddedImage>,
    selfie_image: Option<EmbeddedImage>,
}

/// Stamps PDFs according to a [`StampLayout`].
#[derive(Debug, Clone, Default)]
pub struct SignatureStamper {
    layout: StampLayout,
}

impl SignatureStamper {
    pub fn new(layout: StampLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &StampLayout {
        &self.layout
    }

    // -- Images ---------------------------------------------------------------

    /// Decode an image artifact into embeddable form.
    pub fn prepare_image(&self, artifact: &ImageArtifact) -> Result<PreparedImage, StempelError> {
        PreparedImage::from_artifact(artifact, self.layout.fallback_jpeg_quality)
    }

    /// Like [`prepare_image`](Self::prepare_image), but a failure is logged and
    /// yields `None` so the block is left empty instead of aborting the run.
    pub fn prepare_or_skip(&self, artifact: Option<&ImageArtifact>, kind: CaptureKind) -> Option<PreparedImage> {
        let artifact = artifact?;
        match self.prepare_image(artifact) {
            Ok(prepared) => Some(prepared),
            Err(err) => {
                warn!(image = kind.label(), error = %err, "Image not embeddable, block left empty");
                None
            }
        }
    }

    // -- Stamping -------------------------------------------------------------

    /// Prepare both images, then stamp.
    pub fn stamp_document(&self, request: &StampRequest) -> Result<Vec<u8>, StempelError> {
        let id_image = self.prepare_or_skip(request.id_image.as_ref(), CaptureKind::IdDocument);
        let selfie_image = self.prepare_or_skip(request.selfie_image.as_ref(), CaptureKind::Selfie);
        self.stamp(request, id_image, selfie_image)
    }

    /// Stamp `request.source` with already-prepared images and return the new
    /// document's bytes.
    ///
    /// Every page gets the watermark. Pages picked by the request's page
    /// selection also get the block row; a missing image leaves its block
    /// with border and title only. Parse and serialisation errors abort the
    /// whole run.
    #[instrument(skip_all, fields(file = %request.file_name, bytes = request.source.len(), selection = ?request.page_selection))]
    pub fn stamp(
        &self,
        request: &StampRequest,
        id_image: Option<PreparedImage>,
        selfie_image: Option<PreparedImage>,
    ) -> Result<Vec<u8>, StempelError> {
        let mut doc = Document::load_mem(&request.source).map_err(|err| {
            StempelError::PdfError(format!("failed to load PDF: {}", err))
        })?;
        let pages: Vec<ObjectId> = doc.get_pages().into_values().collect();
        if pages.is_empty() {
            return Err(StempelError::PdfError("document has no pages".into()));
        }

        let shared = SharedObjects {
            font: doc.add_object(dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => "Helvetica",
                "Encoding" => "WinAnsiEncoding",
            }),
            watermark_state: doc.add_object(dictionary! {
                "Type" => "ExtGState",
                "ca" => Object::Real(self.layout.watermark_opacity),
                "CA" => Object::Real(self.layout.watermark_opacity),
            }),
            id_image: id_image.as_ref().map(|img| embed(&mut doc, img)),
            selfie_image: selfie_image.as_ref().map(|img| embed(&mut doc, img)),
        };

        let watermark = watermark_text(&request.signed_at, &request.file_name);
        let targets = request.page_selection.page_indices(pages.len());

        for (index, &page_id) in pages.iter().enumerate() {
            let (width, height) = page::page_size(&doc, page_id);
            let font = page::register_resource(&mut doc, page_id, ResourceKind::Font, shared.font)?;
            let state = page::register_resource(&mut doc, page_id, ResourceKind::ExtGState, shared.watermark_state)?;

            let mut operations = self.watermark_operations(&watermark, width, height, &font, &state);
            if targets.contains(&index) {
                let blocks = self.block_operations(&mut doc, page_id, width, &font, &shared, request.device_info.as_ref())?;
                operations.extend(blocks);
            }

            let content = Content { operations }.encode().map_err(|err| {
                StempelError::PdfError(format!("failed to encode page content: {}", err))
            })?;
            page::append_content(&mut doc, page_id, content)?;
            debug!(page = index + 1, width, height, blocks = targets.contains(&index), "Page stamped");
        }

        let mut output = Vec::new();
        doc.save_to(&mut output).map_err(|err| {
            StempelError::PdfError(format!("failed to serialise PDF: {}", err))
        })?;

        info!(
            pages = pages.len(),
            stamped_pages = targets.len(),
            id_image = shared.id_image.is_some(),
            selfie_image = shared.selfie_image.is_some(),
            output_bytes = output.len(),
            "Document stamped"
        );
        Ok(output)
    }

    // -- Content --------------------------------------------------------------

    fn watermark_operations(&self, text: &str, width: f32, height: f32, font: &[u8], state: &[u8]) -> Vec<Operation> {
        let layout = &self.layout;
        let (x, y) = watermark_origin(width, height, text, layout);
        let radians = layout.watermark_rotation_degrees.to_radians();
        let (sin, cos) = radians.sin_cos();
        let gray = layout.watermark_gray;

        vec![
            Operation::new("q", vec![]),
            Operation::new("gs", vec![name(state)]),
            Operation::new("rg", vec![real(gray), real(gray), real(gray)]),
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec![name(font), real(layout.watermark_font_size)]),
            Operation::new("Tm", vec![real(cos), real(sin), real(-sin), real(cos), real(x), real(y)]),
            Operation::new("Tj", vec![literal(text)]),
            Operation::new("ET", vec![]),
            Operation::new("Q", vec![]),
        ]
    }

    fn block_operations(
        &self,
        doc: &mut Document,
        page_id: ObjectId,
        page_width: f32,
        font: &[u8],
        shared: &SharedObjects,
        device_info: Option<&DeviceInfo>,
    ) -> Result<Vec<Operation>, StempelError> {
        let layout = &self.layout;
        let mut ops = Vec::new();

        for block in block_frames(page_width, layout) {
            ops.extend(self.title_operations(&block, font));
            ops.extend(self.border_operations(&block.frame));

            match block.kind {
                BlockKind::IdDocument | BlockKind::Selfie => {
                    let image = match block.kind {
                        BlockKind::IdDocument => shared.id_image,
                        _ => shared.selfie_image,
                    };
                    if let Some(image) = image {
                        let xobject = page::register_resource(doc, page_id, ResourceKind::XObject, image.object)?;
                        let placed = fit_image(image.width, image.height, &block.frame, layout);
                        ops.extend([
                            Operation::new("q", vec![]),
                            Operation::new(
                                "cm",
                                vec![real(placed.width), real(0.0), real(0.0), real(placed.height), real(placed.x), real(placed.y)],
                            ),
                            Operation::new("Do", vec![name(&xobject)]),
                            Operation::new("Q", vec![]),
                        ]);
                    }
                }
                BlockKind::DeviceVerification => {
                    let lines = device_lines(device_info);
                    ops.extend(self.device_text_operations(&block.frame, &lines, font));
                }
            }
        }
        Ok(ops)
    }

    fn title_operations(&self, block: &BlockFrame, font: &[u8]) -> Vec<Operation> {
        let gray = self.layout.text_gray;
        vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec![name(font), real(self.layout.title_font_size)]),
            Operation::new("rg", vec![real(gray), real(gray), real(gray)]),
            Operation::new("Td", vec![real(block.title_x), real(block.title_y)]),
            Operation::new("Tj", vec![literal(block.kind.title())]),
            Operation::new("ET", vec![]),
        ]
    }

    fn border_operations(&self, frame: &Frame) -> Vec<Operation> {
        let layout = &self.layout;
        let gray = layout.border_gray;
        let [on, off] = layout.dash;
        vec![
            Operation::new("q", vec![]),
            Operation::new("RG", vec![real(gray), real(gray), real(gray)]),
            Operation::new("w", vec![real(layout.border_width)]),
            Operation::new("d", vec![Object::Array(vec![real(on), real(off)]), Object::Integer(0)]),
            Operation::new("re", vec![real(frame.x), real(frame.y), real(frame.width), real(frame.height)]),
            Operation::new("S", vec![]),
            Operation::new("Q", vec![]),
        ]
    }

    fn device_text_operations(&self, frame: &Frame, lines: &[String], font: &[u8]) -> Vec<Operation> {
        let layout = &self.layout;
        let placed = device_line_positions(frame, lines, layout);
        if placed.is_empty() {
            return Vec::new();
        }

        let gray = layout.text_gray;
        let mut ops = vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec![name(font), real(layout.content_font_size)]),
            Operation::new("rg", vec![real(gray), real(gray), real(gray)]),
        ];
        for line in placed {
            ops.push(Operation::new(
                "Tm",
                vec![real(1.0), real(0.0), real(0.0), real(1.0), real(line.x), real(line.y)],
            ));
            ops.push(Operation::new("Tj", vec![literal(&lines[line.index])]));
        }
        ops.push(Operation::new("ET", vec![]));
        ops
    }
}

fn embed(doc: &mut Document, image: &PreparedImage) -> EmbeddedImage {
    EmbeddedImage {
        object: image.insert_into(doc),
        width: image.width(),
        height: image.height(),
    }
}

fn real(value: f32) -> Object {
    Object::Real(value)
}

fn name(value: &[u8]) -> Object {
    Object::Name(value.to_vec())
}

fn literal(text: &str) -> Object {
    Object::String(metrics::encode_win_ansi(text), StringFormat::Literal)
}
