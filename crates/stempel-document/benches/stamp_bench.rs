// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the stempel-document stamper.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use image::{DynamicImage, Rgba, RgbaImage};
use printpdf::{Mm, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg};

use stempel_core::types::{ImageArtifact, ImageEncoding, PageSelection};
use stempel_document::{ImageProcessor, SignatureStamper, StampRequest};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

fn blank_pdf(pages: usize) -> Vec<u8> {
    let mut doc = PdfDocument::new("bench");
    doc.with_pages((0..pages).map(|_| PdfPage::new(Mm(210.0), Mm(297.0), Vec::new())).collect());
    let mut warnings: Vec<PdfWarnMsg> = Vec::new();
    doc.save(&PdfSaveOptions::default(), &mut warnings)
}

/// A 640x480 camera-sized still, as the capture flow would store it.
fn camera_still(quality: u8) -> ImageArtifact {
    let frame = RgbaImage::from_fn(640, 480, |x, y| Rgba([(x % 256) as u8, (y % 256) as u8, 128, 255]));
    let bytes = ImageProcessor::from_dynamic(DynamicImage::ImageRgba8(frame))
        .to_jpeg_bytes(quality)
        .unwrap_or_default();
    ImageArtifact::new(bytes, ImageEncoding::Jpeg)
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// Stamp a 3-page document with both stills on every page.
///
/// Image preparation runs inside the loop, matching one click of "generate".
fn bench_stamp_three_pages(c: &mut Criterion) {
    let stamper = SignatureStamper::default();
    let request = StampRequest {
        source: blank_pdf(3),
        file_name: "bench.pdf".into(),
        id_image: Some(camera_still(90)),
        selfie_image: Some(camera_still(80)),
        device_info: None,
        page_selection: PageSelection::All,
        signed_at: "2026-10-17 12:00:00".into(),
    };

    c.bench_function("stamp_document (3 pages, 2 stills)", |b| {
        b.iter(|| {
            let output = stamper.stamp_document(black_box(&request));
            black_box(output.ok());
        });
    });
}

criterion_group!(benches, bench_stamp_three_pages);
criterion_main!(benches);
