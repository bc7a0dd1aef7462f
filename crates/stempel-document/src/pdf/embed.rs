// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image XObjects: turn a captured or uploaded still into data a PDF image
// dictionary can carry.
//
// JPEG passes through untouched under DCTDecode. PNG is decoded and
// re-deflated as raw samples, with a soft mask when it has transparency.
// Anything else is rasterised and re-encoded as JPEG.

use std::io::Write;

use flate2::Compression;
use flate2::write::ZlibEncoder;
use image::ImageFormat;
use lopdf::{Document, ObjectId, Stream, dictionary};
use stempel_core::error::StempelError;
use stempel_core::types::{ImageArtifact, ImageEncoding};
use tracing::{debug, instrument};

use crate::image::ImageProcessor;

#[derive(Debug, Clone)]
enum Samples {
    /// Baseline or progressive JPEG, stored as-is.
    Dct {
        data: Vec<u8>,
        color_space: &'static str,
    },
    /// Zlib-compressed 8-bit RGB, plus an optional compressed alpha plane.
    Flate {
        rgb: Vec<u8>,
        alpha: Option<Vec<u8>>,
    },
}

/// A still image decoded once and ready to be added to any number of pages.
#[derive(Debug, Clone)]
pub struct PreparedImage {
    width: u32,
    height: u32,
    samples: Samples,
}

impl PreparedImage {
    /// Decode `artifact` according to its declared encoding.
    ///
    /// Non-JPEG, non-PNG images are re-encoded as JPEG at `fallback_quality`.
    #[instrument(skip(artifact), fields(bytes = artifact.bytes.len(), mime = artifact.encoding.mime_type()))]
    pub fn from_artifact(artifact: &ImageArtifact, fallback_quality: u8) -> Result<Self, StempelError> {
        let prepared = match &artifact.encoding {
            ImageEncoding::Jpeg => Self::from_jpeg(&artifact.bytes, fallback_quality)?,
            ImageEncoding::Png => Self::from_png(&artifact.bytes)?,
            ImageEncoding::Other(_) => Self::reencoded(ImageProcessor::from_bytes(&artifact.bytes)?, fallback_quality)?,
        };
        debug!(width = prepared.width, height = prepared.height, "Image prepared for embedding");
        Ok(prepared)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    fn from_jpeg(data: &[u8], fallback_quality: u8) -> Result<Self, StempelError> {
        let decoded = image::load_from_memory_with_format(data, ImageFormat::Jpeg)
            .map_err(|err| StempelError::ImageError(format!("invalid JPEG: {}", err)))?;

        let color_space = match jpeg_components(data) {
            Some(1) => "DeviceGray",
            Some(3) => "DeviceRGB",
            // CMYK and friends need Decode arrays; flatten to RGB instead.
            _ => return Self::reencoded(ImageProcessor::from_dynamic(decoded), fallback_quality),
        };
        Ok(Self {
            width: decoded.width(),
            height: decoded.height(),
            samples: Samples::Dct {
                data: data.to_vec(),
                color_space,
            },
        })
    }

    fn from_png(data: &[u8]) -> Result<Self, StempelError> {
        let rgba = image::load_from_memory_with_format(data, ImageFormat::Png)
            .map_err(|err| StempelError::ImageError(format!("invalid PNG: {}", err)))?
            .to_rgba8();
        let (width, height) = rgba.dimensions();

        let mut rgb = Vec::with_capacity((width * height * 3) as usize);
        let mut alpha = Vec::with_capacity((width * height) as usize);
        for pixel in rgba.pixels() {
            rgb.extend_from_slice(&pixel.0[..3]);
            alpha.push(pixel.0[3]);
        }
        let alpha = match alpha.iter().any(|&a| a < u8::MAX) {
            true => Some(deflate(&alpha)?),
            false => None,
        };

        Ok(Self {
            width,
            height,
            samples: Samples::Flate {
                rgb: deflate(&rgb)?,
                alpha,
            },
        })
    }

    fn reencoded(processor: ImageProcessor, quality: u8) -> Result<Self, StempelError> {
        let (width, height) = (processor.width(), processor.height());
        let data = processor.to_jpeg_bytes(quality)?;
        Ok(Self {
            width,
            height,
            samples: Samples::Dct {
                data,
                color_space: "DeviceRGB",
            },
        })
    }

    /// Add the image (and its soft mask, if any) to `doc` as XObjects and
    /// return the image's object id.
    pub fn insert_into(&self, doc: &mut Document) -> ObjectId {
        let (width, height) = (i64::from(self.width), i64::from(self.height));
        let mut dict = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => width,
            "Height" => height,
            "BitsPerComponent" => 8,
        };

        let content = match &self.samples {
            Samples::Dct { data, color_space } => {
                dict.set("ColorSpace", *color_space);
                dict.set("Filter", "DCTDecode");
                data.clone()
            }
            Samples::Flate { rgb, alpha } => {
                dict.set("ColorSpace", "DeviceRGB");
                dict.set("Filter", "FlateDecode");
                if let Some(alpha) = alpha {
                    let mask = doc.add_object(Stream::new(
                        dictionary! {
                            "Type" => "XObject",
                            "Subtype" => "Image",
                            "Width" => width,
                            "Height" => height,
                            "ColorSpace" => "DeviceGray",
                            "BitsPerComponent" => 8,
                            "Filter" => "FlateDecode",
                        },
                        alpha.clone(),
                    ));
                    dict.set("SMask", mask);
                }
                rgb.clone()
            }
        };
        doc.add_object(Stream::new(dict, content))
    }
}

fn deflate(data: &[u8]) -> Result<Vec<u8>, StempelError> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

/// Component count from the first start-of-frame segment of a JPEG stream.
fn jpeg_components(data: &[u8]) -> Option<u8> {
    let mut pos = 2;
    while pos + 4 <= data.len() {
        if data[pos] != 0xFF {
            return None;
        }
        let marker = data[pos + 1];
        if marker == 0xFF {
            pos += 1;
            continue;
        }
        let is_sof = matches!(marker, 0xC0..=0xCF) && !matches!(marker, 0xC4 | 0xC8 | 0xCC);
        if is_sof {
            return data.get(pos + 9).copied();
        }
        let length = usize::from(u16::from_be_bytes([data[pos + 2], data[pos + 3]]));
        pos += 2 + length;
    }
    None
}

#[cfg(test)]
mod tests {
    use image::{DynamicImage, GrayImage, Luma, Rgba, RgbaImage};

    use super::*;

    fn png_bytes(image: DynamicImage) -> Vec<u8> {
        let mut out = Vec::new();
        image
            .write_to(&mut std::io::Cursor::new(&mut out), image::ImageFormat::Png)
            .unwrap();
        out
    }

    #[test]
    fn rgb_jpeg_passes_through() {
        let frame = DynamicImage::ImageRgba8(RgbaImage::from_pixel(40, 30, Rgba([200, 10, 10, 255])));
        let jpeg = ImageProcessor::from_dynamic(frame).to_jpeg_bytes(90).unwrap();
        assert_eq!(jpeg_components(&jpeg), Some(3));

        let prepared = PreparedImage::from_artifact(&ImageArtifact::new(jpeg.clone(), ImageEncoding::Jpeg), 80).unwrap();
        assert_eq!((prepared.width(), prepared.height()), (40, 30));
        match prepared.samples {
            Samples::Dct { data, color_space } => {
                assert_eq!(data, jpeg);
                assert_eq!(color_space, "DeviceRGB");
            }
            other => panic!("expected DCT samples, got {other:?}"),
        }
    }

    #[test]
    fn grayscale_jpeg_keeps_gray_colour_space() {
        let gray = DynamicImage::ImageLuma8(GrayImage::from_pixel(8, 8, Luma([128])));
        let mut jpeg = Vec::new();
        let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut jpeg, 90);
        gray.write_with_encoder(encoder).unwrap();

        let prepared = PreparedImage::from_artifact(&ImageArtifact::new(jpeg, ImageEncoding::Jpeg), 80).unwrap();
        assert!(matches!(prepared.samples, Samples::Dct { color_space: "DeviceGray", .. }));
    }

    #[test]
    fn opaque_png_has_no_mask() {
        let png = png_bytes(DynamicImage::ImageRgba8(RgbaImage::from_pixel(5, 4, Rgba([1, 2, 3, 255]))));
        let prepared = PreparedImage::from_artifact(&ImageArtifact::new(png, ImageEncoding::Png), 80).unwrap();
        assert!(matches!(prepared.samples, Samples::Flate { alpha: None, .. }));
    }

    #[test]
    fn translucent_png_gets_soft_mask() {
        let png = png_bytes(DynamicImage::ImageRgba8(RgbaImage::from_pixel(5, 4, Rgba([1, 2, 3, 128]))));
        let prepared = PreparedImage::from_artifact(&ImageArtifact::new(png, ImageEncoding::Png), 80).unwrap();

        let mut doc = Document::with_version("1.7");
        let id = prepared.insert_into(&mut doc);
        let stream = doc.get_object(id).unwrap().as_stream().unwrap();
        let mask = stream.dict.get(b"SMask").unwrap().as_reference().unwrap();
        let mask_dict = &doc.get_object(mask).unwrap().as_stream().unwrap().dict;
        assert_eq!(mask_dict.get(b"ColorSpace").unwrap().as_name().unwrap(), b"DeviceGray");
        assert_eq!(stream.dict.get(b"Width").unwrap().as_i64().unwrap(), 5);
    }

    #[test]
    fn other_formats_are_reencoded_as_jpeg() {
        let mut bmp = Vec::new();
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(6, 6, Rgba([9, 9, 9, 255])))
            .write_to(&mut std::io::Cursor::new(&mut bmp), ImageFormat::Bmp)
            .unwrap();

        let artifact = ImageArtifact::new(bmp, ImageEncoding::from_mime("image/bmp"));
        let prepared = PreparedImage::from_artifact(&artifact, 80).unwrap();
        match prepared.samples {
            Samples::Dct { data, .. } => assert_eq!(&data[..2], &[0xFF, 0xD8]),
            other => panic!("expected DCT samples, got {other:?}"),
        }
    }

    #[test]
    fn mislabelled_or_corrupt_bytes_fail() {
        let corrupt = ImageArtifact::new(b"\xFF\xD8garbage".to_vec(), ImageEncoding::Jpeg);
        assert!(matches!(PreparedImage::from_artifact(&corrupt, 80), Err(StempelError::ImageError(_))));

        let png = png_bytes(DynamicImage::ImageRgba8(RgbaImage::new(2, 2)));
        let mislabelled = ImageArtifact::new(png, ImageEncoding::Jpeg);
        assert!(PreparedImage::from_artifact(&mislabelled, 80).is_err());
    }
}
