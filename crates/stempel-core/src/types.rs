// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Stempel signing wizard.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Result, StempelError};

/// MIME type of every PDF the wizard accepts and produces.
pub const PDF_MIME: &str = "application/pdf";

/// Prefix of the output file name.
pub const SIGNED_PREFIX: &str = "signed_";

/// Unique identifier for one wizard run, used to correlate log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Infer a declared MIME type from a file extension.
///
/// Desktop file pickers hand back paths, not content types, so the
/// extension stands in for the browser's `File.type`.
pub fn mime_for_extension(ext: &str) -> Option<&'static str> {
    match ext.to_ascii_lowercase().as_str() {
        "pdf" => Some(PDF_MIME),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "bmp" => Some("image/bmp"),
        "tif" | "tiff" => Some("image/tiff"),
        "txt" => Some("text/plain"),
        _ => None,
    }
}

/// The source document chosen in step 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfUpload {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl PdfUpload {
    /// Accept an uploaded file only if its declared type is PDF.
    pub fn from_upload(name: impl Into<String>, mime_type: &str, bytes: Vec<u8>) -> Result<Self> {
        let name = name.into();
        if mime_type != PDF_MIME {
            return Err(StempelError::InvalidInput(format!(
                "{name} is {mime_type}, not a PDF"
            )));
        }
        if bytes.is_empty() {
            return Err(StempelError::InvalidInput(format!("{name} is empty")));
        }
        Ok(Self { name, bytes })
    }

    /// Size in bytes.
    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// Size in megabytes with two decimals, as shown in the upload summary.
    pub fn size_label(&self) -> String {
        format!("{:.2} MB", self.bytes.len() as f64 / 1024.0 / 1024.0)
    }
}

/// Encoding of a still image, derived from its declared MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageEncoding {
    Jpeg,
    Png,
    /// Anything else that still declares an `image/` type.
    Other(String),
}

impl ImageEncoding {
    pub fn from_mime(mime_type: &str) -> Self {
        match mime_type.to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/jpg" => Self::Jpeg,
            "image/png" => Self::Png,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn mime_type(&self) -> &str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Other(mime) => mime,
        }
    }
}

/// An encoded still image held in memory (ID document or selfie).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageArtifact {
    pub bytes: Vec<u8>,
    pub encoding: ImageEncoding,
}

impl ImageArtifact {
    pub fn new(bytes: Vec<u8>, encoding: ImageEncoding) -> Self {
        Self { bytes, encoding }
    }

    /// Accept an uploaded image only if its declared type is an image type.
    pub fn from_upload(bytes: Vec<u8>, mime_type: &str) -> Result<Self> {
        if !mime_type.to_ascii_lowercase().starts_with("image/") {
            return Err(StempelError::InvalidInput(format!(
                "{mime_type} is not an image type"
            )));
        }
        if bytes.is_empty() {
            return Err(StempelError::InvalidInput("image file is empty".into()));
        }
        Ok(Self::new(bytes, ImageEncoding::from_mime(mime_type)))
    }
}

/// Which of the two capture flows an image belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CaptureKind {
    IdDocument,
    Selfie,
}

impl CaptureKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::IdDocument => "ID document",
            Self::Selfie => "selfie",
        }
    }
}

/// Device fingerprint and descriptive metadata.
///
/// `ip_address` is filled in after the rest of the record and may be absent
/// while that lookup is still running.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    pub device_id: String,
    pub device_type: String,
    pub user_agent: String,
    pub platform: String,
    pub language: String,
    pub timezone: String,
    pub screen_resolution: String,
    pub ip_address: Option<String>,
    pub timestamp: String,
}

/// Raw environment readings the device fingerprint is derived from.
///
/// Every field is optional; a missing reading becomes `"Unknown"` in the
/// derived record rather than an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentSignals {
    /// Output of rendering a fixed probe string on this device.
    pub canvas_signature: Option<String>,
    pub user_agent: Option<String>,
    pub platform: Option<String>,
    pub language: Option<String>,
    pub timezone: Option<String>,
    pub screen_width: Option<u32>,
    pub screen_height: Option<u32>,
}

/// Which pages receive the three attestation blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PageSelection {
    #[default]
    All,
    LastOnly,
}

impl PageSelection {
    /// 0-based indices of the selected pages out of `page_count`.
    pub fn page_indices(&self, page_count: usize) -> Vec<usize> {
        match self {
            Self::All => (0..page_count).collect(),
            Self::LastOnly => page_count.checked_sub(1).into_iter().collect(),
        }
    }
}

/// The generated output handed to the user for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedDocument {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

impl SignedDocument {
    pub fn new(original_name: &str, bytes: Vec<u8>) -> Self {
        Self {
            file_name: format!("{SIGNED_PREFIX}{original_name}"),
            content_type: PDF_MIME,
            bytes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_pdf_upload_is_rejected() {
        let err = PdfUpload::from_upload("notes.txt", "text/plain", b"hello".to_vec()).unwrap_err();
        assert!(matches!(err, StempelError::InvalidInput(_)));
    }

    #[test]
    fn pdf_size_label_uses_megabytes() {
        let upload = PdfUpload::from_upload("a.pdf", PDF_MIME, vec![0u8; 1_572_864]).unwrap();
        assert_eq!(upload.size_label(), "1.50 MB");
    }

    #[test]
    fn image_upload_requires_image_category() {
        assert!(ImageArtifact::from_upload(vec![1, 2, 3], "application/pdf").is_err());
        let artifact = ImageArtifact::from_upload(vec![1, 2, 3], "image/webp").unwrap();
        assert_eq!(artifact.encoding, ImageEncoding::Other("image/webp".into()));
        let jpeg = ImageArtifact::from_upload(vec![1], "image/JPG").unwrap();
        assert_eq!(jpeg.encoding, ImageEncoding::Jpeg);
    }

    #[test]
    fn signed_name_is_prefixed_original() {
        for name in ["contract.pdf", "signed_x.pdf", "weird name (1).PDF", ""] {
            let doc = SignedDocument::new(name, vec![1, 2, 3]);
            assert_eq!(doc.file_name, format!("signed_{name}"));
            assert_eq!(doc.content_type, "application/pdf");
        }
    }

    #[test]
    fn page_selection_indices() {
        assert_eq!(PageSelection::All.page_indices(3), vec![0, 1, 2]);
        assert_eq!(PageSelection::LastOnly.page_indices(3), vec![2]);
        assert!(PageSelection::LastOnly.page_indices(0).is_empty());
    }

    #[test]
    fn extension_lookup_is_case_insensitive() {
        assert_eq!(mime_for_extension("PDF"), Some(PDF_MIME));
        assert_eq!(mime_for_extension("jpeg"), Some("image/jpeg"));
        assert_eq!(mime_for_extension("docx"), None);
    }
}
