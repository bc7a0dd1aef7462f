// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Central service layer: owns the platform bridge and configuration and
// provides async-friendly methods for the Dioxus UI to call.
//
// Image preparation and stamping are CPU-bound, so they run on tokio's
// blocking pool and the UI stays responsive while a document is generated.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Local};
use stempel_bridge::PlatformBridge;
use stempel_core::error::{Result, StempelError};
use stempel_core::types::{CaptureKind, DeviceInfo, ImageArtifact, PageSelection, SignedDocument};
use stempel_core::{AppConfig, WizardSession};
use stempel_document::{PreparedImage, SignatureStamper, StampRequest};
use stempel_security::fingerprint::TIMESTAMP_FORMAT;
use tracing::{debug, error, info, warn};

use super::capture::{CaptureController, CaptureSettings};
use super::data_dir;
use super::device;

/// Set to `1` to use the test-pattern camera regardless of `config.json`.
pub const SYNTHETIC_CAMERA_ENV: &str = "STEMPEL_SYNTHETIC_CAMERA";

/// Shared application services accessible from all Dioxus components via
/// `use_context::<AppServices>()`.
///
/// All fields are cheaply cloneable (Arc-wrapped) so that the struct can be
/// passed into closures and async blocks without lifetime issues.
#[derive(Clone)]
pub struct AppServices {
    bridge: Arc<dyn PlatformBridge>,
    data_dir: PathBuf,
    config: Arc<Mutex<AppConfig>>,
}

impl AppServices {
    /// Initialise all services. Call once at app startup.
    pub fn init() -> Self {
        Self::with_data_dir(data_dir::data_dir())
    }

    /// Initialise against an explicit data directory.
    ///
    /// A missing or unreadable `config.json` falls back to defaults.
    pub fn with_data_dir(dir: PathBuf) -> Self {
        info!(path = %dir.display(), "initialising app services");

        let mut config = load_config(&dir).unwrap_or_default();
        if std::env::var(SYNTHETIC_CAMERA_ENV).is_ok_and(|v| v == "1") {
            config.synthetic_camera = true;
        }

        let bridge: Arc<dyn PlatformBridge> =
            Arc::from(stempel_bridge::platform_bridge(config.synthetic_camera));
        info!(platform = bridge.platform_name(), "app services initialised");

        Self {
            bridge,
            data_dir: dir,
            config: Arc::new(Mutex::new(config)),
        }
    }

    // -- Device --------------------------------------------------------------

    /// Device record without the IP address. `screen` is the monitor size
    /// in physical pixels, when the window knows it.
    pub fn device_info(&self, screen: Option<(u32, u32)>) -> DeviceInfo {
        device::collect_device_info(self.bridge.as_ref(), screen)
    }

    /// Best-effort local address, filled into the device record later.
    pub async fn resolve_ip_address(&self) -> String {
        device::resolve_ip_address().await
    }

    // -- Capture -------------------------------------------------------------

    /// A fresh controller for one acquisition flow, using the current camera
    /// settings.
    pub fn capture_controller(&self, kind: CaptureKind) -> CaptureController {
        let settings = CaptureSettings::for_kind(kind, &self.config().camera);
        CaptureController::new(Arc::clone(&self.bridge), settings)
    }

    // -- Signing -------------------------------------------------------------

    /// Stamp the request's document.
    ///
    /// Both images are prepared concurrently; either may fail on its own and
    /// only leaves its block empty. Layout starts once both have finished.
    /// A source that cannot be parsed or saved fails the whole run with
    /// `GenerationFailed`.
    pub async fn generate_signed_pdf(&self, request: StampRequest) -> Result<SignedDocument> {
        let stamper = SignatureStamper::new(self.config().layout);
        info!(
            file = %request.file_name,
            bytes = request.source.len(),
            selection = ?request.page_selection,
            "generating signed PDF"
        );

        let (id_image, selfie_image) = tokio::join!(
            prepare_in_background(&stamper, request.id_image.clone(), CaptureKind::IdDocument),
            prepare_in_background(&stamper, request.selfie_image.clone(), CaptureKind::Selfie),
        );

        let file_name = request.file_name.clone();
        let stamped = tokio::task::spawn_blocking(move || {
            stamper.stamp(&request, id_image, selfie_image)
        })
        .await
        .map_err(|e| StempelError::GenerationFailed(format!("stamping task failed: {e}")))?;

        let bytes = stamped.map_err(|e| {
            error!(file = %file_name, error = %e, "PDF generation failed");
            match e {
                StempelError::PdfError(detail) => StempelError::GenerationFailed(detail),
                other => other,
            }
        })?;

        let doc = SignedDocument::new(&file_name, bytes);
        info!(name = %doc.file_name, bytes = doc.bytes.len(), "signed PDF generated");
        Ok(doc)
    }

    /// Write the signed document where the user chose to save it.
    pub fn save_signed_pdf(&self, doc: &SignedDocument, path: &Path) -> Result<()> {
        std::fs::write(path, &doc.bytes)?;
        info!(path = %path.display(), bytes = doc.bytes.len(), "signed PDF saved");
        Ok(())
    }

    // -- Config --------------------------------------------------------------

    /// Get a snapshot of the current config.
    pub fn config(&self) -> AppConfig {
        self.config.lock().expect("config lock poisoned").clone()
    }

    /// Make `selection` the preselected choice for future sessions.
    pub fn remember_page_selection(&self, selection: PageSelection) -> Result<()> {
        let mut config = self.config();
        if config.default_page_selection == selection {
            return Ok(());
        }
        config.default_page_selection = selection;
        self.save_config(&config)?;
        debug!(?selection, "default page selection updated");
        Ok(())
    }

    /// Update and persist the config.
    fn save_config(&self, config: &AppConfig) -> Result<()> {
        persist_config(&self.data_dir, config)?;
        *self.config.lock().expect("config lock poisoned") = config.clone();
        Ok(())
    }
}

/// Collect everything stamping needs from a complete session.
///
/// `now` becomes the signing time printed in the watermark.
pub fn signing_request(session: &WizardSession, now: DateTime<Local>) -> Result<StampRequest> {
    session.validate_all()?;
    let pdf = session
        .pdf()
        .ok_or(StempelError::IncompleteSession("PDF document"))?;

    Ok(StampRequest {
        source: pdf.bytes.clone(),
        file_name: pdf.name.clone(),
        id_image: session.id_image().cloned(),
        selfie_image: session.selfie_image().cloned(),
        device_info: session.device_info().cloned(),
        page_selection: session.page_selection(),
        signed_at: now.format(TIMESTAMP_FORMAT).to_string(),
    })
}

async fn prepare_in_background(
    stamper: &SignatureStamper,
    artifact: Option<ImageArtifact>,
    kind: CaptureKind,
) -> Option<PreparedImage> {
    let artifact = artifact?;
    let stamper = stamper.clone();
    tokio::task::spawn_blocking(move || stamper.prepare_or_skip(Some(&artifact), kind))
        .await
        .unwrap_or_else(|e| {
            warn!(image = kind.label(), error = %e, "image preparation task failed");
            None
        })
}

// -- Config persistence (JSON file) -------------------------------------------

const CONFIG_FILE: &str = "config.json";

fn load_config(data_dir: &Path) -> Option<AppConfig> {
    let path = data_dir.join(CONFIG_FILE);
    let data = std::fs::read_to_string(&path).ok()?;
    match serde_json::from_str(&data) {
        Ok(config) => Some(config),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "ignoring unreadable config");
            None
        }
    }
}

fn persist_config(data_dir: &Path, config: &AppConfig) -> Result<()> {
    let path = data_dir.join(CONFIG_FILE);
    let json = serde_json::to_string_pretty(config)?;
    std::fs::write(&path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use chrono::TimeZone;
    use image::{DynamicImage, Rgb, RgbImage};
    use lopdf::content::Content;
    use lopdf::{Document, Object, Stream, dictionary};
    use stempel_core::types::{ImageEncoding, PdfUpload, PDF_MIME};

    use super::*;

    fn blank_pdf(pages: usize) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let mut kids = Vec::new();
        for _ in 0..pages {
            let content = Content { operations: vec![] };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(Object::Reference(page_id));
        }
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Count" => Object::Integer(pages as i64),
                "Kids" => kids,
                "MediaBox" => vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(595),
                    Object::Integer(842),
                ],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut out = Vec::new();
        doc.save_to(&mut out).unwrap();
        out
    }

    fn png_artifact() -> ImageArtifact {
        let mut bytes = Vec::new();
        DynamicImage::ImageRgb8(RgbImage::from_pixel(40, 30, Rgb([10, 120, 60])))
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        ImageArtifact::new(bytes, ImageEncoding::Png)
    }

    fn complete_session(source: Vec<u8>) -> WizardSession {
        let mut session = WizardSession::new(PageSelection::All);
        session.set_pdf(PdfUpload::from_upload("contract.pdf", PDF_MIME, source).unwrap());
        session.set_id_image(png_artifact());
        session.set_selfie_image(png_artifact());
        session.set_device_info(DeviceInfo {
            device_id: "0123456789ab".into(),
            device_type: "Linux PC".into(),
            user_agent: "test".into(),
            platform: "linux".into(),
            language: "en".into(),
            timezone: "UTC".into(),
            screen_resolution: "1920x1080".into(),
            ip_address: Some("10.0.0.7".into()),
            timestamp: "2026-10-17 12:00:00".into(),
        });
        session
    }

    fn now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 10, 17, 12, 30, 0).unwrap()
    }

    #[test]
    fn config_persists_across_restarts() {
        let dir = tempfile::tempdir().unwrap();
        let svc = AppServices::with_data_dir(dir.path().to_path_buf());

        let mut config = svc.config();
        config.default_page_selection = PageSelection::LastOnly;
        config.layout.margin = 36.0;
        svc.save_config(&config).unwrap();

        let reloaded = AppServices::with_data_dir(dir.path().to_path_buf());
        assert_eq!(reloaded.config().default_page_selection, PageSelection::LastOnly);
        assert_eq!(reloaded.config().layout.margin, 36.0);
    }

    #[test]
    fn remembered_page_selection_preselects_next_session() {
        let dir = tempfile::tempdir().unwrap();
        let svc = AppServices::with_data_dir(dir.path().to_path_buf());
        assert_eq!(svc.config().default_page_selection, PageSelection::All);

        svc.remember_page_selection(PageSelection::LastOnly).unwrap();
        assert_eq!(svc.config().default_page_selection, PageSelection::LastOnly);

        let reloaded = AppServices::with_data_dir(dir.path().to_path_buf());
        assert_eq!(reloaded.config().default_page_selection, PageSelection::LastOnly);
    }

    #[test]
    fn stub_bridge_without_camera_reports_platform_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let svc = AppServices::with_data_dir(dir.path().to_path_buf());
        if svc.config().synthetic_camera {
            return;
        }
        let mut selfie = svc.capture_controller(CaptureKind::Selfie);
        assert!(matches!(selfie.start_camera(), Err(StempelError::PlatformUnavailable)));
        assert!(!selfie.is_streaming());
    }

    #[test]
    fn corrupt_config_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "{ not json").unwrap();
        let svc = AppServices::with_data_dir(dir.path().to_path_buf());
        assert_eq!(svc.config().layout, AppConfig::default().layout);
    }

    #[test]
    fn request_requires_complete_session() {
        let session = WizardSession::new(PageSelection::All);
        assert!(matches!(
            signing_request(&session, now()),
            Err(StempelError::IncompleteSession(_))
        ));
    }

    #[test]
    fn request_carries_session_artifacts() {
        let session = complete_session(blank_pdf(1));
        let request = signing_request(&session, now()).unwrap();
        assert_eq!(request.file_name, "contract.pdf");
        assert_eq!(request.signed_at, "2026-10-17 12:30:00");
        assert!(request.id_image.is_some());
        assert!(request.selfie_image.is_some());
        assert_eq!(request.page_selection, PageSelection::All);
    }

    #[tokio::test]
    async fn generates_prefixed_pdf_with_a_broken_image() {
        let dir = tempfile::tempdir().unwrap();
        let svc = AppServices::with_data_dir(dir.path().to_path_buf());

        let mut session = complete_session(blank_pdf(2));
        session.set_id_image(ImageArtifact::new(vec![0xFF, 0xD8, 0xFF, 0x00], ImageEncoding::Jpeg));
        let request = signing_request(&session, now()).unwrap();

        let doc = svc.generate_signed_pdf(request).await.unwrap();
        assert_eq!(doc.file_name, "signed_contract.pdf");
        assert_eq!(doc.content_type, "application/pdf");
        assert!(doc.bytes.starts_with(b"%PDF"));
        assert_eq!(Document::load_mem(&doc.bytes).unwrap().get_pages().len(), 2);

        let target = dir.path().join(&doc.file_name);
        svc.save_signed_pdf(&doc, &target).unwrap();
        assert_eq!(std::fs::read(&target).unwrap(), doc.bytes);
    }

    #[tokio::test]
    async fn unparsable_source_is_a_generation_failure() {
        let dir = tempfile::tempdir().unwrap();
        let svc = AppServices::with_data_dir(dir.path().to_path_buf());

        let session = complete_session(b"this is not a PDF".to_vec());
        let request = signing_request(&session, now()).unwrap();
        let err = svc.generate_signed_pdf(request).await.unwrap_err();
        assert!(matches!(err, StempelError::GenerationFailed(_)));
    }
}
