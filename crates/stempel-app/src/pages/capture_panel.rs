// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Camera-or-upload panel shared by the ID and selfie steps.
//
// The controller owns the stream; the session owns the stored artifact, so
// the wizard's completion predicates see every capture, retake and upload.

use std::time::Duration;

use dioxus::prelude::*;

use stempel_core::human_errors::{HumanError, humanize_error};
use stempel_core::types::{CaptureKind, ImageArtifact};

use crate::pages::ErrorNotice;
use crate::services::preview;
use crate::state::{AppState, Captures};

/// Interval between live preview frames.
const PREVIEW_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Scan,
    Upload,
}

/// Button labels and messages for one flow.
struct Wording {
    start: &'static str,
    capture: &'static str,
    retake: &'static str,
    captured: &'static str,
    uploaded: &'static str,
}

fn wording(kind: CaptureKind) -> Wording {
    match kind {
        CaptureKind::IdDocument => Wording {
            start: "\u{1F4F7} Start ID Camera",
            capture: "\u{1F4F8} Capture ID",
            retake: "\u{1F504} Retake ID Photo",
            captured: "ID Document captured successfully",
            uploaded: "ID Document uploaded successfully",
        },
        CaptureKind::Selfie => Wording {
            start: "\u{1F4F7} Start Camera",
            capture: "\u{1F4F8} Capture Photo",
            retake: "\u{1F504} Retake Photo",
            captured: "Selfie captured successfully",
            uploaded: "Selfie uploaded successfully",
        },
    }
}

fn stored(state: &AppState, kind: CaptureKind) -> Option<&ImageArtifact> {
    match kind {
        CaptureKind::IdDocument => state.session.id_image(),
        CaptureKind::Selfie => state.session.selfie_image(),
    }
}

fn store(state: &mut AppState, kind: CaptureKind, artifact: ImageArtifact) {
    match kind {
        CaptureKind::IdDocument => state.session.set_id_image(artifact),
        CaptureKind::Selfie => state.session.set_selfie_image(artifact),
    }
}

fn discard(state: &mut AppState, kind: CaptureKind) {
    match kind {
        CaptureKind::IdDocument => state.session.clear_id_image(),
        CaptureKind::Selfie => state.session.clear_selfie_image(),
    }
}

/// `always_offer_upload` shows the Scan/Upload toggle. Without it, upload
/// is offered only after the camera could not be opened.
#[component]
pub fn CapturePanel(kind: CaptureKind, always_offer_upload: bool) -> Element {
    let mut state = use_context::<Signal<AppState>>();
    let captures = use_context::<Captures>();
    let mut controller = captures.get(kind);

    let mut mode = use_signal(|| Mode::Scan);
    let mut frame_url = use_signal(|| Option::<String>::None);
    let mut error = use_signal(|| Option::<HumanError>::None);
    let mut last_was_upload = use_signal(|| false);
    let text = wording(kind);

    // Live preview while the camera runs
    let _preview = use_resource(move || async move {
        loop {
            tokio::time::sleep(PREVIEW_INTERVAL).await;
            if !controller.peek().is_streaming() {
                continue;
            }
            let frame = controller.write().preview_frame();
            match frame.and_then(preview::frame_data_url) {
                Ok(url) => frame_url.set(Some(url)),
                Err(e) => tracing::debug!(error = %e, "preview frame dropped"),
            }
        }
    });

    let streaming = controller.read().is_streaming();
    let stored_url = stored(&state.read(), kind).map(preview::artifact_data_url);
    let upload_visible = *mode.read() == Mode::Upload
        || (!always_offer_upload && error.read().is_some() && !streaming);

    let mut start = move || {
        frame_url.set(None);
        let result = controller.write().start_camera();
        match result {
            Ok(()) => {
                error.set(None);
                discard(&mut state.write(), kind);
            }
            Err(e) => error.set(Some(humanize_error(&e))),
        }
    };

    rsx! {
        if always_offer_upload {
            div { style: "display: flex; gap: 8px; margin: 16px 0;",
                button {
                    style: if *mode.read() == Mode::Scan { TOGGLE_ACTIVE } else { TOGGLE_IDLE },
                    onclick: move |_| mode.set(Mode::Scan),
                    "\u{1F4F7} Scan"
                }
                button {
                    style: if *mode.read() == Mode::Upload { TOGGLE_ACTIVE } else { TOGGLE_IDLE },
                    onclick: move |_| {
                        controller.write().stop();
                        frame_url.set(None);
                        mode.set(Mode::Upload);
                    },
                    "\u{1F4C1} Upload"
                }
            }
        }

        if *mode.read() == Mode::Scan {
            div { style: "text-align: center; margin: 16px 0;",
                if streaming {
                    if let Some(ref url) = *frame_url.read() {
                        img { src: "{url}", style: "max-width: 100%; max-height: 360px; border-radius: 10px; background: #000;" }
                    } else {
                        p { style: "color: #888;", "Waiting for camera..." }
                    }
                    button {
                        style: PRIMARY,
                        onclick: move |_| {
                            let result = controller.write().capture_photo(chrono::Local::now());
                            frame_url.set(None);
                            match result {
                                Ok(artifact) => {
                                    error.set(None);
                                    last_was_upload.set(false);
                                    store(&mut state.write(), kind, artifact);
                                }
                                Err(e) => error.set(Some(humanize_error(&e))),
                            }
                        },
                        "{text.capture}"
                    }
                } else if stored_url.is_some() && !*last_was_upload.read() {
                    button {
                        style: SECONDARY,
                        onclick: move |_| {
                            frame_url.set(None);
                            let result = controller.write().retake();
                            discard(&mut state.write(), kind);
                            match result {
                                Ok(()) => error.set(None),
                                Err(e) => error.set(Some(humanize_error(&e))),
                            }
                        },
                        "{text.retake}"
                    }
                } else {
                    button {
                        style: PRIMARY,
                        onclick: move |_| start(),
                        "{text.start}"
                    }
                }
            }
        }

        if upload_visible {
            button {
                style: "width: 100%; padding: 16px; border-radius: 12px; border: 2px dashed #007aff; color: #007aff; background: white; font-size: 16px; margin: 16px 0;",
                onclick: move |_| {
                    #[cfg(not(any(target_os = "ios", target_os = "android")))]
                    {
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("Images", &["jpg", "jpeg", "png", "gif", "webp", "bmp", "tif", "tiff"])
                            .add_filter("All files", &["*"])
                            .pick_file()
                        {
                            let (_, mime) = super::describe_path(&path);
                            let result = std::fs::read(&path)
                                .map_err(stempel_core::StempelError::from)
                                .and_then(|bytes| controller.write().upload_image(bytes, mime));
                            frame_url.set(None);
                            match result {
                                Ok(artifact) => {
                                    error.set(None);
                                    last_was_upload.set(true);
                                    store(&mut state.write(), kind, artifact);
                                }
                                Err(e) => {
                                    tracing::warn!(path = %path.display(), error = %e, "image rejected");
                                    error.set(Some(humanize_error(&e)));
                                }
                            }
                        }
                    }
                    #[cfg(any(target_os = "ios", target_os = "android"))]
                    {
                        tracing::info!("image picker: requires native bridge");
                    }
                },
                "\u{1F4C1} Choose Image"
            }
        }

        if let Some(ref err) = *error.read() {
            ErrorNotice { error: err.clone() }
        }

        if let Some(ref url) = stored_url {
            div { style: "text-align: center; margin: 16px 0;",
                img { src: "{url}", alt: "Preview", style: "max-width: 100%; max-height: 300px; border-radius: 10px;" }
                p { style: "margin-top: 12px; color: #28a745; font-weight: 600;",
                    if *last_was_upload.read() { "\u{2705} {text.uploaded}" } else { "\u{2705} {text.captured}" }
                }
            }
        }
    }
}

const PRIMARY: &str = "padding: 12px 24px; border-radius: 8px; border: none; background: #007aff; color: white; font-size: 16px; margin-top: 12px;";
const SECONDARY: &str = "padding: 12px 24px; border-radius: 8px; border: 1px solid #007aff; color: #007aff; background: white; font-size: 16px;";
const TOGGLE_ACTIVE: &str = "flex: 1; padding: 10px; border-radius: 8px; border: none; background: #007aff; color: white;";
const TOGGLE_IDLE: &str = "flex: 1; padding: 10px; border-radius: 8px; border: 1px solid #ccc; background: white; color: #333;";
