// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Step 1: choose the PDF to sign.

use dioxus::prelude::*;

use stempel_core::human_errors::{HumanError, humanize_error};
use stempel_core::StempelError;
use stempel_core::types::{PDF_MIME, PdfUpload};

use crate::pages::ErrorNotice;
use crate::state::AppState;

#[component]
pub fn DocumentStep() -> Element {
    let mut state = use_context::<Signal<AppState>>();
    let mut error = use_signal(|| Option::<HumanError>::None);

    let summary = state
        .read()
        .session
        .pdf()
        .map(|pdf| (pdf.name.clone(), pdf.size_label()));

    rsx! {
        section {
            h2 { "Upload PDF" }
            p { style: "color: #666;", "Choose the document you want to sign." }

            button {
                style: "width: 100%; padding: 16px; border-radius: 12px; border: 2px dashed #007aff; color: #007aff; background: white; font-size: 16px; margin: 16px 0;",
                onclick: move |_| {
                    #[cfg(not(any(target_os = "ios", target_os = "android")))]
                    {
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("PDF documents", &["pdf"])
                            .add_filter("All files", &["*"])
                            .pick_file()
                        {
                            let (name, mime) = super::describe_path(&path);
                            let result = std::fs::read(&path)
                                .map_err(StempelError::from)
                                .and_then(|bytes| PdfUpload::from_upload(name, mime, bytes));
                            match result {
                                Ok(upload) => {
                                    error.set(None);
                                    state.write().session.set_pdf(upload);
                                }
                                Err(e) => {
                                    tracing::warn!(path = %path.display(), error = %e, "PDF rejected");
                                    error.set(Some(humanize_error(&e)));
                                }
                            }
                        }
                    }
                    #[cfg(any(target_os = "ios", target_os = "android"))]
                    {
                        tracing::info!("document picker: requires native bridge");
                    }
                },
                "\u{1F4C4} Choose PDF"
            }

            if let Some(ref err) = *error.read() {
                ErrorNotice { error: err.clone() }
            }

            if let Some((name, size)) = summary {
                div { style: "padding: 16px; border-radius: 12px; background: #e8f5e9; border: 1px solid #c8e6c9;",
                    p { style: "margin: 0 0 4px 0; font-weight: 600;", "\u{2705} PDF uploaded successfully" }
                    p { style: "margin: 0; color: #555; font-size: 14px;", "File: {name}" }
                    p { style: "margin: 0; color: #555; font-size: 14px;", "Size: {size}" }
                    p { style: "margin: 0; color: #555; font-size: 14px;", "Type: {PDF_MIME}" }
                }
            }
        }
    }
}
