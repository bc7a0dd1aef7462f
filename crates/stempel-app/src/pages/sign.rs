// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Step 5: choose the target pages, generate the stamped PDF, save it.

use dioxus::prelude::*;

use stempel_core::human_errors::{HumanError, humanize_error};
use stempel_core::types::PageSelection;
use stempel_security::display_hash;

use crate::pages::ErrorNotice;
use crate::pages::review::LiveClock;
use crate::services::app_services::{AppServices, signing_request};
use crate::services::preview;
use crate::state::AppState;

const NOT_YET: &str = "Resolving...";

/// Caption for the shortened output digest. It lets the user compare a
/// saved copy with what was generated; it proves nothing about the signer.
fn hash_caption(bytes: &[u8]) -> String {
    format!("Display hash: {}", display_hash(bytes))
}

#[component]
pub fn SignStep() -> Element {
    let mut state = use_context::<Signal<AppState>>();
    let svc = use_context::<AppServices>();
    let mut generating = use_signal(|| false);
    let mut error = use_signal(|| Option::<HumanError>::None);
    let mut saved_to = use_signal(|| Option::<String>::None);

    let (id_url, selfie_url, device_lines, selection, output) = {
        let current = state.read();
        let session = &current.session;
        let device_lines = session.device_info().map(|info| {
            [
                format!("Device ID: {}", info.device_id),
                format!("Type: {}", info.device_type),
                format!("IP: {}", info.ip_address.as_deref().unwrap_or(NOT_YET)),
            ]
        });
        (
            session.id_image().map(preview::artifact_data_url),
            session.selfie_image().map(preview::artifact_data_url),
            device_lines,
            session.page_selection(),
            session
                .signed_output()
                .map(|doc| (doc.file_name.clone(), hash_caption(&doc.bytes))),
        )
    };

    let svc_all = svc.clone();
    let svc_last = svc.clone();
    let svc_generate = svc.clone();
    let svc_save = svc.clone();

    rsx! {
        section {
            h2 { "Sign & Download" }
            p { style: "color: #666;",
                "The watermark goes on every page. The ID photo, selfie and device details go on the pages you choose below."
            }

            // What will be stamped
            div { style: "display: flex; gap: 10px; margin: 16px 0;",
                PreviewBlock { title: "ID Document:",
                    if let Some(url) = id_url {
                        img { src: "{url}", alt: "ID", style: "max-width: 100%; max-height: 100%; border-radius: 5px;" }
                    }
                }
                PreviewBlock { title: "Selfie:",
                    if let Some(url) = selfie_url {
                        img { src: "{url}", alt: "Selfie", style: "max-width: 100%; max-height: 100%; border-radius: 5px;" }
                    }
                }
                PreviewBlock { title: "Device Verification:",
                    if let Some(lines) = device_lines {
                        div { style: "font-size: 12px; padding: 6px;",
                            for line in lines {
                                div { "{line}" }
                            }
                        }
                    }
                }
            }

            p { style: "font-size: 14px; color: #444;",
                "Signature timestamp: "
                LiveClock {}
            }

            // Page selection
            fieldset { style: "border: 1px solid #e0e0e0; border-radius: 8px; padding: 12px 16px; margin: 16px 0;",
                legend { style: "font-size: 14px; color: #666;", "Add verification blocks to" }
                label { style: "display: block; margin: 4px 0;",
                    input {
                        r#type: "radio",
                        name: "page-selection",
                        checked: selection == PageSelection::All,
                        disabled: *generating.read(),
                        onchange: move |_| choose_pages(state, &svc_all, PageSelection::All),
                    }
                    " All pages"
                }
                label { style: "display: block; margin: 4px 0;",
                    input {
                        r#type: "radio",
                        name: "page-selection",
                        checked: selection == PageSelection::LastOnly,
                        disabled: *generating.read(),
                        onchange: move |_| choose_pages(state, &svc_last, PageSelection::LastOnly),
                    }
                    " Last page only"
                }
            }

            if let Some(ref err) = *error.read() {
                ErrorNotice { error: err.clone() }
            }

            match output {
                None => rsx! {
                    button {
                        style: "width: 100%; padding: 14px; border-radius: 8px; border: none; background: #28a745; color: white; font-size: 16px;",
                        disabled: *generating.read(),
                        onclick: move |_| {
                            let request = match signing_request(&state.read().session, chrono::Local::now()) {
                                Ok(request) => request,
                                Err(e) => {
                                    error.set(Some(humanize_error(&e)));
                                    return;
                                }
                            };
                            generating.set(true);
                            error.set(None);
                            saved_to.set(None);

                            let svc = svc_generate.clone();
                            spawn(async move {
                                match svc.generate_signed_pdf(request).await {
                                    Ok(doc) => state.write().session.set_signed_output(doc),
                                    Err(e) => error.set(Some(humanize_error(&e))),
                                }
                                generating.set(false);
                            });
                        },
                        if *generating.read() { "\u{1F504} Generating..." } else { "\u{2705} Generate Signed PDF" }
                    }
                },
                Some((file_name, hash)) => rsx! {
                    div { style: "padding: 16px; border-radius: 12px; background: #e8f5e9; border: 1px solid #c8e6c9; margin-bottom: 12px; font-size: 14px;",
                        p { style: "margin: 0 0 4px 0; font-weight: 600;", "{file_name}" }
                        code { style: "word-break: break-all; color: #555;", "{hash}" }
                    }
                    button {
                        style: "width: 100%; padding: 14px; border-radius: 8px; border: none; background: #007aff; color: white; font-size: 16px;",
                        onclick: move |_| {
                            #[cfg(not(any(target_os = "ios", target_os = "android")))]
                            {
                                let Some(doc) = state.read().session.signed_output().cloned() else {
                                    return;
                                };
                                if let Some(path) = rfd::FileDialog::new()
                                    .set_file_name(&doc.file_name)
                                    .add_filter("PDF documents", &["pdf"])
                                    .save_file()
                                {
                                    match svc_save.save_signed_pdf(&doc, &path) {
                                        Ok(()) => saved_to.set(Some(path.display().to_string())),
                                        Err(e) => error.set(Some(humanize_error(&e))),
                                    }
                                }
                            }
                            #[cfg(any(target_os = "ios", target_os = "android"))]
                            {
                                tracing::info!("save dialog: requires native bridge");
                            }
                        },
                        "\u{1F4E5} Download Signed PDF"
                    }
                },
            }

            if let Some(ref path) = *saved_to.read() {
                p { style: "margin-top: 12px; color: #28a745; font-size: 14px; text-align: center;",
                    "Saved to {path}"
                }
            }
        }
    }
}

/// Apply `selection` to this run and remember it as the default for the next.
fn choose_pages(mut state: Signal<AppState>, svc: &AppServices, selection: PageSelection) {
    state.write().session.set_page_selection(selection);
    if let Err(e) = svc.remember_page_selection(selection) {
        tracing::warn!(error = %e, "could not save page selection");
    }
}

/// One of the three stamped blocks, as it will appear on the page.
#[component]
fn PreviewBlock(title: &'static str, children: Element) -> Element {
    rsx! {
        div { style: "flex: 1; min-width: 0;",
            p { style: "margin: 0 0 4px 0; font-size: 13px; color: #333;", "{title}" }
            div { style: "height: 110px; border: 1px dashed #ccc; border-radius: 6px; display: flex; align-items: center; justify-content: center; overflow: hidden; background: white;",
                {children}
            }
        }
    }
}
