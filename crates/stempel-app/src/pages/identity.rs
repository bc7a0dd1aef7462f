// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Step 2: photograph or upload an ID document.

use dioxus::prelude::*;

use stempel_core::types::CaptureKind;

use crate::pages::capture_panel::CapturePanel;

#[component]
pub fn IdentityStep() -> Element {
    rsx! {
        section {
            h2 { "ID Document" }
            p { style: "color: #666;",
                "Scan your passport, ID card or driving licence with the camera, or upload an existing photo. Make sure all text is readable."
            }
            CapturePanel { kind: CaptureKind::IdDocument, always_offer_upload: true }
        }
    }
}
