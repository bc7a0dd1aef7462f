// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Step 3: take a timestamped selfie.

use dioxus::prelude::*;

use stempel_core::types::CaptureKind;

use crate::pages::capture_panel::CapturePanel;

#[component]
pub fn SelfieStep() -> Element {
    rsx! {
        section {
            h2 { "Selfie" }
            p { style: "color: #666;",
                "Take a photo of your face. The capture time is printed onto the photo."
            }
            CapturePanel { kind: CaptureKind::Selfie, always_offer_upload: false }
        }
    }
}
