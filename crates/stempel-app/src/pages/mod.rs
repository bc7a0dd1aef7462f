// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

pub mod capture_panel;
pub mod document;
pub mod identity;
pub mod review;
pub mod selfie;
pub mod sign;

use std::path::Path;

use dioxus::prelude::*;
use stempel_core::human_errors::{HumanError, Severity};
use stempel_core::types::mime_for_extension;

/// Declared for files whose extension says nothing.
const UNKNOWN_MIME: &str = "application/octet-stream";

/// File name and declared MIME type of a picked file.
///
/// The type comes from the extension, as a browser would report it.
pub fn describe_path(path: &Path) -> (String, &'static str) {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "unknown".into());
    let mime = path
        .extension()
        .and_then(|e| mime_for_extension(&e.to_string_lossy()))
        .unwrap_or(UNKNOWN_MIME);
    (name, mime)
}

/// Inline message box for a humanised error.
#[component]
pub fn ErrorNotice(error: HumanError) -> Element {
    let (background, border) = match error.severity {
        Severity::Degraded => ("#fff3cd", "#ffe69c"),
        _ => ("#f8d7da", "#f1aeb5"),
    };

    rsx! {
        div { style: "padding: 12px 16px; border-radius: 8px; margin: 12px 0; background: {background}; border: 1px solid {border};",
            p { style: "margin: 0 0 4px 0; font-weight: 600;", "{error.message}" }
            p { style: "margin: 0; font-size: 14px; color: #555;", "{error.suggestion}" }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picked_file_is_typed_by_extension() {
        assert_eq!(
            describe_path(Path::new("/home/a/Contract.PDF")),
            ("Contract.PDF".to_string(), "application/pdf")
        );
        assert_eq!(
            describe_path(Path::new("scan.jpeg")),
            ("scan.jpeg".to_string(), "image/jpeg")
        );
        assert_eq!(describe_path(Path::new("notes")).1, UNKNOWN_MIME);
    }
}
