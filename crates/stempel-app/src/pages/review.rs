// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Step 4: review the device record that will be printed on the document.

use dioxus::prelude::*;

use stempel_security::fingerprint::TIMESTAMP_FORMAT;

use crate::state::AppState;

fn local_now() -> String {
    chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}

#[component]
pub fn ReviewStep() -> Element {
    let state = use_context::<Signal<AppState>>();

    let rows: Vec<(&'static str, String)> = match state.read().session.device_info() {
        Some(info) => vec![
            ("Device ID", info.device_id.clone()),
            ("Device Type", info.device_type.clone()),
            ("Platform", info.platform.clone()),
            ("User Agent", info.user_agent.clone()),
            ("Language", info.language.clone()),
            ("Timezone", info.timezone.clone()),
            ("Screen Resolution", info.screen_resolution.clone()),
            (
                "IP Address",
                info.ip_address.clone().unwrap_or_else(|| "Resolving...".into()),
            ),
            ("Recorded", info.timestamp.clone()),
        ],
        None => Vec::new(),
    };

    rsx! {
        section {
            h2 { "Device Verification" }
            p { style: "color: #666;",
                "These details identify the device used for signing and are added to the document."
            }

            if rows.is_empty() {
                p { style: "text-align: center; color: #aaa; margin: 48px 0;", "Device information unavailable." }
            } else {
                div { style: "border: 1px solid #e0e0e0; border-radius: 12px; background: white; overflow: hidden;",
                    for (label, value) in rows {
                        div { style: "display: flex; justify-content: space-between; gap: 16px; padding: 10px 16px; border-bottom: 1px solid #f0f0f0; font-size: 14px;",
                            span { style: "color: #666;", "{label}" }
                            span { style: "font-family: monospace; text-align: right; word-break: break-all;", "{value}" }
                        }
                    }
                }
            }

            div { style: "margin-top: 16px; font-size: 14px; color: #444;",
                "Current time: "
                LiveClock {}
            }
        }
    }
}

/// Local time, refreshed every second.
#[component]
pub fn LiveClock() -> Element {
    let mut now = use_signal(local_now);

    let _ticker = use_resource(move || async move {
        loop {
            tokio::time::sleep(std::time::Duration::from_secs(1)).await;
            now.set(local_now());
        }
    });

    rsx! {
        span { style: "font-family: monospace;", "{now}" }
    }
}
