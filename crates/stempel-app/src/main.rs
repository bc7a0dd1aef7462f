// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stempel: local attestation wizard.
//
// Entry point. Initialises logging, backend services, app state, and launches
// the Dioxus UI.

mod pages;
mod services;
mod state;

use dioxus::prelude::*;
use stempel_core::wizard::StepState;
use stempel_core::WizardStep;

use pages::document::DocumentStep;
use pages::identity::IdentityStep;
use pages::review::ReviewStep;
use pages::selfie::SelfieStep;
use pages::sign::SignStep;

use services::app_services::AppServices;
use state::{AppState, Captures};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Stempel starting");

    dioxus::launch(app);
}

/// Root component.
fn app() -> Element {
    let svc = use_hook(AppServices::init);

    // Provide services and state as context for all steps
    use_context_provider(|| svc.clone());
    let mut state = use_context_provider(|| Signal::new(AppState::new(&svc, monitor_size())));
    let captures = use_context_provider(|| Captures::new(&svc));

    // The IP address arrives after the rest of the device record
    let svc_ip = svc.clone();
    use_future(move || {
        let svc = svc_ip.clone();
        async move {
            let ip = svc.resolve_ip_address().await;
            state.write().session.set_ip_address(ip);
        }
    });

    // No camera may outlive the window
    use_drop(move || captures.stop_all());

    rsx! {
        Wizard {}
    }
}

/// Physical size of the monitor the window is on.
#[cfg(not(any(target_os = "ios", target_os = "android")))]
fn monitor_size() -> Option<(u32, u32)> {
    let monitor = dioxus::desktop::window().window.current_monitor()?;
    let size = monitor.size();
    tracing::debug!(width = size.width, height = size.height, "monitor size");
    Some((size.width, size.height))
}

#[cfg(any(target_os = "ios", target_os = "android"))]
fn monitor_size() -> Option<(u32, u32)> {
    None
}

/// Progress bar, the active step and the navigation controls.
#[component]
fn Wizard() -> Element {
    let mut state = use_context::<Signal<AppState>>();
    let captures = use_context::<Captures>();

    let (step, progress, shows_prev, shows_next, can_advance) = {
        let current = state.read();
        let session = &current.session;
        (
            session.current_step(),
            session.progress(),
            session.shows_prev(),
            session.shows_next(),
            session.can_advance(),
        )
    };

    rsx! {
        div { class: "app-container",
            style: "display: flex; flex-direction: column; min-height: 100vh; font-family: system-ui, -apple-system, sans-serif; background: #f5f6fa;",

            header { style: "padding: 16px 24px; background: white; border-bottom: 1px solid #e0e0e0;",
                h1 { style: "margin: 0 0 12px 0; font-size: 22px;", "Stempel" }
                div { style: "display: flex; gap: 8px;",
                    for marker in progress {
                        StepBadge {
                            number: marker.step.number(),
                            title: marker.step.title(),
                            state: marker.state,
                        }
                    }
                }
            }

            main { style: "flex: 1; padding: 24px; max-width: 760px; width: 100%; margin: 0 auto; box-sizing: border-box;",
                match step {
                    WizardStep::Document => rsx! { DocumentStep {} },
                    WizardStep::IdDocument => rsx! { IdentityStep {} },
                    WizardStep::Selfie => rsx! { SelfieStep {} },
                    WizardStep::Review => rsx! { ReviewStep {} },
                    WizardStep::Sign => rsx! { SignStep {} },
                }
            }

            nav { style: "display: flex; justify-content: space-between; padding: 12px 24px; border-top: 1px solid #e0e0e0; background: white;",
                if shows_prev {
                    button {
                        style: "padding: 10px 24px; border-radius: 8px; border: 1px solid #ccc; background: white; font-size: 15px;",
                        onclick: move |_| {
                            captures.stop_all();
                            state.write().session.prev();
                        },
                        "\u{2190} Previous"
                    }
                } else {
                    span {}
                }
                if shows_next {
                    button {
                        style: if can_advance {
                            "padding: 10px 24px; border-radius: 8px; border: none; background: #007aff; color: white; font-size: 15px;"
                        } else {
                            "padding: 10px 24px; border-radius: 8px; border: none; background: #b0c4de; color: white; font-size: 15px;"
                        },
                        disabled: !can_advance,
                        onclick: move |_| {
                            captures.stop_all();
                            state.write().session.next();
                        },
                        "Next \u{2192}"
                    }
                }
            }
        }
    }
}

#[component]
fn StepBadge(number: u8, title: &'static str, state: StepState) -> Element {
    let (background, color) = match state {
        StepState::Completed => ("#28a745", "white"),
        StepState::Active => ("#007aff", "white"),
        StepState::Pending => ("#e9ecef", "#6c757d"),
    };
    let mark = if state == StepState::Completed {
        "\u{2713}".to_string()
    } else {
        number.to_string()
    };

    rsx! {
        div { style: "flex: 1; display: flex; flex-direction: column; align-items: center; gap: 4px; font-size: 12px; color: #555;",
            span {
                style: "width: 28px; height: 28px; border-radius: 14px; display: flex; align-items: center; justify-content: center; background: {background}; color: {color}; font-weight: 600;",
                "{mark}"
            }
            span { "{title}" }
        }
    }
}
