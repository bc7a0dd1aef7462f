// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Global application state: reactive signals for the Dioxus UI.

use dioxus::prelude::*;
use stempel_core::types::CaptureKind;
use stempel_core::WizardSession;

use crate::services::app_services::AppServices;
use crate::services::capture::CaptureController;

/// Shared state accessible to all pages via `use_context`.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The one wizard run in progress.
    pub session: WizardSession,
}

impl AppState {
    /// Create initial state from the backend services.
    ///
    /// The device record is collected right away; its IP address arrives later.
    pub fn new(svc: &AppServices, screen: Option<(u32, u32)>) -> Self {
        let mut session = WizardSession::new(svc.config().default_page_selection);
        session.set_device_info(svc.device_info(screen));

        Self { session }
    }
}

/// The two acquisition flows, each in its own signal so a running preview
/// only re-renders the step that shows it.
#[derive(Clone, Copy)]
pub struct Captures {
    pub id: Signal<CaptureController>,
    pub selfie: Signal<CaptureController>,
}

impl Captures {
    pub fn new(svc: &AppServices) -> Self {
        Self {
            id: Signal::new(svc.capture_controller(CaptureKind::IdDocument)),
            selfie: Signal::new(svc.capture_controller(CaptureKind::Selfie)),
        }
    }

    pub fn get(&self, kind: CaptureKind) -> Signal<CaptureController> {
        match kind {
            CaptureKind::IdDocument => self.id,
            CaptureKind::Selfie => self.selfie,
        }
    }

    /// Release both cameras. Skips a controller that is already gone or
    /// borrowed, whose own drop releases it instead.
    pub fn stop_all(&self) {
        for mut signal in [self.id, self.selfie] {
            if let Ok(mut controller) = signal.try_write() {
                controller.stop();
            }
        }
    }
}
