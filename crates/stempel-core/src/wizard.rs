// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Wizard state machine: five linear steps gated by completion predicates.
//
// The session owns every artifact collected during one run. Predicates are
// evaluated from the current artifacts on every query; nothing is cached.

use tracing::{debug, info};

use crate::error::{Result, StempelError};
use crate::types::{DeviceInfo, ImageArtifact, PageSelection, PdfUpload, SessionId, SignedDocument};

/// The five wizard steps, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WizardStep {
    /// Choose the PDF.
    Document,
    /// Capture or upload the ID document.
    IdDocument,
    /// Take the selfie.
    Selfie,
    /// Review the device information.
    Review,
    /// Generate and download.
    Sign,
}

impl WizardStep {
    pub const ALL: [WizardStep; 5] = [
        Self::Document,
        Self::IdDocument,
        Self::Selfie,
        Self::Review,
        Self::Sign,
    ];

    /// 1-based position.
    pub fn number(self) -> u8 {
        match self {
            Self::Document => 1,
            Self::IdDocument => 2,
            Self::Selfie => 3,
            Self::Review => 4,
            Self::Sign => 5,
        }
    }

    pub fn from_number(number: u8) -> Option<Self> {
        Self::ALL.get(usize::from(number).checked_sub(1)?).copied()
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Document => "Upload PDF",
            Self::IdDocument => "ID Document",
            Self::Selfie => "Selfie",
            Self::Review => "Device Verification",
            Self::Sign => "Sign & Download",
        }
    }

    fn following(self) -> Option<Self> {
        Self::from_number(self.number() + 1)
    }

    fn preceding(self) -> Option<Self> {
        Self::from_number(self.number().checked_sub(1)?)
    }
}

/// How a step is drawn in the progress indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepState {
    Completed,
    Active,
    Pending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepMarker {
    pub step: WizardStep,
    pub state: StepState,
}

/// The single mutable record for one wizard run.
#[derive(Debug, Clone)]
pub struct WizardSession {
    id: SessionId,
    step: WizardStep,
    pdf: Option<PdfUpload>,
    id_image: Option<ImageArtifact>,
    selfie_image: Option<ImageArtifact>,
    device_info: Option<DeviceInfo>,
    page_selection: PageSelection,
    signed_output: Option<SignedDocument>,
}

impl WizardSession {
    pub fn new(page_selection: PageSelection) -> Self {
        Self {
            id: SessionId::new(),
            step: WizardStep::Document,
            pdf: None,
            id_image: None,
            selfie_image: None,
            device_info: None,
            page_selection,
            signed_output: None,
        }
    }

    // -- Navigation -----------------------------------------------------------

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn current_step(&self) -> WizardStep {
        self.step
    }

    /// Completion predicate of the current step.
    pub fn can_advance(&self) -> bool {
        self.is_complete(self.step)
    }

    /// Completion predicate for any step. `Sign` has no forward transition.
    pub fn is_complete(&self, step: WizardStep) -> bool {
        match step {
            WizardStep::Document => self.pdf.is_some(),
            WizardStep::IdDocument => self.id_image.is_some(),
            WizardStep::Selfie => self.selfie_image.is_some(),
            WizardStep::Review => true,
            WizardStep::Sign => false,
        }
    }

    /// Move forward if the current step is complete. Returns whether it moved.
    pub fn next(&mut self) -> bool {
        if !self.can_advance() {
            debug!(session = %self.id, step = self.step.number(), "forward navigation blocked");
            return false;
        }
        match self.step.following() {
            Some(step) => {
                info!(session = %self.id, from = self.step.number(), to = step.number(), "wizard advanced");
                self.step = step;
                true
            }
            None => false,
        }
    }

    /// Move back one step. Returns whether it moved.
    pub fn prev(&mut self) -> bool {
        match self.step.preceding() {
            Some(step) => {
                info!(session = %self.id, from = self.step.number(), to = step.number(), "wizard went back");
                self.step = step;
                true
            }
            None => false,
        }
    }

    /// Whether the back control is shown.
    pub fn shows_prev(&self) -> bool {
        self.step.preceding().is_some()
    }

    /// Whether the forward control is shown. Its enabled state is `can_advance`.
    pub fn shows_next(&self) -> bool {
        self.step.following().is_some()
    }

    /// Only the active step's region is visible.
    pub fn is_visible(&self, step: WizardStep) -> bool {
        step == self.step
    }

    pub fn progress(&self) -> [StepMarker; 5] {
        WizardStep::ALL.map(|step| StepMarker {
            step,
            state: match step.cmp(&self.step) {
                std::cmp::Ordering::Less => StepState::Completed,
                std::cmp::Ordering::Equal => StepState::Active,
                std::cmp::Ordering::Greater => StepState::Pending,
            },
        })
    }

    /// All artifacts needed for generation are present.
    pub fn validate_all(&self) -> Result<()> {
        if self.pdf.is_none() {
            return Err(StempelError::IncompleteSession("PDF document"));
        }
        if self.id_image.is_none() {
            return Err(StempelError::IncompleteSession("ID document photo"));
        }
        if self.selfie_image.is_none() {
            return Err(StempelError::IncompleteSession("selfie"));
        }
        if self.device_info.is_none() {
            return Err(StempelError::IncompleteSession("device information"));
        }
        Ok(())
    }

    // -- Artifacts ------------------------------------------------------------
    //
    // Any change to an input invalidates a previously generated output.

    pub fn pdf(&self) -> Option<&PdfUpload> {
        self.pdf.as_ref()
    }

    pub fn set_pdf(&mut self, pdf: PdfUpload) {
        info!(session = %self.id, name = %pdf.name, bytes = pdf.size(), "PDF loaded");
        self.pdf = Some(pdf);
        self.signed_output = None;
    }

    pub fn id_image(&self) -> Option<&ImageArtifact> {
        self.id_image.as_ref()
    }

    pub fn set_id_image(&mut self, image: ImageArtifact) {
        debug!(session = %self.id, bytes = image.bytes.len(), "ID image stored");
        self.id_image = Some(image);
        self.signed_output = None;
    }

    pub fn clear_id_image(&mut self) {
        self.id_image = None;
        self.signed_output = None;
    }

    pub fn selfie_image(&self) -> Option<&ImageArtifact> {
        self.selfie_image.as_ref()
    }

    pub fn set_selfie_image(&mut self, image: ImageArtifact) {
        debug!(session = %self.id, bytes = image.bytes.len(), "selfie stored");
        self.selfie_image = Some(image);
        self.signed_output = None;
    }

    pub fn clear_selfie_image(&mut self) {
        self.selfie_image = None;
        self.signed_output = None;
    }

    pub fn device_info(&self) -> Option<&DeviceInfo> {
        self.device_info.as_ref()
    }

    pub fn set_device_info(&mut self, info: DeviceInfo) {
        self.device_info = Some(info);
    }

    /// Late fill of the IP address. Ignored if no device record exists yet.
    pub fn set_ip_address(&mut self, ip: String) {
        if let Some(info) = self.device_info.as_mut() {
            info.ip_address = Some(ip);
        }
    }

    pub fn page_selection(&self) -> PageSelection {
        self.page_selection
    }

    pub fn set_page_selection(&mut self, selection: PageSelection) {
        if self.page_selection != selection {
            self.page_selection = selection;
            self.signed_output = None;
        }
    }

    pub fn signed_output(&self) -> Option<&SignedDocument> {
        self.signed_output.as_ref()
    }

    pub fn set_signed_output(&mut self, output: SignedDocument) {
        info!(session = %self.id, name = %output.file_name, bytes = output.bytes.len(), "signed PDF ready");
        self.signed_output = Some(output);
    }
}

impl Default for WizardSession {
    fn default() -> Self {
        Self::new(PageSelection::All)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ImageEncoding, PDF_MIME};

    fn pdf() -> PdfUpload {
        PdfUpload::from_upload("doc.pdf", PDF_MIME, b"%PDF-1.5".to_vec()).unwrap()
    }

    fn image() -> ImageArtifact {
        ImageArtifact::new(vec![0xFF, 0xD8], ImageEncoding::Jpeg)
    }

    fn session_at(step: WizardStep) -> WizardSession {
        let mut session = WizardSession::default();
        session.set_pdf(pdf());
        session.set_id_image(image());
        session.set_selfie_image(image());
        while session.current_step() < step {
            assert!(session.next());
        }
        session
    }

    #[test]
    fn forward_enabled_iff_predicate_holds() {
        let mut session = WizardSession::default();
        assert!(!session.can_advance());
        session.set_pdf(pdf());
        assert!(session.can_advance());

        let mut session = session_at(WizardStep::IdDocument);
        assert!(session.can_advance());
        session.clear_id_image();
        assert!(!session.can_advance());

        let mut session = session_at(WizardStep::Selfie);
        assert!(session.can_advance());
        session.clear_selfie_image();
        assert!(!session.can_advance());

        assert!(session_at(WizardStep::Review).can_advance());
        assert!(!session_at(WizardStep::Sign).can_advance());
    }

    #[test]
    fn next_is_blocked_without_pdf() {
        let mut session = WizardSession::default();
        assert!(!session.next());
        assert_eq!(session.current_step(), WizardStep::Document);
    }

    #[test]
    fn navigation_clamps_at_both_ends() {
        let mut session = WizardSession::default();
        assert!(!session.prev());
        assert!(!session.shows_prev());

        let mut session = session_at(WizardStep::Sign);
        assert!(!session.next());
        assert!(!session.shows_next());
        assert_eq!(session.current_step(), WizardStep::Sign);
        assert!(session.prev());
        assert_eq!(session.current_step(), WizardStep::Review);
    }

    #[test]
    fn back_navigation_ignores_predicates() {
        let mut session = session_at(WizardStep::Selfie);
        session.clear_id_image();
        assert!(session.prev());
        assert_eq!(session.current_step(), WizardStep::IdDocument);
        assert!(!session.can_advance());
    }

    #[test]
    fn progress_marks_completed_and_active() {
        let session = session_at(WizardStep::Selfie);
        let states: Vec<StepState> = session.progress().iter().map(|m| m.state).collect();
        assert_eq!(
            states,
            vec![
                StepState::Completed,
                StepState::Completed,
                StepState::Active,
                StepState::Pending,
                StepState::Pending,
            ]
        );
        assert!(session.is_visible(WizardStep::Selfie));
        assert!(!session.is_visible(WizardStep::Document));
    }

    #[test]
    fn validate_all_names_first_missing_piece() {
        let session = WizardSession::default();
        assert!(matches!(
            session.validate_all(),
            Err(StempelError::IncompleteSession("PDF document"))
        ));
    }

    #[test]
    fn replacing_an_input_discards_stale_output() {
        let mut session = session_at(WizardStep::Sign);
        session.set_signed_output(SignedDocument::new("doc.pdf", vec![1]));
        assert!(session.signed_output().is_some());
        session.set_selfie_image(image());
        assert!(session.signed_output().is_none());

        session.set_signed_output(SignedDocument::new("doc.pdf", vec![1]));
        session.set_page_selection(PageSelection::All);
        assert!(session.signed_output().is_some());
        session.set_page_selection(PageSelection::LastOnly);
        assert!(session.signed_output().is_none());
    }

    #[test]
    fn ip_fill_waits_for_device_record() {
        let mut session = WizardSession::default();
        session.set_ip_address("10.0.0.1".into());
        assert!(session.device_info().is_none());
    }

    #[test]
    fn step_numbers_round_trip() {
        for step in WizardStep::ALL {
            assert_eq!(WizardStep::from_number(step.number()), Some(step));
        }
        assert_eq!(WizardStep::from_number(0), None);
        assert_eq!(WizardStep::from_number(6), None);
    }
}
