// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stempel core types, error definitions, configuration and the wizard
// state machine shared across all crates.

pub mod config;
pub mod error;
pub mod human_errors;
pub mod types;
pub mod wizard;

pub use config::{AppConfig, CameraConfig, StampLayout};
pub use error::StempelError;
pub use types::*;
pub use wizard::{StepMarker, WizardSession, WizardStep};
