//! Install orchestration.
//!
//! - [`install`] - The install pipeline state machine
//! - [`pacing`] - Abort windows after warnings
//! - [`guidance`] - Warning and post-install text

pub mod guidance;
pub mod install;
pub mod pacing;

pub use install::{InstallOrchestrator, InstallOutcome, Stage};
pub use pacing::{Pacer, RecordingPacer, SystemPacer, DEPRECATION_PAUSE, WARNING_PAUSE};
