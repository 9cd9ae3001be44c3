//! Rootless (unprivileged) installation.
//!
//! - [`requirement`] - Capability gaps and their remediation commands
//! - [`preflight`] - Host validation before anything is downloaded
//! - [`install`] - Static archive install and setup tool invocation

pub mod install;
pub mod preflight;
pub mod requirement;

pub use install::{RootlessInstaller, RootlessOutcome};
pub use preflight::{PreflightOutcome, RootlessPreflightChecker};
pub use requirement::{render_requirements, CapabilityStatus, PreflightRequirement};
