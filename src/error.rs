//! Error types for dockstrap operations.
//!
//! This module defines [`InstallError`], the primary error type used
//! throughout the installer, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Detection lookups never fail; they yield empty fields that are judged
//!   later by the orchestrator.
//! - Everything else is fail-fast and surfaces as an `InstallError` naming
//!   the offending value and, where one exists, the remediation command.
//! - Use `anyhow::Error` (via `InstallError::Other`) for unexpected errors.

use std::path::PathBuf;
use thiserror::Error;

use crate::rootless::requirement::{render_requirements, PreflightRequirement};

/// Core error type for dockstrap operations.
#[derive(Debug, Error)]
pub enum InstallError {
    /// The host platform cannot be served by this installer.
    #[error("Unsupported platform '{platform}': {message}")]
    UnsupportedPlatform { platform: String, message: String },

    /// A configuration value (channel, mirror, ...) is not recognised.
    #[error("Unsupported {setting} '{value}': expected one of {expected}")]
    UnsupportedConfiguration {
        setting: String,
        value: String,
        expected: String,
    },

    /// A pinned version is absent from the package index.
    #[error("'{version}' not found amongst {manager} results (searched with: {search})")]
    VersionNotFound {
        version: String,
        manager: String,
        search: String,
    },

    /// Aggregated rootless capability gaps.
    #[error("{}", render_requirements(.requirements))]
    MissingCapability {
        requirements: Vec<PreflightRequirement>,
    },

    /// A subordinate id table has no record for the current user.
    #[error(
        "{}Could not find records for the current user {user} from {} . Please make sure valid {} range is set there.\nFor example:\necho \"{example}\" >> {}",
        pending_block(.pending),
        .table.display(),
        table_kind(.table),
        .table.display()
    )]
    IdentityMappingMissing {
        user: String,
        table: PathBuf,
        example: String,
        pending: Vec<PreflightRequirement>,
    },

    /// The host is in a state the installer refuses to touch.
    #[error("{message}")]
    PreflightAborted { message: String },

    /// No usable way to run commands with the required privileges.
    #[error("{message}")]
    PrivilegeError { message: String },

    /// A mutating command exited unsuccessfully.
    #[error("Command failed with exit code {code:?}: {command}")]
    CommandFailed { command: String, code: Option<i32> },

    /// The operator interrupted the run.
    #[error("Interrupted")]
    Interrupted,

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl InstallError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Interrupted => 130,
            _ => 1,
        }
    }
}

fn pending_block(pending: &[PreflightRequirement]) -> String {
    if pending.is_empty() {
        String::new()
    } else {
        format!("{}\n\n", render_requirements(pending))
    }
}

fn table_kind(table: &std::path::Path) -> &str {
    table
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("subordinate id")
}

/// Result type alias for dockstrap operations.
pub type Result<T> = std::result::Result<T, InstallError>;
