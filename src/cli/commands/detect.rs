//! Detect command implementation.
//!
//! The `dockstrap detect` command runs detection only and reports what an
//! install would target. Nothing on the host is changed.

use serde::Serialize;

use crate::cli::args::DetectArgs;
use crate::detection::{is_deprecated, Distribution, DistroFamily, DistributionDetector, Platform};
use crate::error::{InstallError, Result};
use crate::package_manager::PackageManagerKind;
use crate::shell::Host;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// Detection results for one host.
#[derive(Debug, Clone, Serialize)]
pub struct HostReport {
    pub distribution: Distribution,
    pub forked_from: Option<Distribution>,
    pub platform: Platform,
    /// `None` when the distribution has no supported package manager.
    pub package_manager: Option<PackageManagerKind>,
    pub deprecated: bool,
}

impl HostReport {
    /// Collect a report from the host.
    pub fn collect(host: &Host<'_>) -> Self {
        let report = DistributionDetector::new(host).detect();
        let package_manager = match report.distribution.family() {
            DistroFamily::Debian => Some(PackageManagerKind::Apt),
            DistroFamily::Rpm => Some(PackageManagerKind::probe_rpm(host)),
            DistroFamily::Sles | DistroFamily::Unsupported => None,
        };
        Self {
            deprecated: is_deprecated(&report.distribution),
            distribution: report.distribution,
            forked_from: report.forked_from,
            platform: Platform::detect(host),
            package_manager,
        }
    }
}

/// The detect command implementation.
pub struct DetectCommand<'h, 'a> {
    host: &'h Host<'a>,
    args: DetectArgs,
}

impl<'h, 'a> DetectCommand<'h, 'a> {
    /// Create a new detect command.
    pub fn new(host: &'h Host<'a>, args: DetectArgs) -> Self {
        Self { host, args }
    }
}

impl Command for DetectCommand<'_, '_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let report = HostReport::collect(self.host);

        if self.args.json {
            let json = serde_json::to_string_pretty(&report)
                .map_err(|e| InstallError::Other(e.into()))?;
            ui.message(&json);
            return Ok(CommandResult::success());
        }

        let unknown = report.distribution.is_unknown();
        if unknown {
            ui.warning("Distribution: unknown (no ID in /etc/os-release)");
        } else {
            ui.message(&format!(
                "Distribution:    {} {}",
                report.distribution.id, report.distribution.version
            ));
        }
        if let Some(forked) = &report.forked_from {
            ui.message(&format!("Forked from:     {} {}", forked.id, forked.version));
        }
        ui.message(&format!(
            "Platform:        {} {} ({})",
            report.platform.kernel, report.platform.kernel_release, report.platform.arch
        ));
        match report.package_manager {
            Some(kind) => ui.message(&format!("Package manager: {}", kind)),
            None => ui.message("Package manager: unsupported"),
        }
        if report.deprecated {
            ui.warning("This release has reached end-of-life");
        }

        if unknown {
            Ok(CommandResult::failure(1))
        } else {
            Ok(CommandResult::success())
        }
    }
}
