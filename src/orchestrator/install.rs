//! The package-manager install pipeline.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::InstallConfig;
use crate::detection::{
    deprecation_notice, is_deprecated, Distribution, DistributionDetector, Platform,
};
use crate::error::{InstallError, Result};
use crate::package_manager::{Adapter, PackageManagerAdapter, PackageManagerKind};
use crate::shell::{Executor, Host, Privilege};
use crate::ui::UserInterface;
use crate::version::{PackageSet, VersionResolver};

use super::guidance::{post_install_guidance, ABORT_HINT, EXISTING_DOCKER_WARNING, WSL_WARNING};
use super::pacing::{Pacer, DEPRECATION_PAUSE, WARNING_PAUSE};

/// Pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    PrivilegeResolution,
    DistributionDetection,
    DeprecationCheck,
    PackageManagerSelection,
    RepositorySetup,
    VersionResolution,
    PackageInstallation,
    PostInstallGuidance,
}

/// What a completed run did.
#[derive(Debug, Clone, Serialize)]
pub struct InstallOutcome {
    pub privilege: Privilege,
    pub distribution: Distribution,
    pub deprecated: bool,
    pub package_manager: PackageManagerKind,
    pub packages: PackageSet,
    pub dry_run: bool,
    /// Stages entered, in order.
    pub stages: Vec<Stage>,
}

/// Sequences detection, repository setup and installation.
pub struct InstallOrchestrator<'h, 'a> {
    host: &'h Host<'a>,
    config: &'h InstallConfig,
    pacer: &'h dyn Pacer,
}

impl<'h, 'a> InstallOrchestrator<'h, 'a> {
    /// Create an orchestrator.
    pub fn new(host: &'h Host<'a>, config: &'h InstallConfig, pacer: &'h dyn Pacer) -> Self {
        Self {
            host,
            config,
            pacer,
        }
    }

    /// Run the pipeline to completion or the first failure.
    pub fn run(&self, ui: &mut dyn UserInterface) -> Result<InstallOutcome> {
        let mut stages = Vec::new();
        ui.show_header(&format!(
            "Executing docker install script, version: {}",
            env!("CARGO_PKG_VERSION")
        ));

        if self.host.command_exists("docker") {
            warn!("docker command already present");
            ui.warning(EXISTING_DOCKER_WARNING);
            self.pacer.pause(ui, WARNING_PAUSE)?;
        }

        enter(&mut stages, Stage::PrivilegeResolution);
        let privilege = Privilege::resolve(self.host)?;
        let exec = Executor::new(self.host.runner(), privilege, self.config.dry_run);

        enter(&mut stages, Stage::DistributionDetection);
        let platform = Platform::detect(self.host);
        let distribution = self.detect_distribution(ui, &platform)?;

        enter(&mut stages, Stage::DeprecationCheck);
        let deprecated = is_deprecated(&distribution);
        if deprecated {
            warn!(distribution = %distribution, "end-of-life distribution");
            ui.warning(&deprecation_notice(&distribution));
            ui.message(ABORT_HINT);
            self.pacer.pause(ui, DEPRECATION_PAUSE)?;
        }

        enter(&mut stages, Stage::PackageManagerSelection);
        let adapter = Adapter::select(self.host, self.config, &distribution, &platform)?;
        info!(package_manager = %adapter.kind(), "selected package manager");

        enter(&mut stages, Stage::RepositorySetup);
        adapter.configure_repository(&exec, ui)?;
        adapter.refresh_index(&exec, ui)?;

        enter(&mut stages, Stage::VersionResolution);
        let resolved =
            VersionResolver::new(self.config.version.clone()).resolve(&adapter, &exec, ui)?;

        enter(&mut stages, Stage::PackageInstallation);
        adapter.install(&exec, ui, &resolved.packages)?;

        let package_manager = adapter.kind();

        enter(&mut stages, Stage::PostInstallGuidance);
        self.post_install(&exec, ui);

        Ok(InstallOutcome {
            privilege,
            distribution,
            deprecated,
            package_manager,
            packages: resolved.packages,
            dry_run: self.config.dry_run,
            stages,
        })
    }

    /// Detect and reconcile the distribution; an empty id is fatal.
    fn detect_distribution(
        &self,
        ui: &mut dyn UserInterface,
        platform: &Platform,
    ) -> Result<Distribution> {
        if platform.is_wsl() {
            warn!("running under WSL");
            ui.warning(WSL_WARNING);
            self.pacer.pause(ui, WARNING_PAUSE)?;
        }

        let report = DistributionDetector::new(self.host).detect();
        if let Some(reported) = &report.forked_from {
            ui.message(&format!(
                "You're using '{}' version '{}'.",
                reported.id, reported.version
            ));
            ui.message(&format!(
                "Upstream release is '{}' version '{}'.",
                report.distribution.id, report.distribution.version
            ));
        }

        let distribution = report.distribution;
        if distribution.is_unknown() {
            if platform.is_darwin() {
                return Err(InstallError::UnsupportedPlatform {
                    platform: "macOS".to_string(),
                    message: "Please get Docker Desktop from https://www.docker.com/products/docker-desktop"
                        .to_string(),
                });
            }
            return Err(InstallError::UnsupportedPlatform {
                platform: String::new(),
                message: "Unsupported distribution: could not read an ID from /etc/os-release"
                    .to_string(),
            });
        }

        debug!(distribution = %distribution, "detected distribution");
        Ok(distribution)
    }

    fn post_install(&self, exec: &Executor<'_>, ui: &mut dyn UserInterface) {
        if exec.is_dry_run() {
            return;
        }
        if self.host.command_exists("docker") && self.host.exists("/var/run/docker.sock") {
            if let Err(err) = exec.run(ui, "docker version") {
                debug!(error = %err, "docker version failed");
            }
        }
        for line in post_install_guidance(&self.config.version) {
            ui.message(&line);
        }
    }
}

fn enter(stages: &mut Vec<Stage>, stage: Stage) {
    debug!(stage = ?stage, "entering stage");
    stages.push(stage);
}
