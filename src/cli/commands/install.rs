//! Install command implementation.
//!
//! The `dockstrap install` command (also the default) configures the
//! package repository and installs the engine packages.

use crate::cli::args::InstallArgs;
use crate::config::InstallConfig;
use crate::error::Result;
use crate::orchestrator::{InstallOrchestrator, Pacer};
use crate::shell::Host;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The install command implementation.
pub struct InstallCommand<'h, 'a> {
    host: &'h Host<'a>,
    pacer: &'h dyn Pacer,
    args: InstallArgs,
}

impl<'h, 'a> InstallCommand<'h, 'a> {
    /// Create a new install command.
    pub fn new(host: &'h Host<'a>, pacer: &'h dyn Pacer, args: InstallArgs) -> Self {
        Self { host, pacer, args }
    }

    /// Get the command arguments.
    pub fn args(&self) -> &InstallArgs {
        &self.args
    }
}

impl Command for InstallCommand<'_, '_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let config = InstallConfig::from_args(&self.args)?;
        let outcome = InstallOrchestrator::new(self.host, &config, self.pacer).run(ui)?;

        let packages = outcome.packages.render(" ");
        if outcome.dry_run {
            ui.success(&format!(
                "Dry run finished for {} via {}: {}",
                outcome.distribution, outcome.package_manager, packages
            ));
        } else {
            ui.success(&format!("Installed {}", packages));
        }
        Ok(CommandResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InstallError;
    use crate::orchestrator::RecordingPacer;
    use crate::shell::{CommandOutput, FakeRunner};
    use crate::ui::MockUI;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn unknown_channel_fails_before_detection() {
        let runner = FakeRunner::new();
        let host = Host::new(&runner);
        let pacer = RecordingPacer::new();
        let args = InstallArgs {
            channel: Some("nightly".to_string()),
            ..Default::default()
        };
        let mut ui = MockUI::new();

        let err = InstallCommand::new(&host, &pacer, args)
            .execute(&mut ui)
            .unwrap_err();
        assert!(matches!(err, InstallError::UnsupportedConfiguration { .. }));
        assert!(runner.invocations().is_empty());
    }

    #[test]
    fn dry_run_reports_package_set() {
        let root = TempDir::new().unwrap();
        fs::create_dir_all(root.path().join("etc")).unwrap();
        fs::write(root.path().join("etc/os-release"), "ID=debian\n").unwrap();
        fs::write(root.path().join("etc/debian_version"), "12.5\n").unwrap();
        let runner = FakeRunner::new()
            .with_programs(&["id", "uname"])
            .with_output("id -un", CommandOutput::success("root\n"))
            .with_output("uname -s", CommandOutput::success("Linux\n"));
        let host = Host::with_root(&runner, root.path());
        let pacer = RecordingPacer::new();
        let args = InstallArgs {
            dry_run: true,
            ..Default::default()
        };
        let mut ui = MockUI::new();

        let result = InstallCommand::new(&host, &pacer, args)
            .execute(&mut ui)
            .unwrap();
        assert!(result.success);
        assert_eq!(
            ui.successes(),
            ["Dry run finished for debian.bookworm via apt: docker-ce docker-ce-cli \
              containerd.io docker-compose-plugin docker-ce-rootless-extras docker-buildx-plugin"]
        );
    }
}
