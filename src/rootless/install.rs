//! Static rootless install: download, extract, run the setup tool.

use std::path::Path;

use tempfile::TempDir;
use tracing::{debug, info};

use crate::config::RootlessConfig;
use crate::detection::Platform;
use crate::error::Result;
use crate::shell::{check_interrupt, quote_path, shell_quote, Executor, Host, Privilege};
use crate::ui::UserInterface;

use super::preflight::{PreflightOutcome, RootlessPreflightChecker};

/// Setup tool shipped in the rootless extras archive.
pub const SETUP_TOOL: &str = "dockerd-rootless-setuptool.sh";

/// How a rootless run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RootlessOutcome {
    /// Binaries were installed and the setup tool ran.
    Installed,
    /// A rootless daemon was already present.
    AlreadyInstalled,
}

/// Installs the engine for the current user from static archives.
pub struct RootlessInstaller<'h, 'a> {
    host: &'h Host<'a>,
    config: &'h RootlessConfig,
}

impl<'h, 'a> RootlessInstaller<'h, 'a> {
    /// Create an installer.
    pub fn new(host: &'h Host<'a>, config: &'h RootlessConfig) -> Self {
        Self { host, config }
    }

    /// Validate the host, then install.
    ///
    /// Downloads are staged in a temporary directory that is removed when
    /// this returns, including on failure or interrupt.
    pub fn run(&self, ui: &mut dyn UserInterface) -> Result<RootlessOutcome> {
        let checker = RootlessPreflightChecker::new(self.host, self.config);
        if let PreflightOutcome::AlreadyInstalled { daemon } = checker.check()? {
            self.print_upgrade_instructions(ui, &daemon);
            return Ok(RootlessOutcome::AlreadyInstalled);
        }

        let exec = Executor::new(self.host.runner(), Privilege::Direct, self.config.dry_run);
        let arch = Platform::detect(self.host).arch;
        let staging = tempfile::Builder::new().prefix("dockstrap-").tempdir()?;
        debug!(dir = %staging.path().display(), "staging downloads");

        self.download(&exec, ui, &staging, &arch)?;
        check_interrupt()?;
        self.extract(&exec, ui, &staging)?;
        self.setup(&exec, ui)?;

        info!(bin = %self.config.bin_dir.display(), "rootless install finished");
        Ok(RootlessOutcome::Installed)
    }

    fn download(
        &self,
        exec: &Executor<'_>,
        ui: &mut dyn UserInterface,
        staging: &TempDir,
        arch: &str,
    ) -> Result<()> {
        for (archive, file) in [
            ("docker", "docker.tgz"),
            ("docker-rootless-extras", "rootless.tgz"),
        ] {
            let target = staging.path().join(file);
            exec.run(
                ui,
                &format!(
                    "curl -L -o {} {}",
                    quote_path(&target),
                    shell_quote(&self.config.archive_url(arch, archive))
                ),
            )?;
        }
        Ok(())
    }

    fn extract(
        &self,
        exec: &Executor<'_>,
        ui: &mut dyn UserInterface,
        staging: &TempDir,
    ) -> Result<()> {
        let bin = quote_path(&self.config.bin_dir);
        exec.run(ui, &format!("mkdir -p {}", bin))?;
        for file in ["docker.tgz", "rootless.tgz"] {
            exec.run(
                ui,
                &format!(
                    "cd {} && tar zxf {} --strip-components=1",
                    bin,
                    quote_path(&staging.path().join(file))
                ),
            )?;
        }
        Ok(())
    }

    fn setup(&self, exec: &Executor<'_>, ui: &mut dyn UserInterface) -> Result<()> {
        exec.run(ui, &self.setup_command())
    }

    /// The setup tool invocation, with overrides forwarded.
    pub fn setup_command(&self) -> String {
        let bin = quote_path(&self.config.bin_dir);
        let tool = quote_path(&self.config.bin_dir.join(SETUP_TOOL));
        let mut command = format!("PATH={}:$PATH {} install", bin, tool);
        if self.config.force {
            command.push_str(" --force");
        }
        if self.config.skip_iptables {
            command.push_str(" --skip-iptables");
        }
        command
    }

    fn print_upgrade_instructions(&self, ui: &mut dyn UserInterface, daemon: &Path) {
        ui.message(&format!(
            "# Existing rootless Docker detected at {}",
            daemon.display()
        ));
        ui.message("");
        ui.message(
            "# To reinstall or upgrade rootless Docker, run the following commands and then rerun the installation script:",
        );
        ui.message("systemctl --user stop docker");
        ui.message(&format!("rm -f {}", daemon.display()));
        ui.message("");
        ui.message(
            "# Alternatively, install the docker-ce-rootless-extras RPM/deb package for ease of package management (requires root).",
        );
        ui.message("# See https://docs.docker.com/go/rootless/ for details.");
    }
}
