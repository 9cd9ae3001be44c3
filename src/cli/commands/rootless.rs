//! Rootless command implementation.
//!
//! The `dockstrap rootless` command installs the static engine binaries for
//! the current user and runs the rootless setup tool.

use crate::cli::args::RootlessArgs;
use crate::config::RootlessConfig;
use crate::error::Result;
use crate::rootless::{RootlessInstaller, RootlessOutcome};
use crate::shell::Host;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The rootless command implementation.
pub struct RootlessCommand<'h, 'a> {
    host: &'h Host<'a>,
    args: RootlessArgs,
}

impl<'h, 'a> RootlessCommand<'h, 'a> {
    /// Create a new rootless command.
    pub fn new(host: &'h Host<'a>, args: RootlessArgs) -> Self {
        Self { host, args }
    }
}

impl Command for RootlessCommand<'_, '_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let config = RootlessConfig::from_args(&self.args)?;
        ui.show_header(&format!(
            "Installing rootless Docker {} ({})",
            config.static_version, config.channel
        ));

        match RootlessInstaller::new(self.host, &config).run(ui)? {
            RootlessOutcome::Installed => {
                ui.success(&format!(
                    "Rootless Docker installed in {}",
                    config.bin_dir.display()
                ));
            }
            RootlessOutcome::AlreadyInstalled => {
                ui.show_hint("Nothing to do: a rootless daemon is already installed.");
            }
        }
        Ok(CommandResult::success())
    }
}
