//! Privileged command execution.
//!
//! The [`Executor`] is the single sink for commands that change the host.
//! It wraps each script with the resolved [`Privilege`] mechanism and, in
//! dry-run mode, prints the script instead of running it.

use serde::Serialize;
use tracing::debug;

use crate::error::{InstallError, Result};
use crate::ui::UserInterface;

use super::command::CommandRunner;
use super::host::Host;
use super::interrupt::check_interrupt;

/// How scripts are given root privileges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Privilege {
    /// Already root (or no escalation wanted): `sh -c`.
    Direct,
    /// `sudo -E sh -c`.
    Sudo,
    /// `su -c`.
    Su,
}

impl Privilege {
    /// Pick the escalation mechanism for the current user.
    pub fn resolve(host: &Host<'_>) -> Result<Self> {
        let user = host.user_name();
        let privilege = if user == "root" {
            Self::Direct
        } else if host.command_exists("sudo") {
            Self::Sudo
        } else if host.command_exists("su") {
            Self::Su
        } else {
            return Err(InstallError::PrivilegeError {
                message: "this installer needs the ability to run commands as root. \
                          We are unable to find either \"sudo\" or \"su\" available to make this happen."
                    .to_string(),
            });
        };
        debug!(user = %user, privilege = ?privilege, "resolved privilege");
        Ok(privilege)
    }

    /// The wrapper argv preceding the script.
    pub fn wrapper(&self) -> &'static [&'static str] {
        match self {
            Self::Direct => &["sh", "-c"],
            Self::Sudo => &["sudo", "-E", "sh", "-c"],
            Self::Su => &["su", "-c"],
        }
    }
}

/// Runs host-mutating scripts through a privilege wrapper.
pub struct Executor<'a> {
    runner: &'a dyn CommandRunner,
    privilege: Privilege,
    dry_run: bool,
}

impl<'a> Executor<'a> {
    /// Create an executor.
    pub fn new(runner: &'a dyn CommandRunner, privilege: Privilege, dry_run: bool) -> Self {
        Self {
            runner,
            privilege,
            dry_run,
        }
    }

    /// Whether scripts are printed instead of run.
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Run a script, failing on a non-zero exit.
    ///
    /// In dry-run mode the script is printed and treated as successful.
    pub fn run(&self, ui: &mut dyn UserInterface, script: &str) -> Result<()> {
        if self.dry_run {
            ui.message(script);
            return Ok(());
        }

        ui.message(&format!("+ {} '{}'", self.privilege.wrapper().join(" "), script));
        self.capture(script).map(|_| ())
    }

    /// Run a script and return its stdout.
    ///
    /// Always executes, also in dry-run mode; callers use it only for
    /// read-only index queries.
    pub fn capture(&self, script: &str) -> Result<String> {
        let mut argv: Vec<&str> = self.privilege.wrapper().to_vec();
        argv.push(script);

        let output = self.runner.run(&argv);
        check_interrupt()?;

        debug!(script, code = ?output.code, "executed");
        if output.succeeded() {
            Ok(output.stdout)
        } else {
            Err(InstallError::CommandFailed {
                command: script.to_string(),
                code: output.code,
            })
        }
    }
}
