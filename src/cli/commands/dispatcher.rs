//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use crate::cli::args::{Cli, Commands};
use crate::error::Result;
use crate::orchestrator::{Pacer, SystemPacer};
use crate::shell::Host;
use crate::ui::UserInterface;

/// Trait for command implementations.
///
/// Each CLI subcommand implements this trait to provide its execution logic.
pub trait Command {
    /// Execute the command.
    ///
    /// # Arguments
    ///
    /// * `ui` - User interface for displaying output
    ///
    /// # Returns
    ///
    /// A [`CommandResult`] indicating success/failure and exit code.
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher<'a> {
    host: Host<'a>,
    pacer: Box<dyn Pacer>,
}

impl<'a> CommandDispatcher<'a> {
    /// Create a dispatcher for the given host, pausing in real time.
    pub fn new(host: Host<'a>) -> Self {
        Self {
            host,
            pacer: Box::new(SystemPacer),
        }
    }

    /// Replace the pacer used for observation windows.
    pub fn with_pacer(mut self, pacer: Box<dyn Pacer>) -> Self {
        self.pacer = pacer;
        self
    }

    /// The host commands run against.
    pub fn host(&self) -> &Host<'a> {
        &self.host
    }

    /// Dispatch and execute a command.
    ///
    /// Without a subcommand, the top-level install arguments are used.
    pub fn dispatch(&self, cli: &Cli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        match &cli.command {
            Some(Commands::Install(args)) => {
                super::install::InstallCommand::new(&self.host, self.pacer.as_ref(), args.clone())
                    .execute(ui)
            }
            Some(Commands::Rootless(args)) => {
                super::rootless::RootlessCommand::new(&self.host, args.clone()).execute(ui)
            }
            Some(Commands::Detect(args)) => {
                super::detect::DetectCommand::new(&self.host, args.clone()).execute(ui)
            }
            Some(Commands::Completions(args)) => {
                super::completions::CompletionsCommand::new(args.clone()).execute(ui)
            }
            None => super::install::InstallCommand::new(
                &self.host,
                self.pacer.as_ref(),
                cli.install.clone(),
            )
            .execute(ui),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InstallError;
    use crate::shell::FakeRunner;
    use crate::ui::MockUI;
    use clap::Parser;

    #[test]
    fn command_result_success() {
        let result = CommandResult::success();
        assert!(result.success);
        assert_eq!(result.exit_code, 0);
    }

    #[test]
    fn command_result_failure() {
        let result = CommandResult::failure(1);
        assert!(!result.success);
        assert_eq!(result.exit_code, 1);
    }

    #[test]
    fn bare_invocation_routes_to_install() {
        let runner = FakeRunner::new();
        let dispatcher = CommandDispatcher::new(Host::new(&runner));
        let cli = Cli::try_parse_from(["dockstrap", "--mirror", "Foo"]).unwrap();
        let mut ui = MockUI::new();

        let err = dispatcher.dispatch(&cli, &mut ui).unwrap_err();
        assert!(matches!(err, InstallError::UnsupportedConfiguration { .. }));
        assert!(runner.invocations().is_empty());
    }
}
