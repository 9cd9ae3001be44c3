//! Command-line interface for Dockstrap.
//!
//! This module provides the CLI argument parsing using clap's derive macros
//! and command implementations.
//!
//! # Architecture
//!
//! - [`args`] - Argument definitions using clap derive macros
//! - [`commands`] - Command implementations

pub mod args;
pub mod commands;

pub use args::{
    parse_lenient, Cli, Commands, CompletionsArgs, DetectArgs, InstallArgs, RootlessArgs,
};
pub use commands::{Command, CommandDispatcher, CommandResult};
