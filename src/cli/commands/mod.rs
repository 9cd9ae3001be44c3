//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.
//!
//! # Architecture
//!
//! Commands are dispatched via [`CommandDispatcher`], which routes CLI
//! subcommands to their implementations. Every command inspects the host
//! through the dispatcher's [`Host`](crate::shell::Host), so tests can run
//! them against a fake runner and a temporary root.

pub mod completions;
pub mod detect;
pub mod dispatcher;
pub mod install;
pub mod rootless;

pub use dispatcher::{Command, CommandDispatcher, CommandResult};
