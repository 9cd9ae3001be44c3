//! Shell command execution and host access.

pub mod command;
pub mod executor;
pub mod host;
pub mod interrupt;
pub mod mock;
pub mod quote;

pub use command::{CommandOutput, CommandRunner, SystemRunner};
pub use executor::{Executor, Privilege};
pub use host::{is_executable, is_writable, shell_var, Host};
pub use interrupt::{check_interrupt, install_interrupt_guard, interrupted};
pub use mock::FakeRunner;
pub use quote::{quote_path, shell_quote};

/// Check if running in a CI environment.
pub fn is_ci() -> bool {
    std::env::var("CI").is_ok()
        || std::env::var("GITHUB_ACTIONS").is_ok()
        || std::env::var("GITLAB_CI").is_ok()
        || std::env::var("CIRCLECI").is_ok()
        || std::env::var("TRAVIS").is_ok()
        || std::env::var("JENKINS_URL").is_ok()
}
