//! External process execution.
//!
//! Every host command the installer issues goes through a [`CommandRunner`],
//! so detection and package-manager logic can be driven by scripted output
//! in tests (see [`FakeRunner`](super::mock::FakeRunner)).

use std::process::{Command, Stdio};
use std::time::Instant;

use tracing::debug;

/// Result of executing an external command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code (None if the program could not be started or was killed by a signal).
    pub code: Option<i32>,

    /// Standard output.
    pub stdout: String,

    /// Standard error.
    pub stderr: String,
}

impl CommandOutput {
    /// Create a successful result with the given stdout.
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Create a failed result with the given exit code.
    pub fn failure(code: i32) -> Self {
        Self {
            code: Some(code),
            ..Default::default()
        }
    }

    /// Result for a program that could not be started.
    pub fn not_found() -> Self {
        Self::default()
    }

    /// Whether the command exited with status 0.
    pub fn succeeded(&self) -> bool {
        self.code == Some(0)
    }

    /// Stdout with surrounding whitespace removed.
    pub fn trimmed(&self) -> &str {
        self.stdout.trim()
    }
}

/// Narrow capability for running host commands.
pub trait CommandRunner {
    /// Run `argv[0]` with the remaining arguments and capture its output.
    ///
    /// Never fails: a program that cannot be started yields an output with
    /// no exit code.
    fn run(&self, argv: &[&str]) -> CommandOutput;

    /// Whether `program` can be found on PATH.
    fn exists(&self, program: &str) -> bool;
}

/// Runs commands on the real host.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl SystemRunner {
    /// Create a new system runner.
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, argv: &[&str]) -> CommandOutput {
        let Some((program, args)) = argv.split_first() else {
            return CommandOutput::not_found();
        };

        let start = Instant::now();
        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .output();

        match output {
            Ok(output) => {
                let result = CommandOutput {
                    code: output.status.code(),
                    stdout: String::from_utf8_lossy(&output.stdout).to_string(),
                    stderr: String::from_utf8_lossy(&output.stderr).to_string(),
                };
                debug!(
                    command = %argv.join(" "),
                    code = ?result.code,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "command finished"
                );
                result
            }
            Err(err) => {
                debug!(command = %argv.join(" "), error = %err, "command could not start");
                CommandOutput::not_found()
            }
        }
    }

    fn exists(&self, program: &str) -> bool {
        which::which(program).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_successful_command() {
        let result = SystemRunner::new().run(&["sh", "-c", "echo hello"]);

        assert!(result.succeeded());
        assert_eq!(result.code, Some(0));
        assert_eq!(result.trimmed(), "hello");
    }

    #[test]
    fn run_failing_command() {
        let result = SystemRunner::new().run(&["sh", "-c", "exit 3"]);

        assert!(!result.succeeded());
        assert_eq!(result.code, Some(3));
    }

    #[test]
    fn run_missing_program_has_no_code() {
        let result = SystemRunner::new().run(&["this-command-does-not-exist-12345"]);
        assert_eq!(result.code, None);
        assert!(!result.succeeded());
    }

    #[test]
    fn run_empty_argv_is_not_found() {
        assert_eq!(SystemRunner::new().run(&[]), CommandOutput::not_found());
    }

    #[test]
    fn exists_finds_sh() {
        assert!(SystemRunner::new().exists("sh"));
        assert!(!SystemRunner::new().exists("this-command-does-not-exist-12345"));
    }

    #[test]
    fn output_constructors() {
        assert!(CommandOutput::success("x").succeeded());
        assert!(!CommandOutput::failure(1).succeeded());
        assert_eq!(CommandOutput::success("  jammy\n").trimmed(), "jammy");
    }
}
