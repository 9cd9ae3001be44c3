//! Scripted command runner for testing.
//!
//! `FakeRunner` implements [`CommandRunner`] and answers from a table of
//! scripted outputs keyed by the space-joined argv. Every invocation is
//! recorded for later assertion.
//!
//! # Example
//!
//! ```
//! use dockstrap::shell::{CommandOutput, CommandRunner, FakeRunner};
//!
//! let runner = FakeRunner::new()
//!     .with_program("lsb_release")
//!     .with_output("lsb_release --codename", CommandOutput::success("Codename:\tjammy\n"));
//!
//! assert!(runner.exists("lsb_release"));
//! assert_eq!(
//!     runner.run(&["lsb_release", "--codename"]).stdout,
//!     "Codename:\tjammy\n"
//! );
//! assert_eq!(runner.invocations(), vec!["lsb_release --codename".to_string()]);
//! ```

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use super::command::{CommandOutput, CommandRunner};

/// Shell wrappers whose last argument is the script being run.
const SCRIPT_WRAPPERS: [&[&str]; 3] = [&["sh", "-c"], &["sudo", "-E", "sh", "-c"], &["su", "-c"]];

/// Fake runner answering from scripted outputs.
///
/// Unscripted commands succeed with empty output when their program is
/// known (see [`FakeRunner::with_program`]) and behave as "not found"
/// otherwise. `sh` is always known.
#[derive(Debug)]
pub struct FakeRunner {
    programs: HashSet<String>,
    outputs: HashMap<String, CommandOutput>,
    invocations: RefCell<Vec<String>>,
}

impl Default for FakeRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeRunner {
    /// Create a runner that only knows `sh`.
    pub fn new() -> Self {
        let mut programs = HashSet::new();
        programs.insert("sh".to_string());
        Self {
            programs,
            outputs: HashMap::new(),
            invocations: RefCell::new(Vec::new()),
        }
    }

    /// Mark a program as present on PATH.
    pub fn with_program(mut self, program: &str) -> Self {
        self.programs.insert(program.to_string());
        self
    }

    /// Mark several programs as present on PATH.
    pub fn with_programs(mut self, programs: &[&str]) -> Self {
        for program in programs {
            self.programs.insert((*program).to_string());
        }
        self
    }

    /// Script the output for an exact command line.
    pub fn with_output(mut self, command: &str, output: CommandOutput) -> Self {
        self.outputs.insert(command.to_string(), output);
        self
    }

    /// Script the output for a script run through any shell wrapper.
    ///
    /// Registers `sh -c`, `sudo -E sh -c` and `su -c` forms of `script`.
    pub fn with_script_output(mut self, script: &str, output: CommandOutput) -> Self {
        for wrapper in SCRIPT_WRAPPERS {
            let key = format!("{} {}", wrapper.join(" "), script);
            self.outputs.insert(key, output.clone());
        }
        self
    }

    /// Every command line run so far, in order.
    pub fn invocations(&self) -> Vec<String> {
        self.invocations.borrow().clone()
    }

    /// Scripts passed to a shell wrapper, in order.
    pub fn scripts(&self) -> Vec<String> {
        self.invocations
            .borrow()
            .iter()
            .filter_map(|line| {
                SCRIPT_WRAPPERS.iter().find_map(|wrapper| {
                    let prefix = format!("{} ", wrapper.join(" "));
                    line.strip_prefix(&prefix).map(str::to_string)
                })
            })
            .collect()
    }
}

impl CommandRunner for FakeRunner {
    fn run(&self, argv: &[&str]) -> CommandOutput {
        let line = argv.join(" ");
        self.invocations.borrow_mut().push(line.clone());

        if let Some(output) = self.outputs.get(&line) {
            return output.clone();
        }

        match argv.first() {
            Some(program) if self.exists(program) => CommandOutput::success(""),
            _ => CommandOutput::not_found(),
        }
    }

    fn exists(&self, program: &str) -> bool {
        self.programs.contains(program)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_program_is_not_found() {
        let runner = FakeRunner::new();
        let out = runner.run(&["lsb_release", "-a"]);
        assert_eq!(out.code, None);
        assert!(!runner.exists("lsb_release"));
    }

    #[test]
    fn known_program_defaults_to_empty_success() {
        let runner = FakeRunner::new().with_program("dnf");
        let out = runner.run(&["dnf", "makecache"]);
        assert!(out.succeeded());
        assert!(out.stdout.is_empty());
    }

    #[test]
    fn scripted_output_wins() {
        let runner = FakeRunner::new()
            .with_program("uname")
            .with_output("uname -m", CommandOutput::success("s390x\n"));
        assert_eq!(runner.run(&["uname", "-m"]).trimmed(), "s390x");
    }

    #[test]
    fn script_output_matches_every_wrapper() {
        let runner = FakeRunner::new()
            .with_programs(&["sudo", "su"])
            .with_script_output("yum makecache", CommandOutput::failure(1));
        assert!(!runner.run(&["sh", "-c", "yum makecache"]).succeeded());
        assert!(!runner
            .run(&["sudo", "-E", "sh", "-c", "yum makecache"])
            .succeeded());
        assert!(!runner.run(&["su", "-c", "yum makecache"]).succeeded());
    }

    #[test]
    fn scripts_strip_wrappers() {
        let runner = FakeRunner::new().with_program("sudo");
        runner.run(&["uname", "-m"]);
        runner.run(&["sh", "-c", "apt-get -qq update"]);
        runner.run(&["sudo", "-E", "sh", "-c", "chmod a+r /etc/apt/keyrings/docker.asc"]);

        assert_eq!(
            runner.scripts(),
            vec![
                "apt-get -qq update".to_string(),
                "chmod a+r /etc/apt/keyrings/docker.asc".to_string()
            ]
        );
        assert_eq!(runner.invocations().len(), 3);
    }
}
