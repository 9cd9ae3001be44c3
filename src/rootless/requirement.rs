//! Rootless capability gaps and their remediation.
//!
//! Each failed capability probe produces a [`PreflightRequirement`] carrying
//! the shell commands an administrator runs to close the gap. Gaps are
//! collected before reporting so one run shows every fix at once.

use std::fmt;

/// Header printed above the aggregated remediation block.
const MISSING_HEADER: &str = "# Missing system requirements. Please run following commands to
# install the requirements and run this installer again.
# Alternatively iptables checks can be disabled with SKIP_IPTABLES=1";

/// A missing host capability and the commands that provide it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreflightRequirement {
    /// Short capability name, e.g. `newuidmap`.
    pub name: String,
    /// Commands to run as root, in order.
    pub commands: Vec<String>,
}

impl PreflightRequirement {
    /// Create a requirement.
    pub fn new(name: &str, commands: Vec<String>) -> Self {
        Self {
            name: name.to_string(),
            commands,
        }
    }
}

impl fmt::Display for PreflightRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// The outcome of a single capability probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CapabilityStatus {
    /// The capability is present.
    Satisfied,
    /// The capability is absent; running the requirement's commands adds it.
    Missing(PreflightRequirement),
}

impl CapabilityStatus {
    /// Whether the capability is present.
    pub fn is_satisfied(&self) -> bool {
        matches!(self, CapabilityStatus::Satisfied)
    }
}

/// Render gaps as one copy-pasteable block piped to `sudo sh -x`.
pub fn render_requirements(requirements: &[PreflightRequirement]) -> String {
    let mut block = String::new();
    block.push_str(MISSING_HEADER);
    block.push_str("\n\ncat <<EOF | sudo sh -x\n");
    for requirement in requirements {
        for command in &requirement.commands {
            block.push_str(command);
            block.push('\n');
        }
    }
    block.push_str("EOF");
    block
}
