//! Kernel and architecture facts from `uname`.

use serde::Serialize;

use crate::shell::Host;

/// What `uname` reports about the host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Platform {
    /// Kernel name (`uname -s`).
    pub kernel: String,
    /// Kernel release (`uname -r`).
    pub kernel_release: String,
    /// Machine architecture (`uname -m`).
    pub arch: String,
}

impl Platform {
    /// Query the host.
    pub fn detect(host: &Host<'_>) -> Self {
        Self {
            kernel: host.uname("-s"),
            kernel_release: host.uname("-r"),
            arch: host.uname("-m"),
        }
    }

    /// Windows Subsystem for Linux (WSL 1 reports `Microsoft`, WSL 2 `microsoft`).
    pub fn is_wsl(&self) -> bool {
        self.kernel_release.contains("microsoft") || self.kernel_release.contains("Microsoft")
    }

    /// macOS.
    pub fn is_darwin(&self) -> bool {
        self.kernel.to_lowercase().contains("darwin")
    }

    /// Linux.
    pub fn is_linux(&self) -> bool {
        self.kernel == "Linux"
    }

    /// IBM Z.
    pub fn is_s390x(&self) -> bool {
        self.arch == "s390x"
    }
}
