//! Host access: files and commands.
//!
//! [`Host`] pairs a [`CommandRunner`] with a filesystem root. System files
//! such as `/etc/os-release` are resolved under that root, which is `/` in
//! production and a temporary directory in tests.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::trace;

use super::command::{CommandOutput, CommandRunner};

/// View of the machine being provisioned.
pub struct Host<'a> {
    runner: &'a dyn CommandRunner,
    root: PathBuf,
}

impl<'a> Host<'a> {
    /// Host rooted at `/`.
    pub fn new(runner: &'a dyn CommandRunner) -> Self {
        Self::with_root(runner, "/")
    }

    /// Host whose system files live under `root`.
    pub fn with_root(runner: &'a dyn CommandRunner, root: impl Into<PathBuf>) -> Self {
        Self {
            runner,
            root: root.into(),
        }
    }

    /// The command runner.
    pub fn runner(&self) -> &'a dyn CommandRunner {
        self.runner
    }

    /// Resolve an absolute system path under the host root.
    pub fn path(&self, absolute: &str) -> PathBuf {
        self.root.join(absolute.trim_start_matches('/'))
    }

    /// Read a system file, `None` when missing or unreadable.
    pub fn read(&self, absolute: &str) -> Option<String> {
        let content = fs::read_to_string(self.path(absolute)).ok();
        trace!(path = absolute, found = content.is_some(), "read host file");
        content
    }

    /// Whether a system path exists.
    pub fn exists(&self, absolute: &str) -> bool {
        self.path(absolute).exists()
    }

    /// Run a command.
    pub fn run(&self, argv: &[&str]) -> CommandOutput {
        self.runner.run(argv)
    }

    /// Whether a program is on PATH.
    pub fn command_exists(&self, program: &str) -> bool {
        self.runner.exists(program)
    }

    /// Trimmed `uname <flag>` output, empty when unavailable.
    pub fn uname(&self, flag: &str) -> String {
        let output = self.run(&["uname", flag]);
        if output.succeeded() {
            output.trimmed().to_string()
        } else {
            String::new()
        }
    }

    /// Name of the effective user (`id -un`), empty when unavailable.
    pub fn user_name(&self) -> String {
        self.run(&["id", "-un"]).trimmed().to_string()
    }

    /// Numeric id of the effective user (`id -u`), empty when unavailable.
    pub fn user_id(&self) -> String {
        self.run(&["id", "-u"]).trimmed().to_string()
    }

    /// A field from `/etc/os-release`, empty when absent.
    pub fn os_release(&self, key: &str) -> String {
        self.read("/etc/os-release")
            .and_then(|content| shell_var(&content, key))
            .unwrap_or_default()
    }
}

/// Value of `KEY=value` in a shell-style variables file, quotes removed.
pub fn shell_var(content: &str, key: &str) -> Option<String> {
    content.lines().find_map(|line| {
        let (name, value) = line.trim().split_once('=')?;
        if name.trim() == key {
            Some(value.trim().trim_matches('"').trim_matches('\'').to_string())
        } else {
            None
        }
    })
}

/// Whether the current process may write to `path`.
pub fn is_writable(path: &Path) -> bool {
    #[cfg(unix)]
    {
        use std::ffi::CString;
        use std::os::unix::ffi::OsStrExt;

        let Ok(c_path) = CString::new(path.as_os_str().as_bytes()) else {
            return false;
        };
        // SAFETY: `c_path` is a valid NUL-terminated string for the duration of the call.
        unsafe { libc::access(c_path.as_ptr(), libc::W_OK) == 0 }
    }

    #[cfg(not(unix))]
    {
        fs::metadata(path)
            .map(|meta| !meta.permissions().readonly())
            .unwrap_or(false)
    }
}

/// Check whether a file has executable permission bits set.
#[cfg(unix)]
pub fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

/// Check whether a file exists; permission bits are not meaningful here.
#[cfg(not(unix))]
pub fn is_executable(path: &Path) -> bool {
    path.is_file()
}
