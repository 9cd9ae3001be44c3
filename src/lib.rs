//! Dockstrap - Unattended Docker Engine installer.
//!
//! Dockstrap detects the host distribution, configures the Docker package
//! repository for its package manager and installs a version-gated set of
//! engine packages. A separate rootless flow installs static binaries for
//! an unprivileged user after validating the host.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Immutable run configuration built from arguments
//! - [`detection`] - Distribution, platform and end-of-life detection
//! - [`error`] - Error types and result aliases
//! - [`orchestrator`] - The install pipeline and its pacing delays
//! - [`package_manager`] - apt and dnf/yum adapters
//! - [`rootless`] - Rootless preflight checks and installation
//! - [`shell`] - Host access, command execution and interrupts
//! - [`ui`] - Spinners and terminal output
//! - [`version`] - Version comparison, resolution and package sets
//!
//! # Example
//!
//! ```
//! use dockstrap::version::{version_compare, PackageSet, PinnedVersions, VersionSpec};
//!
//! assert!(version_compare("20.10", "18.09"));
//!
//! let set = PackageSet::build(&VersionSpec::parse(Some("19.03")), &PinnedVersions::default());
//! assert_eq!(set.names(), ["docker-ce", "docker-ce-cli", "containerd.io"]);
//! ```
//!
//! For end-to-end runs against a fake host, see the integration tests.

pub mod cli;
pub mod config;
pub mod detection;
pub mod error;
pub mod orchestrator;
pub mod package_manager;
pub mod rootless;
pub mod shell;
pub mod ui;
pub mod version;

pub use error::{InstallError, Result};
