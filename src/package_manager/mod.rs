//! System package-manager adapters.
//!
//! One adapter per repository family drives the host package manager
//! through the [`Executor`]. The RPM adapter covers three generations of
//! tooling, picked by probing PATH rather than by distribution name.
//!
//! - [`apt`] - Debian, Ubuntu, Raspbian
//! - [`rpm`] - CentOS, RHEL, Fedora (dnf5, dnf, yum)

pub mod apt;
pub mod rpm;

pub use apt::AptAdapter;
pub use rpm::RpmAdapter;

use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::config::InstallConfig;
use crate::detection::{Distribution, DistroFamily, Platform};
use crate::error::{InstallError, Result};
use crate::shell::{Executor, Host};
use crate::ui::UserInterface;
use crate::version::PackageSet;

/// Concrete package manager driving the install.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageManagerKind {
    Apt,
    Dnf5,
    Dnf,
    Yum,
}

impl PackageManagerKind {
    /// Probe the RPM tool generations in order: dnf5, dnf, yum.
    pub fn probe_rpm(host: &Host<'_>) -> Self {
        let kind = if host.command_exists("dnf5") {
            Self::Dnf5
        } else if host.command_exists("dnf") {
            Self::Dnf
        } else {
            Self::Yum
        };
        debug!(kind = %kind, "probed rpm package manager");
        kind
    }

    /// Name of the package manager.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Apt => "apt",
            Self::Dnf5 => "dnf5",
            Self::Dnf => "dnf",
            Self::Yum => "yum",
        }
    }
}

impl fmt::Display for PackageManagerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Uniform contract over the package-manager families.
pub trait PackageManagerAdapter {
    /// Which package manager this adapter drives.
    fn kind(&self) -> PackageManagerKind;

    /// Install prerequisites and write the repository descriptor.
    ///
    /// Existing descriptors are overwritten.
    fn configure_repository(&self, exec: &Executor<'_>, ui: &mut dyn UserInterface)
        -> Result<()>;

    /// Rebuild the package index.
    fn refresh_index(&self, exec: &Executor<'_>, ui: &mut dyn UserInterface) -> Result<()>;

    /// Find the exact index version of `package` matching a requested version.
    ///
    /// Fails with `VersionNotFound` when nothing matches.
    fn resolve_version(
        &self,
        exec: &Executor<'_>,
        ui: &mut dyn UserInterface,
        package: &str,
        version: &str,
    ) -> Result<String>;

    /// Install a package set.
    fn install(
        &self,
        exec: &Executor<'_>,
        ui: &mut dyn UserInterface,
        packages: &PackageSet,
    ) -> Result<()>;
}

/// The adapter selected for a host.
pub enum Adapter<'c> {
    Apt(AptAdapter<'c>),
    Rpm(RpmAdapter<'c>),
}

impl<'c> Adapter<'c> {
    /// Choose the adapter for a detected distribution.
    ///
    /// s390x on the RPM family and SLES are rejected here, as is any
    /// distribution outside the supported families.
    pub fn select(
        host: &Host<'_>,
        config: &'c InstallConfig,
        distribution: &'c Distribution,
        platform: &Platform,
    ) -> Result<Self> {
        match distribution.family() {
            DistroFamily::Debian => Ok(Adapter::Apt(AptAdapter::new(config, distribution))),
            DistroFamily::Rpm => {
                if platform.is_s390x() {
                    return Err(InstallError::UnsupportedPlatform {
                        platform: format!("{} s390x", distribution.id),
                        message: "Effective v27.5, please consult RHEL distro statement for s390x support."
                            .to_string(),
                    });
                }
                let kind = PackageManagerKind::probe_rpm(host);
                Ok(Adapter::Rpm(RpmAdapter::new(config, distribution, kind)))
            }
            DistroFamily::Sles => {
                let message = if platform.is_s390x() {
                    "Effective v27.5, please consult SLES distro statement for s390x support."
                } else {
                    "Packages for SLES are currently only available for s390x"
                };
                Err(InstallError::UnsupportedPlatform {
                    platform: "sles".to_string(),
                    message: message.to_string(),
                })
            }
            DistroFamily::Unsupported => Err(InstallError::UnsupportedPlatform {
                platform: distribution.id.clone(),
                message: "Unsupported distribution".to_string(),
            }),
        }
    }

    fn inner(&self) -> &dyn PackageManagerAdapter {
        match self {
            Adapter::Apt(apt) => apt,
            Adapter::Rpm(rpm) => rpm,
        }
    }
}

impl PackageManagerAdapter for Adapter<'_> {
    fn kind(&self) -> PackageManagerKind {
        self.inner().kind()
    }

    fn configure_repository(
        &self,
        exec: &Executor<'_>,
        ui: &mut dyn UserInterface,
    ) -> Result<()> {
        self.inner().configure_repository(exec, ui)
    }

    fn refresh_index(&self, exec: &Executor<'_>, ui: &mut dyn UserInterface) -> Result<()> {
        self.inner().refresh_index(exec, ui)
    }

    fn resolve_version(
        &self,
        exec: &Executor<'_>,
        ui: &mut dyn UserInterface,
        package: &str,
        version: &str,
    ) -> Result<String> {
        self.inner().resolve_version(exec, ui, package, version)
    }

    fn install(
        &self,
        exec: &Executor<'_>,
        ui: &mut dyn UserInterface,
        packages: &PackageSet,
    ) -> Result<()> {
        self.inner().install(exec, ui, packages)
    }
}
