//! RPM adapter (CentOS, RHEL, Fedora).
//!
//! Three tool generations are supported. `dnf5` has its own config-manager
//! syntax; `dnf` and `yum` share the classic one. Installs always go through
//! `dnf` when any dnf is present.

use tracing::debug;

use crate::config::{Channel, InstallConfig};
use crate::detection::Distribution;
use crate::error::{InstallError, Result};
use crate::shell::Executor;
use crate::ui::UserInterface;
use crate::version::PackageSet;

use super::{PackageManagerAdapter, PackageManagerKind};

/// Stale descriptors removed before a dnf/yum repository is added.
const STALE_REPO_FILES: &str = "/etc/yum.repos.d/docker-ce.repo  /etc/yum.repos.d/docker-ce-staging.repo";

/// Drives dnf5, dnf or yum.
pub struct RpmAdapter<'c> {
    config: &'c InstallConfig,
    distribution: &'c Distribution,
    kind: PackageManagerKind,
}

impl<'c> RpmAdapter<'c> {
    /// Create an adapter for a probed tool generation.
    pub fn new(
        config: &'c InstallConfig,
        distribution: &'c Distribution,
        kind: PackageManagerKind,
    ) -> Self {
        Self {
            config,
            distribution,
            kind,
        }
    }

    /// The binary used for queries and installs.
    fn manager(&self) -> &'static str {
        match self.kind {
            PackageManagerKind::Yum => "yum",
            _ => "dnf",
        }
    }

    fn install_flags(&self) -> &'static str {
        match self.kind {
            PackageManagerKind::Yum => "-y -q",
            _ => "-y -q --best",
        }
    }

    /// Release token package versions must carry for this distribution.
    pub fn package_suffix(&self) -> String {
        if self.distribution.id == "fedora" {
            format!("fc{}", self.distribution.version)
        } else {
            "el".to_string()
        }
    }

    /// Grep pattern for a requested version in `list --showduplicates` output.
    pub fn search_pattern(&self, version: &str) -> String {
        format!(
            "{}.*{}",
            version.replace("-ce-", "\\.ce.*").replace('-', ".*"),
            self.package_suffix()
        )
    }

    /// The index query used to pin `package` to `version`.
    pub fn search_command(&self, package: &str, version: &str) -> String {
        format!(
            "{} list --showduplicates {} | grep '{}' | tail -1 | awk '{{print $2}}'",
            self.manager(),
            package,
            self.search_pattern(version)
        )
    }

    /// Scripts that add the repository and select the channel.
    pub fn repository_scripts(&self) -> Vec<String> {
        let url = self.config.repo_file_url(&self.distribution.id);
        let channel = self.config.channel;
        let mut scripts = Vec::new();

        match self.kind {
            PackageManagerKind::Dnf5 => {
                scripts.push(
                    "dnf -y -q --setopt=install_weak_deps=False install dnf-plugins-core".into(),
                );
                scripts.push(format!(
                    "dnf5 config-manager addrepo --overwrite --save-filename=docker-ce.repo --from-repofile='{}'",
                    url
                ));
                if channel != Channel::Stable {
                    scripts.push("dnf5 config-manager setopt \"docker-ce-*.enabled=0\"".into());
                    scripts.push(format!(
                        "dnf5 config-manager setopt \"docker-ce-{}.enabled=1\"",
                        channel
                    ));
                }
            }
            PackageManagerKind::Dnf => {
                scripts.push(
                    "dnf -y -q --setopt=install_weak_deps=False install dnf-plugins-core".into(),
                );
                scripts.push(format!("rm -f {}", STALE_REPO_FILES));
                scripts.push(format!("dnf config-manager --add-repo {}", url));
                if channel != Channel::Stable {
                    scripts.push("dnf config-manager --set-disabled \"docker-ce-*\"".into());
                    scripts.push(format!(
                        "dnf config-manager --set-enabled \"docker-ce-{}\"",
                        channel
                    ));
                }
            }
            _ => {
                scripts.push("yum -y -q install yum-utils".into());
                scripts.push(format!("rm -f {}", STALE_REPO_FILES));
                scripts.push(format!("yum-config-manager --add-repo {}", url));
                if channel != Channel::Stable {
                    scripts.push("yum-config-manager --disable \"docker-ce-*\"".into());
                    scripts.push(format!("yum-config-manager --enable \"docker-ce-{}\"", channel));
                }
            }
        }
        scripts
    }
}

/// Drop an `epoch:` prefix from a package version.
pub fn strip_epoch(version: &str) -> &str {
    version
        .split_once(':')
        .map(|(_, rest)| rest)
        .unwrap_or(version)
}

impl PackageManagerAdapter for RpmAdapter<'_> {
    fn kind(&self) -> PackageManagerKind {
        self.kind
    }

    fn configure_repository(
        &self,
        exec: &Executor<'_>,
        ui: &mut dyn UserInterface,
    ) -> Result<()> {
        for script in self.repository_scripts() {
            exec.run(ui, &script)?;
        }
        Ok(())
    }

    fn refresh_index(&self, exec: &Executor<'_>, ui: &mut dyn UserInterface) -> Result<()> {
        let cache = match self.kind {
            PackageManagerKind::Yum => "yum makecache",
            _ => "dnf makecache",
        };
        exec.run(ui, cache)
    }

    fn resolve_version(
        &self,
        exec: &Executor<'_>,
        ui: &mut dyn UserInterface,
        package: &str,
        version: &str,
    ) -> Result<String> {
        let search = self.search_command(package, version);
        ui.message(&format!("INFO: {}", search));

        let output = exec.capture(&search)?;
        let found = strip_epoch(output.trim()).to_string();
        debug!(package, version, found = %found, "rpm version search");
        if found.is_empty() {
            return Err(InstallError::VersionNotFound {
                version: version.to_string(),
                manager: format!("{} list", self.manager()),
                search,
            });
        }
        Ok(found)
    }

    fn install(
        &self,
        exec: &Executor<'_>,
        ui: &mut dyn UserInterface,
        packages: &PackageSet,
    ) -> Result<()> {
        exec.run(
            ui,
            &format!(
                "{} {} install {}",
                self.manager(),
                self.install_flags(),
                packages.render("-")
            ),
        )
    }
}
