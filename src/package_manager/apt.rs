//! APT adapter (Debian, Ubuntu, Raspbian).

use tracing::debug;

use crate::config::InstallConfig;
use crate::detection::Distribution;
use crate::error::{InstallError, Result};
use crate::shell::Executor;
use crate::ui::UserInterface;
use crate::version::PackageSet;

use super::{PackageManagerAdapter, PackageManagerKind};

/// Packages needed to fetch the signing key.
const PREREQUISITES: &str = "ca-certificates curl";

/// Signing key location referenced by the sources entry.
pub const KEYRING: &str = "/etc/apt/keyrings/docker.asc";

/// Sources list entry written by [`AptAdapter::configure_repository`].
pub const SOURCES_LIST: &str = "/etc/apt/sources.list.d/docker.list";

/// Drives `apt-get` with the non-interactive front-end.
pub struct AptAdapter<'c> {
    config: &'c InstallConfig,
    distribution: &'c Distribution,
}

impl<'c> AptAdapter<'c> {
    /// Create an adapter.
    pub fn new(config: &'c InstallConfig, distribution: &'c Distribution) -> Self {
        Self {
            config,
            distribution,
        }
    }

    /// The `deb` line for the configured mirror, release and channel.
    ///
    /// The architecture is expanded by the shell when the line is written.
    pub fn repository_line(&self) -> String {
        format!(
            "deb [arch=$(dpkg --print-architecture) signed-by={}] {} {} {}",
            KEYRING,
            self.config.apt_repo_url(&self.distribution.id),
            self.distribution.version,
            self.config.channel
        )
    }

    /// The index query used to pin `package` to `version`.
    pub fn search_command(package: &str, version: &str) -> String {
        format!(
            "apt-cache madison {} | grep '{}' | head -1 | awk '{{$1=$1}};1' | cut -d' ' -f 3",
            package,
            search_pattern(version)
        )
    }
}

/// Grep pattern for a requested version in `apt-cache madison` output.
///
/// `-ce-` becomes `~ce~.*` and remaining hyphens become `.*`, so `17.06.2-ce-1`
/// also matches `17.06.2~ce-0~ubuntu`.
pub fn search_pattern(version: &str) -> String {
    version.replace("-ce-", "~ce~.*").replace('-', ".*")
}

impl PackageManagerAdapter for AptAdapter<'_> {
    fn kind(&self) -> PackageManagerKind {
        PackageManagerKind::Apt
    }

    fn configure_repository(
        &self,
        exec: &Executor<'_>,
        ui: &mut dyn UserInterface,
    ) -> Result<()> {
        let gpg_url = format!("{}/gpg", self.config.apt_repo_url(&self.distribution.id));
        exec.run(ui, "apt-get -qq update >/dev/null")?;
        exec.run(
            ui,
            &format!(
                "DEBIAN_FRONTEND=noninteractive apt-get -y -qq install {} >/dev/null",
                PREREQUISITES
            ),
        )?;
        exec.run(ui, "install -m 0755 -d /etc/apt/keyrings")?;
        exec.run(ui, &format!("curl -fsSL \"{}\" -o {}", gpg_url, KEYRING))?;
        exec.run(ui, &format!("chmod a+r {}", KEYRING))?;
        exec.run(
            ui,
            &format!("echo \"{}\" > {}", self.repository_line(), SOURCES_LIST),
        )
    }

    fn refresh_index(&self, exec: &Executor<'_>, ui: &mut dyn UserInterface) -> Result<()> {
        exec.run(ui, "apt-get -qq update >/dev/null")
    }

    fn resolve_version(
        &self,
        exec: &Executor<'_>,
        ui: &mut dyn UserInterface,
        package: &str,
        version: &str,
    ) -> Result<String> {
        let search = Self::search_command(package, version);
        ui.message(&format!("INFO: {}", search));

        let found = exec.capture(&search)?.trim().to_string();
        debug!(package, version, found = %found, "apt version search");
        if found.is_empty() {
            return Err(InstallError::VersionNotFound {
                version: version.to_string(),
                manager: "apt-cache madison".to_string(),
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
                "DEBIAN_FRONTEND=noninteractive apt-get -y -qq install {} >/dev/null",
                packages.render("=")
            ),
        )
    }
}
