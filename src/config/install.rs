//! Configuration for the package-manager install flow.

use serde::Serialize;

use crate::cli::args::InstallArgs;
use crate::error::Result;
use crate::version::VersionSpec;

use super::{Channel, Mirror, DEFAULT_REPO_FILE};

/// Immutable settings for one install run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstallConfig {
    /// Release track.
    pub channel: Channel,
    /// Selected mirror.
    pub mirror: Mirror,
    /// Resolved base URL for keys, repositories and packages.
    pub download_url: String,
    /// RPM repository descriptor name.
    pub repo_file: String,
    /// Requested engine version.
    pub version: VersionSpec,
    /// Print mutating commands instead of running them.
    pub dry_run: bool,
}

impl Default for InstallConfig {
    fn default() -> Self {
        Self {
            channel: Channel::Stable,
            mirror: Mirror::None,
            download_url: Mirror::None.download_url(None),
            repo_file: DEFAULT_REPO_FILE.to_string(),
            version: VersionSpec::latest(),
            dry_run: false,
        }
    }
}

impl InstallConfig {
    /// Validate arguments into a configuration.
    ///
    /// Fails with `UnsupportedConfiguration` on an unknown mirror or channel
    /// without touching the host.
    pub fn from_args(args: &InstallArgs) -> Result<Self> {
        let mirror: Mirror = args.mirror.as_deref().unwrap_or_default().parse()?;
        let channel: Channel = match args.channel.as_deref() {
            None | Some("") => Channel::default(),
            Some(channel) => channel.parse()?,
        };
        let repo_file = args
            .repo_file
            .clone()
            .filter(|file| !file.is_empty())
            .unwrap_or_else(|| DEFAULT_REPO_FILE.to_string());

        Ok(Self {
            channel,
            mirror,
            download_url: mirror.download_url(args.download_url.as_deref()),
            repo_file,
            version: VersionSpec::parse(args.version.as_deref()),
            dry_run: args.dry_run,
        })
    }

    /// URL of the RPM repository descriptor for a distribution.
    pub fn repo_file_url(&self, distro_id: &str) -> String {
        format!("{}/linux/{}/{}", self.download_url, distro_id, self.repo_file)
    }

    /// URL of the apt repository for a distribution.
    pub fn apt_repo_url(&self, distro_id: &str) -> String {
        format!("{}/linux/{}", self.download_url, distro_id)
    }
}
