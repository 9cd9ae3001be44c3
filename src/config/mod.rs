//! Run configuration.
//!
//! Configuration is assembled once from parsed arguments and the process
//! environment, validated, and then only ever read.
//!
//! - [`install`] - [`InstallConfig`] for the package-manager install
//! - [`rootless`] - [`RootlessConfig`] for the static rootless install

pub mod install;
pub mod rootless;

pub use install::InstallConfig;
pub use rootless::RootlessConfig;

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::InstallError;

/// Base URL of the official package repositories.
pub const DEFAULT_DOWNLOAD_URL: &str = "https://download.docker.com";

/// Default name of the RPM repository descriptor.
pub const DEFAULT_REPO_FILE: &str = "docker-ce.repo";

/// Release track.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    /// General availability releases.
    #[default]
    Stable,
    /// Pre-releases.
    Test,
}

impl Channel {
    /// The channel name as used in repository paths.
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Stable => "stable",
            Channel::Test => "test",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Channel {
    type Err = InstallError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "stable" => Ok(Channel::Stable),
            "test" => Ok(Channel::Test),
            other => Err(InstallError::UnsupportedConfiguration {
                setting: "CHANNEL".to_string(),
                value: other.to_string(),
                expected: "stable, test".to_string(),
            }),
        }
    }
}

/// Package mirror.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum Mirror {
    /// No mirror: the default (or `DOWNLOAD_URL`) base URL.
    #[default]
    None,
    /// Alibaba Cloud.
    Aliyun,
    /// Azure China Cloud.
    AzureChinaCloud,
}

impl Mirror {
    /// Base URL served by the mirror, if it is one.
    pub fn url(&self) -> Option<&'static str> {
        match self {
            Mirror::None => None,
            Mirror::Aliyun => Some("https://mirrors.aliyun.com/docker-ce"),
            Mirror::AzureChinaCloud => Some("https://mirror.azure.cn/docker-ce"),
        }
    }

    /// Resolve the download base URL; a mirror wins over any override.
    pub fn download_url(&self, override_url: Option<&str>) -> String {
        match (self.url(), override_url.filter(|url| !url.is_empty())) {
            (Some(mirror), _) => mirror.to_string(),
            (None, Some(custom)) => custom.trim_end_matches('/').to_string(),
            (None, None) => DEFAULT_DOWNLOAD_URL.to_string(),
        }
    }
}

impl FromStr for Mirror {
    type Err = InstallError;

    /// Mirror names are case-sensitive; an empty name selects no mirror.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" => Ok(Mirror::None),
            "Aliyun" => Ok(Mirror::Aliyun),
            "AzureChinaCloud" => Ok(Mirror::AzureChinaCloud),
            other => Err(InstallError::UnsupportedConfiguration {
                setting: "mirror".to_string(),
                value: other.to_string(),
                expected: "Aliyun, AzureChinaCloud".to_string(),
            }),
        }
    }
}
