//! Configuration for the rootless (unprivileged) install flow.

use std::env::VarError;
use std::path::PathBuf;

use serde::Serialize;

use crate::cli::args::RootlessArgs;
use crate::error::Result;
use crate::version::VersionSpec;

use super::{Channel, Mirror};

/// Static release installed from the stable channel when none is pinned.
pub const STABLE_LATEST: &str = "28.0.1";

/// Static release installed from the test channel when none is pinned.
pub const TEST_LATEST: &str = "28.1.0-rc.1";

/// Immutable settings for one rootless install run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RootlessConfig {
    /// Release track of the static archives.
    pub channel: Channel,
    /// Requested engine version.
    pub version: VersionSpec,
    /// Concrete static release to download.
    pub static_version: String,
    /// Base URL for the static archives.
    pub download_url: String,
    /// Allow running as root and alongside a rootful daemon.
    pub force: bool,
    /// Skip the iptables checks.
    pub skip_iptables: bool,
    /// The user's home directory (empty when `HOME` is unset).
    pub home: PathBuf,
    /// Where binaries are installed.
    pub bin_dir: PathBuf,
    /// Per-user runtime directory, if set.
    pub xdg_runtime_dir: Option<PathBuf>,
    /// Print mutating commands instead of running them.
    pub dry_run: bool,
}

impl RootlessConfig {
    /// Build from arguments and the process environment.
    pub fn from_args(args: &RootlessArgs) -> Result<Self> {
        Self::from_args_with_env(args, |key: &str| std::env::var(key))
    }

    /// Build with a custom environment lookup.
    ///
    /// Only `HOME` and `XDG_RUNTIME_DIR` are read through `env_fn`; every
    /// other input arrives through `args`.
    pub fn from_args_with_env<F>(args: &RootlessArgs, env_fn: F) -> Result<Self>
    where
        F: Fn(&str) -> std::result::Result<String, VarError>,
    {
        let channel: Channel = match args.channel.as_deref() {
            None | Some("") => Channel::default(),
            Some(channel) => channel.parse()?,
        };
        let version = VersionSpec::parse(args.version.as_deref());
        let static_version = match version.requested() {
            Some(pinned) => pinned.to_string(),
            None => match channel {
                Channel::Stable => STABLE_LATEST.to_string(),
                Channel::Test => TEST_LATEST.to_string(),
            },
        };

        let home = env_fn("HOME").map(PathBuf::from).unwrap_or_default();
        let bin_dir = args
            .bin
            .clone()
            .filter(|bin| !bin.as_os_str().is_empty())
            .unwrap_or_else(|| home.join("bin"));
        let xdg_runtime_dir = env_fn("XDG_RUNTIME_DIR")
            .ok()
            .filter(|dir| !dir.is_empty())
            .map(PathBuf::from);

        Ok(Self {
            channel,
            version,
            static_version,
            download_url: Mirror::None.download_url(args.download_url.as_deref()),
            force: args.force,
            skip_iptables: args.skip_iptables,
            home,
            bin_dir,
            xdg_runtime_dir,
            dry_run: args.dry_run,
        })
    }

    /// URL of a static archive for the given architecture.
    pub fn archive_url(&self, arch: &str, archive: &str) -> String {
        format!(
            "{}/linux/static/{}/{}/{}-{}.tgz",
            self.download_url, self.channel, arch, archive, self.static_version
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env_with<'a>(
        vars: &'a [(&'a str, &'a str)],
    ) -> impl Fn(&str) -> std::result::Result<String, VarError> + 'a {
        move |key: &str| {
            vars.iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| value.to_string())
                .ok_or(VarError::NotPresent)
        }
    }

    #[test]
    fn bin_defaults_under_home() {
        let config = RootlessConfig::from_args_with_env(
            &RootlessArgs::default(),
            env_with(&[("HOME", "/home/alice")]),
        )
        .unwrap();
        assert_eq!(config.bin_dir, PathBuf::from("/home/alice/bin"));
        assert_eq!(config.static_version, STABLE_LATEST);
        assert!(config.xdg_runtime_dir.is_none());
    }

    #[test]
    fn explicit_bin_and_runtime_dir() {
        let args = RootlessArgs {
            bin: Some(PathBuf::from("/opt/docker/bin")),
            ..Default::default()
        };
        let config = RootlessConfig::from_args_with_env(
            &args,
            env_with(&[("HOME", "/home/alice"), ("XDG_RUNTIME_DIR", "/run/user/1000")]),
        )
        .unwrap();
        assert_eq!(config.bin_dir, PathBuf::from("/opt/docker/bin"));
        assert_eq!(config.xdg_runtime_dir, Some(PathBuf::from("/run/user/1000")));
    }

    #[test]
    fn test_channel_uses_prerelease() {
        let args = RootlessArgs {
            channel: Some("test".to_string()),
            ..Default::default()
        };
        let config = RootlessConfig::from_args_with_env(&args, env_with(&[])).unwrap();
        assert_eq!(config.static_version, TEST_LATEST);
        assert_eq!(config.home, PathBuf::new());
    }

    #[test]
    fn pinned_version_wins() {
        let args = RootlessArgs {
            version: Some("v27.5.1".to_string()),
            ..Default::default()
        };
        let config = RootlessConfig::from_args_with_env(&args, env_with(&[])).unwrap();
        assert_eq!(config.static_version, "27.5.1");
        assert_eq!(
            config.archive_url("x86_64", "docker-rootless-extras"),
            "https://download.docker.com/linux/static/stable/x86_64/docker-rootless-extras-27.5.1.tgz"
        );
    }

    #[test]
    fn bad_channel_is_rejected() {
        let args = RootlessArgs {
            channel: Some("nightly".to_string()),
            ..Default::default()
        };
        assert!(RootlessConfig::from_args_with_env(&args, env_with(&[])).is_err());
    }
}
