//! Version handling.
//!
//! - [`compare`] - CalVer/SemVer comparison used by the package gates
//! - [`package_set`] - Feature-gated package list construction
//! - [`resolver`] - Pinned version lookup against the package index

pub mod compare;
pub mod package_set;
pub mod resolver;

pub use compare::{compare, version_compare};
pub use package_set::{Package, PackageSet, PinnedVersions};
pub use resolver::{ResolvedPackageSet, VersionResolver};

use serde::Serialize;

/// Minimum version shipping the CLI and containerd as separate packages.
pub const SPLIT_CLI_GATE: &str = "18.09";
/// Minimum version shipping the compose plugin and rootless extras.
pub const COMPOSE_GATE: &str = "20.10";
/// Minimum version shipping the buildx plugin.
pub const BUILDX_GATE: &str = "23.0";

/// A requested engine version; `None` means "latest in channel".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VersionSpec(Option<String>);

impl VersionSpec {
    /// Normalise user input: one leading `v` is dropped and an empty value
    /// means "latest".
    pub fn parse(raw: Option<&str>) -> Self {
        let version = raw
            .map(str::trim)
            .map(|v| v.strip_prefix('v').unwrap_or(v))
            .filter(|v| !v.is_empty())
            .map(str::to_string);
        Self(version)
    }

    /// Latest version in the channel.
    pub fn latest() -> Self {
        Self(None)
    }

    /// The pinned version, if any.
    pub fn requested(&self) -> Option<&str> {
        self.0.as_deref()
    }

    /// Whether no version was pinned.
    pub fn is_latest(&self) -> bool {
        self.0.is_none()
    }

    /// Whether the requested version is at least `want`.
    ///
    /// Always true when nothing was pinned: "latest" is newer than any gate.
    pub fn gte(&self, want: &str) -> bool {
        match &self.0 {
            None => true,
            Some(requested) => version_compare(requested, want),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_strips_leading_v() {
        assert_eq!(VersionSpec::parse(Some("v20.10")).requested(), Some("20.10"));
        assert_eq!(VersionSpec::parse(Some("23.0.1")).requested(), Some("23.0.1"));
    }

    #[test]
    fn parse_treats_empty_as_latest() {
        assert!(VersionSpec::parse(Some("")).is_latest());
        assert!(VersionSpec::parse(Some("v")).is_latest());
        assert!(VersionSpec::parse(None).is_latest());
    }

    #[test]
    fn latest_passes_every_gate() {
        let latest = VersionSpec::latest();
        for want in ["0.0", SPLIT_CLI_GATE, COMPOSE_GATE, BUILDX_GATE, "99.99"] {
            assert!(latest.gte(want));
        }
    }

    #[test]
    fn pinned_version_is_gated() {
        let pinned = VersionSpec::parse(Some("19.03"));
        assert!(pinned.gte(SPLIT_CLI_GATE));
        assert!(!pinned.gte(COMPOSE_GATE));
        assert!(!pinned.gte(BUILDX_GATE));
    }
}
