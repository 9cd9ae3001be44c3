//! Linux distribution detection.
//!
//! Detection never fails: every lookup that cannot be answered leaves the
//! corresponding field empty. Whether an empty id is acceptable is decided
//! by the caller.

use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::shell::{shell_var, Host};

/// Identified distribution and release.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Distribution {
    /// Lower-cased distribution id (`ubuntu`, `centos`, ...), empty if unknown.
    pub id: String,
    /// Codename (Debian family) or numeric release, empty if unknown.
    pub version: String,
}

impl Distribution {
    /// Create a distribution descriptor.
    pub fn new(id: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            version: version.into(),
        }
    }

    /// Whether no distribution id could be determined.
    pub fn is_unknown(&self) -> bool {
        self.id.is_empty()
    }

    /// Package family this distribution is served by.
    pub fn family(&self) -> DistroFamily {
        DistroFamily::of(&self.id)
    }
}

impl fmt::Display for Distribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.id, self.version)
    }
}

/// Packaging family, one variant per supported repository layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DistroFamily {
    /// ubuntu, debian, raspbian.
    Debian,
    /// centos, rhel, fedora.
    Rpm,
    /// SUSE Linux Enterprise Server.
    Sles,
    /// Anything else, including an empty id.
    Unsupported,
}

impl DistroFamily {
    /// Classify a distribution id.
    pub fn of(id: &str) -> Self {
        match id {
            "ubuntu" | "debian" | "raspbian" => DistroFamily::Debian,
            "centos" | "rhel" | "fedora" => DistroFamily::Rpm,
            "sles" => DistroFamily::Sles,
            _ => DistroFamily::Unsupported,
        }
    }
}

/// Result of distribution detection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DistributionReport {
    /// The distribution packages are installed for.
    pub distribution: Distribution,
    /// What the host called itself before upstream reconciliation, when
    /// `lsb_release` reported a different upstream.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forked_from: Option<Distribution>,
}

/// Map a Debian major release number to its codename.
///
/// Unknown numbers are returned unchanged.
///
/// ```
/// use dockstrap::detection::map_debian_numeric;
///
/// assert_eq!(map_debian_numeric("12"), "bookworm");
/// assert_eq!(map_debian_numeric("7"), "7");
/// ```
pub fn map_debian_numeric(major: &str) -> String {
    match major {
        "13" => "trixie",
        "12" => "bookworm",
        "11" => "bullseye",
        "10" => "buster",
        "9" => "stretch",
        "8" => "jessie",
        other => other,
    }
    .to_string()
}

/// Reads host identification files and commands.
pub struct DistributionDetector<'h, 'a> {
    host: &'h Host<'a>,
}

impl<'h, 'a> DistributionDetector<'h, 'a> {
    /// Create a detector for a host.
    pub fn new(host: &'h Host<'a>) -> Self {
        Self { host }
    }

    /// Detect the distribution, reconciling forked distributions.
    pub fn detect(&self) -> DistributionReport {
        let id = self.host.os_release("ID").to_lowercase();
        let version = self.version_for(&id);
        let primary = Distribution::new(id, version);
        debug!(id = %primary.id, version = %primary.version, "primary distribution");

        self.reconcile_fork(primary)
    }

    /// Release string for a distribution id, empty if undetectable.
    pub fn version_for(&self, id: &str) -> String {
        match id {
            "ubuntu" => {
                let codename = self.lsb_field("--codename");
                if codename.is_empty() {
                    self.host
                        .read("/etc/lsb-release")
                        .and_then(|content| shell_var(&content, "DISTRIB_CODENAME"))
                        .unwrap_or_default()
                } else {
                    codename
                }
            }
            "debian" | "raspbian" => self.debian_codename(),
            "centos" | "rhel" => self.host.os_release("VERSION_ID"),
            _ => {
                let release = self.lsb_field("--release");
                if release.is_empty() {
                    self.host.os_release("VERSION_ID")
                } else {
                    release
                }
            }
        }
    }

    /// Codename from `/etc/debian_version`, empty if unreadable.
    fn debian_codename(&self) -> String {
        let Some(content) = self.host.read("/etc/debian_version") else {
            return String::new();
        };
        let line = content.lines().next().unwrap_or_default();
        let before_slash = line.split('/').next().unwrap_or_default();
        let major = before_slash.split('.').next().unwrap_or_default().trim();
        map_debian_numeric(major)
    }

    /// Second tab-separated field of `lsb_release <flag>`.
    fn lsb_field(&self, flag: &str) -> String {
        if !self.host.command_exists("lsb_release") {
            return String::new();
        }
        let output = self.host.run(&["lsb_release", flag]);
        output
            .stdout
            .lines()
            .next()
            .and_then(|line| line.split('\t').nth(1))
            .map(|field| field.trim().to_string())
            .unwrap_or_default()
    }

    fn reconcile_fork(&self, primary: Distribution) -> DistributionReport {
        if !self.host.command_exists("lsb_release") {
            return DistributionReport {
                distribution: primary,
                forked_from: None,
            };
        }

        let upstream = self.host.run(&["lsb_release", "-a", "-u"]);
        if upstream.succeeded() {
            let text = format!("{}{}", upstream.stdout, upstream.stderr).to_lowercase();
            let distribution = Distribution::new(
                upstream_field(&text, "id"),
                upstream_field(&text, "codename"),
            );
            debug!(id = %distribution.id, version = %distribution.version, "upstream distribution");
            return DistributionReport {
                distribution,
                forked_from: Some(primary),
            };
        }

        let debian_like = self.host.read("/etc/debian_version").is_some()
            && primary.id != "ubuntu"
            && primary.id != "raspbian";
        if debian_like {
            let id = if primary.id == "osmc" {
                "raspbian"
            } else {
                "debian"
            };
            let distribution = Distribution::new(id, self.debian_codename());
            debug!(from = %primary.id, to = %distribution.id, "coerced to debian family");
            return DistributionReport {
                distribution,
                forked_from: None,
            };
        }

        DistributionReport {
            distribution: primary,
            forked_from: None,
        }
    }
}

/// Value after the first `:` on the first line containing `needle`, with
/// all whitespace removed.
fn upstream_field(text: &str, needle: &str) -> String {
    text.lines()
        .find(|line| line.contains(needle))
        .and_then(|line| line.split(':').nth(1))
        .map(|value| value.chars().filter(|c| !c.is_whitespace()).collect())
        .unwrap_or_default()
}
