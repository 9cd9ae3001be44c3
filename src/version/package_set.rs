//! Feature-gated package selection.

use serde::Serialize;

use super::{VersionSpec, BUILDX_GATE, COMPOSE_GATE, SPLIT_CLI_GATE};

/// Engine package.
pub const ENGINE: &str = "docker-ce";
/// CLI package.
pub const CLI: &str = "docker-ce-cli";
/// Container runtime companion.
pub const CONTAINERD: &str = "containerd.io";
/// Compose v2 plugin.
pub const COMPOSE_PLUGIN: &str = "docker-compose-plugin";
/// Rootless mode helpers.
pub const ROOTLESS_EXTRAS: &str = "docker-ce-rootless-extras";
/// Buildx plugin.
pub const BUILDX_PLUGIN: &str = "docker-buildx-plugin";

/// Concrete package versions found in the index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PinnedVersions {
    /// Version of the engine package.
    pub engine: Option<String>,
    /// Version of the CLI package, if the index carries a matching one.
    pub cli: Option<String>,
}

/// A package name and optional exact version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Package {
    pub name: String,
    pub version: Option<String>,
}

impl Package {
    /// Unpinned package.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            version: None,
        }
    }

    /// Package pinned to `version` when one is given.
    pub fn pinned(name: &str, version: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            version: version.map(str::to_string),
        }
    }

    /// Render as `name<separator>version`, or just `name` when unpinned.
    pub fn render(&self, separator: &str) -> String {
        match &self.version {
            Some(version) => format!("{}{}{}", self.name, separator, version),
            None => self.name.clone(),
        }
    }
}

/// Ordered packages to install.
///
/// Packages can only be appended; construction applies the version gates in
/// ascending order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PackageSet {
    packages: Vec<Package>,
}

impl PackageSet {
    /// Build the set for a requested version.
    ///
    /// Gates are judged against the requested version; an unpinned request
    /// passes every gate.
    pub fn build(requested: &VersionSpec, pins: &PinnedVersions) -> Self {
        let engine = pins.engine.as_deref();
        let mut set = Self::default();

        set.push(Package::pinned(ENGINE, engine));
        if requested.gte(SPLIT_CLI_GATE) {
            set.push(Package::pinned(CLI, pins.cli.as_deref()));
            set.push(Package::new(CONTAINERD));
        }
        if requested.gte(COMPOSE_GATE) {
            set.push(Package::new(COMPOSE_PLUGIN));
            set.push(Package::pinned(ROOTLESS_EXTRAS, engine));
        }
        if requested.gte(BUILDX_GATE) {
            set.push(Package::new(BUILDX_PLUGIN));
        }
        set
    }

    fn push(&mut self, package: Package) {
        if !self.contains(&package.name) {
            self.packages.push(package);
        }
    }

    /// Packages in install order.
    pub fn packages(&self) -> &[Package] {
        &self.packages
    }

    /// Package names in install order.
    pub fn names(&self) -> Vec<&str> {
        self.packages.iter().map(|p| p.name.as_str()).collect()
    }

    /// Whether a package is in the set.
    pub fn contains(&self, name: &str) -> bool {
        self.packages.iter().any(|p| p.name == name)
    }

    /// Version a package is pinned to, if any.
    pub fn version_of(&self, name: &str) -> Option<&str> {
        self.packages
            .iter()
            .find(|p| p.name == name)
            .and_then(|p| p.version.as_deref())
    }

    /// Space-separated package arguments.
    pub fn render(&self, separator: &str) -> String {
        self.packages
            .iter()
            .map(|p| p.render(separator))
            .collect::<Vec<_>>()
            .join(" ")
    }
}
