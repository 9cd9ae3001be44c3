//! Resolution of a requested version into installable packages.

use serde::Serialize;
use tracing::debug;

use crate::error::{InstallError, Result};
use crate::package_manager::PackageManagerAdapter;
use crate::shell::Executor;
use crate::ui::UserInterface;

use super::package_set::{CLI, ENGINE};
use super::{PackageSet, PinnedVersions, VersionSpec, SPLIT_CLI_GATE};

/// Packages to install, with the index versions they were pinned to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolvedPackageSet {
    pub pins: PinnedVersions,
    pub packages: PackageSet,
}

/// Resolves a [`VersionSpec`] once per run.
///
/// `resolve` consumes the resolver, so a run cannot query the index twice.
pub struct VersionResolver {
    requested: VersionSpec,
}

impl VersionResolver {
    /// Create a resolver for a requested version.
    pub fn new(requested: VersionSpec) -> Self {
        Self { requested }
    }

    /// Query the index (when pinned) and build the package set.
    ///
    /// In dry-run the index is never queried: pinning is skipped with a
    /// warning and the gates still apply to the requested version.
    pub fn resolve(
        self,
        adapter: &dyn PackageManagerAdapter,
        exec: &Executor<'_>,
        ui: &mut dyn UserInterface,
    ) -> Result<ResolvedPackageSet> {
        let mut pins = PinnedVersions::default();

        if let Some(version) = self.requested.requested() {
            if exec.is_dry_run() {
                ui.warning("VERSION pinning is not supported in DRY_RUN");
            } else {
                ui.message(&format!(
                    "INFO: Searching repository for VERSION '{}'",
                    version
                ));
                pins.engine = Some(adapter.resolve_version(exec, ui, ENGINE, version)?);

                if self.requested.gte(SPLIT_CLI_GATE) {
                    pins.cli = match adapter.resolve_version(exec, ui, CLI, version) {
                        Ok(found) => Some(found),
                        Err(InstallError::VersionNotFound { .. }) => {
                            debug!(version, "no matching cli package, installing unpinned");
                            None
                        }
                        Err(err) => return Err(err),
                    };
                }
            }
        }

        let packages = PackageSet::build(&self.requested, &pins);
        debug!(packages = ?packages.names(), "resolved package set");
        Ok(ResolvedPackageSet { pins, packages })
    }
}
