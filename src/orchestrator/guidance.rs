//! Operator-facing notices.

use crate::version::{VersionSpec, COMPOSE_GATE};

/// Shown when a `docker` binary is already on PATH.
pub const EXISTING_DOCKER_WARNING: &str = "\
Warning: the \"docker\" command appears to already exist on this system.

If you already have Docker installed, this installer can cause trouble, which is
why we're displaying this warning and provide the opportunity to cancel the
installation.

If you installed the current Docker package using this installer and are using it
again to update Docker, you can ignore this message, but be aware that the
installer resets any custom changes in the deb and rpm repo configuration
files to match the parameters passed to it.

You may press Ctrl+C now to abort this installer.";

/// Shown on Windows Subsystem for Linux.
pub const WSL_WARNING: &str = "\
WSL DETECTED: We recommend using Docker Desktop for Windows.
Please get Docker Desktop from https://www.docker.com/products/docker-desktop/

You may press Ctrl+C now to abort this installer.";

/// Shown after an end-of-life notice.
pub const ABORT_HINT: &str =
    "Press Ctrl+C now to abort this installer, or wait for the installation to continue.";

const RULE: &str =
    "================================================================================";

/// Lines printed after a successful install.
pub fn post_install_guidance(version: &VersionSpec) -> Vec<String> {
    let mut lines = vec![String::new(), RULE.to_string(), String::new()];
    if version.gte(COMPOSE_GATE) {
        lines.extend(
            [
                "To run Docker as a non-privileged user, consider setting up the",
                "Docker daemon in rootless mode for your user:",
                "",
                "    dockerd-rootless-setuptool.sh install",
                "",
                "Visit https://docs.docker.com/go/rootless/ to learn about rootless mode.",
                "",
            ]
            .map(String::from),
        );
    }
    lines.extend(
        [
            "",
            "To run the Docker daemon as a fully privileged service, but granting non-root",
            "users access, refer to https://docs.docker.com/go/daemon-access/",
            "",
            "WARNING: Access to the remote API on a privileged Docker daemon is equivalent",
            "         to root access on the host. Refer to the following article for details:",
            "         https://docs.docker.com/go/attack-surface/",
            "",
            RULE,
            "",
        ]
        .map(String::from),
    );
    lines
}
