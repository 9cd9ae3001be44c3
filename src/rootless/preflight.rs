//! Rootless preflight validation.
//!
//! Checks run in three phases:
//!
//! 1. Environment checks (Linux, non-root, writable directories, no
//!    reachable rootful daemon). The first failure aborts.
//! 2. An existing rootless daemon ends the run successfully with upgrade
//!    instructions.
//! 3. Capability probes (uidmap, iptables, kernel sysctls) are all run and
//!    their gaps collected; then the subordinate id tables are checked.
//!    A missing id range fails with the collected gaps attached, otherwise
//!    any gaps fail together as one block.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::RootlessConfig;
use crate::detection::Platform;
use crate::error::{InstallError, Result};
use crate::shell::{is_executable, is_writable, Host};

use super::requirement::{CapabilityStatus, PreflightRequirement};

/// Daemon binary whose presence means rootless mode is already installed.
pub const DAEMON: &str = "dockerd";

/// Result of a successful preflight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreflightOutcome {
    /// The host can take a rootless install.
    Ready,
    /// A rootless daemon already exists; nothing will be installed.
    AlreadyInstalled {
        /// Path of the existing daemon binary.
        daemon: PathBuf,
    },
}

/// Validates that the host can run the engine as the current user.
pub struct RootlessPreflightChecker<'h, 'a> {
    host: &'h Host<'a>,
    config: &'h RootlessConfig,
}

impl<'h, 'a> RootlessPreflightChecker<'h, 'a> {
    /// Create a checker.
    pub fn new(host: &'h Host<'a>, config: &'h RootlessConfig) -> Self {
        Self { host, config }
    }

    /// Run every phase.
    pub fn check(&self) -> Result<PreflightOutcome> {
        self.check_environment()?;

        let daemon = self.config.bin_dir.join(DAEMON);
        if is_executable(&daemon) {
            debug!(daemon = %daemon.display(), "existing rootless daemon");
            return Ok(PreflightOutcome::AlreadyInstalled { daemon });
        }

        let gaps = self.capability_gaps();
        debug!(gaps = gaps.len(), "capability probes finished");

        let user = self.host.user_name();
        let uid = self.host.user_id();
        for table in ["/etc/subuid", "/etc/subgid"] {
            if !self.has_id_range(table, &user, &uid) {
                return Err(InstallError::IdentityMappingMissing {
                    example: format!("{}:100000:65536", user),
                    user,
                    table: PathBuf::from(table),
                    pending: gaps,
                });
            }
        }

        if gaps.is_empty() {
            Ok(PreflightOutcome::Ready)
        } else {
            Err(InstallError::MissingCapability { requirements: gaps })
        }
    }

    /// Fail-fast checks on the user, directories and running daemons.
    pub fn check_environment(&self) -> Result<()> {
        let platform = Platform::detect(self.host);
        if !platform.is_linux() {
            return Err(InstallError::UnsupportedPlatform {
                platform: platform.kernel.clone(),
                message: format!("Rootless Docker cannot be installed on {}", platform.kernel),
            });
        }

        if self.host.user_id() == "0" && !self.config.force {
            return Err(InstallError::PrivilegeError {
                message: "Refusing to install rootless Docker as the root user".to_string(),
            });
        }

        let home = &self.config.home;
        if !home.is_dir() {
            return Err(abort(format!(
                "Aborting because HOME directory {} does not exist",
                home.display()
            )));
        }

        let bin = &self.config.bin_dir;
        if bin.is_dir() {
            if !is_writable(bin) {
                return Err(abort(format!(
                    "Aborting because {} is not writable",
                    bin.display()
                )));
            }
        } else if !is_writable(home) {
            return Err(abort(format!(
                "Aborting because HOME (\"{}\") is not writable",
                home.display()
            )));
        }

        if is_writable(&self.host.path("/var/run/docker.sock")) && !self.config.force {
            return Err(abort(
                "Aborting because rootful Docker is running and accessible. \
                 Set FORCE_ROOTLESS_INSTALL=1 to ignore."
                    .to_string(),
            ));
        }

        let runtime_writable = self
            .config
            .xdg_runtime_dir
            .as_deref()
            .is_some_and(is_writable);
        if !runtime_writable && self.systemd_user_session() {
            let runtime = self
                .config
                .xdg_runtime_dir
                .as_deref()
                .map(Path::display)
                .map(|dir| dir.to_string())
                .unwrap_or_default();
            return Err(abort(format!(
                "Aborting because systemd was detected but XDG_RUNTIME_DIR (\"{}\") does not exist or is not writable\n\
                 Hint: this could happen if you changed users with 'su' or 'sudo'. To work around this:\n\
                 - try again by first running with root privileges 'loginctl enable-linger <user>' where <user> is the unprivileged user and export XDG_RUNTIME_DIR to the value of RuntimePath as shown by 'loginctl show-user <user>'\n\
                 - or simply log back in as the desired unprivileged user (ssh works for remote machines)",
                runtime
            )));
        }

        Ok(())
    }

    /// Run every capability probe and collect the gaps, in probe order.
    pub fn capability_gaps(&self) -> Vec<PreflightRequirement> {
        [
            self.check_newuidmap(),
            self.check_iptables(),
            self.check_ip_tables_module(),
            self.check_userns_clone(),
            self.check_max_user_namespaces(),
        ]
        .into_iter()
        .filter_map(|status| match status {
            CapabilityStatus::Satisfied => None,
            CapabilityStatus::Missing(requirement) => Some(requirement),
        })
        .collect()
    }

    /// Whether a per-user systemd instance is running.
    pub fn systemd_user_session(&self) -> bool {
        self.host
            .run(&["systemctl", "--user", "daemon-reload"])
            .succeeded()
    }

    fn check_newuidmap(&self) -> CapabilityStatus {
        if self.host.command_exists("newuidmap") {
            return CapabilityStatus::Satisfied;
        }
        let commands = if self.host.command_exists("apt-get") {
            vec!["apt-get install -y uidmap".to_string()]
        } else if self.host.command_exists("dnf") {
            vec!["dnf install -y shadow-utils".to_string()]
        } else if self.host.command_exists("yum") {
            vec![
                "curl -o /etc/yum.repos.d/vbatts-shadow-utils-newxidmap-epel-7.repo https://copr.fedorainfracloud.org/coprs/vbatts/shadow-utils-newxidmap/repo/epel-7/vbatts-shadow-utils-newxidmap-epel-7.repo".to_string(),
                "yum install -y shadow-utils46-newxidmap".to_string(),
            ]
        } else {
            vec!["# newuidmap binary not found. Please install with a package manager.".to_string()]
        };
        CapabilityStatus::Missing(PreflightRequirement::new("newuidmap", commands))
    }

    fn check_iptables(&self) -> CapabilityStatus {
        if self.config.skip_iptables
            || self.host.command_exists("iptables")
            || self.host.path("/sbin/iptables").is_file()
            || self.host.path("/usr/sbin/iptables").is_file()
        {
            return CapabilityStatus::Satisfied;
        }
        let command = if self.host.command_exists("apt-get") {
            "apt-get install -y iptables"
        } else if self.host.command_exists("dnf") {
            "dnf install -y iptables"
        } else if self.host.command_exists("yum") {
            "yum install -y iptables"
        } else {
            "# iptables binary not found. Please install with a package manager."
        };
        CapabilityStatus::Missing(PreflightRequirement::new(
            "iptables",
            vec![command.to_string()],
        ))
    }

    fn check_ip_tables_module(&self) -> CapabilityStatus {
        if self.config.skip_iptables {
            return CapabilityStatus::Satisfied;
        }
        let loaded = self.host.run(&["lsmod"]).stdout.contains("ip_tables");
        let builtin = || {
            let release = self.host.uname("-r");
            self.host
                .read(&format!("/lib/modules/{}/modules.builtin", release))
                .is_some_and(|modules| modules.contains("ip_tables"))
        };
        if loaded || builtin() {
            CapabilityStatus::Satisfied
        } else {
            CapabilityStatus::Missing(PreflightRequirement::new(
                "ip_tables",
                vec!["modprobe ip_tables".to_string()],
            ))
        }
    }

    fn check_userns_clone(&self) -> CapabilityStatus {
        match self.host.read("/proc/sys/kernel/unprivileged_userns_clone") {
            Some(value) if value.trim() != "1" => {
                CapabilityStatus::Missing(PreflightRequirement::new(
                    "unprivileged_userns_clone",
                    sysctl_commands("50-rootless.conf", "kernel.unprivileged_userns_clone = 1"),
                ))
            }
            _ => CapabilityStatus::Satisfied,
        }
    }

    fn check_max_user_namespaces(&self) -> CapabilityStatus {
        match self.host.read("/proc/sys/user/max_user_namespaces") {
            Some(value) if value.trim() == "0" => {
                CapabilityStatus::Missing(PreflightRequirement::new(
                    "max_user_namespaces",
                    sysctl_commands("51-rootless.conf", "user.max_user_namespaces = 28633"),
                ))
            }
            _ => CapabilityStatus::Satisfied,
        }
    }

    /// Whether `table` has a record for the user by name or numeric id.
    fn has_id_range(&self, table: &str, user: &str, uid: &str) -> bool {
        let Some(content) = self.host.read(table) else {
            return false;
        };
        let by_name = format!("{}:", user);
        let by_id = format!("{}:", uid);
        content.lines().any(|line| {
            (!user.is_empty() && line.starts_with(&by_name))
                || (!uid.is_empty() && line.starts_with(&by_id))
        })
    }
}

fn sysctl_commands(file: &str, setting: &str) -> Vec<String> {
    vec![
        format!("cat <<EOT > /etc/sysctl.d/{}", file),
        setting.to_string(),
        "EOT".to_string(),
        "sysctl --system".to_string(),
    ]
}

fn abort(message: String) -> InstallError {
    InstallError::PreflightAborted { message }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Channel;
    use crate::shell::{CommandOutput, FakeRunner};
    use crate::version::VersionSpec;
    use std::fs;
    use tempfile::TempDir;

    struct Fixture {
        root: TempDir,
        home: TempDir,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                root: TempDir::new().unwrap(),
                home: TempDir::new().unwrap(),
            }
        }

        fn file(self, path: &str, content: &str) -> Self {
            let full = self.root.path().join(path.trim_start_matches('/'));
            fs::create_dir_all(full.parent().unwrap()).unwrap();
            fs::write(full, content).unwrap();
            self
        }

        fn config(&self) -> RootlessConfig {
            RootlessConfig {
                channel: Channel::Stable,
                version: VersionSpec::latest(),
                static_version: "28.0.1".into(),
                download_url: "https://download.docker.com".into(),
                force: false,
                skip_iptables: false,
                home: self.home.path().to_path_buf(),
                bin_dir: self.home.path().join("bin"),
                xdg_runtime_dir: None,
                dry_run: false,
            }
        }
    }

    fn alice() -> FakeRunner {
        FakeRunner::new()
            .with_programs(&["uname", "id", "lsmod"])
            .with_output("uname -s", CommandOutput::success("Linux\n"))
            .with_output("uname -r", CommandOutput::success("6.1.0\n"))
            .with_output("id -u", CommandOutput::success("1000\n"))
            .with_output("id -un", CommandOutput::success("alice\n"))
            .with_output("lsmod", CommandOutput::success("ip_tables 32768 0\n"))
    }

    fn healthy(fixture: Fixture) -> Fixture {
        fixture
            .file("/etc/subuid", "alice:100000:65536\n")
            .file("/etc/subgid", "alice:100000:65536\n")
    }

    #[test]
    fn ready_when_everything_present() {
        let fixture = healthy(Fixture::new());
        let runner = alice().with_programs(&["newuidmap", "iptables"]);
        let host = Host::with_root(&runner, fixture.root.path());
        let config = fixture.config();

        let outcome = RootlessPreflightChecker::new(&host, &config).check().unwrap();
        assert_eq!(outcome, PreflightOutcome::Ready);
    }

    #[test]
    fn non_linux_is_rejected() {
        let fixture = Fixture::new();
        let runner = alice().with_output("uname -s", CommandOutput::success("Darwin\n"));
        let host = Host::with_root(&runner, fixture.root.path());
        let config = fixture.config();

        let err = RootlessPreflightChecker::new(&host, &config).check().unwrap_err();
        assert!(err.to_string().contains("cannot be installed on Darwin"));
    }

    #[test]
    fn root_without_force_is_rejected() {
        let fixture = Fixture::new();
        let runner = alice().with_output("id -u", CommandOutput::success("0\n"));
        let host = Host::with_root(&runner, fixture.root.path());
        let config = fixture.config();

        let err = RootlessPreflightChecker::new(&host, &config).check().unwrap_err();
        assert!(matches!(err, InstallError::PrivilegeError { .. }));
    }

    #[test]
    fn root_with_force_passes_user_check() {
        let fixture = healthy(Fixture::new()).file("/etc/subuid", "0:100000:65536\n");
        let fixture = fixture.file("/etc/subgid", "0:100000:65536\n");
        let runner = alice()
            .with_programs(&["newuidmap", "iptables"])
            .with_output("id -u", CommandOutput::success("0\n"))
            .with_output("id -un", CommandOutput::success("root\n"));
        let host = Host::with_root(&runner, fixture.root.path());
        let config = RootlessConfig {
            force: true,
            ..fixture.config()
        };

        let outcome = RootlessPreflightChecker::new(&host, &config).check().unwrap();
        assert_eq!(outcome, PreflightOutcome::Ready);
    }

    #[test]
    fn missing_home_aborts() {
        let fixture = Fixture::new();
        let runner = alice();
        let host = Host::with_root(&runner, fixture.root.path());
        let config = RootlessConfig {
            home: fixture.home.path().join("nope"),
            ..fixture.config()
        };

        let err = RootlessPreflightChecker::new(&host, &config).check().unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn existing_daemon_short_circuits() {
        let fixture = Fixture::new();
        let bin = fixture.home.path().join("bin");
        fs::create_dir_all(&bin).unwrap();
        let daemon = bin.join(DAEMON);
        fs::write(&daemon, "#!/bin/sh\n").unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&daemon, fs::Permissions::from_mode(0o755)).unwrap();
        }
        let runner = alice();
        let host = Host::with_root(&runner, fixture.root.path());
        let config = fixture.config();

        let outcome = RootlessPreflightChecker::new(&host, &config).check().unwrap();
        assert_eq!(outcome, PreflightOutcome::AlreadyInstalled { daemon });
    }

    #[test]
    fn systemd_without_runtime_dir_aborts() {
        let fixture = Fixture::new();
        let runner = alice().with_program("systemctl");
        let host = Host::with_root(&runner, fixture.root.path());
        let config = fixture.config();

        let err = RootlessPreflightChecker::new(&host, &config).check().unwrap_err();
        assert!(err.to_string().contains("XDG_RUNTIME_DIR"));
        assert!(err.to_string().contains("loginctl enable-linger"));
    }

    #[test]
    fn gaps_are_aggregated() {
        let fixture = healthy(Fixture::new())
            .file("/proc/sys/kernel/unprivileged_userns_clone", "0\n")
            .file("/proc/sys/user/max_user_namespaces", "0\n");
        let runner = alice()
            .with_program("apt-get")
            .with_output("lsmod", CommandOutput::success("nf_tables\n"));
        let host = Host::with_root(&runner, fixture.root.path());
        let config = fixture.config();

        let err = RootlessPreflightChecker::new(&host, &config).check().unwrap_err();
        let InstallError::MissingCapability { requirements } = &err else {
            panic!("expected MissingCapability, got {err:?}");
        };
        let names: Vec<&str> = requirements.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "newuidmap",
                "iptables",
                "ip_tables",
                "unprivileged_userns_clone",
                "max_user_namespaces"
            ]
        );
        let text = err.to_string();
        assert!(text.contains("apt-get install -y uidmap"));
        assert!(text.contains("apt-get install -y iptables"));
        assert!(text.contains("user.max_user_namespaces = 28633"));
    }

    #[test]
    fn skip_iptables_disables_iptables_checks() {
        let fixture = healthy(Fixture::new());
        let runner = alice()
            .with_program("newuidmap")
            .with_output("lsmod", CommandOutput::success(""));
        let host = Host::with_root(&runner, fixture.root.path());
        let config = RootlessConfig {
            skip_iptables: true,
            ..fixture.config()
        };

        let outcome = RootlessPreflightChecker::new(&host, &config).check().unwrap();
        assert_eq!(outcome, PreflightOutcome::Ready);
    }

    #[test]
    fn builtin_ip_tables_module_counts() {
        let fixture = healthy(Fixture::new()).file(
            "/lib/modules/6.1.0/modules.builtin",
            "kernel/net/ipv4/netfilter/ip_tables.ko\n",
        );
        let runner = alice()
            .with_programs(&["newuidmap", "iptables"])
            .with_output("lsmod", CommandOutput::success(""));
        let host = Host::with_root(&runner, fixture.root.path());
        let config = fixture.config();

        assert!(RootlessPreflightChecker::new(&host, &config)
            .capability_gaps()
            .is_empty());
    }

    #[test]
    fn sysctl_checks_skip_absent_proc_entries() {
        let fixture = Fixture::new().file("/proc/sys/kernel/unprivileged_userns_clone", "1\n");
        let runner = alice().with_programs(&["newuidmap", "iptables"]);
        let host = Host::with_root(&runner, fixture.root.path());
        let config = fixture.config();

        assert!(RootlessPreflightChecker::new(&host, &config)
            .capability_gaps()
            .is_empty());
    }

    #[test]
    fn missing_subuid_reports_pending_gaps() {
        let fixture = Fixture::new().file("/etc/subgid", "alice:100000:65536\n");
        let runner = alice().with_programs(&["iptables", "dnf"]);
        let host = Host::with_root(&runner, fixture.root.path());
        let config = fixture.config();

        let err = RootlessPreflightChecker::new(&host, &config).check().unwrap_err();
        let text = err.to_string();
        assert!(matches!(err, InstallError::IdentityMappingMissing { .. }));
        assert!(text.contains("dnf install -y shadow-utils"));
        assert!(text.contains("from /etc/subuid"));
        assert!(text.contains("echo \"alice:100000:65536\" >> /etc/subuid"));
    }

    #[test]
    fn subgid_is_checked_after_subuid() {
        let fixture = Fixture::new().file("/etc/subuid", "1000:100000:65536\n");
        let runner = alice().with_programs(&["newuidmap", "iptables"]);
        let host = Host::with_root(&runner, fixture.root.path());
        let config = fixture.config();

        let err = RootlessPreflightChecker::new(&host, &config).check().unwrap_err();
        let InstallError::IdentityMappingMissing { table, pending, .. } = err else {
            panic!("expected IdentityMappingMissing");
        };
        assert_eq!(table, PathBuf::from("/etc/subgid"));
        assert!(pending.is_empty());
    }

    #[test]
    fn yum_uidmap_uses_copr_repo() {
        let fixture = healthy(Fixture::new());
        let runner = alice().with_programs(&["yum", "iptables"]);
        let host = Host::with_root(&runner, fixture.root.path());
        let config = fixture.config();

        let gaps = RootlessPreflightChecker::new(&host, &config).capability_gaps();
        assert_eq!(gaps.len(), 1);
        assert_eq!(gaps[0].commands.len(), 2);
        assert!(gaps[0].commands[1].contains("shadow-utils46-newxidmap"));
    }
}
