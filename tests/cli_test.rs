//! Integration tests for CLI argument parsing.
// The cargo_bin function is marked deprecated in favor of cargo_bin! macro,
// but both work correctly. Suppressing until assert_cmd stabilizes the new API.
#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;

/// A command isolated from installer environment variables.
fn dockstrap() -> Command {
    let mut cmd = Command::new(cargo_bin("dockstrap"));
    for var in [
        "CHANNEL",
        "MIRROR",
        "VERSION",
        "DOWNLOAD_URL",
        "REPO_FILE",
        "DRY_RUN",
        "FORCE_ROOTLESS_INSTALL",
        "SKIP_IPTABLES",
        "DOCKER_BIN",
    ] {
        cmd.env_remove(var);
    }
    cmd.env("NO_COLOR", "1");
    cmd
}

#[test]
fn cli_shows_help() -> Result<(), Box<dyn std::error::Error>> {
    dockstrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Unattended Docker Engine installer"))
        .stdout(predicate::str::contains("rootless"));
    Ok(())
}

#[test]
fn cli_shows_version() -> Result<(), Box<dyn std::error::Error>> {
    dockstrap()
        .arg("-V")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    Ok(())
}

#[test]
fn install_help_lists_flags() -> Result<(), Box<dyn std::error::Error>> {
    dockstrap()
        .args(["install", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--mirror"))
        .stdout(predicate::str::contains("--dry-run"))
        .stdout(predicate::str::contains("--version <VERSION>"));
    Ok(())
}

#[test]
fn unknown_mirror_fails_before_detection() -> Result<(), Box<dyn std::error::Error>> {
    dockstrap()
        .args(["--mirror", "Foo"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unsupported mirror 'Foo'"))
        .stderr(predicate::str::contains("Aliyun, AzureChinaCloud"))
        .stdout(predicate::str::contains("Executing docker install script").not());
    Ok(())
}

#[test]
fn unknown_channel_fails() -> Result<(), Box<dyn std::error::Error>> {
    dockstrap()
        .args(["install", "--channel", "nightly"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unsupported CHANNEL 'nightly'"));
    Ok(())
}

#[test]
fn channel_from_environment_is_validated() -> Result<(), Box<dyn std::error::Error>> {
    dockstrap()
        .env("CHANNEL", "edge")
        .arg("install")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("'edge'"));
    Ok(())
}

#[test]
fn numeric_boolean_environment_values_are_accepted() -> Result<(), Box<dyn std::error::Error>> {
    dockstrap()
        .env("DRY_RUN", "1")
        .args(["install", "--channel", "nightly"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unsupported CHANNEL 'nightly'"));
    dockstrap()
        .env("FORCE_ROOTLESS_INSTALL", "1")
        .env("SKIP_IPTABLES", "1")
        .env("DRY_RUN", "0")
        .args(["rootless", "--channel", "edge"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unsupported CHANNEL 'edge'"));
    Ok(())
}

#[test]
fn mirror_from_environment_is_validated() -> Result<(), Box<dyn std::error::Error>> {
    dockstrap()
        .env("MIRROR", "Foo")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unsupported mirror 'Foo'"));
    Ok(())
}

#[test]
fn unknown_flags_are_reported_not_fatal() -> Result<(), Box<dyn std::error::Error>> {
    dockstrap()
        .args(["--bogus", "--mirror", "Foo"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Ignoring unknown flag: --bogus"))
        .stderr(predicate::str::contains("Unsupported mirror 'Foo'"));
    Ok(())
}

#[test]
fn rootless_rejects_unknown_channel() -> Result<(), Box<dyn std::error::Error>> {
    dockstrap()
        .args(["rootless", "--channel", "edge"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unsupported CHANNEL 'edge'"));
    Ok(())
}

#[test]
fn completions_bash() -> Result<(), Box<dyn std::error::Error>> {
    dockstrap()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("dockstrap"));
    Ok(())
}

#[test]
fn completions_rejects_unknown_shell() -> Result<(), Box<dyn std::error::Error>> {
    dockstrap()
        .args(["completions", "tcsh"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("tcsh"));
    Ok(())
}
