//! Library integration tests.

use dockstrap::InstallError;

#[test]
fn error_types_are_public() {
    let err = InstallError::UnsupportedPlatform {
        platform: "sles".into(),
        message: "Unsupported distribution".into(),
    };
    assert!(err.to_string().contains("sles"));
    assert_eq!(err.exit_code(), 1);
    assert_eq!(InstallError::Interrupted.exit_code(), 130);
}

#[test]
fn result_type_alias_is_public() {
    fn test_fn() -> dockstrap::Result<()> {
        Ok(())
    }
    assert!(test_fn().is_ok());
}

#[test]
fn cli_types_are_public() {
    use dockstrap::cli::{Cli, Commands};
    use clap::Parser;

    let cli = Cli::parse_from(["dockstrap", "detect", "--json"]);

    if let Some(Commands::Detect(args)) = cli.command {
        assert!(args.json);
    } else {
        panic!("Expected Detect command");
    }
}

#[test]
fn lenient_parsing_is_public() {
    let (cli, warnings) =
        dockstrap::cli::parse_lenient(["dockstrap", "--no-such-flag", "--dry-run"]).unwrap();
    assert!(cli.install.dry_run);
    assert_eq!(warnings.len(), 1);
}

#[test]
fn version_gates_are_public() {
    use dockstrap::version::{PackageSet, PinnedVersions, VersionSpec};

    let names = |v: &str| {
        PackageSet::build(&VersionSpec::parse(Some(v)), &PinnedVersions::default())
            .names()
            .len()
    };
    assert_eq!(names("17.06"), 1);
    assert_eq!(names("19.03"), 3);
    assert_eq!(names("21.10"), 5);
    assert_eq!(names("24.0"), 6);
}
