//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct; [`parse_lenient`] wraps
//! clap so unknown flags are reported instead of aborting the run.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::builder::FalseyValueParser;
use clap::error::{ContextKind, ContextValue, ErrorKind};
use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Dockstrap - Unattended Docker Engine installer.
///
/// Without a subcommand, behaves like `install`.
#[derive(Debug, Parser)]
#[command(name = "dockstrap")]
#[command(author, version, about, long_about = None)]
#[command(disable_version_flag = true)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// Print version
    #[arg(short = 'V', action = clap::ArgAction::Version)]
    pub print_version: Option<bool>,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(flatten)]
    pub install: InstallArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Install Docker Engine from the package repository (default)
    Install(InstallArgs),

    /// Install Docker Engine for the current user without root
    Rootless(RootlessArgs),

    /// Print what the installer detects about this host
    Detect(DetectArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `install` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct InstallArgs {
    /// Release channel (stable, test)
    #[arg(long, env = "CHANNEL")]
    pub channel: Option<String>,

    /// Download mirror (Aliyun, AzureChinaCloud)
    #[arg(long, env = "MIRROR")]
    pub mirror: Option<String>,

    /// Docker version to pin (e.g. 24.0 or 20.10.24)
    #[arg(long, env = "VERSION", value_name = "VERSION")]
    pub version: Option<String>,

    /// Base URL for keys and repositories
    #[arg(long, env = "DOWNLOAD_URL", value_name = "URL")]
    pub download_url: Option<String>,

    /// RPM repository file name
    #[arg(long, env = "REPO_FILE", value_name = "FILE")]
    pub repo_file: Option<String>,

    /// Print the commands instead of running them
    #[arg(long, env = "DRY_RUN", value_parser = FalseyValueParser::new())]
    pub dry_run: bool,
}

/// Arguments for the `rootless` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct RootlessArgs {
    /// Release channel (stable, test)
    #[arg(long, env = "CHANNEL")]
    pub channel: Option<String>,

    /// Static release version to install
    #[arg(long, env = "VERSION", value_name = "VERSION")]
    pub version: Option<String>,

    /// Base URL for static archives
    #[arg(long, env = "DOWNLOAD_URL", value_name = "URL")]
    pub download_url: Option<String>,

    /// Directory to install binaries into (default: $HOME/bin)
    #[arg(long, env = "DOCKER_BIN", value_name = "DIR")]
    pub bin: Option<PathBuf>,

    /// Install even when running as root or when dockerd already exists
    #[arg(long, env = "FORCE_ROOTLESS_INSTALL", value_parser = FalseyValueParser::new())]
    pub force: bool,

    /// Do not require the ip_tables kernel module
    #[arg(long, env = "SKIP_IPTABLES", value_parser = FalseyValueParser::new())]
    pub skip_iptables: bool,

    /// Print the commands instead of running them
    #[arg(long, env = "DRY_RUN", value_parser = FalseyValueParser::new())]
    pub dry_run: bool,
}

/// Arguments for the `detect` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct DetectArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Parse arguments, dropping unknown flags.
///
/// Each unknown flag is removed and parsing is retried. The returned list
/// holds one warning per dropped flag. Other errors, including `--help`
/// and `-V`, are returned unchanged.
pub fn parse_lenient<I, T>(args: I) -> Result<(Cli, Vec<String>), clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let mut args: Vec<OsString> = args.into_iter().map(Into::into).collect();
    let mut warnings = Vec::new();

    loop {
        let err = match Cli::try_parse_from(&args) {
            Ok(cli) => return Ok((cli, warnings)),
            Err(err) => err,
        };
        if err.kind() != ErrorKind::UnknownArgument {
            return Err(err);
        }
        let Some(ContextValue::String(flag)) = err.get(ContextKind::InvalidArg) else {
            return Err(err);
        };

        let with_value = format!("{}=", flag);
        let position = args.iter().skip(1).position(|arg| {
            arg.to_str()
                .is_some_and(|arg| arg == flag || arg.starts_with(&with_value))
        });
        let Some(position) = position else {
            return Err(err);
        };

        args.remove(position + 1);
        warnings.push(format!("Ignoring unknown flag: {}", flag));
    }
}
