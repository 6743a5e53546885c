// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

use crate::config::DEFAULT_CONFIG_PATH;
use crate::types::RunReference;

/// Command-line arguments for `ci-status`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "ci-status",
    version,
    about = "Follow Tekton pipeline runs until they finish and report their status.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `ci-status.toml` in the current working directory.
    #[arg(long, value_name = "PATH", default_value = DEFAULT_CONFIG_PATH)]
    pub config: String,

    /// Directory of captured objects (`<kind>/<namespace>/<name>.json`).
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub snapshots: String,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `CI_STATUS_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse + validate config, print it, but don't watch anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Pipeline runs to follow, as `namespace/name` or `name`.
    #[arg(value_name = "RUN")]
    pub runs: Vec<RunReference>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
