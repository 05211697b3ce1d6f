// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `plugbuild`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "plugbuild",
    version,
    about = "Incremental, dependency-aware asset builds for multi-plugin repositories.",
    long_about = None
)]
pub struct CliArgs {
    /// Repository root containing the plugin directories.
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub root: String,

    /// Keep running and rebuild plugins when their sources change.
    #[arg(long)]
    pub watch: bool,

    /// Maximum number of compiler processes running at the same time.
    #[arg(long, value_name = "N", default_value_t = 3)]
    pub parallel: usize,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `PLUGBUILD_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Discover + validate plugins, print the build graph, but don't compile.
    #[arg(long)]
    pub dry_run: bool,
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
