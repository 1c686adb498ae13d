//! CLI argument definitions for the mapping tool.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "iaso-mapping",
    version,
    about = "Inspect survey descriptors and question mapping coverage",
    long_about = "Index a form version descriptor and report how many of its\n\
                  questions are mapped in a mapping version."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// List every indexed node of a descriptor.
    Index(IndexArgs),

    /// Print the navigation tree with per-group mapping coverage.
    Coverage(MappingArgs),

    /// Print mapping totals and the state of every question.
    Summary(MappingArgs),
}

#[derive(Args)]
pub struct IndexArgs {
    /// Descriptor JSON (bare descriptor or form version record).
    #[arg(value_name = "DESCRIPTOR")]
    pub descriptor: PathBuf,

    /// Emit JSON instead of a table.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Args)]
pub struct MappingArgs {
    /// Descriptor JSON (bare descriptor or form version record).
    #[arg(value_name = "DESCRIPTOR")]
    pub descriptor: PathBuf,

    /// Question mappings JSON (plain object or mapping version record).
    ///
    /// Without it every question is reported as unset.
    #[arg(long = "mappings", short = 'm', value_name = "FILE")]
    pub mappings: Option<PathBuf>,

    /// Label language to display (e.g. "English").
    #[arg(long = "lang", value_name = "LANG")]
    pub lang: Option<String>,

    /// Emit JSON instead of a table.
    #[arg(long = "json")]
    pub json: bool,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
