//! Question mapping CLI.

use std::io::{self, IsTerminal};

use clap::{ColorChoice, Parser};
use serde::Serialize;
use tracing::level_filters::LevelFilter;

use iaso_cli::commands::{run_coverage, run_index, run_summary};
use iaso_cli::logging::{LogConfig, LogFormat, init_logging};
use iaso_cli::render::{coverage_text, index_table, question_table, summary_table};

mod cli;

use crate::cli::{Cli, Command, IndexArgs, LogFormatArg, LogLevelArg, MappingArgs};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let result = match &cli.command {
        Command::Index(args) => index(args),
        Command::Coverage(args) => coverage(args),
        Command::Summary(args) => summary(args),
    };
    let exit_code = match result {
        Ok(()) => 0,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

fn index(args: &IndexArgs) -> anyhow::Result<()> {
    let form = run_index(&args.descriptor)?;
    if args.json {
        return print_json(&form.index);
    }
    println!("Form: {}", form.name());
    println!("{}", index_table(&form.index));
    Ok(())
}

fn coverage(args: &MappingArgs) -> anyhow::Result<()> {
    let tree = run_coverage(
        &args.descriptor,
        args.mappings.as_deref(),
        args.lang.as_deref(),
    )?;
    if args.json {
        return print_json(&tree);
    }
    match tree {
        Some(tree) => print!("{}", coverage_text(&tree)),
        None => println!("(empty descriptor)"),
    }
    Ok(())
}

fn summary(args: &MappingArgs) -> anyhow::Result<()> {
    let report = run_summary(
        &args.descriptor,
        args.mappings.as_deref(),
        args.lang.as_deref(),
    )?;
    if args.json {
        return print_json(&report);
    }
    println!("{}", summary_table(&report));
    println!("{}", question_table(&report.questions));
    if !report.summary.orphan_keys.is_empty() {
        eprintln!("Orphan mapping keys:");
        for key in &report.summary.orphan_keys {
            eprintln!("- {key}");
        }
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig::default().with_level(cli.verbosity.tracing_level_filter());
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config = config
        .with_format(match cli.log_format {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Compact => LogFormat::Compact,
            LogFormatArg::Json => LogFormat::Json,
        })
        .with_log_file(cli.log_file.clone());
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
