//! i2b2 ETL command line.

use std::io::{self, IsTerminal};

use clap::{ColorChoice, Parser};
use i2b2_cli::logging::{LogConfig, LogFormat, init_logging};
use i2b2_cli::pipeline::{run, write_report};
use i2b2_cli::types::RunOptions;
use tracing::level_filters::LevelFilter;

mod cli;
mod summary;

use crate::cli::{Cli, LogFormatArg, LogLevelArg};
use crate::summary::print_summary;

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let options = RunOptions {
        config: cli.config.clone(),
        dictionary: cli.dictionary.clone(),
        input: cli.input.clone(),
        output_dir: cli.output_dir.clone(),
        sample: cli.sample,
        seed: cli.seed,
    };
    let exit_code = match run(&options) {
        Ok(result) => {
            print_summary(&result);
            match cli.report.as_deref().map(|path| write_report(path, &result)) {
                Some(Err(error)) => {
                    eprintln!("error: {error:#}");
                    1
                }
                _ => 0,
            }
        }
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig::default()
        .with_format(match cli.log_format {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Compact => LogFormat::Compact,
            LogFormatArg::Json => LogFormat::Json,
        })
        .with_log_file(cli.log_file.clone())
        .with_log_data(cli.log_data);
    if let Some(level) = cli.log_level {
        config = config.with_level(match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        });
    } else if cli.verbosity.is_present() {
        config = config.with_level(cli.verbosity.tracing_level_filter());
    }
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
