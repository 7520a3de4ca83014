//! CLI argument definitions for the i2b2 ETL.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "i2b2-etl",
    version,
    about = "Convert a study data dictionary and data table into i2b2 concepts and facts",
    long_about = "Convert a clinical-study data dictionary and subject-level data table into\n\
                  an i2b2 concept ontology (concepts_<filebase>.csv) and a fact table\n\
                  (facts_<filebase>.csv)."
)]
pub struct Cli {
    /// ETL configuration file (YAML).
    #[arg(short = 'c', long = "config", value_name = "PATH", default_value = "etl.yml")]
    pub config: PathBuf,

    /// Data dictionary file.
    #[arg(short = 'd', long = "dictionary", value_name = "PATH")]
    pub dictionary: PathBuf,

    /// Subject-level data table to convert.
    #[arg(short = 'i', long = "input", value_name = "PATH")]
    pub input: PathBuf,

    /// Write only a random sample of this many facts.
    #[arg(short = 's', long = "sample", value_name = "N")]
    pub sample: Option<usize>,

    /// Seed for --sample (random when omitted).
    #[arg(long = "seed", value_name = "SEED", requires = "sample")]
    pub seed: Option<u64>,

    /// Directory for the concepts and facts files.
    #[arg(short = 'o', long = "output-dir", value_name = "DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// Write the run report as JSON.
    #[arg(long = "report", value_name = "PATH")]
    pub report: Option<PathBuf>,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(long = "log-format", value_enum, default_value = "pretty")]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Allow subject-level cell values in logs.
    #[arg(long = "log-data")]
    pub log_data: bool,
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
