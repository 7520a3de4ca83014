use std::path::PathBuf;

use i2b2_core::{MappingReport, SynthesisReport};
use serde::Serialize;

/// Inputs of one ETL run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub config: PathBuf,
    pub dictionary: PathBuf,
    pub input: PathBuf,
    pub output_dir: PathBuf,
    pub sample: Option<usize>,
    pub seed: Option<u64>,
}

/// Outcome of one ETL run; also the `--report` JSON document.
#[derive(Debug, Clone, Serialize)]
pub struct RunResult {
    pub datemode: u8,
    pub concepts_path: PathBuf,
    pub facts_path: PathBuf,
    pub variables: usize,
    pub concepts_written: usize,
    pub suppressed_concepts: usize,
    pub facts_mapped: usize,
    pub facts_written: usize,
    pub synthesis: SynthesisReport,
    pub mapping: MappingReport,
}
