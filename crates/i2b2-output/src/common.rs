//! Shared helpers for the CSV artifacts.

use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};

use csv::{Writer, WriterBuilder};
use i2b2_model::{EtlConfig, FactCodeOrigin};

use crate::error::{OutputError, Result};

/// Artifact locations for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub concepts: PathBuf,
    pub facts: PathBuf,
}

impl OutputPaths {
    /// `concepts_<filebase>.csv` and `facts_<filebase>.csv` under `output_dir`.
    pub fn new(output_dir: &Path, config: &EtlConfig) -> Self {
        Self {
            concepts: output_dir.join(config.concepts_file_name()),
            facts: output_dir.join(config.facts_file_name()),
        }
    }
}

/// Ensure a parent directory exists for a file path.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| OutputError::io(parent, e))?;
    }
    Ok(())
}

/// Writer with an explicit header row, so an empty artifact still has one.
pub(crate) fn create_writer(path: &Path, header: &[&str]) -> Result<Writer<fs::File>> {
    ensure_parent_dir(path)?;
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(|e| OutputError::csv(path, &e))?;
    writer
        .write_record(header)
        .map_err(|e| OutputError::csv(path, &e))?;
    Ok(writer)
}

pub(crate) fn finish(path: &Path, mut writer: Writer<fs::File>) -> Result<()> {
    writer.flush().map_err(|e| OutputError::io(path, e))
}

/// The global code prefix applies only to codes this ontology owns.
pub fn prefixed_code<'a>(prefix: &str, code: &'a str, origin: FactCodeOrigin) -> Cow<'a, str> {
    if prefix.is_empty() || !origin.takes_prefix() {
        Cow::Borrowed(code)
    } else {
        Cow::Owned(format!("{prefix}{code}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_skips_external_codes() {
        assert_eq!(prefixed_code("S:", "AGE", FactCodeOrigin::Concept), "S:AGE");
        assert_eq!(prefixed_code("S:", "WEIGHT", FactCodeOrigin::Column), "S:WEIGHT");
        assert_eq!(
            prefixed_code("S:", "HOSP_ICD9:401.9", FactCodeOrigin::Icd),
            "HOSP_ICD9:401.9"
        );
        assert_eq!(
            prefixed_code("S:", "DEM|SEX:f", FactCodeOrigin::Demographic),
            "DEM|SEX:f"
        );
        assert_eq!(prefixed_code("", "AGE", FactCodeOrigin::Concept), "AGE");
    }
}
