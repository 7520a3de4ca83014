//! Concepts artifact: `path,code,type`.

use std::borrow::Cow;
use std::path::Path;

use csv::ReaderBuilder;
use i2b2_model::{ConceptDefinition, ConceptType, FactCodeOrigin};
use serde::Serialize;
use tracing::debug;

use crate::common::{create_writer, finish, prefixed_code};
use crate::error::{OutputError, Result};

pub const CONCEPTS_HEADER: [&str; 3] = ["path", "code", "type"];

#[derive(Serialize)]
struct ConceptRow<'a> {
    path: &'a str,
    code: Cow<'a, str>,
    #[serde(rename = "type")]
    concept_type: ConceptType,
}

/// Writes one row per concept and returns the row count.
pub fn write_concepts<'a, I>(path: &Path, concepts: I, code_prefix: &str) -> Result<usize>
where
    I: IntoIterator<Item = (&'a ConceptDefinition, FactCodeOrigin)>,
{
    let mut writer = create_writer(path, &CONCEPTS_HEADER)?;
    let mut written = 0usize;
    for (concept, origin) in concepts {
        writer
            .serialize(ConceptRow {
                path: &concept.path,
                code: prefixed_code(code_prefix, &concept.code, origin),
                concept_type: concept.concept_type,
            })
            .map_err(|e| OutputError::csv(path, &e))?;
        written += 1;
    }
    finish(path, writer)?;
    debug!(path = %path.display(), concepts = written, "wrote concepts");
    Ok(written)
}

pub fn read_concepts(path: &Path) -> Result<Vec<ConceptDefinition>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|e| OutputError::csv(path, &e))?;
    reader
        .deserialize()
        .map(|row| row.map_err(|e| OutputError::csv(path, &e)))
        .collect()
}
