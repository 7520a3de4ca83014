//! Facts artifact: `mrn,start-date,code,value`.

use std::borrow::Cow;
use std::path::Path;

use i2b2_model::Fact;
use serde::Serialize;
use tracing::debug;

use crate::common::{create_writer, finish, prefixed_code};
use crate::error::{OutputError, Result};

pub const FACTS_HEADER: [&str; 4] = ["mrn", "start-date", "code", "value"];

#[derive(Serialize)]
struct FactRow<'a> {
    mrn: &'a str,
    start_date: String,
    code: Cow<'a, str>,
    value: &'a str,
}

/// Writes one row per fact and returns the row count. Unresolved dates are
/// written as the sentinel.
pub fn write_facts(path: &Path, facts: &[Fact], code_prefix: &str) -> Result<usize> {
    let mut writer = create_writer(path, &FACTS_HEADER)?;
    for fact in facts {
        writer
            .serialize(FactRow {
                mrn: &fact.subject_id,
                start_date: fact.event_date.to_string(),
                code: prefixed_code(code_prefix, &fact.code, fact.origin),
                value: &fact.value,
            })
            .map_err(|e| OutputError::csv(path, &e))?;
    }
    finish(path, writer)?;
    debug!(path = %path.display(), facts = facts.len(), "wrote facts");
    Ok(facts.len())
}
