//! Concept suppression and the ICD ontology concepts.
//!
//! Suppression only affects the written concepts artifact. The in-memory
//! index keeps every synthesized entry so facts still resolve their codes.

use std::collections::HashSet;
use std::fmt;

use i2b2_model::{ConceptDefinition, ConceptType, EtlConfig, IcdTable, IndexEntry};

use crate::synthesis::code::sanitize_segment;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IcdVersion {
    Icd9,
    Icd10,
}

impl IcdVersion {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Icd9 => "ICD9",
            Self::Icd10 => "ICD10",
        }
    }

    /// `<system>_ICD9:<key>` or `<system>_ICD10:<key>`.
    pub fn code(self, system: &str, key: &str) -> String {
        format!("{system}_{}:{key}", self.as_str())
    }
}

impl fmt::Display for IcdVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Variables whose synthesized concepts are left out of the artifact.
#[derive(Debug, Clone, Default)]
pub struct ConceptFilter {
    suppressed: HashSet<String>,
}

impl ConceptFilter {
    pub fn new<I, S>(variables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            suppressed: variables.into_iter().map(Into::into).collect(),
        }
    }

    /// Demographic and ICD columns are replaced by externally defined codes,
    /// so their synthesized concepts are not written.
    pub fn from_config(config: &EtlConfig) -> Self {
        Self::new(
            config
                .demographicvars
                .iter()
                .chain(&config.icd9vars)
                .chain(&config.icd10vars)
                .cloned(),
        )
    }

    pub fn keeps(&self, entry: &IndexEntry) -> bool {
        !self.suppressed.contains(&entry.variable)
    }

    pub fn len(&self) -> usize {
        self.suppressed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.suppressed.is_empty()
    }
}

/// One assertion concept per ICD table row:
/// path `/<root>/<segments…>/`, code `<system>_ICD9:<key>`.
pub fn icd_concepts(
    table: &IcdTable,
    path_root: &str,
    system: &str,
    version: IcdVersion,
) -> Vec<ConceptDefinition> {
    table
        .rows()
        .iter()
        .filter(|row| !row.key.is_empty())
        .map(|row| {
            let mut path = format!("/{path_root}/");
            for segment in row.segments.iter().filter(|s| !s.is_empty()) {
                path.push_str(&sanitize_segment(segment));
                path.push('/');
            }
            ConceptDefinition::new(path, version.code(system, &row.key), ConceptType::Assertion)
        })
        .collect()
}
