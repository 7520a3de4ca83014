//! Per-column code overrides applied after the index lookup.

use std::collections::HashSet;

use i2b2_model::{DemographicRow, DemographicsTable, EtlConfig};

use crate::filter::IcdVersion;

/// Rewrites ICD columns to `<system>_ICD9:<cell>` / `<system>_ICD10:<cell>`.
#[derive(Debug, Clone)]
pub struct IcdOverride {
    system: String,
    icd9: HashSet<String>,
    icd10: HashSet<String>,
}

impl IcdOverride {
    /// `None` when no ICD column is configured.
    pub fn from_config(config: &EtlConfig) -> Option<Self> {
        if config.icd9vars.is_empty() && config.icd10vars.is_empty() {
            return None;
        }
        let system = config.icd_system()?;
        Some(Self {
            system: system.to_string(),
            icd9: config.icd9vars.iter().cloned().collect(),
            icd10: config.icd10vars.iter().cloned().collect(),
        })
    }

    pub fn version_for(&self, column: &str) -> Option<IcdVersion> {
        if self.icd9.contains(column) {
            Some(IcdVersion::Icd9)
        } else if self.icd10.contains(column) {
            Some(IcdVersion::Icd10)
        } else {
            None
        }
    }

    /// Replacement code for a cell of `column`, if it is an ICD column.
    pub fn rewrite(&self, column: &str, cell: &str) -> Option<String> {
        self.version_for(column)
            .map(|version| version.code(&self.system, cell))
    }
}

/// Substitutes i2b2 demographic codes for the codes of demographic columns.
#[derive(Debug, Clone)]
pub struct DemographicOverride {
    columns: HashSet<String>,
    table: DemographicsTable,
}

impl DemographicOverride {
    pub fn new<I, S>(columns: I, table: DemographicsTable) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            table,
        }
    }

    /// `None` when `demographicvars` is empty or no table was loaded.
    pub fn from_config(config: &EtlConfig, table: Option<DemographicsTable>) -> Option<Self> {
        if config.demographicvars.is_empty() {
            return None;
        }
        Some(Self::new(config.demographicvars.iter().cloned(), table?))
    }

    pub fn applies_to(&self, column: &str) -> bool {
        self.columns.contains(column)
    }

    /// Table row for a fact `code` drawn from `column`. `previous_race` is the
    /// race code of the previous demographic fact of the same data row.
    pub fn substitute(
        &self,
        column: &str,
        code: &str,
        previous_race: Option<&str>,
    ) -> Option<&DemographicRow> {
        if !self.applies_to(column) {
            return None;
        }
        self.table.lookup(code, previous_race)
    }
}
