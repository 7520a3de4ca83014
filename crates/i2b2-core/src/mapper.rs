//! Fact mapping: one fact per non-blank observation cell.
//!
//! For each cell the code comes from the first of:
//! 1. the index entry keyed by (cell, column), value cleared;
//! 2. the column's scalar concept, value kept;
//! 3. the column header itself, value kept.
//!
//! ICD and demographic overrides then rewrite the code. Dates that cannot be
//! resolved are written as the unresolved sentinel and counted by kind.

use std::collections::{BTreeMap, BTreeSet};

use i2b2_model::{EventDate, Fact, FactCodeOrigin, RawDataTable, RowView};
use serde::Serialize;
use tracing::{debug, trace};

use crate::context::EtlContext;
use crate::error::{MappingError, Result};
use crate::temporal::{AnomalyKind, DateOutcome};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MappingReport {
    pub rows: usize,
    pub facts: usize,
    pub blank_cells: usize,
    pub index_hits: usize,
    pub scalar_fallbacks: usize,
    pub column_fallbacks: usize,
    pub icd_overrides: usize,
    pub demographic_overrides: usize,
    pub unresolved_dates: usize,
    pub anomalies: BTreeMap<AnomalyKind, usize>,
}

impl MappingReport {
    fn record_anomaly(&mut self, kind: AnomalyKind) {
        *self.anomalies.entry(kind).or_default() += 1;
    }

    pub fn anomaly_count(&self, kind: AnomalyKind) -> usize {
        self.anomalies.get(&kind).copied().unwrap_or(0)
    }

    pub fn total_anomalies(&self) -> usize {
        self.anomalies.values().sum()
    }
}

#[derive(Debug, Clone, Default)]
pub struct MappedFacts {
    pub facts: Vec<Fact>,
    pub report: MappingReport,
}

pub struct FactMapper<'a> {
    context: &'a EtlContext,
    skipped_columns: BTreeSet<String>,
}

impl<'a> FactMapper<'a> {
    pub fn new(context: &'a EtlContext) -> Self {
        let mut skipped_columns = context.resolver().time_columns();
        skipped_columns.insert(context.patient_id().to_string());
        Self {
            context,
            skipped_columns,
        }
    }

    /// Columns never turned into facts: the identifier and the time columns.
    pub fn skipped_columns(&self) -> &BTreeSet<String> {
        &self.skipped_columns
    }

    pub fn map(&self, table: &RawDataTable) -> Result<MappedFacts> {
        if table.headers().is_empty() {
            return Err(MappingError::EmptyHeader);
        }
        let patient_id = self.context.patient_id();
        if !table.has_column(patient_id) {
            return Err(MappingError::MissingIdColumn {
                column: patient_id.to_string(),
            });
        }

        let mut mapped = MappedFacts::default();
        for row in table.rows() {
            mapped.report.rows += 1;
            self.map_row(&row, &mut mapped);
        }
        mapped.report.facts = mapped.facts.len();
        debug!(
            rows = mapped.report.rows,
            facts = mapped.report.facts,
            anomalies = mapped.report.total_anomalies(),
            "mapped facts"
        );
        Ok(mapped)
    }

    fn map_row(&self, row: &RowView<'_>, mapped: &mut MappedFacts) {
        let subject_id = row.get(self.context.patient_id()).unwrap_or("");
        let mut previous_race: Option<String> = None;

        for (column, cell) in row.cells() {
            if self.skipped_columns.contains(column) {
                continue;
            }
            let value = cell.trim();
            if value.is_empty() {
                mapped.report.blank_cells += 1;
                continue;
            }

            let (mut code, mut kept_value, mut origin) =
                self.resolve_code(column, value, &mut mapped.report);
            let event_date = self.resolve_date(row, column, &mut mapped.report);

            if let Some(icd_code) = self
                .context
                .icd()
                .and_then(|icd| icd.rewrite(column, value))
            {
                mapped.report.icd_overrides += 1;
                code = icd_code;
                kept_value = String::new();
                origin = FactCodeOrigin::Icd;
            } else if let Some(demographic) = self
                .context
                .demographics()
                .and_then(|d| d.substitute(column, &code, previous_race.as_deref()))
            {
                mapped.report.demographic_overrides += 1;
                trace!(column, code = %demographic.i2b2_code, "demographic substitution");
                code = demographic.i2b2_code.clone();
                kept_value = String::new();
                origin = FactCodeOrigin::Demographic;
                if let Some(race) = &demographic.race_code {
                    previous_race = Some(race.clone());
                }
            }

            mapped.facts.push(Fact {
                subject_id: subject_id.to_string(),
                event_date,
                code,
                value: kept_value,
                origin,
            });
        }
    }

    fn resolve_code(
        &self,
        column: &str,
        value: &str,
        report: &mut MappingReport,
    ) -> (String, String, FactCodeOrigin) {
        let index = &self.context.ontology().index;
        if let Some(entry) = index.lookup(value, column) {
            report.index_hits += 1;
            return (entry.code().to_string(), String::new(), FactCodeOrigin::Concept);
        }
        if let Some(entry) = index.scalar_for(column) {
            report.scalar_fallbacks += 1;
            return (entry.code().to_string(), value.to_string(), FactCodeOrigin::Concept);
        }
        report.column_fallbacks += 1;
        (column.to_string(), value.to_string(), FactCodeOrigin::Column)
    }

    fn resolve_date(&self, row: &RowView<'_>, column: &str, report: &mut MappingReport) -> EventDate {
        match self.context.resolver().resolve(row, column) {
            Ok(DateOutcome::Exact(date)) => EventDate::Resolved(date),
            Ok(DateOutcome::LatestCandidate(date)) => {
                report.record_anomaly(AnomalyKind::UnmatchedPattern);
                debug!(row = row.index(), column, "no time pattern matched; using latest date");
                EventDate::Resolved(date)
            }
            Err(anomaly) => {
                report.record_anomaly(anomaly.kind());
                report.unresolved_dates += 1;
                debug!(row = row.index(), column, %anomaly, "unresolved fact date");
                EventDate::Unresolved
            }
        }
    }
}
