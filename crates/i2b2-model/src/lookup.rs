//! External lookup tables: visit dates, demographics codes, ICD ontology.

use std::collections::HashMap;

use chrono::NaiveDate;

/// Visit token to calendar date; the first row for a token wins.
#[derive(Debug, Clone, Default)]
pub struct VisitDateTable {
    dates: HashMap<String, NaiveDate>,
}

impl VisitDateTable {
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, NaiveDate)>,
        S: Into<String>,
    {
        let mut dates = HashMap::new();
        for (token, date) in pairs {
            dates.entry(token.into()).or_insert(date);
        }
        Self { dates }
    }

    pub fn lookup(&self, token: &str) -> Option<NaiveDate> {
        self.dates.get(token).copied()
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemographicRow {
    /// Declared concept code this row translates.
    pub code: String,
    /// i2b2 demographic code emitted in its place.
    pub i2b2_code: String,
    pub race_code: Option<String>,
    /// Ethnicity rows are disambiguated by the race of the previous fact.
    pub ethnicity: bool,
}

#[derive(Debug, Clone, Default)]
pub struct DemographicsTable {
    rows: Vec<DemographicRow>,
}

impl DemographicsTable {
    pub fn new(rows: Vec<DemographicRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[DemographicRow] {
        &self.rows
    }

    /// First row declaring `code`; for ethnicity rows, prefer the one whose
    /// race code equals `previous_race`.
    pub fn lookup(&self, code: &str, previous_race: Option<&str>) -> Option<&DemographicRow> {
        let mut candidates = self.rows.iter().filter(|row| row.code == code).peekable();
        let first = *candidates.peek()?;
        if let Some(race) = previous_race {
            if let Some(row) = candidates
                .filter(|row| row.ethnicity)
                .find(|row| row.race_code.as_deref() == Some(race))
            {
                return Some(row);
            }
        }
        Some(first)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IcdRow {
    pub segments: Vec<String>,
    pub key: String,
}

#[derive(Debug, Clone, Default)]
pub struct IcdTable {
    rows: Vec<IcdRow>,
}

impl IcdTable {
    pub fn new(rows: Vec<IcdRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[IcdRow] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
