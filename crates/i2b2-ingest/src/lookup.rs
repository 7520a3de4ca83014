//! Readers for the external lookup tables.

use std::path::Path;

use i2b2_model::{
    DemographicRow, DemographicsTable, IcdRow, IcdTable, VisitDateTable, parse_calendar_date,
};
use tracing::debug;

use crate::csv_table::read_rows;
use crate::error::{IngestError, Result};
use crate::text::read_text;

/// Visit token to date. A leading row whose date does not parse is taken as
/// a header; any later unparseable date is an error.
pub fn read_visit_dates(path: &Path) -> Result<VisitDateTable> {
    let text = read_text(path)?;
    let rows = read_rows(path, &text, b',')?;
    let mut pairs = Vec::with_capacity(rows.len());
    for (idx, row) in rows.iter().enumerate() {
        let token = row.first().map(String::as_str).unwrap_or("");
        let raw_date = row.get(1).map(String::as_str).unwrap_or("");
        match parse_calendar_date(raw_date) {
            Some(date) => pairs.push((token.to_string(), date)),
            None if idx == 0 => continue,
            None => {
                return Err(IngestError::InvalidDate {
                    path: path.to_path_buf(),
                    row: idx + 1,
                    value: raw_date.to_string(),
                });
            }
        }
    }
    let table = VisitDateTable::from_pairs(pairs);
    debug!(path = %path.display(), visits = table.len(), "read visit dates");
    Ok(table)
}

/// Demographics mapping: `code, i2b2 code, race code, …, ethnicity flag`.
/// The first row is a header.
pub fn read_demographics(path: &Path) -> Result<DemographicsTable> {
    let text = read_text(path)?;
    let rows = read_rows(path, &text, b',')?;
    let parsed: Vec<DemographicRow> = rows
        .into_iter()
        .skip(1)
        .filter(|row| row.len() >= 2 && !row[0].is_empty())
        .map(|row| {
            let ethnicity = row.len() >= 4 && is_truthy(&row[row.len() - 1]);
            DemographicRow {
                code: row[0].clone(),
                i2b2_code: row[1].clone(),
                race_code: row.get(2).filter(|race| !race.is_empty()).cloned(),
                ethnicity,
            }
        })
        .collect();
    debug!(path = %path.display(), rows = parsed.len(), "read demographics table");
    Ok(DemographicsTable::new(parsed))
}

/// ICD ontology: path segments followed by a trailing key. No header.
pub fn read_icd_table(path: &Path) -> Result<IcdTable> {
    let text = read_text(path)?;
    let rows = read_rows(path, &text, b',')?;
    let parsed: Vec<IcdRow> = rows
        .into_iter()
        .filter_map(|mut row| {
            while row.last().is_some_and(String::is_empty) {
                row.pop();
            }
            let key = row.pop()?;
            let segments = row.into_iter().filter(|s| !s.is_empty()).collect();
            Some(IcdRow { segments, key })
        })
        .collect();
    debug!(path = %path.display(), rows = parsed.len(), "read ICD table");
    Ok(IcdTable::new(parsed))
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "y" | "yes" | "true"
    )
}
