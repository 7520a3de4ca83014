use std::path::Path;

use csv::ReaderBuilder;
use i2b2_model::RawDataTable;
use tracing::debug;

use crate::error::{IngestError, Result};
use crate::text::read_text;

pub(crate) fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    let mut parts = trimmed.split_whitespace();
    let mut normalized = String::new();
    if let Some(first) = parts.next() {
        normalized.push_str(first);
        for part in parts {
            normalized.push(' ');
            normalized.push_str(part);
        }
    }
    normalized
}

pub(crate) fn normalize_cell(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

/// Reads delimited text into header-less rows, dropping fully blank rows.
pub(crate) fn read_rows(path: &Path, text: &str, delimiter: u8) -> Result<Vec<Vec<String>>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(text.as_bytes());
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| IngestError::csv(path, &e))?;
        let row: Vec<String> = record.iter().map(normalize_cell).collect();
        if row.iter().all(String::is_empty) {
            continue;
        }
        rows.push(row);
    }
    Ok(rows)
}

/// Reads the subject-level data table. The first non-blank row is the header.
pub fn read_data_table(path: &Path) -> Result<RawDataTable> {
    let text = read_text(path)?;
    let mut raw_rows = read_rows(path, &text, b',')?.into_iter();
    let Some(header_row) = raw_rows.next() else {
        return Err(IngestError::MissingHeader {
            path: path.to_path_buf(),
        });
    };
    let headers: Vec<String> = header_row.iter().map(|h| normalize_header(h)).collect();
    let rows: Vec<Vec<String>> = raw_rows
        .map(|mut row| {
            row.resize(headers.len().max(row.len()), String::new());
            row
        })
        .collect();
    debug!(
        path = %path.display(),
        columns = headers.len(),
        rows = rows.len(),
        "read data table"
    );
    Ok(RawDataTable::new(headers, rows))
}
