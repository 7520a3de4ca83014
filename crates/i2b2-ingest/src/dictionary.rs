//! Data dictionary reading.
//!
//! Dictionaries are exported by several tools. Leading `!#!` lines are
//! comments, rows with an empty first cell are spacers, and the dbGaP layout
//! spills enumerated values into unnamed columns after the last named one.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use i2b2_model::DictFormat;
use tracing::debug;

use crate::csv_table::{normalize_header, read_rows};
use crate::error::{IngestError, Result};
use crate::text::read_text;

const COMMENT_PREFIX: &str = "!#!";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictionaryRecord {
    /// One-based line of the record among data rows.
    pub row: usize,
    fields: BTreeMap<String, String>,
    /// Non-empty cells after the last named column.
    pub extra: Vec<String>,
}

impl DictionaryRecord {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

#[derive(Debug, Clone)]
pub struct DictionaryTable {
    pub path: PathBuf,
    pub format: DictFormat,
    pub headers: Vec<String>,
    pub records: Vec<DictionaryRecord>,
}

impl DictionaryTable {
    /// Fails on the first configured column absent from the header.
    pub fn require_columns<'a, I>(&self, columns: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a str>,
    {
        for column in columns {
            if !self.headers.iter().any(|h| h == column) {
                return Err(IngestError::MissingColumn {
                    path: self.path.clone(),
                    column: column.to_string(),
                });
            }
        }
        Ok(())
    }
}

pub fn read_dictionary(path: &Path, format: DictFormat) -> Result<DictionaryTable> {
    let text = read_text(path)?;
    parse_dictionary(path, &text, format)
}

pub fn parse_dictionary(
    path: &Path,
    text: &str,
    format: DictFormat,
) -> Result<DictionaryTable> {
    let body = strip_comment_lines(text);
    let delimiter = match format {
        DictFormat::Tsv => b'\t',
        DictFormat::Csv | DictFormat::Dbgap => b',',
    };
    let mut rows = read_rows(path, body, delimiter)?.into_iter();
    let Some(header_row) = rows.next() else {
        return Err(IngestError::MissingHeader {
            path: path.to_path_buf(),
        });
    };
    let headers: Vec<String> = header_row.iter().map(|h| normalize_header(h)).collect();
    let named = headers
        .iter()
        .rposition(|h| !h.is_empty())
        .map_or(0, |idx| idx + 1);

    let mut records = Vec::new();
    for (idx, row) in rows.enumerate() {
        if row.first().is_none_or(String::is_empty) {
            continue;
        }
        let mut fields = BTreeMap::new();
        for (header, cell) in headers.iter().take(named).zip(row.iter()) {
            if header.is_empty() {
                continue;
            }
            fields.entry(header.clone()).or_insert_with(|| cell.clone());
        }
        let extra = row
            .iter()
            .skip(named)
            .filter(|cell| !cell.is_empty())
            .cloned()
            .collect();
        records.push(DictionaryRecord {
            row: idx + 1,
            fields,
            extra,
        });
    }
    debug!(path = %path.display(), ?format, records = records.len(), "read dictionary");
    Ok(DictionaryTable {
        path: path.to_path_buf(),
        format,
        headers,
        records,
    })
}

fn strip_comment_lines(text: &str) -> &str {
    let mut rest = text;
    while rest.starts_with(COMMENT_PREFIX) {
        rest = match rest.find('\n') {
            Some(end) => &rest[end + 1..],
            None => "",
        };
    }
    rest
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_only_leading_comments() {
        let text = "!#! exported\n!#! by tool\nA,B\n!#!,x\n";
        assert_eq!(strip_comment_lines(text), "A,B\n!#!,x\n");
    }

    #[test]
    fn dbgap_values_spill_into_extra() {
        let text = "VARNAME,TYPE,VALUES,,\nSEX,encoded value,1=Male,2=Female,9=Unknown\nAGE,num,,,\n";
        let table = parse_dictionary(Path::new("dd.csv"), text, DictFormat::Dbgap).unwrap();
        assert_eq!(table.records.len(), 2);
        let sex = &table.records[0];
        assert_eq!(sex.field("VALUES"), Some("1=Male"));
        assert_eq!(sex.extra, vec!["2=Female", "9=Unknown"]);
        assert!(table.records[1].extra.is_empty());
    }

    #[test]
    fn skips_rows_with_empty_first_cell() {
        let text = "VARNAME,TYPE\n,num\nAGE,num\n";
        let table = parse_dictionary(Path::new("dd.csv"), text, DictFormat::Csv).unwrap();
        assert_eq!(table.records.len(), 1);
        assert_eq!(table.records[0].field("VARNAME"), Some("AGE"));
    }
}
