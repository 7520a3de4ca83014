//! Dictionary records to variable definitions.

use i2b2_ingest::{DictionaryRecord, DictionaryTable, IngestError};
use i2b2_model::{DictFormat, EtlConfig, Enumeration, VariableDefinition};
use tracing::{debug, trace};

/// Maps every dictionary record through the configured field names.
///
/// Fails when a configured field is not a dictionary column. Records with
/// an empty variable name are dropped.
pub fn variables_from_dictionary(
    table: &DictionaryTable,
    config: &EtlConfig,
) -> Result<Vec<VariableDefinition>, IngestError> {
    let mut required = vec![
        config.varname.as_str(),
        config.typename.as_str(),
        config.enumname.as_str(),
    ];
    if let Some(description) = config.description_field() {
        required.push(description);
    }
    table.require_columns(required)?;

    let mut variables = Vec::with_capacity(table.records.len());
    for record in &table.records {
        match variable_from_record(record, config, table.format) {
            Some(variable) => variables.push(variable),
            None => trace!(row = record.row, "dictionary record without a variable name"),
        }
    }
    debug!(variables = variables.len(), "variables from dictionary");
    Ok(variables)
}

fn variable_from_record(
    record: &DictionaryRecord,
    config: &EtlConfig,
    format: DictFormat,
) -> Option<VariableDefinition> {
    let name = record.field(&config.varname)?.trim();
    if name.is_empty() {
        return None;
    }
    let declared_type = record.field(&config.typename).unwrap_or("");
    let enum_text = record.field(&config.enumname).unwrap_or("");
    let enumeration = match format {
        DictFormat::Dbgap => Enumeration::Tokens(
            std::iter::once(enum_text)
                .chain(record.extra.iter().map(String::as_str))
                .map(str::to_string)
                .collect(),
        ),
        DictFormat::Csv | DictFormat::Tsv => Enumeration::Raw(enum_text.to_string()),
    };
    let mut variable =
        VariableDefinition::new(name, declared_type.trim()).with_enumeration(enumeration);
    if let Some(text) = config
        .description_field()
        .and_then(|field| record.field(field))
    {
        variable = variable.with_description(text);
    }
    Some(variable)
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use i2b2_ingest::{parse_config, parse_dictionary};

    use super::*;

    fn config(extra: &str) -> EtlConfig {
        parse_config(&format!(
            "varname: VARNAME\npatientid: SUBJID\ntypename: TYPE\nenumname: VALUES\npathroot: Study\nfilebase: study\n{extra}"
        ))
        .unwrap()
    }

    #[test]
    fn csv_records_keep_raw_enumeration_text() {
        let table = parse_dictionary(
            Path::new("dd.csv"),
            "VARNAME,TYPE,VALUES,DESC\nSEX,encoded value,\"1=Male,2=Female\",Sex at birth\n",
            DictFormat::Csv,
        )
        .unwrap();
        let variables =
            variables_from_dictionary(&table, &config("description: DESC\n")).unwrap();
        assert_eq!(variables.len(), 1);
        assert_eq!(
            variables[0].enumeration,
            Enumeration::Raw("1=Male,2=Female".to_string())
        );
        assert_eq!(variables[0].label(), "Sex at birth");
    }

    #[test]
    fn dbgap_records_become_token_lists() {
        let table = parse_dictionary(
            Path::new("dd.csv"),
            "VARNAME,TYPE,VALUES,,\nSEX,encoded value,1=Male,2=Female,\n",
            DictFormat::Dbgap,
        )
        .unwrap();
        let variables = variables_from_dictionary(&table, &config("dictformat: dbgap\n")).unwrap();
        assert_eq!(
            variables[0].enumeration,
            Enumeration::Tokens(vec!["1=Male".to_string(), "2=Female".to_string()])
        );
    }

    #[test]
    fn configured_field_missing_from_header_is_an_error() {
        let table =
            parse_dictionary(Path::new("dd.csv"), "VARNAME,TYPE\nAGE,num\n", DictFormat::Csv)
                .unwrap();
        let err = variables_from_dictionary(&table, &config("")).unwrap_err();
        assert!(matches!(err, IngestError::MissingColumn { ref column, .. } if column == "VALUES"));
    }
}
