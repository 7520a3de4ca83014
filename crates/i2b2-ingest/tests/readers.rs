//! Reader tests against files on disk.

use std::fs;
use std::path::PathBuf;

use chrono::NaiveDate;
use i2b2_ingest::{
    IngestError, load_config, read_data_table, read_demographics, read_dictionary,
    read_icd_table, read_visit_dates,
};
use i2b2_model::{ConfigError, DictFormat};
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, contents: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("write file");
    path
}

#[test]
fn reads_latin1_dictionary_with_comments() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "dd.csv",
        b"!#! generated\nVARNAME,TYPE,VALUES\nCAFE,encoded value,\"1=Caf\xe9,2=Th\xe9\"\n",
    );
    let table = read_dictionary(&path, DictFormat::Csv).expect("read dictionary");
    assert_eq!(table.headers, vec!["VARNAME", "TYPE", "VALUES"]);
    assert_eq!(table.records.len(), 1);
    assert_eq!(table.records[0].field("VALUES"), Some("1=Café,2=Thé"));
    assert!(table.require_columns(["VARNAME", "VALUES"]).is_ok());
    let err = table.require_columns(["DESCRIPTION"]).unwrap_err();
    assert!(matches!(err, IngestError::MissingColumn { column, .. } if column == "DESCRIPTION"));
}

#[test]
fn reads_tab_delimited_dictionary() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "dd.tsv", b"VARNAME\tTYPE\nAGE\tnum\n");
    let table = read_dictionary(&path, DictFormat::Tsv).expect("read dictionary");
    assert_eq!(table.records[0].field("TYPE"), Some("num"));
}

#[test]
fn reads_data_table_and_pads_short_rows() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "data.csv", b"ID, SEX ,AGE\np1,1,40\n,,\np2,2\n");
    let table = read_data_table(&path).expect("read data");
    assert_eq!(table.headers(), ["ID", "SEX", "AGE"]);
    assert_eq!(table.len(), 2);
    assert_eq!(table.row(1).unwrap().get("AGE"), Some(""));
}

#[test]
fn empty_data_file_has_no_header() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "data.csv", b"\n\n");
    assert!(matches!(
        read_data_table(&path),
        Err(IngestError::MissingHeader { .. })
    ));
}

#[test]
fn reads_visit_dates_with_header() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "visits.csv", b"visit,date\nV1,15/03/2001\nV2,2001-06-30\n");
    let table = read_visit_dates(&path).expect("read visits");
    assert_eq!(table.lookup("V1"), NaiveDate::from_ymd_opt(2001, 3, 15));
    assert_eq!(table.lookup("V2"), NaiveDate::from_ymd_opt(2001, 6, 30));
}

#[test]
fn bad_visit_date_is_fatal() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "visits.csv", b"V1,15/03/2001\nV2,soon\n");
    let err = read_visit_dates(&path).unwrap_err();
    assert!(matches!(err, IngestError::InvalidDate { row: 2, .. }));
}

#[test]
fn reads_demographics_positions() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "demo.csv",
        b"code,i2b2,race,label,ethnicity\nSEXMale1,DEM|SEX:m,,Male,0\nETHHisp,DEM|ETH:h,white,Hispanic,1\n",
    );
    let table = read_demographics(&path).expect("read demographics");
    assert_eq!(table.rows().len(), 2);
    assert!(!table.rows()[0].ethnicity);
    assert_eq!(table.rows()[0].race_code, None);
    assert!(table.rows()[1].ethnicity);
    assert_eq!(table.rows()[1].race_code.as_deref(), Some("white"));
}

#[test]
fn reads_icd_segments_and_key() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "icd9.csv",
        b"Endocrine,Diabetes,250.00\nInfectious,001,\n",
    );
    let table = read_icd_table(&path).expect("read icd");
    assert_eq!(table.rows()[0].segments, vec!["Endocrine", "Diabetes"]);
    assert_eq!(table.rows()[0].key, "250.00");
    assert_eq!(table.rows()[1].segments, vec!["Infectious"]);
    assert_eq!(table.rows()[1].key, "001");
}

#[test]
fn missing_config_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let err = load_config(&dir.path().join("etl.yml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}
