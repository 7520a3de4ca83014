//! Tests for i2b2-model types.

use i2b2_model::{ConceptDefinition, ConceptType, DictFormat, EtlConfig, EventDate, Fact, FactCodeOrigin};

const CONFIG: &str = r#"
varname: VARNAME
patientid: SUBJID
typename: TYPE
enumname: VALUES
pathroot: Study
filebase: study
datemode: "3"
dateformat: 4
additionaldatedifftimeunits: "3"
basedate: 01/01/2000
dictformat: dbgap
timevar:
  default: YEARS
additionaltimevar: [MONTHS_A, MONTHS_B]
"#;

#[test]
fn config_accepts_string_and_integer_codes() {
    let config: EtlConfig = serde_yaml::from_str(CONFIG).expect("parse config");
    assert_eq!(config.datemode, 3);
    assert_eq!(config.dateformat, Some(4));
    assert_eq!(config.additionaldatedifftimeunits, Some(3));
    assert_eq!(config.separator, ",");
    assert_eq!(config.dictformat, DictFormat::Dbgap);
    assert_eq!(config.default_time_var(), Some("YEARS"));
    assert_eq!(config.concepts_file_name(), "concepts_study.csv");
    assert_eq!(config.facts_file_name(), "facts_study.csv");
    assert!(config.validate().is_ok());
}

#[test]
fn config_rejects_unknown_keys() {
    let text = format!("{CONFIG}unexpected: 1\n");
    assert!(serde_yaml::from_str::<EtlConfig>(&text).is_err());
}

#[test]
fn config_requires_core_keys() {
    let text = CONFIG.replace("pathroot: Study\n", "");
    let err = serde_yaml::from_str::<EtlConfig>(&text).unwrap_err();
    assert!(err.to_string().contains("pathroot"));
}

#[test]
fn concept_serializes_with_type_column() {
    let concept = ConceptDefinition::new("/Study/SEX/Male", "SEXMale1", ConceptType::Assertion);
    let json = serde_json::to_value(&concept).expect("serialize concept");
    assert_eq!(json["type"], "assertion");
    assert_eq!(json["code"], "SEXMale1");
}

#[test]
fn only_owned_codes_take_prefix() {
    let fact = Fact {
        subject_id: "p1".to_string(),
        event_date: EventDate::Unresolved,
        code: "HOSP_ICD9:250.00".to_string(),
        value: String::new(),
        origin: FactCodeOrigin::Icd,
    };
    assert!(!fact.origin.takes_prefix());
    assert!(FactCodeOrigin::Concept.takes_prefix());
    assert!(FactCodeOrigin::Column.takes_prefix());
    assert!(!FactCodeOrigin::Demographic.takes_prefix());
}
