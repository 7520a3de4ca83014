use chrono::NaiveDate;
use i2b2_model::{ConceptDefinition, ConceptType, EventDate, Fact, FactCodeOrigin};
use i2b2_output::{read_concepts, write_concepts, write_facts};
use tempfile::tempdir;

fn concepts() -> Vec<ConceptDefinition> {
    vec![
        ConceptDefinition::new("/Study/SEX/Male", "SEXMale1", ConceptType::Assertion),
        ConceptDefinition::new("/Study/Body mass index - kgorm2/", "BMI", ConceptType::Float),
        ConceptDefinition::new("/Study/AGE/", "AGE", ConceptType::Integer),
        ConceptDefinition::new("/Study/NOTE, free/", "NOTE", ConceptType::String),
    ]
}

#[test]
fn concepts_survive_a_write_and_read() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("concepts_study.csv");
    let concepts = concepts();
    let written = write_concepts(
        &path,
        concepts.iter().map(|c| (c, FactCodeOrigin::Concept)),
        "",
    )
    .unwrap();
    assert_eq!(written, concepts.len());
    assert_eq!(read_concepts(&path).unwrap(), concepts);

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("path,code,type\n"));
}

#[test]
fn concept_prefix_skips_icd_codes() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("concepts.csv");
    let age = ConceptDefinition::new("/Study/AGE/", "AGE", ConceptType::Integer);
    let icd = ConceptDefinition::new("/Dx/Circulatory/", "HOSP_ICD9:401.9", ConceptType::Assertion);
    write_concepts(
        &path,
        [(&age, FactCodeOrigin::Concept), (&icd, FactCodeOrigin::Icd)],
        "S1:",
    )
    .unwrap();
    let codes: Vec<_> = read_concepts(&path)
        .unwrap()
        .into_iter()
        .map(|c| c.code)
        .collect();
    assert_eq!(codes, vec!["S1:AGE", "HOSP_ICD9:401.9"]);
}

#[test]
fn facts_use_the_fixed_header_and_sentinel() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("facts_study.csv");
    let facts = vec![
        Fact {
            subject_id: "p1".to_string(),
            event_date: EventDate::Resolved(NaiveDate::from_ymd_opt(2000, 1, 1).unwrap()),
            code: "SEXMale1".to_string(),
            value: String::new(),
            origin: FactCodeOrigin::Concept,
        },
        Fact {
            subject_id: "p1".to_string(),
            event_date: EventDate::Unresolved,
            code: "DEM|SEX:m".to_string(),
            value: String::new(),
            origin: FactCodeOrigin::Demographic,
        },
        Fact {
            subject_id: "p2".to_string(),
            event_date: EventDate::Unresolved,
            code: "NOTE".to_string(),
            value: "left, then right".to_string(),
            origin: FactCodeOrigin::Column,
        },
    ];
    assert_eq!(write_facts(&path, &facts, "S1:").unwrap(), 3);
    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(
        text,
        "mrn,start-date,code,value\n\
         p1,2000-01-01,S1:SEXMale1,\n\
         p1,NA,DEM|SEX:m,\n\
         p2,NA,S1:NOTE,\"left, then right\"\n"
    );
}

#[test]
fn empty_artifacts_still_have_headers() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("facts.csv");
    write_facts(&path, &[], "").unwrap();
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "mrn,start-date,code,value\n"
    );
}
