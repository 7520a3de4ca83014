use i2b2_core::synthesis::Separator;
use i2b2_core::{ConceptIndex, SynthesisOptions, canonicalize, synthesize};
use i2b2_model::{
    ConceptDefinition, ConceptType, Enumeration, IndexEntry, MAX_CODE_LEN, RawValueToken,
    VariableDefinition,
};
use proptest::prelude::*;

fn options() -> SynthesisOptions {
    SynthesisOptions {
        patient_id: "SUBJID".to_string(),
        path_root: "Study".to_string(),
        separator: Separator::parse(",").unwrap(),
    }
}

fn enumeration() -> impl Strategy<Value = String> {
    prop::collection::vec(("[0-9A-Za-z]{1,8}", "[A-Za-z0-9 ()/-]{0,60}"), 2..6).prop_map(
        |pairs| {
            pairs
                .into_iter()
                .map(|(id, label)| format!("{id}={label}"))
                .collect::<Vec<_>>()
                .join(",")
        },
    )
}

proptest! {
    #[test]
    fn synthesized_codes_fit_and_keep_the_variable_prefix(
        name in "[A-Z][A-Z0-9_]{0,40}",
        values in enumeration(),
    ) {
        let variable = VariableDefinition::new(name.clone(), "encoded value")
            .with_enumeration(Enumeration::Raw(values));
        let ontology = synthesize(&[variable], &options());
        let prefix = canonicalize(&name);
        for concept in ontology.concepts() {
            prop_assert!(concept.code.chars().count() <= MAX_CODE_LEN, "{}", concept.code);
            prop_assert!(concept.code.starts_with(&prefix), "{}", concept.code);
        }
    }

    #[test]
    fn scalar_code_is_the_variable_name(
        name in "[A-Za-z][A-Za-z0-9_.]{0,49}",
        kind in prop::sample::select(vec!["num", "decimal", "string", "date"]),
    ) {
        prop_assume!(name != "SUBJID");
        let variable = VariableDefinition::new(name.clone(), kind);
        let ontology = synthesize(&[variable], &options());
        let concepts: Vec<_> = ontology.concepts().collect();
        prop_assert_eq!(concepts.len(), 1);
        prop_assert_eq!(&concepts[0].code, &name);
        prop_assert_ne!(concepts[0].concept_type, ConceptType::Assertion);
    }

    #[test]
    fn keyed_lookup_agrees_with_linear_scan(
        layout in prop::collection::vec((0usize..3, prop::option::of(0usize..4)), 0..40),
    ) {
        let variables = ["SEX", "RACE", "SMOKE"];
        let index: ConceptIndex = layout
            .iter()
            .enumerate()
            .map(|(position, (variable, token))| {
                let raw_token =
                    token.map_or(RawValueToken::NoId, |t| RawValueToken::Coded(t.to_string()));
                let concept_type = if token.is_some() {
                    ConceptType::Assertion
                } else {
                    ConceptType::String
                };
                IndexEntry {
                    concept: ConceptDefinition::new("/S/", format!("C{position}"), concept_type),
                    raw_token,
                    variable: variables[*variable].to_string(),
                }
            })
            .collect();
        for variable in variables {
            for cell in ["0", "1", "2", "3", "4", ""] {
                let keyed = index.lookup(cell, variable).map(IndexEntry::code);
                let scanned = index.scan_last_match(cell, variable).map(IndexEntry::code);
                prop_assert_eq!(keyed, scanned);
            }
        }
    }
}
