//! Concept synthesis: dictionary variables to concept ontology and index.
//!
//! A variable with at most one enumeration token becomes a single scalar
//! concept whose code is the variable name. A variable with two or more
//! tokens becomes one assertion concept per `id=label` token; for mixed
//! types a free token becomes one extra scalar `Value` concept that holds
//! the non-coded remainder.

pub mod code;
pub mod enumeration;

use i2b2_model::{
    ConceptDefinition, ConceptType, ConfigError, DeclaredType, EtlConfig, IndexEntry,
    RawValueToken, VariableDefinition,
};
use serde::Serialize;
use tracing::{debug, trace};

use crate::index::ConceptIndex;

pub use code::{ConceptCode, build_code, canonicalize, concept_folder, enumerated_suffix};
pub use enumeration::{CodedValue, Separator, split_coded_value, value_tokens};

/// Leaf name of the scalar concept that holds a mixed variable's free values.
pub const VALUE_LEAF: &str = "Value";

#[derive(Debug, Clone)]
pub struct SynthesisOptions {
    /// Variable skipped entirely.
    pub patient_id: String,
    pub path_root: String,
    pub separator: Separator,
}

impl SynthesisOptions {
    pub fn from_config(config: &EtlConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            patient_id: config.patientid.clone(),
            path_root: config.pathroot.clone(),
            separator: Separator::parse(&config.separator)?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SynthesisReport {
    pub variables: usize,
    pub scalar_variables: usize,
    pub enumerated_variables: usize,
    pub assertion_concepts: usize,
    pub value_concepts: usize,
    pub truncated_codes: usize,
    pub skipped_tokens: usize,
}

/// Synthesized concepts, in dictionary order, with their index.
#[derive(Debug, Clone, Default)]
pub struct Ontology {
    pub index: ConceptIndex,
    pub report: SynthesisReport,
}

impl Ontology {
    pub fn concepts(&self) -> impl Iterator<Item = &ConceptDefinition> {
        self.index.entries().iter().map(|entry| &entry.concept)
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

pub fn synthesize(variables: &[VariableDefinition], options: &SynthesisOptions) -> Ontology {
    let mut synthesizer = Synthesizer {
        options,
        ontology: Ontology::default(),
    };
    for variable in variables {
        if variable.name == options.patient_id {
            trace!(variable = %variable.name, "skipping patient identifier");
            continue;
        }
        synthesizer.add_variable(variable);
    }
    debug!(
        concepts = synthesizer.ontology.len(),
        truncated = synthesizer.ontology.report.truncated_codes,
        "synthesized concepts"
    );
    synthesizer.ontology
}

struct Synthesizer<'a> {
    options: &'a SynthesisOptions,
    ontology: Ontology,
}

impl Synthesizer<'_> {
    fn add_variable(&mut self, variable: &VariableDefinition) {
        self.ontology.report.variables += 1;
        let tokens = value_tokens(variable, &self.options.separator);
        let folder = concept_folder(&self.options.path_root, variable.label());
        if tokens.len() <= 1 {
            self.ontology.report.scalar_variables += 1;
            self.push_scalar(variable, folder);
            return;
        }
        self.ontology.report.enumerated_variables += 1;

        let prefix = canonicalize(&variable.name);
        let mixed = variable.kind() == DeclaredType::Mixed;
        let mut value_emitted = false;
        for token in &tokens {
            if token.is_empty() {
                self.ontology.report.skipped_tokens += 1;
                continue;
            }
            match split_coded_value(token) {
                Some(coded) => {
                    let suffix = enumerated_suffix(&coded.label, &coded.raw_id);
                    let code = self.code(&variable.name, &prefix, &suffix);
                    self.push_assertion(
                        variable,
                        format!("{folder}{}", coded.label),
                        code,
                        RawValueToken::Coded(coded.raw_id),
                    );
                }
                None if mixed => {
                    if !value_emitted {
                        self.ontology.report.value_concepts += 1;
                        self.push_scalar(variable, format!("{folder}{VALUE_LEAF}"));
                        value_emitted = true;
                    }
                }
                None => {
                    let label = enumeration::free_label(token);
                    let code = self.code(&variable.name, &prefix, &canonicalize(&label));
                    self.push_assertion(
                        variable,
                        format!("{folder}{label}"),
                        code,
                        RawValueToken::NoId,
                    );
                }
            }
        }
    }

    fn code(&mut self, variable: &str, prefix: &str, suffix: &str) -> String {
        let code = build_code(prefix, suffix);
        if let ConceptCode::Truncated { code, dropped } = &code {
            self.ontology.report.truncated_codes += 1;
            trace!(variable, code = %code, dropped, "truncated concept code");
        }
        code.into_string()
    }

    fn push_scalar(&mut self, variable: &VariableDefinition, path: String) {
        let concept_type = ConceptType::classify(&variable.declared_type);
        self.ontology.index.push(IndexEntry {
            concept: ConceptDefinition::new(path, variable.name.clone(), concept_type),
            raw_token: RawValueToken::NoId,
            variable: variable.name.clone(),
        });
    }

    fn push_assertion(
        &mut self,
        variable: &VariableDefinition,
        path: String,
        code: String,
        raw_token: RawValueToken,
    ) {
        self.ontology.report.assertion_concepts += 1;
        self.ontology.index.push(IndexEntry {
            concept: ConceptDefinition::new(path, code, ConceptType::Assertion),
            raw_token,
            variable: variable.name.clone(),
        });
    }
}

#[cfg(test)]
mod tests {
    use i2b2_model::Enumeration;

    use super::*;

    fn options() -> SynthesisOptions {
        SynthesisOptions {
            patient_id: "SUBJID".to_string(),
            path_root: "Study".to_string(),
            separator: Separator::parse(",").unwrap(),
        }
    }

    fn raw(name: &str, kind: &str, values: &str) -> VariableDefinition {
        VariableDefinition::new(name, kind).with_enumeration(Enumeration::Raw(values.to_string()))
    }

    #[test]
    fn patient_identifier_is_skipped() {
        let ontology = synthesize(&[raw("SUBJID", "string", "")], &options());
        assert!(ontology.is_empty());
        assert_eq!(ontology.report.variables, 0);
    }

    #[test]
    fn single_token_is_scalar() {
        let ontology = synthesize(&[raw("AGE", "num", "years")], &options());
        let concepts: Vec<_> = ontology.concepts().collect();
        assert_eq!(concepts.len(), 1);
        assert_eq!(concepts[0].code, "AGE");
        assert_eq!(concepts[0].path, "/Study/AGE/");
        assert_eq!(concepts[0].concept_type, ConceptType::Integer);
        assert!(ontology.index.entries()[0].raw_token == RawValueToken::NoId);
    }

    #[test]
    fn free_token_in_plain_enumeration_is_an_assertion_without_id() {
        let ontology = synthesize(&[raw("SMOKE", "string", "Never,Former")], &options());
        let entries = ontology.index.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].code(), "SMOKENever");
        assert_eq!(entries[0].raw_token, RawValueToken::NoId);
        assert_eq!(entries[0].concept.concept_type, ConceptType::Assertion);
        assert!(ontology.index.scalar_for("SMOKE").is_none());
    }

    #[test]
    fn trailing_separator_still_enumerates() {
        let ontology = synthesize(&[raw("FLAG", "encoded", "1=Yes,")], &options());
        assert_eq!(ontology.len(), 1);
        assert_eq!(ontology.index.entries()[0].code(), "FLAGYes1");
        assert_eq!(ontology.report.skipped_tokens, 1);
    }

    #[test]
    fn mixed_variable_gets_one_value_concept() {
        let ontology = synthesize(
            &[raw("DOSE", "mixed", "0=None,free text,more text,9=Unknown")],
            &options(),
        );
        let codes: Vec<_> = ontology.concepts().map(|c| c.code.as_str()).collect();
        assert_eq!(codes, vec!["DOSENone0", "DOSE", "DOSEUnknown9"]);
        let value = ontology.index.scalar_for("DOSE").unwrap();
        assert_eq!(value.concept.path, "/Study/DOSE/Value");
        assert_eq!(value.concept.concept_type, ConceptType::String);
        assert_eq!(ontology.report.value_concepts, 1);
    }

    #[test]
    fn description_names_the_folder() {
        let variable = raw("BMI", "decimal", "").with_description("Body mass index, kg/m2");
        let ontology = synthesize(&[variable], &options());
        let concept = ontology.concepts().next().unwrap();
        assert_eq!(concept.path, "/Study/Body mass index -  kgorm2/");
        assert_eq!(concept.concept_type, ConceptType::Float);
    }
}
