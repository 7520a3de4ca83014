//! Concept ontology entries and the phenotype-to-concept index entry.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::variable::DeclaredType;

/// Upper bound on synthesized concept codes, in characters.
pub const MAX_CODE_LEN: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConceptType {
    Integer,
    Float,
    String,
    /// The coded value was observed; carries no value of its own.
    Assertion,
}

impl ConceptType {
    /// Scalar classification of a declared type cell.
    pub fn classify(declared_type: &str) -> Self {
        match DeclaredType::parse(declared_type) {
            DeclaredType::Integer => Self::Integer,
            DeclaredType::Float => Self::Float,
            _ => Self::String,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Float => "float",
            Self::String => "string",
            Self::Assertion => "assertion",
        }
    }
}

impl fmt::Display for ConceptType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConceptType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "integer" => Ok(Self::Integer),
            "float" => Ok(Self::Float),
            "string" => Ok(Self::String),
            "assertion" => Ok(Self::Assertion),
            other => Err(format!("unknown concept type `{other}`")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConceptDefinition {
    pub path: String,
    pub code: String,
    #[serde(rename = "type")]
    pub concept_type: ConceptType,
}

impl ConceptDefinition {
    pub fn new(path: impl Into<String>, code: impl Into<String>, concept_type: ConceptType) -> Self {
        Self {
            path: path.into(),
            code: code.into(),
            concept_type,
        }
    }
}

/// Left-hand side of an `id=label` enumeration entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RawValueToken {
    /// Scalar concepts: never equal to a cell value.
    NoId,
    Coded(String),
}

impl RawValueToken {
    pub fn matches(&self, cell: &str) -> bool {
        match self {
            Self::NoId => false,
            Self::Coded(id) => id == cell,
        }
    }

    pub fn as_coded(&self) -> Option<&str> {
        match self {
            Self::NoId => None,
            Self::Coded(id) => Some(id),
        }
    }
}

/// Binds (raw value token, source variable) to a synthesized concept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub concept: ConceptDefinition,
    pub raw_token: RawValueToken,
    pub variable: String,
}

impl IndexEntry {
    pub fn code(&self) -> &str {
        &self.concept.code
    }

    /// Scalar and `Value` concepts carry the raw cell as the fact value.
    pub fn is_scalar(&self) -> bool {
        self.concept.concept_type != ConceptType::Assertion
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_scalar_types() {
        assert_eq!(ConceptType::classify("num"), ConceptType::Integer);
        assert_eq!(ConceptType::classify("INTEGER"), ConceptType::Integer);
        assert_eq!(ConceptType::classify("Float"), ConceptType::Float);
        assert_eq!(ConceptType::classify("encoded value"), ConceptType::String);
    }

    #[test]
    fn no_id_never_matches() {
        assert!(!RawValueToken::NoId.matches(""));
        assert!(RawValueToken::Coded("1".to_string()).matches("1"));
        assert!(!RawValueToken::Coded("1".to_string()).matches("01"));
    }
}
