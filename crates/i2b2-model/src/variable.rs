//! Data dictionary variables.

use serde::{Deserialize, Serialize};

/// Closed vocabulary of declared dictionary types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeclaredType {
    Integer,
    Float,
    String,
    /// Encoded enumeration (`1=Male,2=Female`).
    Encoded,
    /// Coded values mixed with free values.
    Mixed,
}

impl DeclaredType {
    /// Case-insensitive parse of a dictionary type cell.
    pub fn parse(raw: &str) -> Self {
        let lower = raw.trim().to_ascii_lowercase();
        match lower.as_str() {
            "num" | "numeric" | "integer" => Self::Integer,
            "decimal" | "float" => Self::Float,
            _ if lower.contains("mixed") => Self::Mixed,
            _ if lower.contains("encoded") => Self::Encoded,
            _ => Self::String,
        }
    }
}

/// Enumerated-value field of a dictionary row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Enumeration {
    /// Unsplit text; the synthesizer splits it on the configured separator.
    Raw(String),
    /// Already split by a format-specific reader.
    Tokens(Vec<String>),
}

impl Default for Enumeration {
    fn default() -> Self {
        Self::Raw(String::new())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableDefinition {
    pub name: String,
    /// Declared type text as written in the dictionary.
    pub declared_type: String,
    pub description: Option<String>,
    pub enumeration: Enumeration,
}

impl VariableDefinition {
    pub fn new(name: impl Into<String>, declared_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            declared_type: declared_type.into(),
            description: None,
            enumeration: Enumeration::default(),
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_enumeration(mut self, enumeration: Enumeration) -> Self {
        self.enumeration = enumeration;
        self
    }

    pub fn kind(&self) -> DeclaredType {
        DeclaredType::parse(&self.declared_type)
    }

    /// Description when present and non-blank, otherwise the variable name.
    pub fn label(&self) -> &str {
        self.description
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .unwrap_or(&self.name)
    }
}
