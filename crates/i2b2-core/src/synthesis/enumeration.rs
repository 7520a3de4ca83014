//! Splitting enumeration fields into value tokens.

use i2b2_model::{ConfigError, DeclaredType, Enumeration, VariableDefinition};
use regex::Regex;

/// Enumeration separator: a literal string, or a regex written `/.../`.
#[derive(Debug, Clone)]
pub enum Separator {
    Literal(String),
    Pattern(Regex),
}

impl Separator {
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        if raw.len() > 2 && raw.starts_with('/') && raw.ends_with('/') {
            let pattern = &raw[1..raw.len() - 1];
            let regex = Regex::new(pattern)
                .map_err(|e| ConfigError::invalid("separator", e.to_string()))?;
            return Ok(Self::Pattern(regex));
        }
        if raw.is_empty() {
            return Err(ConfigError::invalid("separator", "must not be empty"));
        }
        Ok(Self::Literal(raw.to_string()))
    }

    pub fn split<'a>(&self, text: &'a str) -> Vec<&'a str> {
        match self {
            Self::Literal(sep) => text.split(sep.as_str()).collect(),
            Self::Pattern(regex) => regex.split(text).collect(),
        }
    }
}

/// Trimmed value tokens of a variable's enumeration field.
///
/// Raw text keeps empty tokens so the token count (which selects scalar vs
/// enumerated handling) matches the split. Structured lists drop them, and
/// for mixed types keep every coded token plus only the first free token,
/// which stands for the non-enumerated remainder.
pub fn value_tokens(variable: &VariableDefinition, separator: &Separator) -> Vec<String> {
    match &variable.enumeration {
        Enumeration::Raw(text) => separator
            .split(text)
            .into_iter()
            .map(|token| token.trim().to_string())
            .collect(),
        Enumeration::Tokens(tokens) => {
            let mixed = variable.kind() == DeclaredType::Mixed;
            let mut seen_free = false;
            tokens
                .iter()
                .map(|token| token.trim())
                .filter(|token| !token.is_empty())
                .filter(|token| {
                    if !mixed || token.contains('=') {
                        return true;
                    }
                    !std::mem::replace(&mut seen_free, true)
                })
                .map(str::to_string)
                .collect()
        }
    }
}

/// An `id=label` token split on its first `=`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodedValue {
    pub raw_id: String,
    pub label: String,
}

pub fn split_coded_value(token: &str) -> Option<CodedValue> {
    let (left, right) = token.split_once('=')?;
    let raw_id = left.replace('"', "").trim().to_string();
    let label = right.replace('"', "").trim().replace(',', " or ");
    Some(CodedValue { raw_id, label })
}

/// Free token text used as a label: quotes stripped, commas spelled out.
pub fn free_label(token: &str) -> String {
    token.replace('"', "").trim().replace(',', " or ")
}
