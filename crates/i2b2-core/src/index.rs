//! Phenotype-to-concept index.
//!
//! Entries keep dictionary order. When several entries share a
//! (raw value token, variable) key the one inserted last is returned, which
//! is what a front-to-back scan that keeps overwriting its match produces.

use std::collections::HashMap;

use i2b2_model::{IndexEntry, RawValueToken};

#[derive(Debug, Clone, Default)]
pub struct ConceptIndex {
    entries: Vec<IndexEntry>,
    /// variable -> raw id -> position of the last writer.
    by_token: HashMap<String, HashMap<String, usize>>,
    /// variable -> position of the last scalar entry.
    scalar_by_variable: HashMap<String, usize>,
}

impl ConceptIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: IndexEntry) {
        let position = self.entries.len();
        if let RawValueToken::Coded(id) = &entry.raw_token {
            self.by_token
                .entry(entry.variable.clone())
                .or_default()
                .insert(id.clone(), position);
        }
        if entry.is_scalar() {
            self.scalar_by_variable
                .insert(entry.variable.clone(), position);
        }
        self.entries.push(entry);
    }

    /// Last entry whose raw id equals `cell` for `variable`.
    pub fn lookup(&self, cell: &str, variable: &str) -> Option<&IndexEntry> {
        let position = *self.by_token.get(variable)?.get(cell)?;
        self.entries.get(position)
    }

    /// Last scalar (or `Value`) entry declared for `variable`.
    pub fn scalar_for(&self, variable: &str) -> Option<&IndexEntry> {
        let position = *self.scalar_by_variable.get(variable)?;
        self.entries.get(position)
    }

    /// Linear scan with the same semantics as [`ConceptIndex::lookup`].
    pub fn scan_last_match(&self, cell: &str, variable: &str) -> Option<&IndexEntry> {
        let mut found = None;
        for entry in &self.entries {
            if entry.raw_token.matches(cell) && entry.variable == variable {
                found = Some(entry);
            }
        }
        found
    }

    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<IndexEntry> for ConceptIndex {
    fn from_iter<T: IntoIterator<Item = IndexEntry>>(iter: T) -> Self {
        let mut index = Self::new();
        for entry in iter {
            index.push(entry);
        }
        index
    }
}

#[cfg(test)]
mod tests {
    use i2b2_model::{ConceptDefinition, ConceptType};

    use super::*;

    fn coded(code: &str, id: &str, variable: &str) -> IndexEntry {
        IndexEntry {
            concept: ConceptDefinition::new(format!("/S/{variable}/{code}"), code, ConceptType::Assertion),
            raw_token: RawValueToken::Coded(id.to_string()),
            variable: variable.to_string(),
        }
    }

    fn scalar(code: &str, variable: &str) -> IndexEntry {
        IndexEntry {
            concept: ConceptDefinition::new(format!("/S/{variable}/"), code, ConceptType::Integer),
            raw_token: RawValueToken::NoId,
            variable: variable.to_string(),
        }
    }

    #[test]
    fn last_insertion_wins() {
        let index: ConceptIndex = [
            coded("SEXMale1", "1", "SEX"),
            coded("SEXFemale2", "2", "SEX"),
            coded("SEXMan1", "1", "SEX"),
        ]
        .into_iter()
        .collect();
        assert_eq!(index.lookup("1", "SEX").unwrap().code(), "SEXMan1");
        assert_eq!(index.scan_last_match("1", "SEX").unwrap().code(), "SEXMan1");
        assert_eq!(index.lookup("2", "SEX").unwrap().code(), "SEXFemale2");
    }

    #[test]
    fn lookup_is_scoped_to_variable() {
        let index: ConceptIndex = [coded("SEXMale1", "1", "SEX"), scalar("AGE", "AGE")]
            .into_iter()
            .collect();
        assert!(index.lookup("1", "AGE").is_none());
        assert!(index.lookup("40", "AGE").is_none());
        assert_eq!(index.scalar_for("AGE").unwrap().code(), "AGE");
        assert!(index.scalar_for("SEX").is_none());
    }
}
