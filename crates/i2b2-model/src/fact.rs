//! Observation facts.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Written in place of a start date the resolver could not compute.
pub const UNRESOLVED_DATE: &str = "NA";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventDate {
    Resolved(NaiveDate),
    Unresolved,
}

impl EventDate {
    pub fn date(self) -> Option<NaiveDate> {
        match self {
            Self::Resolved(date) => Some(date),
            Self::Unresolved => None,
        }
    }

    pub fn is_resolved(self) -> bool {
        matches!(self, Self::Resolved(_))
    }
}

impl fmt::Display for EventDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resolved(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            Self::Unresolved => f.write_str(UNRESOLVED_DATE),
        }
    }
}

/// Where a fact's code came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FactCodeOrigin {
    /// Synthesized concept found in the index.
    Concept,
    /// No index entry: the raw column name.
    Column,
    /// Rewritten by the ICD override.
    Icd,
    /// Substituted from the demographics table.
    Demographic,
}

impl FactCodeOrigin {
    /// Only codes owned by this ontology take the global code prefix.
    pub fn takes_prefix(self) -> bool {
        matches!(self, Self::Concept | Self::Column)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fact {
    pub subject_id: String,
    pub event_date: EventDate,
    pub code: String,
    /// Empty when the code itself encodes the observation.
    pub value: String,
    pub origin: FactCodeOrigin,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_date_formats_iso() {
        let date = NaiveDate::from_ymd_opt(2000, 3, 7).unwrap();
        assert_eq!(EventDate::Resolved(date).to_string(), "2000-03-07");
        assert_eq!(EventDate::Unresolved.to_string(), UNRESOLVED_DATE);
    }
}
