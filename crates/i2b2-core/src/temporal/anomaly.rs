use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Why a fact's date could not be computed. These are reported and the fact
/// is written with the unresolved-date sentinel; they never abort a run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DateAnomaly {
    #[error("time column `{column}` is not in the data table")]
    MissingColumn { column: String },

    #[error("time column `{column}` does not hold a number")]
    NonNumeric { column: String, value: String },

    #[error("no time column produced a candidate date")]
    NoCandidate,

    #[error("visit token is not in the visit-date table")]
    UnknownVisit { token: String },

    #[error("column `{column}` does not hold a calendar date")]
    InvalidDate { column: String, value: String },

    #[error("date arithmetic left the supported calendar range")]
    OutOfRange,
}

impl DateAnomaly {
    pub fn kind(&self) -> AnomalyKind {
        match self {
            Self::MissingColumn { .. } => AnomalyKind::MissingColumn,
            Self::NonNumeric { .. } => AnomalyKind::NonNumeric,
            Self::NoCandidate => AnomalyKind::NoCandidate,
            Self::UnknownVisit { .. } => AnomalyKind::UnknownVisit,
            Self::InvalidDate { .. } => AnomalyKind::InvalidDate,
            Self::OutOfRange => AnomalyKind::OutOfRange,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyKind {
    MissingColumn,
    NonNumeric,
    NoCandidate,
    UnknownVisit,
    InvalidDate,
    OutOfRange,
    /// Mode 2 fell back to the latest candidate date.
    UnmatchedPattern,
}

impl AnomalyKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MissingColumn => "missing time column",
            Self::NonNumeric => "non-numeric time delta",
            Self::NoCandidate => "no candidate date",
            Self::UnknownVisit => "unknown visit token",
            Self::InvalidDate => "invalid calendar date",
            Self::OutOfRange => "date out of range",
            Self::UnmatchedPattern => "no time pattern matched",
        }
    }
}

impl fmt::Display for AnomalyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
