//! ETL configuration as read from the YAML config file.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{ConfigError, Result};

/// Key in `timevar` that names the fallback time column.
pub const DEFAULT_TIME_VAR_KEY: &str = "default";

/// Dictionary parsing variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DictFormat {
    /// Comma-delimited, enumeration kept as raw text.
    #[default]
    Csv,
    /// Tab-delimited, enumeration kept as raw text.
    Tsv,
    /// Comma-delimited dbGaP layout: values spill into the unnamed columns
    /// after the enumeration column and arrive as a structured token list.
    Dbgap,
}

/// Unit applied to a time delta (`dateformat` / `additionaldatedifftimeunits`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    /// The time column holds a calendar date, not a delta.
    Literal,
    Days,
    /// Calendar-aware month arithmetic.
    Months,
    /// 365-day years.
    Years,
    /// Half of a 365-day year.
    HalfYears,
}

impl TimeUnit {
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::Literal),
            2 => Some(Self::Days),
            3 => Some(Self::Months),
            4 => Some(Self::Years),
            5 => Some(Self::HalfYears),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Self::Literal => 1,
            Self::Days => 2,
            Self::Months => 3,
            Self::Years => 4,
            Self::HalfYears => 5,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Literal => "literal",
            Self::Days => "days",
            Self::Months => "months",
            Self::Years => "years",
            Self::HalfYears => "half-years",
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One Mode 2 binding: facts whose column matches `regex` take their date
/// from `timevar`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TimeVarPattern {
    pub timevar: String,
    pub regex: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EtlConfig {
    /// Dictionary column holding the variable name.
    pub varname: String,
    /// Variable holding the subject identifier; skipped during synthesis.
    pub patientid: String,
    /// Dictionary column holding the declared type.
    pub typename: String,
    /// Dictionary column holding the enumerated values.
    pub enumname: String,
    #[serde(default = "default_separator")]
    pub separator: String,
    pub pathroot: String,
    /// Optional dictionary column whose text names the concept folder.
    #[serde(default)]
    pub description: Option<String>,
    /// Output basename: `concepts_<filebase>.csv`, `facts_<filebase>.csv`.
    pub filebase: String,
    #[serde(default)]
    pub dictformat: DictFormat,
    #[serde(default, deserialize_with = "de_code")]
    pub datemode: u8,
    #[serde(default)]
    pub datevar: Option<String>,
    #[serde(default, deserialize_with = "de_optional_code")]
    pub dateformat: Option<u8>,
    /// Baseline date, `dd/mm/yyyy`.
    #[serde(default)]
    pub basedate: Option<String>,
    #[serde(default)]
    pub timevar: BTreeMap<String, String>,
    #[serde(default)]
    pub timevarregex: Vec<TimeVarPattern>,
    #[serde(default)]
    pub additionaltimevar: Vec<String>,
    #[serde(default, deserialize_with = "de_optional_code")]
    pub additionaldatedifftimeunits: Option<u8>,
    #[serde(default)]
    pub demographics_file: Option<PathBuf>,
    #[serde(default)]
    pub demographicvars: Vec<String>,
    #[serde(default)]
    pub visitdatefile: Option<PathBuf>,
    #[serde(default)]
    pub codeprefix: Option<String>,
    #[serde(default)]
    pub icdsystem: Option<String>,
    #[serde(default)]
    pub icd9vars: Vec<String>,
    #[serde(default)]
    pub icd10vars: Vec<String>,
    #[serde(default)]
    pub icd9file: Option<PathBuf>,
    #[serde(default)]
    pub icd10file: Option<PathBuf>,
}

fn default_separator() -> String {
    ",".to_string()
}

impl EtlConfig {
    /// Rejects required keys that are present but empty.
    pub fn validate(&self) -> Result<()> {
        let required: [(&'static str, &str); 6] = [
            ("varname", &self.varname),
            ("patientid", &self.patientid),
            ("typename", &self.typename),
            ("enumname", &self.enumname),
            ("pathroot", &self.pathroot),
            ("filebase", &self.filebase),
        ];
        for (key, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::missing(key, "value is empty"));
            }
        }
        if self.separator.is_empty() {
            return Err(ConfigError::invalid("separator", "must not be empty"));
        }
        let has_icd_columns = !self.icd9vars.is_empty() || !self.icd10vars.is_empty();
        let has_icd_files = self.icd9file.is_some() || self.icd10file.is_some();
        if (has_icd_columns || has_icd_files) && self.icd_system().is_none() {
            return Err(ConfigError::missing(
                "icdsystem",
                "required when ICD columns or ICD tables are configured",
            ));
        }
        if !self.demographicvars.is_empty() && self.demographics_file.is_none() {
            return Err(ConfigError::missing(
                "demographics_file",
                "required when demographicvars is set",
            ));
        }
        Ok(())
    }

    /// The time column used when a variable has no `timevar` override.
    pub fn default_time_var(&self) -> Option<&str> {
        self.timevar
            .get(DEFAULT_TIME_VAR_KEY)
            .or(self.datevar.as_ref())
            .map(String::as_str)
            .filter(|name| !name.trim().is_empty())
    }

    /// Non-empty description column, if configured.
    pub fn description_field(&self) -> Option<&str> {
        self.description
            .as_deref()
            .filter(|field| !field.trim().is_empty())
    }

    pub fn code_prefix(&self) -> &str {
        self.codeprefix.as_deref().unwrap_or("")
    }

    pub fn icd_system(&self) -> Option<&str> {
        self.icdsystem
            .as_deref()
            .filter(|system| !system.trim().is_empty())
    }

    pub fn concepts_file_name(&self) -> String {
        format!("concepts_{}.csv", self.filebase)
    }

    pub fn facts_file_name(&self) -> String {
        format!("facts_{}.csv", self.filebase)
    }
}

/// Codes may be written as YAML integers or quoted strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum CodeRepr {
    Int(u8),
    Text(String),
}

impl CodeRepr {
    fn into_code<E: serde::de::Error>(self) -> std::result::Result<u8, E> {
        match self {
            Self::Int(value) => Ok(value),
            Self::Text(text) => text
                .trim()
                .parse::<u8>()
                .map_err(|_| E::custom(format!("expected a small integer code, got `{text}`"))),
        }
    }
}

fn de_code<'de, D>(deserializer: D) -> std::result::Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    CodeRepr::deserialize(deserializer)?.into_code()
}

fn de_optional_code<'de, D>(deserializer: D) -> std::result::Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<CodeRepr>::deserialize(deserializer)?
        .map(CodeRepr::into_code)
        .transpose()
}
