//! Temporal resolution: the calendar date attached to each fact.
//!
//! The configured `datemode` selects one strategy:
//!
//! | mode | strategy                                                        |
//! |------|-----------------------------------------------------------------|
//! | 0    | fixed base date                                                 |
//! | 1    | base date + per-variable time column delta (or a literal date)  |
//! | 2    | base date + delta of the first time column whose regex matches  |
//! | 3    | mode 1 date, then + max of the additional columns, own unit     |
//! | 4    | base date + max(default delta, additional deltas), one unit     |
//! | 5    | base date + signed decimal parsed from a visit label            |
//! | 6    | visit token looked up in the external visit-date table          |
//! | 7    | base date + first digit run parsed from a visit label           |

pub mod anomaly;
pub mod delta;

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use i2b2_model::{
    ConfigError, DEFAULT_TIME_VAR_KEY, EtlConfig, RowView, TimeUnit, VisitDateTable,
    parse_base_date, parse_calendar_date,
};
use regex::Regex;
use tracing::trace;

pub use anomaly::{AnomalyKind, DateAnomaly};
pub use delta::{DeltaUnit, parse_delta, parse_label_integer, parse_label_number, shift};

/// Per-variable time column, with a default for variables not listed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeVarTable {
    default: String,
    overrides: BTreeMap<String, String>,
}

impl TimeVarTable {
    pub fn new(default: impl Into<String>, overrides: BTreeMap<String, String>) -> Self {
        Self {
            default: default.into(),
            overrides,
        }
    }

    pub fn from_config(config: &EtlConfig) -> Result<Self, ConfigError> {
        let default = config
            .default_time_var()
            .ok_or_else(|| ConfigError::missing("timevar", "a `default` entry or `datevar`"))?;
        let overrides = config
            .timevar
            .iter()
            .filter(|(variable, _)| variable.as_str() != DEFAULT_TIME_VAR_KEY)
            .map(|(variable, column)| (variable.clone(), column.clone()))
            .collect();
        Ok(Self::new(default, overrides))
    }

    pub fn column_for(&self, variable: &str) -> &str {
        self.overrides
            .get(variable)
            .map_or(self.default.as_str(), String::as_str)
    }

    pub fn default_column(&self) -> &str {
        &self.default
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.default.as_str()).chain(self.overrides.values().map(String::as_str))
    }
}

/// Mode 2 binding of a time column to the fact columns it dates.
#[derive(Debug, Clone)]
pub struct TimePattern {
    pub column: String,
    pub regex: Regex,
}

/// Mode 1 reads either a delta or a calendar date from the time column.
#[derive(Debug, Clone, PartialEq)]
pub enum TimeSource {
    Delta { base: NaiveDate, unit: DeltaUnit },
    Literal,
}

#[derive(Debug, Clone)]
pub enum DateMode {
    Fixed {
        base: NaiveDate,
    },
    TimeVariable {
        time_vars: TimeVarTable,
        source: TimeSource,
    },
    PatternTimeVariable {
        base: NaiveDate,
        patterns: Vec<TimePattern>,
        unit: DeltaUnit,
    },
    CompoundDelta {
        base: NaiveDate,
        time_var: String,
        unit: DeltaUnit,
        additional: Vec<String>,
        additional_unit: DeltaUnit,
    },
    MaxDelta {
        base: NaiveDate,
        time_var: String,
        unit: DeltaUnit,
        additional: Vec<String>,
    },
    NumericLabel {
        base: NaiveDate,
        label_column: String,
        unit: DeltaUnit,
    },
    VisitLookup {
        label_column: String,
        visits: VisitDateTable,
    },
    IntegerLabel {
        base: NaiveDate,
        label_column: String,
        unit: DeltaUnit,
    },
}

impl DateMode {
    pub fn code(&self) -> u8 {
        match self {
            Self::Fixed { .. } => 0,
            Self::TimeVariable { .. } => 1,
            Self::PatternTimeVariable { .. } => 2,
            Self::CompoundDelta { .. } => 3,
            Self::MaxDelta { .. } => 4,
            Self::NumericLabel { .. } => 5,
            Self::VisitLookup { .. } => 6,
            Self::IntegerLabel { .. } => 7,
        }
    }
}

/// How a resolved date was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateOutcome {
    Exact(NaiveDate),
    /// Mode 2: no pattern matched the fact column; latest candidate used.
    LatestCandidate(NaiveDate),
}

impl DateOutcome {
    pub fn date(self) -> NaiveDate {
        match self {
            Self::Exact(date) | Self::LatestCandidate(date) => date,
        }
    }
}

pub type Resolution = Result<DateOutcome, DateAnomaly>;

#[derive(Debug, Clone)]
pub struct TemporalResolver {
    mode: DateMode,
}

impl TemporalResolver {
    pub fn new(mode: DateMode) -> Self {
        Self { mode }
    }

    /// Builds the configured strategy. `visits` is required by mode 6 only.
    pub fn from_config(
        config: &EtlConfig,
        visits: Option<VisitDateTable>,
    ) -> Result<Self, ConfigError> {
        let mode = match config.datemode {
            0 => DateMode::Fixed {
                base: base_date(config)?,
            },
            1 => {
                let source = match time_unit(config)? {
                    TimeUnit::Literal => TimeSource::Literal,
                    unit => TimeSource::Delta {
                        base: base_date(config)?,
                        unit: delta_unit("dateformat", unit)?,
                    },
                };
                DateMode::TimeVariable {
                    time_vars: TimeVarTable::from_config(config)?,
                    source,
                }
            }
            2 => DateMode::PatternTimeVariable {
                base: base_date(config)?,
                patterns: time_patterns(config)?,
                unit: delta_unit("dateformat", time_unit(config)?)?,
            },
            3 => DateMode::CompoundDelta {
                base: base_date(config)?,
                time_var: default_time_var(config)?,
                unit: delta_unit("dateformat", time_unit(config)?)?,
                additional: additional_time_vars(config)?,
                additional_unit: additional_unit(config)?,
            },
            4 => DateMode::MaxDelta {
                base: base_date(config)?,
                time_var: default_time_var(config)?,
                unit: delta_unit("dateformat", time_unit(config)?)?,
                additional: additional_time_vars(config)?,
            },
            5 => DateMode::NumericLabel {
                base: base_date(config)?,
                label_column: label_column(config)?,
                unit: delta_unit("dateformat", time_unit(config)?)?,
            },
            6 => {
                let label_column = label_column(config)?;
                if config.visitdatefile.is_none() {
                    return Err(ConfigError::missing("visitdatefile", "required by datemode 6"));
                }
                let visits = visits.ok_or_else(|| {
                    ConfigError::missing("visitdatefile", "visit-date table was not loaded")
                })?;
                DateMode::VisitLookup {
                    label_column,
                    visits,
                }
            }
            7 => DateMode::IntegerLabel {
                base: base_date(config)?,
                label_column: label_column(config)?,
                unit: delta_unit("dateformat", time_unit(config)?)?,
            },
            other => {
                return Err(ConfigError::invalid(
                    "datemode",
                    format!("expected 0 to 7, got {other}"),
                ));
            }
        };
        Ok(Self::new(mode))
    }

    pub fn mode(&self) -> &DateMode {
        &self.mode
    }

    /// Columns that carry timing rather than observations; the fact mapper
    /// skips them.
    pub fn time_columns(&self) -> BTreeSet<String> {
        let columns: Vec<&str> = match &self.mode {
            DateMode::Fixed { .. } => Vec::new(),
            DateMode::TimeVariable { time_vars, .. } => time_vars.columns().collect(),
            DateMode::PatternTimeVariable { patterns, .. } => {
                patterns.iter().map(|p| p.column.as_str()).collect()
            }
            DateMode::CompoundDelta {
                time_var,
                additional,
                ..
            }
            | DateMode::MaxDelta {
                time_var,
                additional,
                ..
            } => std::iter::once(time_var.as_str())
                .chain(additional.iter().map(String::as_str))
                .collect(),
            DateMode::NumericLabel { label_column, .. }
            | DateMode::VisitLookup { label_column, .. }
            | DateMode::IntegerLabel { label_column, .. } => vec![label_column.as_str()],
        };
        columns.into_iter().map(str::to_string).collect()
    }

    /// Date for the fact drawn from `column` of `row`.
    pub fn resolve(&self, row: &RowView<'_>, column: &str) -> Resolution {
        match &self.mode {
            DateMode::Fixed { base } => Ok(DateOutcome::Exact(*base)),
            DateMode::TimeVariable { time_vars, source } => {
                resolve_time_variable(time_vars, source, row, column)
            }
            DateMode::PatternTimeVariable {
                base,
                patterns,
                unit,
            } => resolve_pattern(*base, patterns, *unit, row, column),
            DateMode::CompoundDelta {
                base,
                time_var,
                unit,
                additional,
                additional_unit,
            } => resolve_compound(*base, time_var, *unit, additional, *additional_unit, row),
            DateMode::MaxDelta {
                base,
                time_var,
                unit,
                additional,
            } => resolve_max_delta(*base, time_var, *unit, additional, row),
            DateMode::NumericLabel {
                base,
                label_column,
                unit,
            } => {
                let delta = parse_label_number(cell(row, label_column)?);
                shifted(*base, delta, *unit).map(DateOutcome::Exact)
            }
            DateMode::VisitLookup {
                label_column,
                visits,
            } => resolve_visit(label_column, visits, row),
            DateMode::IntegerLabel {
                base,
                label_column,
                unit,
            } => {
                let delta = parse_label_integer(cell(row, label_column)?);
                shifted(*base, delta, *unit).map(DateOutcome::Exact)
            }
        }
    }
}

fn resolve_time_variable(
    time_vars: &TimeVarTable,
    source: &TimeSource,
    row: &RowView<'_>,
    column: &str,
) -> Resolution {
    let time_column = time_vars.column_for(column);
    match source {
        TimeSource::Delta { base, unit } => {
            let delta = numeric_cell(row, time_column)?;
            shifted(*base, delta, *unit).map(DateOutcome::Exact)
        }
        TimeSource::Literal => {
            let text = cell(row, time_column)?;
            parse_calendar_date(text)
                .map(DateOutcome::Exact)
                .ok_or_else(|| DateAnomaly::InvalidDate {
                    column: time_column.to_string(),
                    value: text.to_string(),
                })
        }
    }
}

fn resolve_pattern(
    base: NaiveDate,
    patterns: &[TimePattern],
    unit: DeltaUnit,
    row: &RowView<'_>,
    column: &str,
) -> Resolution {
    let mut candidates: Vec<(&TimePattern, NaiveDate)> = Vec::with_capacity(patterns.len());
    for pattern in patterns {
        match numeric_cell(row, &pattern.column).and_then(|delta| shifted(base, delta, unit)) {
            Ok(date) => candidates.push((pattern, date)),
            Err(anomaly) => trace!(time_column = %pattern.column, %anomaly, "no candidate"),
        }
    }
    if let Some((_, date)) = candidates
        .iter()
        .find(|(pattern, _)| pattern.regex.is_match(column))
    {
        return Ok(DateOutcome::Exact(*date));
    }
    candidates
        .iter()
        .map(|(_, date)| *date)
        .max()
        .map(DateOutcome::LatestCandidate)
        .ok_or(DateAnomaly::NoCandidate)
}

fn resolve_compound(
    base: NaiveDate,
    time_var: &str,
    unit: DeltaUnit,
    additional: &[String],
    additional_unit: DeltaUnit,
    row: &RowView<'_>,
) -> Resolution {
    let first = shifted(base, numeric_cell(row, time_var)?, unit)?;
    let second = max_additional_delta(additional, row).unwrap_or(0.0);
    shifted(first, second, additional_unit).map(DateOutcome::Exact)
}

fn resolve_max_delta(
    base: NaiveDate,
    time_var: &str,
    unit: DeltaUnit,
    additional: &[String],
    row: &RowView<'_>,
) -> Resolution {
    let first = numeric_cell(row, time_var)?;
    let combined = max_additional_delta(additional, row).map_or(first, |second| first.max(second));
    shifted(base, combined, unit).map(DateOutcome::Exact)
}

fn resolve_visit(label_column: &str, visits: &VisitDateTable, row: &RowView<'_>) -> Resolution {
    let token = cell(row, label_column)?.trim();
    visits
        .lookup(token)
        .map(DateOutcome::Exact)
        .ok_or_else(|| DateAnomaly::UnknownVisit {
            token: token.to_string(),
        })
}

/// Largest numeric value among the additional time columns; non-numeric
/// and absent cells are ignored.
fn max_additional_delta(columns: &[String], row: &RowView<'_>) -> Option<f64> {
    columns
        .iter()
        .filter_map(|column| row.get(column).and_then(parse_delta))
        .reduce(f64::max)
}

fn cell<'a>(row: &RowView<'a>, column: &str) -> Result<&'a str, DateAnomaly> {
    row.get(column).ok_or_else(|| DateAnomaly::MissingColumn {
        column: column.to_string(),
    })
}

fn numeric_cell(row: &RowView<'_>, column: &str) -> Result<f64, DateAnomaly> {
    let text = cell(row, column)?;
    parse_delta(text).ok_or_else(|| DateAnomaly::NonNumeric {
        column: column.to_string(),
        value: text.to_string(),
    })
}

fn shifted(date: NaiveDate, delta: f64, unit: DeltaUnit) -> Result<NaiveDate, DateAnomaly> {
    shift(date, delta, unit).ok_or(DateAnomaly::OutOfRange)
}

fn base_date(config: &EtlConfig) -> Result<NaiveDate, ConfigError> {
    let raw = config
        .basedate
        .as_deref()
        .ok_or_else(|| ConfigError::missing("basedate", required_by(config)))?;
    parse_base_date(raw).ok_or_else(|| {
        ConfigError::invalid("basedate", format!("expected dd/mm/yyyy, got `{raw}`"))
    })
}

fn time_unit(config: &EtlConfig) -> Result<TimeUnit, ConfigError> {
    let code = config
        .dateformat
        .ok_or_else(|| ConfigError::missing("dateformat", required_by(config)))?;
    TimeUnit::from_code(code)
        .ok_or_else(|| ConfigError::invalid("dateformat", format!("expected 1 to 5, got {code}")))
}

fn delta_unit(key: &'static str, unit: TimeUnit) -> Result<DeltaUnit, ConfigError> {
    DeltaUnit::from_time_unit(unit).ok_or_else(|| {
        ConfigError::invalid(key, "the literal date unit is only valid with datemode 1")
    })
}

fn additional_unit(config: &EtlConfig) -> Result<DeltaUnit, ConfigError> {
    let code = config.additionaldatedifftimeunits.ok_or_else(|| {
        ConfigError::missing("additionaldatedifftimeunits", "required by datemode 3")
    })?;
    let unit = TimeUnit::from_code(code).ok_or_else(|| {
        ConfigError::invalid(
            "additionaldatedifftimeunits",
            format!("expected 2 to 5, got {code}"),
        )
    })?;
    delta_unit("additionaldatedifftimeunits", unit)
}

fn default_time_var(config: &EtlConfig) -> Result<String, ConfigError> {
    config
        .default_time_var()
        .map(str::to_string)
        .ok_or_else(|| ConfigError::missing("timevar", "a `default` entry or `datevar`"))
}

fn additional_time_vars(config: &EtlConfig) -> Result<Vec<String>, ConfigError> {
    if config.additionaltimevar.is_empty() {
        return Err(ConfigError::missing("additionaltimevar", required_by(config)));
    }
    Ok(config.additionaltimevar.clone())
}

fn label_column(config: &EtlConfig) -> Result<String, ConfigError> {
    config
        .datevar
        .as_deref()
        .map(str::trim)
        .filter(|column| !column.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ConfigError::missing("datevar", required_by(config)))
}

fn required_by(config: &EtlConfig) -> String {
    format!("required by datemode {}", config.datemode)
}

fn time_patterns(config: &EtlConfig) -> Result<Vec<TimePattern>, ConfigError> {
    if config.timevarregex.is_empty() {
        return Err(ConfigError::missing("timevarregex", "required by datemode 2"));
    }
    config
        .timevarregex
        .iter()
        .map(|binding| {
            let regex = Regex::new(&binding.regex).map_err(|e| {
                ConfigError::invalid("timevarregex", format!("{}: {e}", binding.timevar))
            })?;
            Ok(TimePattern {
                column: binding.timevar.clone(),
                regex,
            })
        })
        .collect()
}
