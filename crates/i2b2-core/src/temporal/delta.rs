//! Time-delta parsing and calendar arithmetic.

use std::sync::LazyLock;

use chrono::{Months, NaiveDate, TimeDelta};
use i2b2_model::TimeUnit;
use regex::Regex;

static SIGNED_DECIMAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[-+]?(?:\d+(?:\.\d+)?|\.\d+)").expect("signed decimal pattern")
});
static DIGIT_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").expect("digit pattern"));

const DAYS_PER_YEAR: f64 = 365.0;

/// Units a numeric delta can be expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeltaUnit {
    Days,
    Months,
    Years,
    HalfYears,
}

impl DeltaUnit {
    /// `None` for [`TimeUnit::Literal`], which names a date column.
    pub fn from_time_unit(unit: TimeUnit) -> Option<Self> {
        match unit {
            TimeUnit::Literal => None,
            TimeUnit::Days => Some(Self::Days),
            TimeUnit::Months => Some(Self::Months),
            TimeUnit::Years => Some(Self::Years),
            TimeUnit::HalfYears => Some(Self::HalfYears),
        }
    }
}

/// Whole-cell numeric delta.
pub fn parse_delta(text: &str) -> Option<f64> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// First signed decimal embedded in a visit label; 0 when there is none.
pub fn parse_label_number(text: &str) -> f64 {
    SIGNED_DECIMAL
        .find(text)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .unwrap_or(0.0)
}

/// First run of digits in a visit label; 0 when there is none.
pub fn parse_label_integer(text: &str) -> f64 {
    DIGIT_RUN
        .find(text)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .unwrap_or(0.0)
}

/// Shifts `date` by `delta` units. Fractions are truncated toward zero
/// after conversion: days and months count whole units, years are 365 days
/// and half-years 182.5 days. Months use calendar arithmetic, clamping to
/// the last day of a shorter month.
pub fn shift(date: NaiveDate, delta: f64, unit: DeltaUnit) -> Option<NaiveDate> {
    match unit {
        DeltaUnit::Days => add_days(date, delta),
        DeltaUnit::Years => add_days(date, delta * DAYS_PER_YEAR),
        DeltaUnit::HalfYears => add_days(date, delta * DAYS_PER_YEAR / 2.0),
        DeltaUnit::Months => {
            let months = delta.trunc();
            if !months.is_finite() || months.abs() > f64::from(u32::MAX) {
                return None;
            }
            let magnitude = Months::new(months.abs() as u32);
            if months >= 0.0 {
                date.checked_add_months(magnitude)
            } else {
                date.checked_sub_months(magnitude)
            }
        }
    }
}

fn add_days(date: NaiveDate, days: f64) -> Option<NaiveDate> {
    let days = days.trunc();
    if !days.is_finite() || days.abs() > i64::MAX as f64 {
        return None;
    }
    date.checked_add_signed(TimeDelta::try_days(days as i64)?)
}
