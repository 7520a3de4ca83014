//! Calendar date parsing shared by configuration and lookup tables.

use chrono::NaiveDate;

/// Base-date format: `dd/mm/yyyy`.
pub const BASE_DATE_FORMAT: &str = "%d/%m/%Y";
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

pub fn parse_base_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), BASE_DATE_FORMAT).ok()
}

/// Accepts `dd/mm/yyyy` or ISO `yyyy-mm-dd`.
pub fn parse_calendar_date(text: &str) -> Option<NaiveDate> {
    let trimmed = text.trim();
    NaiveDate::parse_from_str(trimmed, BASE_DATE_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(trimmed, ISO_DATE_FORMAT))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_both_layouts() {
        let expected = NaiveDate::from_ymd_opt(2000, 2, 1);
        assert_eq!(parse_base_date("01/02/2000"), expected);
        assert_eq!(parse_calendar_date("01/02/2000"), expected);
        assert_eq!(parse_calendar_date("2000-02-01"), expected);
        assert_eq!(parse_base_date("2000-02-01"), None);
        assert_eq!(parse_calendar_date("31/02/2000"), None);
        assert_eq!(parse_calendar_date("visit 3"), None);
    }
}
