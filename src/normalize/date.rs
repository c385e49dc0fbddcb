//! Date cells: spreadsheet serial numbers and the text layouts found in exported sheets.

use crate::model::Cell;
use chrono::{DateTime, Days, NaiveDate, NaiveDateTime};

/// Day zero of the spreadsheet serial date system, with the phantom 1900-02-29 already folded in.
const SERIAL_EPOCH: (i32, u32, u32) = (1899, 12, 30);

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%Y/%m/%d", "%d.%m.%Y"];
const DATE_TIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Converts a spreadsheet serial to a date, ignoring any time-of-day fraction. Serials that are
/// not positive, or not finite, are treated as absent.
///
/// ```
/// # use contabook::normalize::from_serial;
/// # use chrono::NaiveDate;
/// assert_eq!(from_serial(44927.0), NaiveDate::from_ymd_opt(2023, 1, 1));
/// assert_eq!(from_serial(0.0), None);
/// ```
pub fn from_serial(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial <= 0.0 {
        return None;
    }
    let days = serial.floor();
    if days > u32::MAX as f64 {
        return None;
    }
    let (y, m, d) = SERIAL_EPOCH;
    NaiveDate::from_ymd_opt(y, m, d)?.checked_add_days(Days::new(days as u64))
}

/// Parses a date from text. Numeric text is read as a serial.
pub fn parse_text(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(serial) = s.parse::<f64>() {
        return from_serial(serial);
    }
    DATE_FORMATS
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(s, f).ok())
        .or_else(|| {
            DATE_TIME_FORMATS
                .iter()
                .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
}

/// Reads a date from a cell, returning `None` if the cell is empty or unreadable.
pub fn parse_cell(cell: &Cell) -> Option<NaiveDate> {
    match cell {
        Cell::Empty => None,
        Cell::Number(n) => from_serial(*n),
        Cell::Text(s) => parse_text(s),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_serial() {
        assert_eq!(from_serial(44927.0), Some(ymd(2023, 1, 1)));
        assert_eq!(from_serial(1.0), Some(ymd(1899, 12, 31)));
        assert_eq!(from_serial(45291.75), Some(ymd(2023, 12, 31)));
        assert_eq!(from_serial(-3.0), None);
        assert_eq!(from_serial(f64::NAN), None);
        assert_eq!(from_serial(f64::INFINITY), None);
    }

    #[test]
    fn test_serial_matches_unix_offset() {
        // Serial 25569 is the Unix epoch.
        assert_eq!(from_serial(25569.0), Some(ymd(1970, 1, 1)));
    }

    #[test]
    fn test_text_formats() {
        assert_eq!(parse_text("2023-03-15"), Some(ymd(2023, 3, 15)));
        assert_eq!(parse_text("15/03/2023"), Some(ymd(2023, 3, 15)));
        assert_eq!(parse_text("15-03-2023"), Some(ymd(2023, 3, 15)));
        assert_eq!(parse_text("2023/03/15"), Some(ymd(2023, 3, 15)));
        assert_eq!(parse_text("15.03.2023"), Some(ymd(2023, 3, 15)));
        assert_eq!(parse_text("2023-03-15 10:30:00"), Some(ymd(2023, 3, 15)));
        assert_eq!(parse_text("2023-03-15T10:30:00"), Some(ymd(2023, 3, 15)));
        assert_eq!(parse_text("2023-03-15T10:30:00-03:00"), Some(ymd(2023, 3, 15)));
    }

    #[test]
    fn test_numeric_text_is_serial() {
        assert_eq!(parse_text(" 44927 "), Some(ymd(2023, 1, 1)));
    }

    #[test]
    fn test_unreadable() {
        assert_eq!(parse_text("not-a-date"), None);
        assert_eq!(parse_text(""), None);
        assert_eq!(parse_text("31/02/2023"), None);
        assert_eq!(parse_cell(&Cell::Empty), None);
    }

    #[test]
    fn test_cell() {
        assert_eq!(parse_cell(&Cell::from(44927.0)), Some(ymd(2023, 1, 1)));
        assert_eq!(parse_cell(&Cell::from("2024-02-29")), Some(ymd(2024, 2, 29)));
    }
}
