//! Date parsing for the loosely formatted date columns of the CV spreadsheets

use crate::error::{CvError, Result};
use chrono::{Datelike, Months, NaiveDate};

/// Full dates, tried in order
///
/// `%Y` also accepts a one or two digit year, so every `%y` layout comes before its
/// `%Y` twin.
const DAY_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%y",
    "%m/%d/%Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%B %d %Y",
    "%b %d %Y",
    "%d %B %Y",
    "%d %b %Y",
    "%d-%b-%y",
    "%d-%b-%Y",
];

/// Month precision dates; parsed with a day of 1 appended
const MONTH_FORMATS: &[&str] = &["%Y-%m", "%Y/%m", "%m/%Y", "%B %Y", "%b %Y", "%b-%y", "%b-%Y"];

const MONTH_NAMES: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// Parses a date column. A missing day reads as the 1st, a bare year as January 1st.
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    let trimmed = value.trim();
    let err = || CvError::Date {
        value: value.to_string(),
    };
    if trimmed.is_empty() {
        return Err(err());
    }

    // ISO datetimes: only the date part matters
    let date_part = match trimmed.find(['T', ' ']) {
        Some(idx) if idx == 10 && trimmed.as_bytes()[4] == b'-' => &trimmed[..idx],
        _ => trimmed,
    };

    for format in DAY_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(date_part, format) {
            return Ok(date);
        }
    }
    let with_day = format!("{date_part} 1");
    for format in MONTH_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(&with_day, &format!("{format} %d")) {
            return Ok(date);
        }
    }
    if date_part.len() == 4 && date_part.chars().all(|c| c.is_ascii_digit()) {
        let year: i32 = date_part.parse().map_err(|_| err())?;
        return NaiveDate::from_ymd_opt(year, 1, 1).ok_or_else(err);
    }
    Err(err())
}

/// Shifts a date by whole months, negative values go back in time
pub fn add_months(date: NaiveDate, months: i32) -> NaiveDate {
    let shifted = if months >= 0 {
        date.checked_add_months(Months::new(months.unsigned_abs()))
    } else {
        date.checked_sub_months(Months::new(months.unsigned_abs()))
    };
    shifted.unwrap_or(date)
}

pub fn add_years(date: NaiveDate, years: i32) -> NaiveDate {
    add_months(date, years.saturating_mul(12))
}

/// Four digit year of a date column shifted by `increment` years; empty input gives ""
pub fn extract_year(value: &str, increment: i32) -> Result<String> {
    if value.trim().is_empty() {
        return Ok(String::new());
    }
    let date = add_years(parse_date(value)?, increment);
    Ok(date.format("%Y").to_string())
}

/// Two digit month of a date column shifted by `increment` months; empty input gives ""
pub fn extract_month(value: &str, increment: i32) -> Result<String> {
    if value.trim().is_empty() {
        return Ok(String::new());
    }
    let date = add_months(parse_date(value)?, increment);
    Ok(date.format("%m").to_string())
}

/// `yyyy/MM` form used by CCV YearMonth fields
pub fn year_month(date: NaiveDate) -> String {
    format!("{:04}/{:02}", date.year(), date.month())
}

/// `MM/YYYY` form used in the student tables
pub fn month_year(date: NaiveDate) -> String {
    format!("{:02}/{:04}", date.month(), date.year())
}

/// Month number from `3`, `March`, `mar` or `Mar.`
pub fn month_number(value: &str) -> Option<u32> {
    let trimmed = value.trim().trim_end_matches('.');
    if let Ok(n) = trimmed.parse::<u32>() {
        return (1..=12).contains(&n).then_some(n);
    }
    let lower = trimmed.to_lowercase();
    if lower.len() < 3 {
        return None;
    }
    MONTH_NAMES
        .iter()
        .position(|name| name.starts_with(&lower))
        .map(|idx| idx as u32 + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_common_layouts() {
        assert_eq!(parse_date("2015-09-01").unwrap(), ymd(2015, 9, 1));
        assert_eq!(parse_date("2015/09/14").unwrap(), ymd(2015, 9, 14));
        assert_eq!(parse_date("9/14/2015").unwrap(), ymd(2015, 9, 14));
        assert_eq!(parse_date("September 14, 2015").unwrap(), ymd(2015, 9, 14));
        assert_eq!(parse_date("14 Sep 2015").unwrap(), ymd(2015, 9, 14));
        assert_eq!(parse_date("2015-09-14T10:00:00").unwrap(), ymd(2015, 9, 14));
    }

    #[test]
    fn month_precision_defaults_to_first() {
        assert_eq!(parse_date("2015-09").unwrap(), ymd(2015, 9, 1));
        assert_eq!(parse_date("2015/09").unwrap(), ymd(2015, 9, 1));
        assert_eq!(parse_date("09/2015").unwrap(), ymd(2015, 9, 1));
        assert_eq!(parse_date("September 2015").unwrap(), ymd(2015, 9, 1));
        assert_eq!(parse_date("Sep 2015").unwrap(), ymd(2015, 9, 1));
        assert_eq!(parse_date("2015").unwrap(), ymd(2015, 1, 1));
    }

    #[test]
    fn two_digit_years_are_this_century() {
        assert_eq!(parse_date("9/14/15").unwrap(), ymd(2015, 9, 14));
        assert_eq!(parse_date("09/14/15").unwrap(), ymd(2015, 9, 14));
        assert_eq!(parse_date("14-Sep-15").unwrap(), ymd(2015, 9, 14));
        assert_eq!(parse_date("Sep-15").unwrap(), ymd(2015, 9, 1));
        assert_eq!(parse_date("14-Sep-2015").unwrap(), ymd(2015, 9, 14));
        assert_eq!(parse_date("Sep-2015").unwrap(), ymd(2015, 9, 1));
        assert_eq!(extract_year("9/14/15", 0).unwrap(), "2015");
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_date("").is_err());
        assert!(parse_date("sometime").is_err());
        assert!(parse_date("2015-13-01").is_err());
    }

    #[test]
    fn extract_with_increment() {
        assert_eq!(extract_year("2015-09-01", 0).unwrap(), "2015");
        assert_eq!(extract_year("2015-09-01", 4).unwrap(), "2019");
        assert_eq!(extract_month("2015-09-01", 0).unwrap(), "09");
        assert_eq!(extract_month("2015-11-01", 3).unwrap(), "02");
        assert_eq!(extract_month("2015-01-01", -1).unwrap(), "12");
        assert_eq!(extract_year("", 1).unwrap(), "");
        assert!(extract_year("never", 0).is_err());
    }

    #[test]
    fn month_names_and_numbers() {
        assert_eq!(month_number("March"), Some(3));
        assert_eq!(month_number("mar"), Some(3));
        assert_eq!(month_number("Dec."), Some(12));
        assert_eq!(month_number(" 7 "), Some(7));
        assert_eq!(month_number("13"), None);
        assert_eq!(month_number("ju"), None);
        assert_eq!(month_number("Smarch"), None);
    }

    #[test]
    fn formats() {
        assert_eq!(year_month(ymd(2019, 4, 30)), "2019/04");
        assert_eq!(month_year(ymd(2019, 4, 30)), "04/2019");
        assert_eq!(add_years(ymd(2020, 2, 29), 1), ymd(2021, 2, 28));
    }
}
