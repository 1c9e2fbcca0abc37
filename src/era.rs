//! Reiwa era date formatting for the card.
//!
//! Era years are counted from 2019 (offset constant 2018). Dates
//! before the era start have no defined rendering and are rejected
//! outright instead of being formatted with a zero or negative era
//! year.

use chrono::{Datelike, NaiveDate};

use crate::error::RenderError;

pub const ERA_NAME: &str = "令和";
pub const ERA_OFFSET: i32 = 2018;

/// A license stays valid for three years from the issue date.
pub const VALIDITY_YEARS: i32 = 3;

/// Parses the fixed `YYYY-MM-DD` request form.
pub fn parse_ymd(s: &str) -> Result<NaiveDate, RenderError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| RenderError::BadRequest(format!("invalid date {s:?}: {e}")))
}

fn era_year(date: NaiveDate) -> Result<i32, RenderError> {
    let year = date.year() - ERA_OFFSET;
    if year < 1 {
        return Err(RenderError::BadRequest(format!(
            "date {date} is before the {ERA_NAME} era"
        )));
    }
    Ok(year)
}

/// `令和06年05月03日` form used for the birth and issue dates.
pub fn format_era(date: NaiveDate) -> Result<String, RenderError> {
    let era = era_year(date)?;
    Ok(format!(
        "{ERA_NAME}{era:02}年{:02}月{:02}日",
        date.month(),
        date.day()
    ))
}

/// Expiry line for the green bar: Gregorian year, parenthesized era
/// year, and the fixed validity suffix. The expiry year is the issue
/// year plus the validity term.
pub fn format_expiry(issue: NaiveDate) -> Result<String, RenderError> {
    era_year(issue)?;
    let expiry_year = issue.year() + VALIDITY_YEARS;
    let era = expiry_year - ERA_OFFSET;
    Ok(format!(
        "{expiry_year}年（{ERA_NAME}{era:02}年）{:02}月{:02}日まで有効",
        issue.month(),
        issue.day()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn era_year_is_offset_and_zero_padded() {
        assert_eq!(format_era(d(2024, 5, 3)).unwrap(), "令和06年05月03日");
        assert_eq!(format_era(d(2019, 1, 1)).unwrap(), "令和01年01月01日");
    }

    #[test]
    fn era_year_ten_and_up_is_not_padded_further() {
        assert_eq!(format_era(d(2029, 12, 31)).unwrap(), "令和11年12月31日");
    }

    #[test]
    fn expiry_adds_three_years() {
        let line = format_expiry(d(2024, 5, 3)).unwrap();
        assert_eq!(line, "2027年（令和09年）05月03日まで有効");
    }

    #[test]
    fn pre_era_dates_are_rejected() {
        assert!(matches!(
            format_era(d(2018, 12, 31)),
            Err(RenderError::BadRequest(_))
        ));
        assert!(matches!(
            format_expiry(d(2000, 1, 1)),
            Err(RenderError::BadRequest(_))
        ));
    }

    #[test]
    fn request_dates_parse_and_reject_garbage() {
        assert_eq!(parse_ymd("2024-05-03").unwrap(), d(2024, 5, 3));
        assert!(parse_ymd("2024/05/03").is_err());
        assert!(parse_ymd("2024-13-01").is_err());
        assert!(parse_ymd("").is_err());
    }
}
