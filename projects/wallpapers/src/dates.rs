//! Publication dates travel as `YYYYMMDD` integers, both upstream and in storage.

use chrono::{Datelike, Local, NaiveDate};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseDateError {
    #[error("invalid date `{value}`, expected YYYYMMDD")]
    InvalidDate { value: String },
}

pub fn to_yyyymmdd(day: NaiveDate) -> i32 {
    day.year() * 10_000 + day.month() as i32 * 100 + day.day() as i32
}

/// Accepts exactly eight digits naming a real calendar day.
pub fn parse_yyyymmdd(value: &str) -> Result<i32, ParseDateError> {
    let value = value.trim();
    let invalid = || ParseDateError::InvalidDate { value: value.to_string() };
    if value.len() != 8 || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    NaiveDate::parse_from_str(value, "%Y%m%d")
        .map(to_yyyymmdd)
        .map_err(|_| invalid())
}

/// Today in the server's local time zone, evaluated per call.
pub fn today() -> i32 {
    to_yyyymmdd(Local::now().date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_calendar_days() {
        assert_eq!(parse_yyyymmdd("20230102"), Ok(20230102));
        assert_eq!(parse_yyyymmdd("20240229"), Ok(20240229));
    }

    #[test]
    fn rejects_impossible_or_malformed_days() {
        for value in ["20230230", "20231301", "2023012", "202301021", "2023-01-02", "abcdefgh", "+2023010"] {
            assert!(parse_yyyymmdd(value).is_err(), "{value}");
        }
    }

    #[test]
    fn today_round_trips_through_parser() {
        let now = today();
        assert_eq!(parse_yyyymmdd(&now.to_string()), Ok(now));
    }
}
