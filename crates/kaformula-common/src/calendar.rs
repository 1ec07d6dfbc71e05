//! Pure calendar helpers over `chrono` dates.

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use thiserror::Error;

use crate::error::FormulaError;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum DateError {
    #[error("serial {0} is outside the representable date range")]
    SerialOutOfRange(f64),
    #[error("no such date {year}-{month}-{day}")]
    InvalidDate { year: i64, month: i64, day: i64 },
    #[error("no such time {hour}:{minute}:{second}")]
    InvalidTime { hour: i64, minute: i64, second: i64 },
    #[error("'{text}' does not match format '{format}'")]
    Unparsable { text: String, format: String },
}

impl From<DateError> for FormulaError {
    fn from(err: DateError) -> Self {
        let text = match &err {
            DateError::Unparsable { text, .. } => text.clone(),
            other => other.to_string(),
        };
        FormulaError::invalid_date(text)
    }
}

/// ISO-8601 week number (1..=53).
pub fn iso_week(date: NaiveDate) -> u32 {
    date.iso_week().week()
}

/// The most recent `first_day` on or before `date`.
pub fn start_of_week(date: NaiveDate, first_day: Weekday) -> NaiveDate {
    let diff = (7 + date.weekday().num_days_from_monday() - first_day.num_days_from_monday()) % 7;
    date - Days::new(diff as u64)
}

pub fn first_day_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub fn days_in_month(date: NaiveDate) -> u32 {
    let first = first_day_of_month(date);
    match first.checked_add_months(chrono::Months::new(1)) {
        Some(next) => (next - first).num_days() as u32,
        // December 9999 or later: nothing follows, but December is always 31 days.
        None => 31,
    }
}

pub fn last_day_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(days_in_month(date)).unwrap_or(date)
}

/// Build a date from integer components, rejecting anything that is not a
/// real calendar day in years 1..=9999.
pub fn date_from_parts(year: i64, month: i64, day: i64) -> Result<NaiveDate, DateError> {
    let invalid = || DateError::InvalidDate { year, month, day };
    if !(1..=9999).contains(&year) {
        return Err(invalid());
    }
    let (m, d) = (u32::try_from(month).map_err(|_| invalid())?, u32::try_from(day).map_err(|_| invalid())?);
    NaiveDate::from_ymd_opt(year as i32, m, d).ok_or_else(invalid)
}

pub fn datetime_from_parts(
    year: i64,
    month: i64,
    day: i64,
    hour: i64,
    minute: i64,
    second: i64,
) -> Result<NaiveDateTime, DateError> {
    let date = date_from_parts(year, month, day)?;
    let invalid = || DateError::InvalidTime { hour, minute, second };
    let component = |v: i64, max: i64| {
        if (0..max).contains(&v) { Ok(v as u32) } else { Err(invalid()) }
    };
    let time = NaiveTime::from_hms_opt(component(hour, 24)?, component(minute, 60)?, component(second, 60)?)
        .ok_or_else(invalid)?;
    Ok(date.and_time(time))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn iso_week_edges() {
        assert_eq!(iso_week(d(2024, 1, 15)), 3);
        // 2021-01-01 is a Friday: still week 53 of 2020.
        assert_eq!(iso_week(d(2021, 1, 1)), 53);
        // 2024-12-30 is a Monday: week 1 of 2025.
        assert_eq!(iso_week(d(2024, 12, 30)), 1);
    }

    #[test]
    fn start_of_week_respects_first_day() {
        // 2024-01-17 is a Wednesday.
        assert_eq!(start_of_week(d(2024, 1, 17), Weekday::Mon), d(2024, 1, 15));
        assert_eq!(start_of_week(d(2024, 1, 17), Weekday::Sun), d(2024, 1, 14));
        assert_eq!(start_of_week(d(2024, 1, 15), Weekday::Mon), d(2024, 1, 15));
    }

    #[test]
    fn month_boundaries() {
        assert_eq!(first_day_of_month(d(2024, 2, 17)), d(2024, 2, 1));
        assert_eq!(last_day_of_month(d(2024, 2, 17)), d(2024, 2, 29));
        assert_eq!(last_day_of_month(d(2023, 2, 1)), d(2023, 2, 28));
        assert_eq!(days_in_month(d(9999, 12, 5)), 31);
    }

    #[test]
    fn impossible_components_are_rejected() {
        assert!(date_from_parts(2024, 2, 30).is_err());
        assert!(date_from_parts(2024, 13, 1).is_err());
        assert!(date_from_parts(0, 1, 1).is_err());
        assert!(datetime_from_parts(2024, 1, 1, 24, 0, 0).is_err());
        assert_eq!(
            datetime_from_parts(2024, 1, 15, 12, 30, 0).unwrap(),
            d(2024, 1, 15).and_hms_opt(12, 30, 0).unwrap()
        );
    }

    #[test]
    fn converts_into_invalid_date() {
        let err: FormulaError = DateError::SerialOutOfRange(1e9).into();
        assert_eq!(err.kind, crate::FormulaErrorKind::InvalidDate);
    }
}
