use std::fmt::{self, Display};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};

use crate::calendar::DateError;

/// A single evaluation result.
///
/// There is no boolean, date or empty variant: booleans are `0.0`/`1.0`,
/// dates are day-count serials and "empty" is `""` or `0.0`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    Number(f64),
    Text(String),
}

impl Value {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            Value::Number(_) => None,
        }
    }

    pub fn kind(&self) -> crate::ValueKind {
        match self {
            Value::Number(_) => crate::ValueKind::Number,
            Value::Text(_) => crate::ValueKind::Text,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{n}"),
            Value::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

/* ───────────────────────── booleans ───────────────────────── */

pub fn bool_to_float(b: bool) -> f64 {
    if b { 1.0 } else { 0.0 }
}

/// `true` when the value rounds (half-to-even, on its magnitude) to at least 1.
pub fn float_to_bool(v: f64) -> bool {
    v.abs().round_ties_even() >= 1.0
}

/* ───────────────────────── date serials ───────────────────────── */

/// OLE Automation epoch: serial 0.0 is midnight on 1899-12-30.
pub const OA_EPOCH: NaiveDate = NaiveDate::from_ymd_opt(1899, 12, 30).unwrap();

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Exclusive bounds of a convertible serial (0100-01-01 .. 10000-01-01).
pub const MIN_SERIAL: f64 = -657_435.0;
pub const MAX_SERIAL: f64 = 2_958_466.0;

fn oa_epoch() -> NaiveDateTime {
    OA_EPOCH.and_time(NaiveTime::MIN)
}

/// Encode a date-time as an OLE Automation serial.
///
/// Before the epoch the integer part counts days backwards while the
/// fraction still counts time forwards from midnight, so
/// 1899-12-29 06:00 encodes as `-1.25`.
pub fn datetime_to_serial(dt: &NaiveDateTime) -> f64 {
    let mut millis = (*dt - oa_epoch()).num_milliseconds();
    if millis < 0 {
        let frac = millis % MILLIS_PER_DAY;
        if frac != 0 {
            millis -= (MILLIS_PER_DAY + frac) * 2;
        }
    }
    millis as f64 / MILLIS_PER_DAY as f64
}

pub fn date_to_serial(date: &NaiveDate) -> f64 {
    datetime_to_serial(&date.and_time(NaiveTime::MIN))
}

/// Decode an OLE Automation serial, rounded to the nearest millisecond.
pub fn serial_to_datetime(serial: f64) -> Result<NaiveDateTime, DateError> {
    if !(serial > MIN_SERIAL && serial < MAX_SERIAL) {
        return Err(DateError::SerialOutOfRange(serial));
    }

    let half = if serial >= 0.0 { 0.5 } else { -0.5 };
    let mut millis = (serial * MILLIS_PER_DAY as f64 + half) as i64;
    if millis < 0 {
        millis -= (millis % MILLIS_PER_DAY) * 2;
    }

    TimeDelta::try_milliseconds(millis)
        .and_then(|delta| oa_epoch().checked_add_signed(delta))
        .ok_or(DateError::SerialOutOfRange(serial))
}

pub fn serial_to_date(serial: f64) -> Result<NaiveDate, DateError> {
    serial_to_datetime(serial).map(|dt| dt.date())
}
