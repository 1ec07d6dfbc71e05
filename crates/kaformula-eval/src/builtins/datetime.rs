//! Date functions over OLE Automation serials.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use kaformula_common::calendar::{self, DateError};
use kaformula_common::{
    Arity, FormulaError, date_to_serial, datetime_to_serial, serial_to_date,
};

use super::{NumericTable, add_numeric};
use crate::coercion::round_to_i64;
use crate::interpreter::Evaluator;

fn date_arg(ev: &Evaluator<'_>, params: &[String], i: usize) -> Result<NaiveDate, FormulaError> {
    Ok(serial_to_date(ev.num(params, i)?)?)
}

/* ─────────────── TODAY / NOW ─────────────── */

/// Days from `n` to today (both as serials).
fn today_fn(ev: &Evaluator<'_>, params: &[String]) -> Result<f64, FormulaError> {
    let n = ev.num(params, 0)?;
    Ok(date_to_serial(&ev.clock().today()) - n)
}

/// Days, with fraction, from `n` to now.
fn now_fn(ev: &Evaluator<'_>, params: &[String]) -> Result<f64, FormulaError> {
    let n = ev.num(params, 0)?;
    Ok(datetime_to_serial(&ev.clock().now()) - n)
}

/* ─────────────── component getters ─────────────── */

fn getday_fn(ev: &Evaluator<'_>, params: &[String]) -> Result<f64, FormulaError> {
    Ok(date_arg(ev, params, 0)?.day() as f64)
}

fn getweek_fn(ev: &Evaluator<'_>, params: &[String]) -> Result<f64, FormulaError> {
    Ok(calendar::iso_week(date_arg(ev, params, 0)?) as f64)
}

fn getmonth_fn(ev: &Evaluator<'_>, params: &[String]) -> Result<f64, FormulaError> {
    Ok(date_arg(ev, params, 0)?.month() as f64)
}

fn getyear_fn(ev: &Evaluator<'_>, params: &[String]) -> Result<f64, FormulaError> {
    Ok(date_arg(ev, params, 0)?.year() as f64)
}

/* ─────────────── week / month boundaries ─────────────── */

fn startoftheweek_fn(ev: &Evaluator<'_>, params: &[String]) -> Result<f64, FormulaError> {
    let date = date_arg(ev, params, 0)?;
    let start = calendar::start_of_week(date, ev.config().first_day_of_week);
    Ok(date_to_serial(&start))
}

fn startofthemonth_fn(ev: &Evaluator<'_>, params: &[String]) -> Result<f64, FormulaError> {
    Ok(date_to_serial(&calendar::first_day_of_month(date_arg(ev, params, 0)?)))
}

fn endofthemonth_fn(ev: &Evaluator<'_>, params: &[String]) -> Result<f64, FormulaError> {
    Ok(date_to_serial(&calendar::last_day_of_month(date_arg(ev, params, 0)?)))
}

/* ─────────────── constructors ─────────────── */

/// Evaluate every argument and round it to the nearest integer, ties to even.
fn int_args<const N: usize>(ev: &Evaluator<'_>, params: &[String]) -> Result<[i64; N], FormulaError> {
    let mut out = [0i64; N];
    for (i, slot) in out.iter_mut().enumerate() {
        *slot = round_to_i64(ev.num(params, i)?);
    }
    Ok(out)
}

fn todate_fn(ev: &Evaluator<'_>, params: &[String]) -> Result<f64, FormulaError> {
    let [y, m, d] = int_args::<3>(ev, params)?;
    Ok(date_to_serial(&calendar::date_from_parts(y, m, d)?))
}

fn todatetime_fn(ev: &Evaluator<'_>, params: &[String]) -> Result<f64, FormulaError> {
    let [y, m, d, h, mi, s] = int_args::<6>(ev, params)?;
    Ok(datetime_to_serial(&calendar::datetime_from_parts(y, m, d, h, mi, s)?))
}

/* ─────────────── STRINGTODATETIME ─────────────── */

/// `stringtodatetime(format, text)` with a .NET-style custom format such as
/// `dd/MM/yyyy HH:mm`.
fn stringtodatetime_fn(ev: &Evaluator<'_>, params: &[String]) -> Result<f64, FormulaError> {
    let format = ev.text(params, 0)?;
    let text = ev.text(params, 1)?;
    let dt = parse_with_format(&text, &format, ev.clock().today())?;
    Ok(datetime_to_serial(&dt))
}

/// Date-time first, then date at midnight, then time on `today`.
pub fn parse_with_format(text: &str, format: &str, today: NaiveDate) -> Result<NaiveDateTime, DateError> {
    let fmt = translate_format(format);
    let text = text.trim();

    NaiveDateTime::parse_from_str(text, &fmt)
        .or_else(|_| NaiveDate::parse_from_str(text, &fmt).map(|d| d.and_time(NaiveTime::MIN)))
        .or_else(|_| NaiveTime::parse_from_str(text, &fmt).map(|t| today.and_time(t)))
        .map_err(|_| DateError::Unparsable {
            text: text.to_string(),
            format: format.to_string(),
        })
}

/// Translate .NET custom date/time specifiers into `chrono` strftime items.
pub fn translate_format(format: &str) -> String {
    let chars: Vec<char> = format.chars().collect();
    let mut out = String::with_capacity(format.len() * 2);
    let mut i = 0;

    let push_literal = |out: &mut String, c: char| {
        if c == '%' {
            out.push_str("%%");
        } else {
            out.push(c);
        }
    };

    while i < chars.len() {
        let c = chars[i];
        let run = chars[i..].iter().take_while(|&&x| x == c).count();

        match c {
            '\'' | '"' => {
                i += 1;
                while i < chars.len() && chars[i] != c {
                    push_literal(&mut out, chars[i]);
                    i += 1;
                }
                i += 1;
                continue;
            }
            '\\' => {
                if let Some(&next) = chars.get(i + 1) {
                    push_literal(&mut out, next);
                }
                i += 2;
                continue;
            }
            'y' => out.push_str(if run <= 2 { "%y" } else { "%Y" }),
            'M' => out.push_str(match run {
                1 | 2 => "%m",
                3 => "%b",
                _ => "%B",
            }),
            'd' => out.push_str(match run {
                1 | 2 => "%d",
                3 => "%a",
                _ => "%A",
            }),
            'H' => out.push_str("%H"),
            'h' => out.push_str("%I"),
            'm' => out.push_str("%M"),
            's' => out.push_str("%S"),
            'f' | 'F' => out.push_str(match run {
                1..=3 => "%3f",
                4..=6 => "%6f",
                _ => "%9f",
            }),
            't' => out.push_str("%p"),
            'z' | 'K' => out.push_str("%:z"),
            other => {
                for _ in 0..run {
                    push_literal(&mut out, other);
                }
            }
        }
        i += run;
    }
    out
}

pub fn register_numeric(reg: &mut NumericTable) {
    add_numeric(reg, &["today"], Arity::Exact(1), today_fn);
    add_numeric(reg, &["now"], Arity::Exact(1), now_fn);
    add_numeric(reg, &["getday"], Arity::Exact(1), getday_fn);
    add_numeric(reg, &["getweek"], Arity::Exact(1), getweek_fn);
    add_numeric(reg, &["getmonth"], Arity::Exact(1), getmonth_fn);
    add_numeric(reg, &["getyear"], Arity::Exact(1), getyear_fn);
    add_numeric(reg, &["startoftheweek"], Arity::Exact(1), startoftheweek_fn);
    add_numeric(reg, &["startofthemonth"], Arity::Exact(1), startofthemonth_fn);
    add_numeric(reg, &["endofthemonth"], Arity::Exact(1), endofthemonth_fn);
    add_numeric(reg, &["todate"], Arity::Exact(3), todate_fn);
    add_numeric(reg, &["todatetime"], Arity::Exact(6), todatetime_fn);
    add_numeric(reg, &["stringtodatetime"], Arity::Exact(2), stringtodatetime_fn);
}
