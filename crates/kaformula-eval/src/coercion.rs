//! Conversions between numbers and text shared by the numeric and string
//! paths, and by range values of the wrong kind.

use std::cmp::Ordering;

use kaformula_common::FormulaError;

/// Parse user text as a number, accepting `,` or `.` as the decimal point.
///
/// Surrounding whitespace, a leading sign, exponent notation and an
/// accounting-style `(12.5)` negative are accepted.
pub fn str_to_float_ext(text: &str) -> Result<f64, FormulaError> {
    let normalized = text.trim().replace(',', ".");

    let (body, negate) = match normalized
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
    {
        Some(inner) => (inner.trim(), true),
        None => (normalized.as_str(), false),
    };

    body.parse::<f64>()
        .ok()
        .or_else(|| parse_with_trailing_sign(body))
        .map(|v| if negate { -v } else { v })
        .ok_or_else(|| FormulaError::invalid_number(text))
}

fn parse_with_trailing_sign(body: &str) -> Option<f64> {
    if let Some(n) = body.strip_suffix('-') {
        return n.trim_end().parse::<f64>().ok().map(|v| -v);
    }
    body.strip_suffix('+')?.trim_end().parse::<f64>().ok()
}

/// General-format rendering of a number: the shortest text that reads back
/// to the same value, switching to `d.dddE+XX` when the decimal exponent is
/// 15 or more, or below -4.
pub fn number_to_text(v: f64) -> String {
    if v.is_nan() {
        return "NaN".to_string();
    }
    if v.is_infinite() {
        return if v > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if v == 0.0 {
        return if v.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    let sci = format!("{v:e}");
    let (mantissa, exp) = match sci.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (sci.as_str(), 0),
    };

    if (-5 < exp) && (exp < 15) {
        format!("{v}")
    } else {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{mantissa}E{sign}{:02}", exp.abs())
    }
}

/// Round to the nearest integer, ties to even, then saturate into `i64`.
pub fn round_to_i64(v: f64) -> i64 {
    v.round_ties_even() as i64
}

/// A rounded, non-negative count.
pub fn round_to_count(v: f64) -> usize {
    round_to_i64(v).max(0) as usize
}

/// Round `v` to `digits` decimal places, ties to even.
pub fn round_digits(v: f64, digits: f64) -> f64 {
    let digits = round_to_i64(digits).clamp(0, 15) as i32;
    if v.abs() >= 1e16 {
        return v;
    }
    let scale = 10f64.powi(digits);
    let scaled = (v * scale).round_ties_even() / scale;
    if scaled.is_finite() { scaled } else { v }
}

/// Ordering used by `comparestr`/`comparetext`: letters compare regardless of
/// case first; with `ignore_case == false` a remaining tie puts lowercase
/// before uppercase at the first differing position.
pub fn compare_text(a: &str, b: &str, ignore_case: bool) -> Ordering {
    let primary = a.to_lowercase().cmp(&b.to_lowercase());
    if primary != Ordering::Equal || ignore_case {
        return primary;
    }
    a.chars()
        .zip(b.chars())
        .find(|(x, y)| x != y)
        .map(|(x, _)| if x.is_lowercase() { Ordering::Less } else { Ordering::Greater })
        .unwrap_or_else(|| a.chars().count().cmp(&b.chars().count()))
}

pub fn ordering_to_f64(ord: Ordering) -> f64 {
    match ord {
        Ordering::Less => -1.0,
        Ordering::Equal => 0.0,
        Ordering::Greater => 1.0,
    }
}

/// Char index of `needle` in `haystack`, or -1.
pub fn char_position(needle: &str, haystack: &str) -> f64 {
    haystack
        .find(needle)
        .map_or(-1.0, |byte| haystack[..byte].chars().count() as f64)
}
