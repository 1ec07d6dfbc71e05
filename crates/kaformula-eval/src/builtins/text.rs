use kaformula_common::{Arity, FormulaError, bool_to_float};

use super::{NumericTable, TextTable, add_numeric, add_text};
use crate::coercion::{
    char_position, compare_text, number_to_text, ordering_to_f64, round_to_count, round_to_i64,
    str_to_float_ext,
};
use crate::interpreter::Evaluator;

/* ─────────────── text → number ─────────────── */

fn len_fn(ev: &Evaluator<'_>, params: &[String]) -> Result<f64, FormulaError> {
    Ok(ev.text(params, 0)?.chars().count() as f64)
}

/// `pos(needle, haystack)`: 0-based char index or -1.
fn pos_fn(ev: &Evaluator<'_>, params: &[String]) -> Result<f64, FormulaError> {
    let needle = ev.text(params, 0)?;
    let haystack = ev.text(params, 1)?;
    Ok(char_position(&needle, &haystack))
}

fn todouble_fn(ev: &Evaluator<'_>, params: &[String]) -> Result<f64, FormulaError> {
    str_to_float_ext(&ev.text(params, 0)?)
}

fn empty_fn(ev: &Evaluator<'_>, params: &[String]) -> Result<f64, FormulaError> {
    Ok(bool_to_float(ev.text(params, 0)?.trim().is_empty()))
}

/// 1 when both texts are identical.
fn compare_fn(ev: &Evaluator<'_>, params: &[String]) -> Result<f64, FormulaError> {
    Ok(bool_to_float(ev.text(params, 0)? == ev.text(params, 1)?))
}

fn comparestr_fn(ev: &Evaluator<'_>, params: &[String]) -> Result<f64, FormulaError> {
    let (a, b) = (ev.text(params, 0)?, ev.text(params, 1)?);
    Ok(ordering_to_f64(compare_text(&a, &b, false)))
}

fn comparetext_fn(ev: &Evaluator<'_>, params: &[String]) -> Result<f64, FormulaError> {
    let (a, b) = (ev.text(params, 0)?, ev.text(params, 1)?);
    Ok(ordering_to_f64(compare_text(&a, &b, true)))
}

/* ─────────────── string builtins ─────────────── */

fn concatenate_fn(ev: &Evaluator<'_>, params: &[String]) -> Result<String, FormulaError> {
    let mut out = String::new();
    for i in 0..params.len() {
        out.push_str(&ev.text(params, i)?);
    }
    Ok(out)
}

/// Largest result, in bytes, `repl` will build.
const MAX_REPL_BYTES: usize = 1 << 24;

/// `repl(s, n)` is `s` followed by `n` more copies.
fn repl_fn(ev: &Evaluator<'_>, params: &[String]) -> Result<String, FormulaError> {
    let s = ev.text(params, 0)?;
    let copies = round_to_count(ev.num(params, 1)?).saturating_add(1);
    match s.len().checked_mul(copies) {
        Some(total) if total <= MAX_REPL_BYTES => Ok(s.repeat(copies)),
        _ => Err(FormulaError::function("repl").with_message("result too long")),
    }
}

fn tostr_fn(ev: &Evaluator<'_>, params: &[String]) -> Result<String, FormulaError> {
    Ok(number_to_text(ev.num(params, 0)?))
}

fn uppercase_fn(ev: &Evaluator<'_>, params: &[String]) -> Result<String, FormulaError> {
    Ok(ev.text(params, 0)?.to_uppercase())
}

fn lowercase_fn(ev: &Evaluator<'_>, params: &[String]) -> Result<String, FormulaError> {
    Ok(ev.text(params, 0)?.to_lowercase())
}

fn left_fn(ev: &Evaluator<'_>, params: &[String]) -> Result<String, FormulaError> {
    let s = ev.text(params, 0)?;
    let n = round_to_count(ev.num(params, 1)?);
    Ok(s.chars().take(n).collect())
}

fn right_fn(ev: &Evaluator<'_>, params: &[String]) -> Result<String, FormulaError> {
    let s = ev.text(params, 0)?;
    let n = round_to_count(ev.num(params, 1)?);
    let len = s.chars().count();
    Ok(s.chars().skip(len.saturating_sub(n)).collect())
}

/// `substr(s, start, len)` with a 1-based start; out-of-range parts are clamped.
///
/// Yields exactly `len` characters when the text is long enough, so
/// `substr('abcdef', 2, 3)` is `"bcd"`. Stored formulas written for a
/// `len - 1` reading must add one to the length.
fn substr_fn(ev: &Evaluator<'_>, params: &[String]) -> Result<String, FormulaError> {
    let s = ev.text(params, 0)?;
    let start = round_to_i64(ev.num(params, 1)?).max(1) - 1;
    let count = round_to_count(ev.num(params, 2)?);
    Ok(s.chars().skip(start as usize).take(count).collect())
}

/* ─────────────── trim family ─────────────── */

/// Built-in trims, only consulted for single-argument calls in a string
/// expression; otherwise the name goes to the host like any unknown call.
pub fn trim_function(lower: &str) -> Option<fn(&str) -> &str> {
    let f: fn(&str) -> &str = match lower {
        "trim" => str::trim,
        "ltrim" => str::trim_start,
        "rtrim" => str::trim_end,
        _ => return None,
    };
    Some(f)
}

pub fn register_numeric(reg: &mut NumericTable) {
    add_numeric(reg, &["len"], Arity::Exact(1), len_fn);
    add_numeric(reg, &["pos"], Arity::Exact(2), pos_fn);
    add_numeric(reg, &["todouble", "tonumber"], Arity::Exact(1), todouble_fn);
    add_numeric(reg, &["empty"], Arity::Exact(1), empty_fn);
    add_numeric(reg, &["compare"], Arity::Exact(2), compare_fn);
    add_numeric(reg, &["comparestr"], Arity::Exact(2), comparestr_fn);
    add_numeric(reg, &["comparetext"], Arity::Exact(2), comparetext_fn);
}

pub fn register_text(reg: &mut TextTable) {
    add_text(reg, &["concatenate", "concat"], Arity::AtLeast(2), concatenate_fn);
    add_text(reg, &["repl"], Arity::Exact(2), repl_fn);
    add_text(reg, &["tostr"], Arity::Exact(1), tostr_fn);
    add_text(reg, &["uppercase"], Arity::Exact(1), uppercase_fn);
    add_text(reg, &["lowercase"], Arity::Exact(1), lowercase_fn);
    add_text(reg, &["left"], Arity::Exact(2), left_fn);
    add_text(reg, &["right"], Arity::Exact(2), right_fn);
    add_text(reg, &["substr"], Arity::Exact(3), substr_fn);
}
