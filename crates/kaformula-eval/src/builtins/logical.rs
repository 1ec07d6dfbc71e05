use kaformula_common::{Arity, FormulaError, bool_to_float, float_to_bool, tolerance::safe_div};

use super::{NumericTable, TextTable, add_numeric, add_text};
use crate::interpreter::Evaluator;

/* ─────────────── IF ─────────────── */

/// Only the taken branch is evaluated.
fn if_fn(ev: &Evaluator<'_>, params: &[String]) -> Result<f64, FormulaError> {
    let branch = if ev.num(params, 0)? != 0.0 { 1 } else { 2 };
    ev.num(params, branch)
}

/// String `if` takes the first branch when the condition is (about) 1 or more.
fn if_text_fn(ev: &Evaluator<'_>, params: &[String]) -> Result<String, FormulaError> {
    let cond = ev.num(params, 0)?;
    let branch = if ev.tolerance().equal(1.0, cond) || cond > 1.0 { 1 } else { 2 };
    ev.text(params, branch)
}

/* ─────────────── AND / OR / NOT ─────────────── */

fn and_fn(ev: &Evaluator<'_>, params: &[String]) -> Result<f64, FormulaError> {
    for i in 0..params.len() {
        if !float_to_bool(ev.num(params, i)?) {
            return Ok(0.0);
        }
    }
    Ok(1.0)
}

fn or_fn(ev: &Evaluator<'_>, params: &[String]) -> Result<f64, FormulaError> {
    for i in 0..params.len() {
        if float_to_bool(ev.num(params, i)?) {
            return Ok(1.0);
        }
    }
    Ok(0.0)
}

fn not_fn(ev: &Evaluator<'_>, params: &[String]) -> Result<f64, FormulaError> {
    Ok(bool_to_float(!float_to_bool(ev.num(params, 0)?)))
}

/* ─────────────── SAFEDIV / BETWEEN ─────────────── */

fn safediv_fn(ev: &Evaluator<'_>, params: &[String]) -> Result<f64, FormulaError> {
    Ok(safe_div(ev.num(params, 0)?, ev.num(params, 1)?))
}

fn between_fn(ev: &Evaluator<'_>, params: &[String]) -> Result<f64, FormulaError> {
    let v = ev.num(params, 0)?;
    let lo = ev.num(params, 1)?;
    let hi = ev.num(params, 2)?;
    let t = ev.tolerance();
    Ok(bool_to_float(
        t.equal(v, lo) || t.equal(v, hi) || (v >= lo && v <= hi),
    ))
}

pub fn register_numeric(reg: &mut NumericTable) {
    add_numeric(reg, &["if"], Arity::Exact(3), if_fn);
    add_numeric(reg, &["and"], Arity::AtLeast(2), and_fn);
    add_numeric(reg, &["or"], Arity::AtLeast(2), or_fn);
    add_numeric(reg, &["not"], Arity::Exact(1), not_fn);
    add_numeric(reg, &["safediv"], Arity::Exact(2), safediv_fn);
    add_numeric(reg, &["between"], Arity::Exact(3), between_fn);
}

pub fn register_text(reg: &mut TextTable) {
    add_text(reg, &["if"], Arity::Exact(3), if_text_fn);
}
