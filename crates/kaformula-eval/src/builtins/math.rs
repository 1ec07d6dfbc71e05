use kaformula_common::{Arity, FormulaError};

use super::{NumericTable, add_numeric};
use crate::coercion::round_digits;
use crate::interpreter::Evaluator;

/* ─────────────── internal single-argument functions ─────────────── */

/// `trunc(x)`, `sin(x)`... take one full expression between their
/// parentheses instead of a comma-separated list.
pub fn internal_function(lower: &str) -> Option<fn(f64) -> f64> {
    let f: fn(f64) -> f64 = match lower {
        "trunc" | "int" => f64::trunc,
        "sin" => f64::sin,
        "cos" => f64::cos,
        "tan" => f64::tan,
        "frac" => |v| v - v.trunc(),
        _ => return None,
    };
    Some(f)
}

/* ─────────────── round / ceil / floor ─────────────── */

fn round_fn(ev: &Evaluator<'_>, params: &[String]) -> Result<f64, FormulaError> {
    let value = ev.num(params, 0)?;
    let digits = ev.num(params, 1)?;
    Ok(round_digits(value, digits))
}

fn ceil_fn(ev: &Evaluator<'_>, params: &[String]) -> Result<f64, FormulaError> {
    Ok(ev.num(params, 0)?.ceil())
}

fn floor_fn(ev: &Evaluator<'_>, params: &[String]) -> Result<f64, FormulaError> {
    Ok(ev.num(params, 0)?.floor())
}

pub fn register_numeric(reg: &mut NumericTable) {
    add_numeric(reg, &["round"], Arity::Exact(2), round_fn);
    add_numeric(reg, &["ceil"], Arity::Exact(1), ceil_fn);
    add_numeric(reg, &["floor"], Arity::Exact(1), floor_fn);
}
