//! `sum`, `max`, `min`, `avg`, `count` over a value set that is either the
//! argument list itself or, for `f(keyword(expr))`, a host collection.

use kaformula_common::{Arity, FormulaError, RangeKeyword, Value, ValueKind};
use kaformula_parse::strip_enclosing_parens;
use smallvec::SmallVec;

use super::{NumericTable, TextTable, add_numeric, add_text};
use crate::coercion::{number_to_text, str_to_float_ext};
use crate::interpreter::Evaluator;

type Numbers = SmallVec<[f64; 8]>;

/// `Some((keyword, inner))` when the single argument is a call whose name
/// contains a relationship keyword, e.g. `childs(amount)`.
///
/// The keyword may sit anywhere in the call name; only what follows it must
/// be exactly one parenthesised expression.
pub fn delegated_range(params: &[String]) -> Result<Option<(RangeKeyword, &str)>, FormulaError> {
    let [param] = params else {
        return Ok(None);
    };
    let Some(open) = param.find('(') else {
        return Ok(None);
    };
    match RangeKeyword::locate(&param[..open]) {
        Some((keyword, end)) => Ok(Some((keyword, strip_enclosing_parens(&param[end..])?))),
        None => Ok(None),
    }
}

fn host_range(
    ev: &Evaluator<'_>,
    keyword: RangeKeyword,
    kind: ValueKind,
    expression: &str,
) -> Result<Vec<Value>, FormulaError> {
    #[cfg(feature = "tracing")]
    tracing::trace!(%keyword, ?kind, expression, "range delegated to host");
    ev.host()
        .range_values(keyword, kind, expression)
        .ok_or_else(|| FormulaError::function(keyword.as_str()).with_message("range not handled"))
}

fn numbers(ev: &Evaluator<'_>, params: &[String]) -> Result<Numbers, FormulaError> {
    match delegated_range(params)? {
        Some((keyword, inner)) => host_range(ev, keyword, ValueKind::Number, inner)?
            .into_iter()
            .map(|v| match v {
                Value::Number(n) => Ok(n),
                Value::Text(t) => str_to_float_ext(&t),
            })
            .collect(),
        None => (0..params.len()).map(|i| ev.num(params, i)).collect(),
    }
}

fn texts(ev: &Evaluator<'_>, params: &[String]) -> Result<Vec<String>, FormulaError> {
    match delegated_range(params)? {
        Some((keyword, inner)) => Ok(host_range(ev, keyword, ValueKind::Text, inner)?
            .into_iter()
            .map(|v| match v {
                Value::Text(t) => t,
                Value::Number(n) => number_to_text(n),
            })
            .collect()),
        None => (0..params.len()).map(|i| ev.text(params, i)).collect(),
    }
}

/* ─────────────── numeric ─────────────── */

fn sum_fn(ev: &Evaluator<'_>, params: &[String]) -> Result<f64, FormulaError> {
    Ok(numbers(ev, params)?.iter().sum())
}

/// Folds from the first element; an empty set gives 0.
fn fold_numbers(values: &[f64], keep: impl Fn(f64, f64) -> bool) -> f64 {
    let Some((&first, rest)) = values.split_first() else {
        return 0.0;
    };
    rest.iter()
        .fold(first, |acc, &v| if keep(v, acc) { v } else { acc })
}

fn max_fn(ev: &Evaluator<'_>, params: &[String]) -> Result<f64, FormulaError> {
    Ok(fold_numbers(&numbers(ev, params)?, |v, acc| v > acc))
}

fn min_fn(ev: &Evaluator<'_>, params: &[String]) -> Result<f64, FormulaError> {
    Ok(fold_numbers(&numbers(ev, params)?, |v, acc| v < acc))
}

fn avg_fn(ev: &Evaluator<'_>, params: &[String]) -> Result<f64, FormulaError> {
    let values = numbers(ev, params)?;
    if values.is_empty() {
        return Ok(0.0);
    }
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

fn count_fn(ev: &Evaluator<'_>, params: &[String]) -> Result<f64, FormulaError> {
    Ok(numbers(ev, params)?.len() as f64)
}

/* ─────────────── string ─────────────── */

fn sum_text_fn(ev: &Evaluator<'_>, params: &[String]) -> Result<String, FormulaError> {
    Ok(texts(ev, params)?.concat())
}

fn max_text_fn(ev: &Evaluator<'_>, params: &[String]) -> Result<String, FormulaError> {
    Ok(texts(ev, params)?.into_iter().reduce(|acc, v| if v > acc { v } else { acc }).unwrap_or_default())
}

fn min_text_fn(ev: &Evaluator<'_>, params: &[String]) -> Result<String, FormulaError> {
    Ok(texts(ev, params)?.into_iter().reduce(|acc, v| if v < acc { v } else { acc }).unwrap_or_default())
}

fn count_text_fn(ev: &Evaluator<'_>, params: &[String]) -> Result<String, FormulaError> {
    Ok(texts(ev, params)?.len().to_string())
}

pub fn register_numeric(reg: &mut NumericTable) {
    add_numeric(reg, &["sum"], Arity::AtLeast(1), sum_fn);
    add_numeric(reg, &["max"], Arity::AtLeast(1), max_fn);
    add_numeric(reg, &["min"], Arity::AtLeast(1), min_fn);
    add_numeric(reg, &["avg"], Arity::AtLeast(1), avg_fn);
    add_numeric(reg, &["count"], Arity::AtLeast(1), count_fn);
}

pub fn register_text(reg: &mut TextTable) {
    add_text(reg, &["sum"], Arity::AtLeast(1), sum_text_fn);
    add_text(reg, &["max"], Arity::AtLeast(1), max_text_fn);
    add_text(reg, &["min"], Arity::AtLeast(1), min_text_fn);
    add_text(reg, &["count"], Arity::AtLeast(1), count_text_fn);
}
