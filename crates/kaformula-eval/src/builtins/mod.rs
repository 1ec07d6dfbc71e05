//! Built-in function tables.
//!
//! Two case-insensitive tables, one per value context. A name present in
//! either table is a "special function": it is never forwarded to the
//! host, and calling it from the context whose table lacks it fails with
//! `FunctionUnknown`.

use kaformula_common::{Arity, FormulaError};
use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;

use crate::interpreter::Evaluator;

pub mod datetime;
pub mod logical;
pub mod math;
pub mod range;
pub mod text;

pub type NumericFn = fn(&Evaluator<'_>, &[String]) -> Result<f64, FormulaError>;
pub type TextFn = fn(&Evaluator<'_>, &[String]) -> Result<String, FormulaError>;

#[derive(Clone, Copy)]
pub struct Builtin<F> {
    pub arity: Arity,
    pub eval: F,
}

pub type NumericTable = FxHashMap<&'static str, Builtin<NumericFn>>;
pub type TextTable = FxHashMap<&'static str, Builtin<TextFn>>;

static NUMERIC: Lazy<NumericTable> = Lazy::new(|| {
    let mut reg = NumericTable::default();
    logical::register_numeric(&mut reg);
    math::register_numeric(&mut reg);
    text::register_numeric(&mut reg);
    datetime::register_numeric(&mut reg);
    range::register_numeric(&mut reg);
    reg
});

static TEXT: Lazy<TextTable> = Lazy::new(|| {
    let mut reg = TextTable::default();
    logical::register_text(&mut reg);
    text::register_text(&mut reg);
    range::register_text(&mut reg);
    reg
});

pub(crate) fn add_numeric(reg: &mut NumericTable, names: &[&'static str], arity: Arity, eval: NumericFn) {
    for &name in names {
        reg.insert(name, Builtin { arity, eval });
    }
}

pub(crate) fn add_text(reg: &mut TextTable, names: &[&'static str], arity: Arity, eval: TextFn) {
    for &name in names {
        reg.insert(name, Builtin { arity, eval });
    }
}

/// `lower` must already be ASCII-lowercased.
pub fn is_special(lower: &str) -> bool {
    NUMERIC.contains_key(lower) || TEXT.contains_key(lower)
}

pub fn numeric_names() -> impl Iterator<Item = &'static str> {
    NUMERIC.keys().copied()
}

pub fn text_names() -> impl Iterator<Item = &'static str> {
    TEXT.keys().copied()
}

fn check_arity(name: &str, arity: Arity, params: &[String]) -> Result<(), FormulaError> {
    if arity.accepts(params.len()) {
        Ok(())
    } else {
        Err(FormulaError::wrong_param_count(name, arity, params.len()))
    }
}

pub(crate) fn call_numeric(
    ev: &Evaluator<'_>,
    name: &str,
    lower: &str,
    params: &[String],
) -> Result<f64, FormulaError> {
    let builtin = NUMERIC
        .get(lower)
        .ok_or_else(|| FormulaError::unknown_function(name).with_message("not available in a numeric expression"))?;
    check_arity(name, builtin.arity, params)?;
    (builtin.eval)(ev, params).map_err(|e| e.in_function(name))
}

pub(crate) fn call_text(
    ev: &Evaluator<'_>,
    name: &str,
    lower: &str,
    params: &[String],
) -> Result<String, FormulaError> {
    let builtin = TEXT
        .get(lower)
        .ok_or_else(|| FormulaError::unknown_function(name).with_message("not available in a string expression"))?;
    check_arity(name, builtin.arity, params)?;
    (builtin.eval)(ev, params).map_err(|e| e.in_function(name))
}
