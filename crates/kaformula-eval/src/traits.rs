use std::{rc::Rc, sync::Arc};

use kaformula_common::{RangeKeyword, Value, ValueKind};

/// Capabilities the embedding application lends to the engine.
///
/// Every method answers `None` for "not handled", which the engine turns
/// into a `FunctionError` naming the identifier. Callbacks run inline and
/// may evaluate other formulas re-entrantly.
pub trait FormulaHost {
    /// Numeric value of a bare identifier that is not a built-in constant.
    fn value(&self, name: &str) -> Option<f64> {
        let _ = name;
        None
    }

    /// Text value of a bare identifier in a string expression.
    fn text_value(&self, name: &str) -> Option<String> {
        let _ = name;
        None
    }

    /// The whole value set for `sum(childs(expr))` and friends. `expression`
    /// is the text inside the keyword's parentheses, unevaluated.
    fn range_values(
        &self,
        keyword: RangeKeyword,
        kind: ValueKind,
        expression: &str,
    ) -> Option<Vec<Value>> {
        let _ = (keyword, kind, expression);
        None
    }

    /// Unknown function in a numeric expression, with raw argument texts.
    fn call_numeric(&self, name: &str, params: &[String]) -> Option<f64> {
        let _ = (name, params);
        None
    }

    /// Unknown function in a string expression, with raw argument texts.
    fn call_text(&self, name: &str, params: &[String]) -> Option<String> {
        let _ = (name, params);
        None
    }
}

/// A host that handles nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoHost;

impl FormulaHost for NoHost {}

macro_rules! forward_host {
    ($($ptr:ty),*) => {$(
        impl<T: FormulaHost + ?Sized> FormulaHost for $ptr {
            fn value(&self, name: &str) -> Option<f64> {
                (**self).value(name)
            }
            fn text_value(&self, name: &str) -> Option<String> {
                (**self).text_value(name)
            }
            fn range_values(
                &self,
                keyword: RangeKeyword,
                kind: ValueKind,
                expression: &str,
            ) -> Option<Vec<Value>> {
                (**self).range_values(keyword, kind, expression)
            }
            fn call_numeric(&self, name: &str, params: &[String]) -> Option<f64> {
                (**self).call_numeric(name, params)
            }
            fn call_text(&self, name: &str, params: &[String]) -> Option<String> {
                (**self).call_text(name, params)
            }
        }
    )*};
}

forward_host!(&T, Box<T>, Rc<T>, Arc<T>);
