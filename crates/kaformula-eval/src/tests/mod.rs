mod interpreter;
mod range;

use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use kaformula_common::{RangeKeyword, Value, ValueKind};

use crate::clock::FixedClock;
use crate::engine::Engine;
use crate::traits::{FormulaHost, NoHost};

/// 2024-01-15 10:00, serial 45306 + 10/24.
pub(crate) fn fixed_clock() -> Arc<FixedClock> {
    let at = NaiveDate::from_ymd_opt(2024, 1, 15)
        .unwrap()
        .and_hms_opt(10, 0, 0)
        .unwrap();
    Arc::new(FixedClock::new(at))
}

pub(crate) fn engine() -> Engine<NoHost> {
    Engine::new().with_clock(fixed_clock())
}

pub(crate) fn num(formula: &str) -> f64 {
    engine()
        .evaluate_numeric(formula)
        .unwrap_or_else(|e| panic!("{formula}: {e}"))
}

pub(crate) fn text(formula: &str) -> String {
    engine()
        .evaluate_string(formula)
        .unwrap_or_else(|e| panic!("{formula}: {e}"))
}

pub(crate) fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

/// Host with canned answers that records every range and function call.
#[derive(Default)]
pub(crate) struct RecordingHost {
    pub values: HashMap<String, f64>,
    pub texts: HashMap<String, String>,
    pub ranges: HashMap<RangeKeyword, Vec<Value>>,
    pub text_lookups: RefCell<Vec<String>>,
    pub range_calls: RefCell<Vec<(RangeKeyword, ValueKind, String)>>,
    pub function_calls: RefCell<Vec<(String, Vec<String>)>>,
}

impl RecordingHost {
    pub fn with_value(mut self, name: &str, v: f64) -> Self {
        self.values.insert(name.to_string(), v);
        self
    }

    pub fn with_text(mut self, name: &str, v: &str) -> Self {
        self.texts.insert(name.to_string(), v.to_string());
        self
    }

    pub fn with_range(mut self, keyword: RangeKeyword, values: Vec<Value>) -> Self {
        self.ranges.insert(keyword, values);
        self
    }
}

impl FormulaHost for RecordingHost {
    fn value(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    fn text_value(&self, name: &str) -> Option<String> {
        self.text_lookups.borrow_mut().push(name.to_string());
        self.texts.get(name).cloned()
    }

    fn range_values(
        &self,
        keyword: RangeKeyword,
        kind: ValueKind,
        expression: &str,
    ) -> Option<Vec<Value>> {
        self.range_calls
            .borrow_mut()
            .push((keyword, kind, expression.to_string()));
        self.ranges.get(&keyword).cloned()
    }

    fn call_numeric(&self, name: &str, params: &[String]) -> Option<f64> {
        self.function_calls
            .borrow_mut()
            .push((name.to_string(), params.to_vec()));
        match name {
            "answer" => Some(42.0),
            "argc" => Some(params.len() as f64),
            _ => None,
        }
    }

    fn call_text(&self, name: &str, params: &[String]) -> Option<String> {
        self.function_calls
            .borrow_mut()
            .push((name.to_string(), params.to_vec()));
        match name {
            "greet" => Some(format!("hello {}", params.join("|"))),
            "fmt" => Some(format!("host:{name}")),
            _ => None,
        }
    }
}

pub(crate) fn host_engine(host: RecordingHost) -> Engine<RecordingHost> {
    Engine::with_host(host).with_clock(fixed_clock())
}
