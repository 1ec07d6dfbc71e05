//! Public entry point: an `Engine` owns a host, a config and a clock, and
//! evaluates formula text against them.

use std::sync::Arc;

use kaformula_common::{FormulaError, Value, ValueKind};

use crate::builtins;
use crate::clock::{ClockProvider, default_clock};
use crate::config::EngineConfig;
use crate::interpreter::Evaluator;
use crate::traits::{FormulaHost, NoHost};

/// Evaluates numeric and string formulas.
///
/// An engine holds no per-evaluation state, so `evaluate_*` take `&self`
/// and may be called re-entrantly from inside host callbacks.
#[derive(Debug, Clone)]
pub struct Engine<H = NoHost> {
    host: H,
    config: EngineConfig,
    clock: Arc<dyn ClockProvider>,
}

impl Engine<NoHost> {
    pub fn new() -> Self {
        Self::with_host(NoHost)
    }
}

impl Default for Engine<NoHost> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: FormulaHost> Engine<H> {
    pub fn with_host(host: H) -> Self {
        Self {
            host,
            config: EngineConfig::default(),
            clock: default_clock(),
        }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn ClockProvider>) -> Self {
        self.clock = clock;
        self
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn into_host(self) -> H {
        self.host
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut EngineConfig {
        &mut self.config
    }

    /// Decimal places used for tolerant comparisons, falling back to the
    /// process-wide default.
    pub fn precision(&self) -> u32 {
        self.config.tolerance().decimals()
    }

    pub fn set_precision(&mut self, precision: Option<u32>) {
        self.config.precision = precision;
    }

    fn evaluator(&self) -> Evaluator<'_> {
        Evaluator::new(&self.host, &self.config, self.clock.as_ref())
    }

    /// Evaluate `formula` as a numeric expression.
    ///
    /// Leading and trailing whitespace and every line break are ignored.
    /// With `;`-separated segments, the last segment's value is returned.
    pub fn evaluate_numeric(&self, formula: &str) -> Result<f64, FormulaError> {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("evaluate_numeric", formula).entered();
        let result = self.evaluator().eval_numeric(formula);
        #[cfg(feature = "tracing")]
        if let Err(err) = &result {
            tracing::debug!(%err, "numeric evaluation failed");
        }
        result
    }

    /// Evaluate `formula` as a string expression.
    pub fn evaluate_string(&self, formula: &str) -> Result<String, FormulaError> {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("evaluate_string", formula).entered();
        let result = self.evaluator().eval_text(formula);
        #[cfg(feature = "tracing")]
        if let Err(err) = &result {
            tracing::debug!(%err, "string evaluation failed");
        }
        result
    }

    pub fn evaluate(&self, formula: &str, kind: ValueKind) -> Result<Value, FormulaError> {
        match kind {
            ValueKind::Number => self.evaluate_numeric(formula).map(Value::Number),
            ValueKind::Text => self.evaluate_string(formula).map(Value::Text),
        }
    }
}

/// Sorted names callable in a numeric expression.
pub fn numeric_function_names() -> Vec<&'static str> {
    let mut names: Vec<_> = builtins::numeric_names().collect();
    names.sort_unstable();
    names
}

/// Sorted names callable in a string expression.
pub fn string_function_names() -> Vec<&'static str> {
    let mut names: Vec<_> = builtins::text_names().collect();
    names.sort_unstable();
    names
}
