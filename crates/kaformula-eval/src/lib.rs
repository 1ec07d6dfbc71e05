pub mod clock;
pub mod coercion;
pub mod config;
pub mod engine;
pub mod traits;

pub(crate) mod builtins;
pub(crate) mod interpreter;

#[cfg(test)]
mod tests;

pub use clock::{ClockProvider, FixedClock};
#[cfg(feature = "system-clock")]
pub use clock::SystemClock;
pub use config::EngineConfig;
pub use engine::{Engine, numeric_function_names, string_function_names};
pub use traits::{FormulaHost, NoHost};

pub use kaformula_common::{
    FormulaError, FormulaErrorKind, RangeKeyword, Tolerance, Value, ValueKind,
};
