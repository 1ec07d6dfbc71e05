//! Meta crate that re-exports the kaformula building blocks. Most users only
//! need [`Engine`], a [`FormulaHost`] implementation and [`FormulaError`];
//! the underlying crates stay reachable for lexer-level or type-level work.

pub use kaformula_common as common;
pub use kaformula_eval as eval;
pub use kaformula_parse as parse;

pub use kaformula_common::{
    Arity, DateError, FormulaError, FormulaErrorExtra, FormulaErrorKind, RangeKeyword, Tolerance,
    ToleranceError, Value, ValueKind, date_to_serial, datetime_to_serial, serial_to_date,
    serial_to_datetime,
};
pub use kaformula_common::tolerance::{default_tolerance, init_default_decimals};

#[cfg(feature = "system-clock")]
pub use kaformula_eval::SystemClock;
pub use kaformula_eval::{
    ClockProvider, Engine, EngineConfig, FixedClock, FormulaHost, NoHost, numeric_function_names,
    string_function_names,
};
