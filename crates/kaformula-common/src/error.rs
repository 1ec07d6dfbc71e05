//! Formula error representation: a closed set of failure kinds plus
//! structured context, in the same shape as the rest of the workspace.
//!
//! - **`FormulaErrorKind`** : the canonical failure categories
//! - **`ErrorContext`**     : where it happened (function name, char offset)
//! - **`FormulaErrorExtra`**: per-kind payload slot (e.g. `ParamCount`)
//! - **`FormulaError`**     : one struct that glues the three together
//!
//! Every failure aborts the top-level evaluation, so callers only ever see
//! one of these per `evaluate_*` call.

use std::{error::Error, fmt};

use crate::Arity;

/// All recognised failure categories.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FormulaErrorKind {
    /// A string literal was still open at end of input.
    InvalidString,
    /// Unexpected token, malformed range argument or trailing input.
    SyntaxError,
    /// Missing `)` after an internal function, unbalanced call parentheses,
    /// or the host refused a lookup / custom function.
    FunctionError,
    /// A built-in was called with an argument count outside its arity.
    WrongParamCount,
    /// The name is a built-in, but not one available in this value context.
    FunctionUnknown,
    /// `todouble` / `tonumber` could not read the text as a number.
    InvalidNumber,
    /// Impossible calendar components, unparsable date text or a serial
    /// outside the representable range.
    InvalidDate,
}

impl fmt::Display for FormulaErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::InvalidString => "invalid string",
            Self::SyntaxError => "syntax error",
            Self::FunctionError => "function error",
            Self::WrongParamCount => "wrong parameter count",
            Self::FunctionUnknown => "unknown function",
            Self::InvalidNumber => "invalid number",
            Self::InvalidDate => "invalid date",
        })
    }
}

/// Location info any error may carry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ErrorContext {
    /// Function (or identifier) the failure is attributed to.
    pub function: Option<String>,
    /// Char offset into the normalised formula text.
    pub position: Option<usize>,
}

/// Kind-specific payloads.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum FormulaErrorExtra {
    #[default]
    None,

    /// `WrongParamCount`: what the built-in accepts and what it got.
    ParamCount { expected: Arity, found: usize },

    /// The offending input text (`InvalidNumber`, `InvalidDate`).
    Text { text: String },

    /// Free-form detail, e.g. the token found where another was expected.
    Message(String),
}

/// The single error value surfaced by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FormulaError {
    pub kind: FormulaErrorKind,
    pub context: ErrorContext,
    pub extra: FormulaErrorExtra,
}

/* ───────────────────── Constructors & helpers ─────────────────────── */

impl From<FormulaErrorKind> for FormulaError {
    fn from(kind: FormulaErrorKind) -> Self {
        Self {
            kind,
            context: ErrorContext::default(),
            extra: FormulaErrorExtra::None,
        }
    }
}

impl FormulaError {
    pub fn new(kind: FormulaErrorKind) -> Self {
        kind.into()
    }

    pub fn invalid_string(position: usize) -> Self {
        Self::new(FormulaErrorKind::InvalidString).at(position)
    }

    pub fn syntax(position: usize) -> Self {
        Self::new(FormulaErrorKind::SyntaxError).at(position)
    }

    pub fn function<S: Into<String>>(name: S) -> Self {
        Self::new(FormulaErrorKind::FunctionError).in_function(name)
    }

    pub fn unknown_function<S: Into<String>>(name: S) -> Self {
        Self::new(FormulaErrorKind::FunctionUnknown).in_function(name)
    }

    pub fn wrong_param_count<S: Into<String>>(name: S, expected: Arity, found: usize) -> Self {
        Self::new(FormulaErrorKind::WrongParamCount)
            .in_function(name)
            .with_extra(FormulaErrorExtra::ParamCount { expected, found })
    }

    pub fn invalid_number<S: Into<String>>(text: S) -> Self {
        Self::new(FormulaErrorKind::InvalidNumber)
            .with_extra(FormulaErrorExtra::Text { text: text.into() })
    }

    pub fn invalid_date<S: Into<String>>(text: S) -> Self {
        Self::new(FormulaErrorKind::InvalidDate)
            .with_extra(FormulaErrorExtra::Text { text: text.into() })
    }

    /// Attach the char offset where the failure was detected.
    pub fn at(mut self, position: usize) -> Self {
        self.context.position = Some(position);
        self
    }

    /// Attribute the failure to a function. An inner attribution wins, so
    /// a failure deep inside nested calls keeps naming the innermost one.
    pub fn in_function<S: Into<String>>(mut self, name: S) -> Self {
        if self.context.function.is_none() {
            self.context.function = Some(name.into());
        }
        self
    }

    pub fn with_message<S: Into<String>>(self, msg: S) -> Self {
        self.with_extra(FormulaErrorExtra::Message(msg.into()))
    }

    pub fn with_extra(mut self, extra: FormulaErrorExtra) -> Self {
        self.extra = extra;
        self
    }

    pub fn function_name(&self) -> Option<&str> {
        self.context.function.as_deref()
    }

    pub fn position(&self) -> Option<usize> {
        self.context.position
    }
}

/* ───────────────────────── Display / Error ────────────────────────── */

impl fmt::Display for FormulaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;

        if let Some(ref name) = self.context.function {
            write!(f, " in '{name}'")?;
        }
        if let Some(pos) = self.context.position {
            write!(f, " at {pos}")?;
        }

        match &self.extra {
            FormulaErrorExtra::None => {}
            FormulaErrorExtra::ParamCount { expected, found } => {
                write!(f, ": expected {expected} parameter(s), got {found}")?;
            }
            FormulaErrorExtra::Text { text } => write!(f, ": '{text}'")?,
            FormulaErrorExtra::Message(msg) => write!(f, ": {msg}")?,
        }

        Ok(())
    }
}

impl Error for FormulaError {}

impl From<FormulaError> for String {
    fn from(error: FormulaError) -> Self {
        format!("{error}")
    }
}

impl PartialEq<FormulaErrorKind> for FormulaError {
    fn eq(&self, other: &FormulaErrorKind) -> bool {
        self.kind == *other
    }
}
