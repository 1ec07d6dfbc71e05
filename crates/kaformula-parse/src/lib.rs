pub mod cursor;
pub mod params;
pub mod tokenizer;

pub use cursor::{Cursor, normalize_formula};
pub use params::{ParamList, split_parameters, split_top_level, strip_enclosing_parens};
pub use tokenizer::{Lexer, Number, Token, tokenize};

// Re-export common types
pub use kaformula_common::{FormulaError, FormulaErrorKind};
