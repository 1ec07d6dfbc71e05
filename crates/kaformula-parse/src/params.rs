use kaformula_common::{FormulaError, FormulaErrorKind};
use smallvec::SmallVec;

use crate::cursor::Cursor;

/// Raw, trimmed argument texts of one call site. Each entry is evaluated
/// only when the dispatched function asks for it.
pub type ParamList = SmallVec<[String; 4]>;

/// Split the argument list of a call whose `(` has just been consumed.
///
/// Parentheses are balanced outside single-quoted regions; a `'` toggles
/// the quoted state and there are no escapes. On success the cursor sits
/// just past the matching `)`. A quote still open at end of input is an
/// `InvalidString` error at its position.
pub fn split_parameters(cursor: &mut Cursor, name: &str) -> Result<ParamList, FormulaError> {
    let start = cursor.position();
    let mut depth = 1usize;
    let mut quoted = false;
    let mut quote_start = start;

    while let Some(c) = cursor.current() {
        match c {
            '\'' => {
                if !quoted {
                    quote_start = cursor.position();
                }
                quoted = !quoted;
            }
            '(' if !quoted => depth += 1,
            ')' if !quoted => depth -= 1,
            _ => {}
        }
        if depth == 0 {
            break;
        }
        cursor.advance();
    }

    if quoted {
        return Err(FormulaError::invalid_string(quote_start));
    }
    if depth != 0 {
        return Err(FormulaError::function(name)
            .at(start)
            .with_message("unbalanced parentheses in argument list"));
    }

    let interior = cursor.slice(start, cursor.position());
    cursor.advance();

    Ok(split_top_level(interior.trim()))
}

/// Split on commas that are outside quotes and nested parentheses.
pub fn split_top_level(text: &str) -> ParamList {
    let mut params = ParamList::new();
    if text.is_empty() {
        return params;
    }

    let mut depth = 0i32;
    let mut quoted = false;
    let mut begin = 0usize;
    for (i, c) in text.char_indices() {
        match c {
            '\'' => quoted = !quoted,
            '(' if !quoted => depth += 1,
            ')' if !quoted => depth -= 1,
            ',' if !quoted && depth == 0 => {
                params.push(text[begin..i].trim().to_string());
                begin = i + 1;
            }
            _ => {}
        }
    }
    params.push(text[begin..].trim().to_string());
    params
}

/// Interior of a single parenthesised expression such as `( amount )`.
pub fn strip_enclosing_parens(text: &str) -> Result<&str, FormulaError> {
    let text = text.trim();
    let malformed = || {
        FormulaError::new(FormulaErrorKind::SyntaxError)
            .with_message(format!("expected '(expression)', found '{text}'"))
    };

    if text.chars().count() <= 2 {
        return Err(malformed());
    }
    text.strip_prefix('(')
        .and_then(|t| t.strip_suffix(')'))
        .map(str::trim)
        .ok_or_else(malformed)
}
