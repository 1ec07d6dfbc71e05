use std::f64::consts::PI;

use kaformula_common::{FormulaErrorExtra, FormulaErrorKind};

use super::{approx, engine, num, text};

#[test]
fn test_precedence() {
    assert_eq!(num("(1+1) + 1"), 3.0);
    assert_eq!(num("2**2"), 4.0);
    assert_eq!(num("4-(2*2)"), 0.0);
    assert_eq!(num("2 + 3 * 4"), 14.0);
    assert_eq!(num("10 - 4 - 3"), 3.0);
    assert_eq!(num("-2**2"), -4.0);
    assert_eq!(num("1 + 2 < 4"), 1.0);
}

#[test]
fn test_power_groups_left() {
    assert_eq!(num("2**2**2"), 16.0);
    assert_eq!(num("2**3**2"), 64.0);
}

#[test]
fn test_modulo_and_percent() {
    assert_eq!(num("7 % 3"), 1.0);
    assert_eq!(num("-7 % 3"), -1.0);
    assert_eq!(num("7.9 % 3.2"), 1.0);
    assert_eq!(num("50 %% 10"), 5.0);
    assert!(num("5 % 0").is_nan());
}

#[test]
fn test_bitwise_and_prefix_operators() {
    assert_eq!(num("5 | 2"), 7.0);
    assert_eq!(num("6 & 3"), 2.0);
    assert_eq!(num("6 ^ 3"), 5.0);
    assert_eq!(num("5.9 | 0"), 5.0);
    assert_eq!(num("!0"), 1.0);
    assert_eq!(num("!3"), 0.0);
    assert_eq!(num("~0"), -1.0);
    assert_eq!(num("--3"), 3.0);
    assert_eq!(num("+-3"), -3.0);
}

#[test]
fn test_relational_operators_use_tolerance() {
    assert_eq!(num("1 = 1.000001"), 1.0);
    assert_eq!(num("1 == 1.000001"), 1.0);
    assert_eq!(num("1 < 1.000001"), 0.0);
    assert_eq!(num("1.000001 > 1"), 0.0);
    assert_eq!(num("1 <= 1.000001"), 1.0);
    assert_eq!(num("1 >= 1.000001"), 1.0);
    assert_eq!(num("1 <> 1.1"), 1.0);
    assert_eq!(num("1 >< 1.1"), 1.0);
    assert_eq!(num("1 != 1.000001"), 0.0);
    assert_eq!(num("1 < 1.1"), 1.0);
}

#[test]
fn test_semicolon_keeps_last_segment() {
    assert_eq!(num("1; 2; 3"), 3.0);
    assert_eq!(text("'a'; 'b'"), "b");
}

#[test]
fn test_whitespace_and_line_breaks_are_ignored() {
    assert_eq!(num("  1 +\r\n 2  "), 3.0);
    assert_eq!(
        engine().evaluate_numeric("1\t+ 1").unwrap_err().kind,
        FormulaErrorKind::SyntaxError
    );
}

#[test]
fn test_decimal_separators() {
    assert_eq!(num("1.5 + 1,5"), 3.0);
}

#[test]
fn test_constants() {
    assert_eq!(num("pi"), PI);
    assert_eq!(num("TRUE"), 1.0);
    assert_eq!(num("False"), 0.0);
    assert_eq!(num("_today_"), 45306.0);
    assert!(approx(num("_NOW_"), 45306.0 + 10.0 / 24.0));
}

#[test]
fn test_internal_math_functions() {
    assert_eq!(num("trunc(2.7)"), 2.0);
    assert_eq!(num("INT(-2.7)"), -2.0);
    assert_eq!(num("frac(2.5)"), 0.5);
    assert_eq!(num("sin(0)"), 0.0);
    assert_eq!(num("cos(0)"), 1.0);
    assert_eq!(num("trunc(1 + 1.5) * 2"), 4.0);
}

#[test]
fn test_internal_function_missing_paren() {
    let err = engine().evaluate_numeric("trunc(2").unwrap_err();
    assert_eq!(err.kind, FormulaErrorKind::FunctionError);
    assert_eq!(err.function_name(), Some("trunc"));
}

#[test]
fn test_trailing_tokens_are_syntax_errors() {
    let err = engine().evaluate_numeric("1 2").unwrap_err();
    assert_eq!(err.kind, FormulaErrorKind::SyntaxError);
    assert_eq!(err.position(), Some(2));

    assert_eq!(
        engine().evaluate_numeric("(1 + 2").unwrap_err().kind,
        FormulaErrorKind::SyntaxError
    );
    assert_eq!(
        engine().evaluate_numeric(")").unwrap_err().kind,
        FormulaErrorKind::SyntaxError
    );
    assert_eq!(
        engine().evaluate_numeric("").unwrap_err().kind,
        FormulaErrorKind::SyntaxError
    );
}

#[test]
fn test_unknown_operator_character() {
    let err = engine().evaluate_numeric("1 # 2").unwrap_err();
    assert_eq!(err.kind, FormulaErrorKind::SyntaxError);
}

#[test]
fn test_unterminated_string() {
    let err = engine().evaluate_numeric("len('abc").unwrap_err();
    assert_eq!(err.kind, FormulaErrorKind::InvalidString);

    let err = engine().evaluate_string("'abc").unwrap_err();
    assert_eq!(err.kind, FormulaErrorKind::InvalidString);
    assert_eq!(err.position(), Some(0));
}

#[test]
fn test_unknown_identifier_without_host() {
    let err = engine().evaluate_numeric("1 + price").unwrap_err();
    assert_eq!(err.kind, FormulaErrorKind::FunctionError);
    assert_eq!(err.function_name(), Some("price"));

    let err = engine().evaluate_string("name").unwrap_err();
    assert_eq!(err.kind, FormulaErrorKind::FunctionError);
}

#[test]
fn test_string_grammar() {
    assert_eq!(text("'a' + 'b'"), "ab");
    assert_eq!(text("('a' + \"b\") + 'c'"), "abc");
    assert_eq!(text("\"it's\""), "it's");
    assert_eq!(text("''"), "");
}

#[test]
fn test_string_grammar_rejects_numbers_and_operators() {
    assert_eq!(
        engine().evaluate_string("1").unwrap_err().kind,
        FormulaErrorKind::SyntaxError
    );
    let err = engine().evaluate_string("'a' - 'b'").unwrap_err();
    assert_eq!(err.kind, FormulaErrorKind::SyntaxError);
    assert_eq!(err.position(), Some(4));
    assert_eq!(
        err.extra,
        FormulaErrorExtra::Message("unexpected operator -".to_string())
    );
}

#[test]
fn test_evaluation_is_idempotent() {
    let e = engine();
    for formula in ["(1+1) + 1", "round(pi, 3)", "_now_", "todate(2024, 2, 29)"] {
        assert_eq!(
            e.evaluate_numeric(formula).unwrap(),
            e.evaluate_numeric(formula).unwrap()
        );
    }
    assert_eq!(
        e.evaluate_string("uppercase('x') + 'y'").unwrap(),
        e.evaluate_string("uppercase('x') + 'y'").unwrap()
    );
}

#[test]
fn test_per_engine_precision() {
    let mut e = engine();
    assert_eq!(e.precision(), 5);
    assert_eq!(e.evaluate_numeric("1 = 1.001").unwrap(), 0.0);
    e.set_precision(Some(2));
    assert_eq!(e.precision(), 2);
    assert_eq!(e.evaluate_numeric("1 = 1.001").unwrap(), 1.0);
}
