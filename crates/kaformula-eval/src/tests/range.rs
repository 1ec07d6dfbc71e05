use kaformula_common::{FormulaErrorKind, RangeKeyword, Value, ValueKind};

use super::{RecordingHost, engine, host_engine, num, text};

fn numbers(values: &[f64]) -> Vec<Value> {
    values.iter().copied().map(Value::Number).collect()
}

#[test]
fn test_inline_numeric_aggregates() {
    assert_eq!(num("sum(1, 2, 3)"), 6.0);
    assert_eq!(num("sum(4)"), 4.0);
    assert_eq!(num("max(1, 5, 3)"), 5.0);
    assert_eq!(num("max(-3, -1, -2)"), -1.0);
    assert_eq!(num("min(4, 2, 8)"), 2.0);
    assert_eq!(num("avg(1, 2, 3, 6)"), 3.0);
    assert_eq!(num("count(1, 2, 3)"), 3.0);
    assert_eq!(num("sum(1 + 1, if(1, 2, 0))"), 4.0);
}

#[test]
fn test_inline_string_aggregates() {
    assert_eq!(text("sum('a', 'b', 'c')"), "abc");
    assert_eq!(text("max('apple', 'pear', 'fig')"), "pear");
    assert_eq!(text("min('b', 'a', 'c')"), "a");
    assert_eq!(text("max('zz')"), "zz");
    assert_eq!(text("count('x', 'y')"), "2");
}

#[test]
fn test_aggregates_need_an_argument() {
    let err = engine().evaluate_numeric("sum()").unwrap_err();
    assert_eq!(err.kind, FormulaErrorKind::WrongParamCount);
    let err = engine().evaluate_string("max()").unwrap_err();
    assert_eq!(err.kind, FormulaErrorKind::WrongParamCount);
}

#[test]
fn test_childs_range_reaches_host() {
    let host = RecordingHost::default().with_range(RangeKeyword::Childs, numbers(&[1.0, 2.0, 3.5]));
    let e = host_engine(host);

    assert_eq!(e.evaluate_numeric("sum(childs(amount))").unwrap(), 6.5);
    assert_eq!(
        e.host().range_calls.borrow().as_slice(),
        [(RangeKeyword::Childs, ValueKind::Number, "amount".to_string())]
    );
}

#[test]
fn test_longer_keywords_win() {
    let host = RecordingHost::default()
        .with_range(RangeKeyword::ParentNotNull, numbers(&[4.0]))
        .with_range(RangeKeyword::Parents, numbers(&[1.0, 2.0]))
        .with_range(RangeKeyword::Parent, numbers(&[9.0]))
        .with_range(RangeKeyword::ChildsNotNull, numbers(&[]));
    let e = host_engine(host);

    assert_eq!(e.evaluate_numeric("avg(parentnotnull(price))").unwrap(), 4.0);
    assert_eq!(e.evaluate_numeric("sum(parents(x))").unwrap(), 3.0);
    assert_eq!(e.evaluate_numeric("MAX(Parent(x))").unwrap(), 9.0);
    assert_eq!(e.evaluate_numeric("count(childsnotnull(x))").unwrap(), 0.0);

    let keywords: Vec<_> = e.host().range_calls.borrow().iter().map(|c| c.0).collect();
    assert_eq!(
        keywords,
        [
            RangeKeyword::ParentNotNull,
            RangeKeyword::Parents,
            RangeKeyword::Parent,
            RangeKeyword::ChildsNotNull,
        ]
    );
}

#[test]
fn test_inner_expression_is_passed_unevaluated() {
    let host = RecordingHost::default().with_range(RangeKeyword::Childs, numbers(&[2.0]));
    let e = host_engine(host);

    assert_eq!(e.evaluate_numeric("sum(childs( price * (qty + 1) ))").unwrap(), 2.0);
    assert_eq!(
        e.host().range_calls.borrow()[0].2,
        "price * (qty + 1)"
    );
}

#[test]
fn test_empty_host_ranges() {
    let host = RecordingHost::default().with_range(RangeKeyword::Childs, Vec::new());
    let e = host_engine(host);
    assert_eq!(e.evaluate_numeric("sum(childs(x))").unwrap(), 0.0);
    assert_eq!(e.evaluate_numeric("avg(childs(x))").unwrap(), 0.0);
    assert_eq!(e.evaluate_numeric("max(childs(x))").unwrap(), 0.0);
    assert_eq!(e.evaluate_string("min(childs(x))").unwrap(), "");
    assert_eq!(e.evaluate_string("count(childs(x))").unwrap(), "0");
}

#[test]
fn test_string_range_asks_for_text() {
    let host = RecordingHost::default().with_range(
        RangeKeyword::Childs,
        vec![Value::from("b"), Value::from("a"), Value::Number(3.0)],
    );
    let e = host_engine(host);

    assert_eq!(e.evaluate_string("sum(childs(name))").unwrap(), "ba3");
    assert_eq!(e.evaluate_string("max(childs(name))").unwrap(), "b");
    assert_eq!(e.evaluate_string("min(childs(name))").unwrap(), "3");
    assert_eq!(e.host().range_calls.borrow()[0].1, ValueKind::Text);
}

#[test]
fn test_text_values_in_numeric_range_are_parsed() {
    let host = RecordingHost::default().with_range(
        RangeKeyword::Childs,
        vec![Value::from("2,5"), Value::Number(1.0)],
    );
    let e = host_engine(host);
    assert_eq!(e.evaluate_numeric("sum(childs(x))").unwrap(), 3.5);

    let host = RecordingHost::default()
        .with_range(RangeKeyword::Childs, vec![Value::from("n/a")]);
    let err = host_engine(host)
        .evaluate_numeric("sum(childs(x))")
        .unwrap_err();
    assert_eq!(err.kind, FormulaErrorKind::InvalidNumber);
}

#[test]
fn test_host_refusing_a_range() {
    let err = engine().evaluate_numeric("sum(childs(x))").unwrap_err();
    assert_eq!(err.kind, FormulaErrorKind::FunctionError);
    assert_eq!(err.function_name(), Some("childs"));
}

#[test]
fn test_keyword_outside_a_call_name_is_not_a_range() {
    let host = RecordingHost::default().with_value("parent", 7.0);
    let e = host_engine(host);

    assert_eq!(e.evaluate_numeric("sum(parent)").unwrap(), 7.0);
    assert_eq!(e.evaluate_numeric("sum(parent, 1)").unwrap(), 8.0);
    assert!(e.host().range_calls.borrow().is_empty());
}

#[test]
fn test_trailing_text_after_range_call() {
    let host = RecordingHost::default().with_range(RangeKeyword::Childs, numbers(&[1.0]));
    let err = host_engine(host)
        .evaluate_numeric("sum(childs(x) + 1)")
        .unwrap_err();
    assert_eq!(err.kind, FormulaErrorKind::SyntaxError);
    assert_eq!(err.function_name(), Some("sum"));
}
