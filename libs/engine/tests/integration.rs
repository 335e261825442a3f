//! End-to-end tests: lines in, formatted results out.

use std::sync::Arc;
use tally_engine::{Config, ConfigBuilder, Environment, Interpreter, Value};
use test_support::{eval, eval_lines};

mod test_support;

#[test]
fn test_plain_arithmetic() {
    assert_eq!(eval("2 * 3"), "6");
    assert_eq!(eval("1 / 3"), "0.3333");
    assert_eq!(eval("2 / 3"), "0.6667");
    assert_eq!(eval("-5 + 2"), "-3");
    assert_eq!(eval("10 minus 3 times 2"), "4");
    assert_eq!(eval("10 divided by 4"), "2.5");
    assert_eq!(eval("(1 + 2) * 3"), "9");
}

#[test]
fn test_percent_on_the_right_is_relative() {
    assert_eq!(eval("100 € + 20 %"), "120 EUR");
    assert_eq!(eval("100 + 20%"), "120");
    assert_eq!(eval("80 - 25 percent"), "60");
    // Percent on the left of a plain number cannot be added.
    assert_eq!(eval("20% + 100"), "");
}

#[test]
fn test_unit_selection_after_arithmetic() {
    assert_eq!(eval("123 mm + 3 cm"), "153 mm");
    assert_eq!(eval("1500 m + 500 m"), "2 km");
    assert_eq!(eval("250 g * 4"), "1 kg");
    assert_eq!(eval("90 min + 30 min"), "2 h");
}

#[test]
fn test_explicit_conversion_keeps_unit() {
    assert_eq!(eval("(123 mm + 3 cm) to cm"), "15.3 cm");
    assert_eq!(eval("1 mile to km"), "1.6093 km");
    assert_eq!(eval("5 kg as g"), "5000 g");
    assert_eq!(eval("1 h to min"), "60 min");
    // Without arithmetic the unit is never changed.
    assert_eq!(eval("2000 m"), "2000 m");
}

#[test]
fn test_incompatible_units() {
    let interpreter = test_support::interpreter();
    let mut env = test_support::environment();
    assert_eq!(interpreter.evaluate_line(&mut env, "1 m + 1 kg"), "");
    assert_eq!(
        env.lines(),
        &[Value::error("cannot convert unit kg to m")]
    );
    assert_eq!(eval("3 kg to cm"), "");
}

#[test]
fn test_singular_and_plural_names() {
    assert_eq!(eval("1 day to day"), "1 day");
    assert_eq!(eval("48 h to days"), "2 days");
}

#[test]
fn test_sum_of_mixed_lengths() {
    assert_eq!(
        eval_lines(&["10 cm", "30 mm", "2 in", "sum"]),
        vec!["10 cm", "30 mm", "2 in", "18.08 cm"]
    );
}

#[test]
fn test_aggregation_stops_at_blank_line() {
    assert_eq!(
        eval_lines(&["1", "2", "", "3", "4", "total"]),
        vec!["1", "2", "", "3", "4", "7"]
    );
    assert_eq!(eval_lines(&["10", "20", "average"]), vec!["10", "20", "15"]);
    assert_eq!(eval_lines(&["# empty", "sum"]), vec!["", "0"]);
}

#[test]
fn test_percent_phrases() {
    assert_eq!(eval("15 as a % on 10"), "50 %");
    assert_eq!(eval("8 as a % off 10"), "20 %");
    assert_eq!(eval("50 cm as a % of 2 m"), "25 %");
    assert_eq!(eval("20% of 50 €"), "10 EUR");
    assert_eq!(eval("20% on 50 €"), "60 EUR");
    assert_eq!(eval("20% off 50 €"), "40 EUR");
    assert_eq!(eval("25% off what is 75"), "100");
    assert_eq!(eval("25% on what is 125"), "100");
    assert_eq!(eval("5% of what is 2"), "40");
}

#[test]
fn test_percent_phrases_need_a_percentage() {
    assert_eq!(eval("5 cm of 30 €"), "");
    assert_eq!(eval("20 of 50"), "");
    assert_eq!(eval("3 kg off what is 75"), "");
    assert_eq!(eval("20% as a % of 50"), "");
}

#[test]
fn test_aggregation_adds_like_plus() {
    assert_eq!(eval_lines(&["5", "3 cm", "sum"]), vec!["5", "3 cm", "8 cm"]);
    assert_eq!(eval("5 + 3 cm"), "8 cm");
    assert_eq!(
        eval_lines(&["100 €", "20 %", "sum"]),
        vec!["100 EUR", "20 %", "120 EUR"]
    );
}

#[test]
fn test_variables() {
    assert_eq!(
        eval_lines(&["price = 40 €", "price * 3", "qty: 2", "qty * price"]),
        vec!["40 EUR", "120 EUR", "2", "80 EUR"]
    );
    assert_eq!(eval_lines(&["unknown + 1"]), vec![""]);
}

#[test]
fn test_prev() {
    assert_eq!(eval_lines(&["5 * 2", "prev + 1"]), vec!["10", "11"]);
}

#[test]
fn test_rounding_functions() {
    assert_eq!(eval("round(3.14159; 2)"), "3.14");
    assert_eq!(eval("round(2.5)"), "3");
    assert_eq!(eval("ceil(2.1)"), "3");
    assert_eq!(eval("ceiling(-2.1)"), "-2");
    assert_eq!(eval("floor(1299; -2)"), "1200");
    assert_eq!(eval("round(1.26 m; 1)"), "1.3 m");
    assert_eq!(eval("round(5; -40)"), "0");
}

#[test]
fn test_dates() {
    assert_eq!(eval("today"), "2024-03-10");
    assert_eq!(eval("now"), "2024-03-10 15:45:00");
    assert_eq!(eval("tomorrow"), "2024-03-11");
    assert_eq!(eval("yesterday"), "2024-03-09");
    assert_eq!(eval("today + 1 day"), "2024-03-11");
    assert_eq!(eval("2024-01-31 + 1 week"), "2024-02-07");
    assert_eq!(eval("2024-03-01 - 1 day"), "2024-02-29");
    assert_eq!(eval("2 hours from 2024-01-01"), "2024-01-01 02:00:00");
    assert_eq!(eval("14:30"), "2024-03-10 14:30:00");
    assert_eq!(eval("days until 2024-12-24"), "289 days");
    assert_eq!(eval("now - today"), "945 min");
}

#[test]
fn test_failed_lines_record_values() {
    let interpreter = test_support::interpreter();
    let mut env = test_support::environment();
    let results = interpreter.evaluate_document(&mut env, "(1 + 2\n1 / 0\n# note\n4");
    assert_eq!(results, vec!["", "", "", "4"]);
    assert_eq!(
        &env.lines()[..3],
        &[
            Value::Empty,
            Value::error("Division by zero"),
            Value::Empty,
        ]
    );
    assert!(env.lines()[3].is_numeric());
}

#[test]
fn test_custom_number_format() {
    let mut builder = ConfigBuilder::with_defaults().unwrap();
    builder.decimal_separator(',').grouping_separator(Some('.'));
    let interpreter = Interpreter::new(Arc::new(builder.build().unwrap())).unwrap();
    let mut env = Environment::new();

    assert_eq!(interpreter.evaluate_line(&mut env, "1234,5 * 2"), "2.469");
    assert_eq!(interpreter.evaluate_line(&mut env, "1 / 4"), "0,25");
    assert_eq!(interpreter.evaluate_line(&mut env, "round(2,5; 0)"), "3");
}

#[test]
fn test_custom_vocabulary() {
    let mut builder = Config::builder();
    builder
        .add_unit("data", "B", 1.into(), &["B"], &[&["byte", "bytes"]])
        .unwrap()
        .add_unit("data", "KB", 1024.into(), &["KB"], &[&["kilobyte", "kilobytes"]])
        .unwrap()
        .add_auto_group(&["B", "KB"])
        .unwrap();
    builder.add_operator(tally_engine::OperatorDef::binary(
        "+",
        2,
        tally_engine::Associativity::Left,
        tally_engine::vm::operators::add,
    ));
    let interpreter = Interpreter::new(Arc::new(builder.build().unwrap())).unwrap();
    let mut env = Environment::new();

    assert_eq!(interpreter.evaluate_line(&mut env, "512 bytes + 512 B"), "1 KB");
    // No multiplication registered in this vocabulary.
    assert_eq!(interpreter.evaluate_line(&mut env, "2 * 3"), "");
}
