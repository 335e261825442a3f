#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use std::sync::{Arc, OnceLock};
use tally_engine::{Config, Environment, Interpreter};

static INTERPRETER: OnceLock<Interpreter> = OnceLock::new();

/// Shared interpreter over the built-in vocabulary.
pub fn interpreter() -> &'static Interpreter {
    INTERPRETER.get_or_init(|| {
        Interpreter::new(Arc::new(Config::default())).expect("default interpreter")
    })
}

/// 2024-03-10 15:45:00, a Sunday.
pub fn fixed_clock() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 10)
        .unwrap()
        .and_hms_opt(15, 45, 0)
        .unwrap()
}

/// A fresh document with the clock frozen at [`fixed_clock`].
pub fn environment() -> Environment {
    Environment::with_clock(fixed_clock())
}

/// Evaluate a single line in a fresh document.
pub fn eval(line: &str) -> String {
    interpreter().evaluate_line(&mut environment(), line)
}

/// Evaluate lines in order within one document.
pub fn eval_lines(lines: &[&str]) -> Vec<String> {
    let mut env = environment();
    lines
        .iter()
        .map(|line| interpreter().evaluate_line(&mut env, line))
        .collect()
}
