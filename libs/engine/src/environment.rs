//! Per-document evaluation state.
//!
//! An `Environment` holds the variables assigned so far and the result of
//! every evaluated line, in order. Lines must be evaluated strictly in
//! document order by a single writer: later lines and the aggregators read
//! what earlier lines left behind. Nothing is ever rolled back; a failed line
//! still records its `Error` or `Empty` value.

use crate::value::Value;
use chrono::{Local, NaiveDate, NaiveDateTime};
use std::collections::HashMap;

#[derive(Clone, Debug, Default)]
pub struct Environment {
    variables: HashMap<String, Value>,
    lines: Vec<Value>,
    clock: Option<NaiveDateTime>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// An environment whose clock is frozen at `now`.
    pub fn with_clock(now: NaiveDateTime) -> Self {
        Self {
            clock: Some(now),
            ..Self::default()
        }
    }

    pub fn variable(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }

    pub fn set_variable(&mut self, name: impl Into<String>, value: Value) {
        self.variables.insert(name.into(), value);
    }

    pub fn variables(&self) -> &HashMap<String, Value> {
        &self.variables
    }

    /// Results of all evaluated lines, oldest first.
    pub fn lines(&self) -> &[Value] {
        &self.lines
    }

    pub fn push_line(&mut self, value: Value) {
        self.lines.push(value);
    }

    /// Current local time, or the frozen clock when one is set.
    pub fn now(&self) -> NaiveDateTime {
        self.clock.unwrap_or_else(|| Local::now().naive_local())
    }

    pub fn today(&self) -> NaiveDate {
        self.now().date()
    }
}
