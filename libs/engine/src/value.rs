//! Runtime values of the calculator VM.

use crate::error::{Error, Result};
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use std::sync::Arc;
use tally_units::{Quantity, Unit};

/// A value on the VM stack or in the line history.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// A magnitude with a unit (the unitless unit when none was given).
    Numeric(Quantity),
    /// A calendar date, optionally with a meaningful time of day.
    DateTime {
        instant: NaiveDateTime,
        has_time: bool,
    },
    /// A bare unit waiting to be consumed by a conversion operator.
    Unit(Arc<Unit>),
    /// Result of a line without anything to evaluate.
    Empty,
    /// Terminal evaluation failure. Never used as an operand.
    Error(String),
}

impl Value {
    pub fn numeric(value: Decimal, unit: Arc<Unit>) -> Self {
        Value::Numeric(Quantity::new(value, unit))
    }

    pub fn date(date: NaiveDate) -> Self {
        Value::DateTime {
            instant: date.and_time(chrono::NaiveTime::MIN),
            has_time: false,
        }
    }

    pub fn datetime(instant: NaiveDateTime) -> Self {
        Value::DateTime {
            instant,
            has_time: true,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Value::Error(message.into())
    }

    pub fn as_quantity(&self) -> Option<&Quantity> {
        match self {
            Value::Numeric(q) => Some(q),
            _ => None,
        }
    }

    pub fn as_decimal(&self) -> Option<Decimal> {
        self.as_quantity().map(|q| q.value)
    }

    pub fn as_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            Value::DateTime { instant, .. } => Some(*instant),
            _ => None,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Numeric(_))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Value::Empty)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error(_))
    }

    /// Error message when this is an `Error` value.
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Value::Error(message) => Some(message),
            _ => None,
        }
    }

    /// Short name of the value kind, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Numeric(_) => "number",
            Value::DateTime { .. } => "date",
            Value::Unit(_) => "unit",
            Value::Empty => "empty value",
            Value::Error(_) => "error",
        }
    }

    /// Borrow the quantity or fail with a type error naming `what`.
    pub fn expect_numeric(&self, what: &str) -> Result<&Quantity> {
        self.as_quantity().ok_or_else(|| {
            Error::TypeError(format!("{} expects a number, got {}", what, self.kind()))
        })
    }
}
