//! Number parsing and output formatting.

use crate::error::{Error, Result};
use crate::value::Value;
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

/// Decimal formatting profile shared by the lexer and the output formatter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NumberFormat {
    pub decimal_separator: char,
    pub grouping_separator: Option<char>,
    /// Decimal places kept on output.
    pub precision: u32,
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self {
            decimal_separator: '.',
            grouping_separator: None,
            precision: 4,
        }
    }
}

impl NumberFormat {
    /// Parse a number literal written with the configured decimal separator.
    pub fn parse_number(&self, text: &str) -> Result<Decimal> {
        let mut normalized: String = text
            .trim()
            .chars()
            .map(|c| if c == self.decimal_separator { '.' } else { c })
            .collect();
        if normalized.starts_with('.') {
            normalized.insert(0, '0');
        }
        Decimal::from_str(&normalized)
            .map_err(|e| Error::EvaluationError(format!("invalid number '{}': {}", text, e)))
    }

    /// Round to the output precision, dropping trailing zeros.
    pub fn round(&self, value: Decimal) -> Decimal {
        let rounded = value
            .round_dp_with_strategy(self.precision, RoundingStrategy::MidpointAwayFromZero)
            .normalize();
        if rounded.is_zero() {
            Decimal::ZERO
        } else {
            rounded
        }
    }

    pub fn format_decimal(&self, value: Decimal) -> String {
        let rounded = self.round(value);
        let digits = rounded.abs().to_string();
        let (integer, fraction) = match digits.split_once('.') {
            Some((integer, fraction)) => (integer, Some(fraction)),
            None => (digits.as_str(), None),
        };

        let mut out = String::new();
        if rounded.is_sign_negative() {
            out.push('-');
        }
        match self.grouping_separator {
            Some(separator) => out.push_str(&group_digits(integer, separator)),
            None => out.push_str(integer),
        }
        if let Some(fraction) = fraction {
            out.push(self.decimal_separator);
            out.push_str(fraction);
        }
        out
    }

    /// Render a line result. Markers, empty lines and errors render as `""`.
    pub fn format_value(&self, value: &Value) -> String {
        match value {
            Value::Numeric(q) => {
                let number = self.format_decimal(q.value);
                if q.unit.is_unitless() {
                    number
                } else {
                    format!("{} {}", number, q.unit.display_name(self.round(q.value)))
                }
            }
            Value::DateTime { instant, has_time } => {
                if *has_time {
                    instant.format("%Y-%m-%d %H:%M:%S").to_string()
                } else {
                    instant.format("%Y-%m-%d").to_string()
                }
            }
            Value::Unit(_) | Value::Empty | Value::Error(_) => String::new(),
        }
    }
}

fn group_digits(integer: &str, separator: char) -> String {
    let len = integer.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(digit);
    }
    out
}
