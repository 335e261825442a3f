//! Arithmetic and conversion operators.
//!
//! Binary arithmetic has two modes. When the right operand is a percentage
//! and the left is not, the percentage is applied relative to the left value
//! (`100 + 20%` is `120`). Otherwise the right operand is expressed in the
//! left operand's unit and the magnitudes are combined.

use super::temporal;
use crate::context::Context;
use crate::error::{Error, Result};
use crate::value::Value;
use rust_decimal::Decimal;
use std::sync::Arc;
use tally_units::{Quantity, Unit};

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Arith {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Arith {
    fn symbol(self) -> &'static str {
        match self {
            Arith::Add => "+",
            Arith::Subtract => "-",
            Arith::Multiply => "*",
            Arith::Divide => "/",
        }
    }

    fn is_additive(self) -> bool {
        matches!(self, Arith::Add | Arith::Subtract)
    }
}

pub fn add(ctx: &Context<'_>, left: &Value, right: &Value) -> Result<Value> {
    match (left, right) {
        (Value::DateTime { .. }, Value::Numeric(offset)) => temporal::shift(left, offset, false),
        (Value::Numeric(offset), Value::DateTime { .. }) => temporal::shift(right, offset, false),
        _ => arithmetic(ctx, Arith::Add, left, right),
    }
}

pub fn subtract(ctx: &Context<'_>, left: &Value, right: &Value) -> Result<Value> {
    match (left, right) {
        (Value::DateTime { .. }, Value::Numeric(offset)) => temporal::shift(left, offset, true),
        (Value::DateTime { .. }, Value::DateTime { .. }) => temporal::difference(ctx, left, right),
        _ => arithmetic(ctx, Arith::Subtract, left, right),
    }
}

pub fn multiply(ctx: &Context<'_>, left: &Value, right: &Value) -> Result<Value> {
    arithmetic(ctx, Arith::Multiply, left, right)
}

pub fn divide(ctx: &Context<'_>, left: &Value, right: &Value) -> Result<Value> {
    arithmetic(ctx, Arith::Divide, left, right)
}

pub fn negate(_ctx: &Context<'_>, operand: &Value) -> Result<Value> {
    let q = operand.expect_numeric("'-'")?;
    Ok(Value::Numeric(q.with_value(-q.value)))
}

/// `to` / `as`: express the left quantity in the unit on the right.
pub fn convert(_ctx: &Context<'_>, left: &Value, right: &Value) -> Result<Value> {
    let Value::Unit(target) = right else {
        return Err(Error::TypeError(format!(
            "conversion expects a unit, got {}",
            right.kind()
        )));
    };
    let q = left.expect_numeric("conversion")?;
    Ok(Value::Numeric(q.convert_to(target)?))
}

fn arithmetic(_ctx: &Context<'_>, op: Arith, left: &Value, right: &Value) -> Result<Value> {
    let what = format!("'{}'", op.symbol());
    let a = left.expect_numeric(&what)?;
    let b = right.expect_numeric(&what)?;

    if b.unit.is_percent() && !a.unit.is_percent() {
        return relative(op, a, b.value).map(Value::Numeric);
    }

    let (x, y, unit) = align(op, a, b)?;
    let value = match op {
        Arith::Add => x.checked_add(y),
        Arith::Subtract => x.checked_sub(y),
        Arith::Multiply => x.checked_mul(y),
        Arith::Divide => {
            if y.is_zero() {
                return Err(division_by_zero());
            }
            x.checked_div(y)
        }
    }
    .ok_or_else(overflow)?;
    Ok(Value::Numeric(Quantity::new(value, unit)))
}

/// Apply a percentage to the left operand, keeping its unit.
fn relative(op: Arith, base: &Quantity, percent: Decimal) -> Result<Quantity> {
    let share = base
        .value
        .checked_mul(percent)
        .map(|v| v / HUNDRED)
        .ok_or_else(overflow)?;
    let value = match op {
        Arith::Add => base.value.checked_add(share),
        Arith::Subtract => base.value.checked_sub(share),
        Arith::Multiply => Some(share),
        Arith::Divide => {
            if percent.is_zero() {
                return Err(division_by_zero());
            }
            base.value.checked_div(percent / HUNDRED)
        }
    }
    .ok_or_else(overflow)?;
    Ok(base.with_value(value))
}

/// Bring both magnitudes into one unit.
///
/// The right operand is converted into the left's unit. A unitless left
/// operand adopts the right's unit instead, except that a plain number and a
/// percentage cannot be added or subtracted.
fn align(op: Arith, a: &Quantity, b: &Quantity) -> Result<(Decimal, Decimal, Arc<Unit>)> {
    if op.is_additive() && a.unit.is_percent() != b.unit.is_percent() {
        let plain = if a.unit.is_percent() { b } else { a };
        if plain.unit.is_unitless() {
            return Err(Error::TypeError(format!(
                "cannot combine a percentage and a plain number with '{}'",
                op.symbol()
            )));
        }
    }
    if a.unit.is_unitless() && !b.unit.is_unitless() {
        return Ok((a.value, b.value, Arc::clone(&b.unit)));
    }
    let b = b.convert_to(&a.unit)?;
    Ok((a.value, b.value, Arc::clone(&a.unit)))
}

fn division_by_zero() -> Error {
    Error::EvaluationError("Division by zero".into())
}

pub(crate) fn overflow() -> Error {
    Error::Unit(tally_units::Error::Overflow)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::environment::Environment;

    fn quantity(config: &Config, value: i64, unit: &str) -> Value {
        let unit = match unit {
            "" => Arc::clone(config.units().unitless()),
            name => Arc::clone(config.units().lookup(name).unwrap()),
        };
        Value::numeric(Decimal::from(value), unit)
    }

    #[test]
    fn percent_is_relative_to_left() {
        let config = Config::default();
        let env = Environment::new();
        let ctx = Context::new(&env, &config);
        let hundred = quantity(&config, 100, "EUR");
        let twenty = quantity(&config, 20, "%");

        let sum = add(&ctx, &hundred, &twenty).unwrap();
        assert_eq!(sum, quantity(&config, 120, "EUR"));
        let diff = subtract(&ctx, &hundred, &twenty).unwrap();
        assert_eq!(diff, quantity(&config, 80, "EUR"));
        let product = multiply(&ctx, &hundred, &twenty).unwrap();
        assert_eq!(product, quantity(&config, 20, "EUR"));
        let quotient = divide(&ctx, &hundred, &twenty).unwrap();
        assert_eq!(quotient, quantity(&config, 500, "EUR"));
    }

    #[test]
    fn percent_on_the_left_is_not_relative() {
        let config = Config::default();
        let env = Environment::new();
        let ctx = Context::new(&env, &config);
        let twenty = quantity(&config, 20, "%");
        let hundred = quantity(&config, 100, "");
        assert!(matches!(
            add(&ctx, &twenty, &hundred),
            Err(Error::TypeError(_))
        ));
        let both = add(&ctx, &twenty, &quantity(&config, 5, "%")).unwrap();
        assert_eq!(both, quantity(&config, 25, "%"));
    }

    #[test]
    fn right_operand_takes_left_unit() {
        let config = Config::default();
        let env = Environment::new();
        let ctx = Context::new(&env, &config);
        let sum = add(
            &ctx,
            &quantity(&config, 123, "mm"),
            &quantity(&config, 3, "cm"),
        )
        .unwrap();
        assert_eq!(sum, quantity(&config, 153, "mm"));

        let scaled = multiply(&ctx, &quantity(&config, 2, ""), &quantity(&config, 3, "kg")).unwrap();
        assert_eq!(scaled, quantity(&config, 6, "kg"));
    }

    #[test]
    fn incompatible_units_fail() {
        let config = Config::default();
        let env = Environment::new();
        let ctx = Context::new(&env, &config);
        let err = add(&ctx, &quantity(&config, 1, "m"), &quantity(&config, 1, "kg")).unwrap_err();
        assert_eq!(err.message(), "cannot convert unit kg to m");
    }

    #[test]
    fn division_by_zero_fails() {
        let config = Config::default();
        let env = Environment::new();
        let ctx = Context::new(&env, &config);
        let err = divide(&ctx, &quantity(&config, 1, ""), &quantity(&config, 0, "")).unwrap_err();
        assert_eq!(err.message(), "Division by zero");
    }

    #[test]
    fn convert_requires_unit_marker() {
        let config = Config::default();
        let env = Environment::new();
        let ctx = Context::new(&env, &config);
        let cm = Value::Unit(Arc::clone(config.units().lookup("cm").unwrap()));
        let converted = convert(&ctx, &quantity(&config, 153, "mm"), &cm).unwrap();
        assert_eq!(converted.as_decimal(), Some(Decimal::new(153, 1)));
        assert!(convert(&ctx, &quantity(&config, 1, "mm"), &quantity(&config, 1, "")).is_err());
    }
}
