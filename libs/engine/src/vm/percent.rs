//! Percentage phrases.
//!
//! In `X on Y`, `X off Y`, `X of Y` and the `what is` forms the left operand is
//! the percentage and the result carries the unit of the right operand. The
//! `as a %` forms compare two amounts and answer in percent.

use super::operators::overflow;
use crate::context::Context;
use crate::error::{Error, Result};
use crate::value::Value;
use rust_decimal::Decimal;
use std::sync::Arc;
use tally_units::Quantity;

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// `X on Y`: Y increased by X percent
pub fn on(_ctx: &Context<'_>, left: &Value, right: &Value) -> Result<Value> {
    apply("on", left, right, |x, y| mul(div(y, HUNDRED)?, add(x, HUNDRED)?))
}

/// `X off Y`: Y decreased by X percent
pub fn off(_ctx: &Context<'_>, left: &Value, right: &Value) -> Result<Value> {
    apply("off", left, right, |x, y| mul(div(y, HUNDRED)?, sub(HUNDRED, x)?))
}

/// `X of Y`: X percent of Y
pub fn of(_ctx: &Context<'_>, left: &Value, right: &Value) -> Result<Value> {
    apply("of", left, right, |x, y| mul(div(y, HUNDRED)?, x))
}

/// `X on what is Y`: the amount that, increased by X percent, gives Y
pub fn on_what_is(_ctx: &Context<'_>, left: &Value, right: &Value) -> Result<Value> {
    apply("on what is", left, right, |x, y| {
        mul(div(y, add(x, HUNDRED)?)?, HUNDRED)
    })
}

/// `X off what is Y`: the amount that, decreased by X percent, gives Y
pub fn off_what_is(_ctx: &Context<'_>, left: &Value, right: &Value) -> Result<Value> {
    apply("off what is", left, right, |x, y| {
        mul(div(y, sub(HUNDRED, x)?)?, HUNDRED)
    })
}

/// `X of what is Y`: the amount of which Y is X percent
pub fn of_what_is(_ctx: &Context<'_>, left: &Value, right: &Value) -> Result<Value> {
    apply("of what is", left, right, |x, y| mul(div(y, x)?, HUNDRED))
}

/// `X as a % of Y`
pub fn as_percent_of(ctx: &Context<'_>, left: &Value, right: &Value) -> Result<Value> {
    compare(ctx, "as a % of", left, right, |x, y| mul(div(x, y)?, HUNDRED))
}

/// `X as a % on Y`: how much X exceeds Y
pub fn as_percent_on(ctx: &Context<'_>, left: &Value, right: &Value) -> Result<Value> {
    compare(ctx, "as a % on", left, right, |x, y| {
        mul(div(sub(x, y)?, y)?, HUNDRED)
    })
}

/// `X as a % off Y`: how much X falls short of Y
pub fn as_percent_off(ctx: &Context<'_>, left: &Value, right: &Value) -> Result<Value> {
    compare(ctx, "as a % off", left, right, |x, y| {
        mul(div(sub(y, x)?, y)?, HUNDRED)
    })
}

fn apply(
    phrase: &str,
    left: &Value,
    right: &Value,
    formula: impl Fn(Decimal, Decimal) -> Result<Decimal>,
) -> Result<Value> {
    let what = format!("'{}'", phrase);
    let percent = left.expect_numeric(&what)?;
    if !percent.unit.is_percent() {
        let got = if percent.unit.is_unitless() {
            "a plain number"
        } else {
            percent.unit.name()
        };
        return Err(Error::TypeError(format!(
            "{} expects a percentage on the left, got {}",
            what, got
        )));
    }
    let amount = right.expect_numeric(&what)?;
    let value = formula(percent.value, amount.value)?;
    Ok(Value::Numeric(amount.with_value(value)))
}

fn compare(
    ctx: &Context<'_>,
    phrase: &str,
    left: &Value,
    right: &Value,
    formula: impl Fn(Decimal, Decimal) -> Result<Decimal>,
) -> Result<Value> {
    let what = format!("'{}'", phrase);
    let x = left.expect_numeric(&what)?;
    let y = right.expect_numeric(&what)?;
    if x.unit.is_percent() || y.unit.is_percent() {
        return Err(Error::TypeError(format!(
            "{} compares two amounts, got a percentage",
            what
        )));
    }
    let value = formula(x.value, in_unit_of(x, y)?)?;
    Ok(Value::numeric(value, Arc::clone(ctx.units().percent())))
}

/// Magnitude of `y` expressed in the unit of `x`.
fn in_unit_of(x: &Quantity, y: &Quantity) -> Result<Decimal> {
    if x.unit.is_unitless() {
        return Ok(y.value);
    }
    Ok(y.convert_to(&x.unit)?.value)
}

fn add(a: Decimal, b: Decimal) -> Result<Decimal> {
    a.checked_add(b).ok_or_else(overflow)
}

fn sub(a: Decimal, b: Decimal) -> Result<Decimal> {
    a.checked_sub(b).ok_or_else(overflow)
}

fn mul(a: Decimal, b: Decimal) -> Result<Decimal> {
    a.checked_mul(b).ok_or_else(overflow)
}

fn div(a: Decimal, b: Decimal) -> Result<Decimal> {
    if b.is_zero() {
        return Err(Error::EvaluationError("Division by zero".into()));
    }
    a.checked_div(b).ok_or_else(overflow)
}
