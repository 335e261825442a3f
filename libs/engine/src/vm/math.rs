//! Rounding functions: `round`, `ceil`, `floor`.
//!
//! All take a value and a precision. A negative precision rounds to a power of
//! ten (`round(1234; -2)` is `1200`). The unit of the value is kept.

use super::operators::overflow;
use crate::context::Context;
use crate::error::{Error, Result};
use crate::value::Value;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Largest power of ten a `Decimal` can hold.
const MAX_SCALE: i32 = 28;
const HALF_OF_1E29: Decimal = Decimal::from_parts(0x5000_0000, 0x36B9_0BE5, 0xA18F_07D7, false, 0);

pub fn round(_ctx: &Context<'_>, value: &Value, precision: &Value) -> Result<Value> {
    round_with("round", value, precision, RoundingStrategy::MidpointAwayFromZero)
}

pub fn ceil(_ctx: &Context<'_>, value: &Value, precision: &Value) -> Result<Value> {
    round_with("ceil", value, precision, RoundingStrategy::ToPositiveInfinity)
}

pub fn floor(_ctx: &Context<'_>, value: &Value, precision: &Value) -> Result<Value> {
    round_with("floor", value, precision, RoundingStrategy::ToNegativeInfinity)
}

fn round_with(
    name: &str,
    value: &Value,
    precision: &Value,
    strategy: RoundingStrategy,
) -> Result<Value> {
    let what = format!("{}()", name);
    let q = value.expect_numeric(&what)?;
    let places = precision
        .expect_numeric(&what)?
        .value
        .trunc()
        .to_i32()
        .ok_or_else(|| Error::EvaluationError(format!("{} precision out of range", what)))?;

    let rounded = if places >= 0 {
        q.value.round_dp_with_strategy(places.unsigned_abs(), strategy)
    } else if places < -MAX_SCALE {
        beyond_range(q.value, places, strategy)?
    } else {
        let factor = (0..places.unsigned_abs())
            .try_fold(Decimal::ONE, |acc, _| acc.checked_mul(Decimal::TEN))
            .ok_or_else(overflow)?;
        (q.value / factor)
            .round_dp_with_strategy(0, strategy)
            .checked_mul(factor)
            .ok_or_else(overflow)?
    };
    Ok(Value::Numeric(q.with_value(rounded)))
}

/// Rounding to a power of ten larger than any representable decimal: the
/// answer is zero unless the value would move away from it.
fn beyond_range(value: Decimal, places: i32, strategy: RoundingStrategy) -> Result<Decimal> {
    let towards_zero = match strategy {
        RoundingStrategy::ToPositiveInfinity => value <= Decimal::ZERO,
        RoundingStrategy::ToNegativeInfinity => value >= Decimal::ZERO,
        // Half of 10^29 is still representable.
        _ => places < -(MAX_SCALE + 1) || value.abs() < HALF_OF_1E29,
    };
    if towards_zero {
        Ok(Decimal::ZERO)
    } else {
        Err(overflow())
    }
}
