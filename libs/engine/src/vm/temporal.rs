//! Date arithmetic and clock-based value generators.

use super::operators::overflow;
use crate::context::Context;
use crate::defaults::DURATION_FAMILY;
use crate::error::{Error, Result};
use crate::value::Value;
use chrono::Duration;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tally_units::Quantity;

const NANOS_PER_MILLI: i64 = 1_000_000;
const MILLIS_PER_DAY: i64 = 86_400_000;

/// Move a date by a duration quantity.
///
/// The offset is applied with millisecond resolution; a date gains a time of
/// day as soon as the offset is not a whole number of days.
pub(crate) fn shift(date: &Value, offset: &Quantity, backwards: bool) -> Result<Value> {
    let Value::DateTime { instant, has_time } = date else {
        return Err(Error::TypeError(format!(
            "expected a date, got {}",
            date.kind()
        )));
    };
    if offset.unit.family() != DURATION_FAMILY {
        return Err(Error::TypeError(format!(
            "a date can only be moved by a duration, not by '{}'",
            offset.unit
        )));
    }

    let nanos = offset
        .value
        .checked_mul(offset.unit.multiplier())
        .ok_or_else(overflow)?;
    let millis = (nanos / Decimal::from(NANOS_PER_MILLI))
        .trunc()
        .to_i64()
        .ok_or_else(overflow)?;
    let millis = if backwards { -millis } else { millis };

    let shifted = Duration::try_milliseconds(millis)
        .and_then(|delta| instant.checked_add_signed(delta))
        .ok_or_else(|| Error::EvaluationError("date out of range".into()))?;

    Ok(Value::DateTime {
        instant: shifted,
        has_time: *has_time || millis % MILLIS_PER_DAY != 0,
    })
}

/// `DateTime - DateTime`, in seconds.
pub(crate) fn difference(ctx: &Context<'_>, left: &Value, right: &Value) -> Result<Value> {
    let (Some(a), Some(b)) = (left.as_datetime(), right.as_datetime()) else {
        return Err(Error::TypeError("date difference expects two dates".into()));
    };
    let millis = (a - b).num_milliseconds();
    Ok(Value::numeric(Decimal::new(millis, 3).normalize(), ctx.unit("s")?))
}

/// `<duration> from <date>`
pub fn from(_ctx: &Context<'_>, left: &Value, right: &Value) -> Result<Value> {
    let offset = left.expect_numeric("'from'")?;
    shift(right, offset, false)
}

/// `days until <date>`: signed number of calendar days from today.
pub fn days_until(ctx: &Context<'_>, operand: &Value) -> Result<Value> {
    let Some(target) = operand.as_datetime() else {
        return Err(Error::TypeError(format!(
            "'days until' expects a date, got {}",
            operand.kind()
        )));
    };
    let days = (target.date() - ctx.today()).num_days();
    Ok(Value::numeric(Decimal::from(days), ctx.unit("day")?))
}

pub fn now(ctx: &Context<'_>) -> Result<Value> {
    Ok(Value::datetime(ctx.now()))
}

pub fn today(ctx: &Context<'_>) -> Result<Value> {
    Ok(Value::date(ctx.today()))
}

pub fn tomorrow(ctx: &Context<'_>) -> Result<Value> {
    offset_today(ctx, 1)
}

pub fn yesterday(ctx: &Context<'_>) -> Result<Value> {
    offset_today(ctx, -1)
}

fn offset_today(ctx: &Context<'_>, days: i64) -> Result<Value> {
    ctx.today()
        .checked_add_signed(Duration::days(days))
        .map(Value::date)
        .ok_or_else(|| Error::EvaluationError("date out of range".into()))
}
