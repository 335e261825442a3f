//! Aggregators over the line history: `sum`, `average`, `prev`.

use crate::context::Context;
use crate::error::Result;
use crate::value::Value;
use super::operators::add;
use rust_decimal::Decimal;
use tracing::trace;

/// Total of the numeric lines directly above.
pub fn sum(ctx: &Context<'_>) -> Result<Value> {
    let run = numeric_run(ctx.lines());
    Ok(fold(ctx, &run).unwrap_or_else(|| ctx.unitless(Decimal::ZERO)))
}

/// Mean of the numeric lines directly above.
pub fn average(ctx: &Context<'_>) -> Result<Value> {
    let run = numeric_run(ctx.lines());
    Ok(match fold(ctx, &run) {
        Some(Value::Numeric(total)) => {
            let count = Decimal::from(run.len());
            Value::Numeric(total.with_value(total.value / count))
        }
        Some(other) => other,
        None => ctx.unitless(Decimal::ZERO),
    })
}

/// The previous line's value, when it is a number or a date.
pub fn prev(ctx: &Context<'_>) -> Result<Value> {
    Ok(match ctx.lines().last() {
        Some(value @ (Value::Numeric(_) | Value::DateTime { .. })) => value.clone(),
        _ => Value::Empty,
    })
}

/// The longest run of numeric lines at the end of the history, oldest first.
fn numeric_run(lines: &[Value]) -> Vec<&Value> {
    let mut run: Vec<&Value> = lines
        .iter()
        .rev()
        .take_while(|v| v.is_numeric())
        .collect();
    run.reverse();
    run
}

/// Add the run up with `+`. A line that cannot be added leaves the total as
/// it was.
fn fold(ctx: &Context<'_>, run: &[&Value]) -> Option<Value> {
    let (first, rest) = run.split_first()?;
    let mut total = (*first).clone();
    for value in rest {
        match add(ctx, &total, value) {
            Ok(next) => total = next,
            Err(err) => trace!(error = %err, "skipping line in aggregate"),
        }
    }
    Some(total)
}
