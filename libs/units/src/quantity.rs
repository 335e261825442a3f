use crate::error::{Error, Result};
use crate::unit::Unit;
use rust_decimal::{Decimal, RoundingStrategy};
use std::sync::Arc;

/// A magnitude paired with its unit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Quantity {
    pub value: Decimal,
    pub unit: Arc<Unit>,
}

impl Quantity {
    pub fn new(value: Decimal, unit: Arc<Unit>) -> Self {
        Self { value, unit }
    }

    /// Attach a different unit without rescaling the magnitude.
    pub fn with_unit(&self, unit: Arc<Unit>) -> Self {
        Self {
            value: self.value,
            unit,
        }
    }

    pub fn with_value(&self, value: Decimal) -> Self {
        Self {
            value,
            unit: Arc::clone(&self.unit),
        }
    }

    /// Convert into `target`. A unitless quantity adopts the target unit as-is.
    pub fn convert_to(&self, target: &Arc<Unit>) -> Result<Quantity> {
        if *self.unit == **target {
            return Ok(self.clone());
        }
        if self.unit.is_unitless() {
            return Ok(self.with_unit(Arc::clone(target)));
        }
        let value = convert_decimal(self.value, &self.unit, target)?;
        Ok(Quantity::new(value, Arc::clone(target)))
    }
}

/// Rescale `value` from one unit into another of the same family.
pub fn convert_decimal(value: Decimal, from: &Unit, to: &Unit) -> Result<Decimal> {
    if !from.is_convertible_to(to) {
        return Err(Error::Incompatible {
            from: from.name().into(),
            to: to.name().into(),
        });
    }
    if from.multiplier() == to.multiplier() {
        return Ok(value);
    }
    value
        .checked_mul(from.multiplier())
        .and_then(|base| base.checked_div(to.multiplier()))
        .ok_or(Error::Overflow)
}

/// Number of decimal places `value` still needs after rounding to `precision`.
pub fn decimal_places(value: Decimal, precision: u32) -> u32 {
    value
        .round_dp_with_strategy(precision, RoundingStrategy::MidpointAwayFromZero)
        .normalize()
        .scale()
}

/// Pick the coarsest unit of an ascending auto-conversion group that does not
/// need more decimal places than the finer units before it.
///
/// The quantity is first expressed in the group's smallest unit; the walk
/// upwards stops at the first unit that would need more places.
pub fn normalize_to_group(
    quantity: &Quantity,
    group: &[Arc<Unit>],
    precision: u32,
) -> Result<Quantity> {
    let Some(base) = group.first() else {
        return Err(Error::EmptyGroup);
    };

    let mut best = quantity.convert_to(base)?;
    let mut best_places = decimal_places(best.value, precision);

    for unit in &group[1..] {
        let candidate = quantity.convert_to(unit)?;
        let places = decimal_places(candidate.value, precision);
        if places > best_places {
            break;
        }
        best = candidate;
        best_places = places;
    }

    Ok(best)
}
