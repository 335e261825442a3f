#![forbid(unsafe_code)]
//! Unit model for the tally calculator.
//!
//! Units belong to a family and carry a multiplier relative to the family's
//! base unit. Units of one family convert linearly into each other; units of
//! different families never do. A [`UnitRegistry`] owns the case-insensitive
//! name table and the ordered auto-conversion groups used to pick a display
//! unit after arithmetic.

mod error;
mod quantity;
mod registry;
mod unit;

pub use error::{Error, Result};
pub use quantity::{convert_decimal, decimal_places, normalize_to_group, Quantity};
pub use registry::UnitRegistry;
pub use unit::{Unit, PERCENT_FAMILY, UNITLESS_FAMILY};
