//! Built-in vocabulary used by `Config::default()`.

use crate::config::{Associativity, ConfigBuilder, OperatorDef};
use crate::error::Result;
use crate::vm::{aggregate, math, operators, percent, temporal};
use rust_decimal::Decimal;

pub const LENGTH_FAMILY: &str = "length";
pub const WEIGHT_FAMILY: &str = "weight";
pub const VOLUME_FAMILY: &str = "volume";
/// Base unit is the nanosecond.
pub const DURATION_FAMILY: &str = "duration";

pub const PERCENT_PHRASE_PRECEDENCE: u8 = 1;
pub const ADDITIVE_PRECEDENCE: u8 = 2;
pub const MULTIPLICATIVE_PRECEDENCE: u8 = 3;
pub const CONVERSION_PRECEDENCE: u8 = 4;
pub const PREFIX_PRECEDENCE: u8 = 5;

pub(crate) fn builder() -> Result<ConfigBuilder> {
    let mut builder = ConfigBuilder::new();
    add_units(&mut builder)?;
    add_operators(&mut builder);

    builder
        .add_function("round", math::round)
        .add_function("ceil", math::ceil)
        .add_function("ceiling", math::ceil)
        .add_function("floor", math::floor);

    builder
        .add_aggregator("sum", aggregate::sum)
        .add_aggregator("total", aggregate::sum)
        .add_aggregator("average", aggregate::average)
        .add_aggregator("avg", aggregate::average)
        .add_aggregator("prev", aggregate::prev)
        .add_aggregator("now", temporal::now)
        .add_aggregator("today", temporal::today)
        .add_aggregator("tomorrow", temporal::tomorrow)
        .add_aggregator("yesterday", temporal::yesterday);

    Ok(builder)
}

fn add_units(builder: &mut ConfigBuilder) -> Result<()> {
    // Length, base millimeter
    builder
        .add_unit(LENGTH_FAMILY, "mm", Decimal::ONE, &["mm"], &[&["millimeter", "millimeters", "millimetre", "millimetres"]])?
        .add_unit(LENGTH_FAMILY, "cm", Decimal::from(10), &["cm"], &[&["centimeter", "centimeters", "centimetre", "centimetres"]])?
        .add_unit(LENGTH_FAMILY, "m", Decimal::from(1_000), &["m"], &[&["meter", "meters", "metre", "metres"]])?
        .add_unit(LENGTH_FAMILY, "km", Decimal::from(1_000_000), &["km"], &[&["kilometer", "kilometers", "kilometre", "kilometres"]])?
        .add_unit(LENGTH_FAMILY, "in", Decimal::new(254, 1), &["in"], &[&["inch", "inches"]])?
        .add_unit(LENGTH_FAMILY, "ft", Decimal::new(3048, 1), &["ft"], &[&["foot", "feet"]])?
        .add_unit(LENGTH_FAMILY, "yd", Decimal::new(9144, 1), &["yd"], &[&["yard", "yards"]])?
        .add_unit(LENGTH_FAMILY, "mi", Decimal::from(1_609_344), &["mi"], &[&["mile", "miles"]])?
        .add_auto_group(&["mm", "cm", "m", "km"])?;

    // Weight, base milligram
    builder
        .add_unit(WEIGHT_FAMILY, "mg", Decimal::ONE, &["mg"], &[&["milligram", "milligrams"]])?
        .add_unit(WEIGHT_FAMILY, "g", Decimal::from(1_000), &["g"], &[&["gram", "grams"]])?
        .add_unit(WEIGHT_FAMILY, "kg", Decimal::from(1_000_000), &["kg"], &[&["kilogram", "kilograms", "kilo", "kilos"]])?
        .add_unit(WEIGHT_FAMILY, "t", Decimal::from(1_000_000_000), &["t"], &[&["tonne", "tonnes", "ton", "tons"]])?
        .add_unit(WEIGHT_FAMILY, "oz", Decimal::new(28_349_523_125, 6), &["oz"], &[&["ounce", "ounces"]])?
        .add_unit(WEIGHT_FAMILY, "lb", Decimal::new(45_359_237, 2), &["lb"], &[&["lbs", "pound", "pounds"]])?
        .add_auto_group(&["mg", "g", "kg", "t"])?;

    // Volume, base milliliter
    builder
        .add_unit(VOLUME_FAMILY, "ml", Decimal::ONE, &["ml"], &[&["milliliter", "milliliters", "millilitre", "millilitres"]])?
        .add_unit(VOLUME_FAMILY, "cl", Decimal::from(10), &["cl"], &[&["centiliter", "centiliters"]])?
        .add_unit(VOLUME_FAMILY, "dl", Decimal::from(100), &["dl"], &[&["deciliter", "deciliters"]])?
        .add_unit(VOLUME_FAMILY, "l", Decimal::from(1_000), &["l"], &[&["liter", "liters", "litre", "litres"]])?
        .add_unit(VOLUME_FAMILY, "gal", Decimal::new(3_785_411_784, 6), &["gal"], &[&["gallon", "gallons"]])?
        .add_auto_group(&["ml", "cl", "dl", "l"])?;

    // Duration, base nanosecond
    builder
        .add_unit(DURATION_FAMILY, "ns", Decimal::ONE, &["ns"], &[&["nanosecond", "nanoseconds"]])?
        .add_unit(DURATION_FAMILY, "ms", Decimal::from(1_000_000), &["ms"], &[&["millisecond", "milliseconds"]])?
        .add_unit(DURATION_FAMILY, "s", Decimal::from(1_000_000_000i64), &["s"], &[&["sec", "secs", "second", "seconds"]])?
        .add_unit(DURATION_FAMILY, "min", Decimal::from(60_000_000_000i64), &["min"], &[&["mins", "minute", "minutes"]])?
        .add_unit(DURATION_FAMILY, "h", Decimal::from(3_600_000_000_000i64), &["h"], &[&["hr", "hrs", "hour", "hours"]])?
        .add_unit(DURATION_FAMILY, "day", Decimal::from(86_400_000_000_000i64), &["day", "days"], &[])?
        .add_unit(DURATION_FAMILY, "week", Decimal::from(604_800_000_000_000i64), &["week", "weeks"], &[&["wk"]])?
        .add_auto_group(&["ms", "s", "min", "h", "day"])?;

    // Currencies have no exchange rates: one family each.
    builder
        .add_unit("currency:EUR", "EUR", Decimal::ONE, &["EUR"], &[&["€", "euro", "euros"]])?
        .add_unit("currency:USD", "USD", Decimal::ONE, &["USD"], &[&["$", "dollar", "dollars"]])?
        .add_unit("currency:GBP", "GBP", Decimal::ONE, &["GBP"], &[&["£", "sterling"]])?
        .add_unit("currency:JPY", "JPY", Decimal::ONE, &["JPY"], &[&["¥", "yen"]])?
        .add_unit("currency:CHF", "CHF", Decimal::ONE, &["CHF"], &[&["franc", "francs"]])?;

    Ok(())
}

fn add_operators(builder: &mut ConfigBuilder) {
    use Associativity::Left;

    builder
        .add_operator(OperatorDef::binary("+", ADDITIVE_PRECEDENCE, Left, operators::add))
        .add_operator(OperatorDef::binary("plus", ADDITIVE_PRECEDENCE, Left, operators::add))
        .add_operator(OperatorDef::binary("-", ADDITIVE_PRECEDENCE, Left, operators::subtract))
        .add_operator(OperatorDef::binary("minus", ADDITIVE_PRECEDENCE, Left, operators::subtract))
        .add_operator(OperatorDef::binary("*", MULTIPLICATIVE_PRECEDENCE, Left, operators::multiply))
        .add_operator(OperatorDef::binary("times", MULTIPLICATIVE_PRECEDENCE, Left, operators::multiply))
        .add_operator(OperatorDef::binary("/", MULTIPLICATIVE_PRECEDENCE, Left, operators::divide))
        .add_operator(OperatorDef::binary("divided by", MULTIPLICATIVE_PRECEDENCE, Left, operators::divide))
        .add_operator(OperatorDef::unary("-", PREFIX_PRECEDENCE, operators::negate));

    builder
        .add_operator(OperatorDef::binary("to", CONVERSION_PRECEDENCE, Left, operators::convert).conversion())
        .add_operator(OperatorDef::binary("as", CONVERSION_PRECEDENCE, Left, operators::convert).conversion());

    builder
        .add_operator(OperatorDef::binary("from", ADDITIVE_PRECEDENCE, Left, temporal::from))
        .add_operator(OperatorDef::unary("days until", PREFIX_PRECEDENCE, temporal::days_until));

    builder
        .add_operator(OperatorDef::binary("on", PERCENT_PHRASE_PRECEDENCE, Left, percent::on))
        .add_operator(OperatorDef::binary("off", PERCENT_PHRASE_PRECEDENCE, Left, percent::off))
        .add_operator(OperatorDef::binary("of", PERCENT_PHRASE_PRECEDENCE, Left, percent::of))
        .add_operator(OperatorDef::binary("on what is", PERCENT_PHRASE_PRECEDENCE, Left, percent::on_what_is))
        .add_operator(OperatorDef::binary("off what is", PERCENT_PHRASE_PRECEDENCE, Left, percent::off_what_is))
        .add_operator(OperatorDef::binary("of what is", PERCENT_PHRASE_PRECEDENCE, Left, percent::of_what_is))
        .add_operator(OperatorDef::binary("as a % of", PERCENT_PHRASE_PRECEDENCE, Left, percent::as_percent_of))
        .add_operator(OperatorDef::binary("as a % on", PERCENT_PHRASE_PRECEDENCE, Left, percent::as_percent_on))
        .add_operator(OperatorDef::binary("as a % off", PERCENT_PHRASE_PRECEDENCE, Left, percent::as_percent_off));
}
