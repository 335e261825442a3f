//! Calculator vocabulary: operators, functions, aggregators, units and number format.
//!
//! A [`Config`] is assembled once through a [`ConfigBuilder`] and is read-only
//! afterwards. The lexer and parser derive their vocabulary from it, so the
//! builder is the only way new names enter the language.

use crate::context::Context;
use crate::error::{Error, Result};
use crate::format::NumberFormat;
use crate::value::Value;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tally_units::{Unit, UnitRegistry};

pub type UnaryFn = fn(&Context<'_>, &Value) -> Result<Value>;
pub type BinaryFn = fn(&Context<'_>, &Value, &Value) -> Result<Value>;
/// Functions take a value and a precision.
pub type FunctionFn = fn(&Context<'_>, &Value, &Value) -> Result<Value>;
pub type AggregatorFn = fn(&Context<'_>) -> Result<Value>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Associativity {
    Left,
    Right,
}

/// Conversion operators (`to`, `as`) pick the output unit explicitly, which
/// disables display-unit auto-selection for the line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OperatorKind {
    Arithmetic,
    Conversion,
}

#[derive(Clone, Copy)]
pub enum Operation {
    Unary(UnaryFn),
    Binary(BinaryFn),
}

impl fmt::Debug for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Unary(_) => f.write_str("Unary"),
            Operation::Binary(_) => f.write_str("Binary"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct OperatorDef {
    pub symbol: String,
    pub precedence: u8,
    pub associativity: Associativity,
    pub kind: OperatorKind,
    pub operation: Operation,
}

impl OperatorDef {
    pub fn binary(
        symbol: impl Into<String>,
        precedence: u8,
        associativity: Associativity,
        operation: BinaryFn,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            precedence,
            associativity,
            kind: OperatorKind::Arithmetic,
            operation: Operation::Binary(operation),
        }
    }

    /// Prefix operators are always right associative.
    pub fn unary(symbol: impl Into<String>, precedence: u8, operation: UnaryFn) -> Self {
        Self {
            symbol: symbol.into(),
            precedence,
            associativity: Associativity::Right,
            kind: OperatorKind::Arithmetic,
            operation: Operation::Unary(operation),
        }
    }

    pub fn conversion(mut self) -> Self {
        self.kind = OperatorKind::Conversion;
        self
    }

    pub fn is_unary(&self) -> bool {
        matches!(self.operation, Operation::Unary(_))
    }

    pub fn arity(&self) -> usize {
        match self.operation {
            Operation::Unary(_) => 1,
            Operation::Binary(_) => 2,
        }
    }
}

impl PartialEq for OperatorDef {
    fn eq(&self, other: &Self) -> bool {
        self.symbol == other.symbol
            && self.arity() == other.arity()
            && self.precedence == other.precedence
            && self.kind == other.kind
    }
}

#[derive(Clone)]
pub struct FunctionDef {
    pub name: String,
    pub operation: FunctionFn,
}

impl fmt::Debug for FunctionDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionDef")
            .field("name", &self.name)
            .finish()
    }
}

impl PartialEq for FunctionDef {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

/// A value generator: `sum`, `average`, `today`, ...
#[derive(Clone)]
pub struct AggregatorDef {
    pub name: String,
    pub operation: AggregatorFn,
}

impl fmt::Debug for AggregatorDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AggregatorDef")
            .field("name", &self.name)
            .finish()
    }
}

impl PartialEq for AggregatorDef {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

/// Immutable calculator configuration.
///
/// All name tables are keyed by lowercase name.
#[derive(Clone, Debug)]
pub struct Config {
    binary_operators: HashMap<String, Arc<OperatorDef>>,
    unary_operators: HashMap<String, Arc<OperatorDef>>,
    functions: HashMap<String, Arc<FunctionDef>>,
    aggregators: HashMap<String, Arc<AggregatorDef>>,
    units: UnitRegistry,
    number_format: NumberFormat,
}

impl Default for Config {
    fn default() -> Self {
        crate::defaults::builder()
            .and_then(ConfigBuilder::build)
            .expect("built-in vocabulary is consistent")
    }
}

impl Config {
    /// An empty builder: no operators, functions or aggregators, and only the
    /// unitless and percent units.
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    pub fn binary_operator(&self, symbol: &str) -> Option<&Arc<OperatorDef>> {
        self.binary_operators.get(&symbol.to_lowercase())
    }

    pub fn unary_operator(&self, symbol: &str) -> Option<&Arc<OperatorDef>> {
        self.unary_operators.get(&symbol.to_lowercase())
    }

    pub fn function(&self, name: &str) -> Option<&Arc<FunctionDef>> {
        self.functions.get(&name.to_lowercase())
    }

    pub fn aggregator(&self, name: &str) -> Option<&Arc<AggregatorDef>> {
        self.aggregators.get(&name.to_lowercase())
    }

    pub fn units(&self) -> &UnitRegistry {
        &self.units
    }

    pub fn number_format(&self) -> &NumberFormat {
        &self.number_format
    }

    /// Every operator symbol, unary and binary, without duplicates.
    pub fn operator_symbols(&self) -> Vec<&str> {
        let mut symbols: Vec<&str> = self
            .binary_operators
            .keys()
            .chain(self.unary_operators.keys())
            .map(String::as_str)
            .collect();
        symbols.sort_unstable();
        symbols.dedup();
        symbols
    }

    pub fn function_names(&self) -> impl Iterator<Item = &str> {
        self.functions.keys().map(String::as_str)
    }

    pub fn aggregator_names(&self) -> impl Iterator<Item = &str> {
        self.aggregators.keys().map(String::as_str)
    }

    pub fn unit_names(&self) -> impl Iterator<Item = &str> {
        self.units.names()
    }
}

/// Registration surface for a [`Config`].
pub struct ConfigBuilder {
    config: Config,
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config {
                binary_operators: HashMap::new(),
                unary_operators: HashMap::new(),
                functions: HashMap::new(),
                aggregators: HashMap::new(),
                units: UnitRegistry::new(),
                number_format: NumberFormat::default(),
            },
        }
    }

    /// A builder preloaded with the built-in vocabulary.
    pub fn with_defaults() -> Result<Self> {
        crate::defaults::builder()
    }

    pub fn add_unit(
        &mut self,
        family: &str,
        name: &str,
        multiplier: Decimal,
        display_names: &[&str],
        synonyms: &[&[&str]],
    ) -> Result<&mut Self> {
        let unit = Unit::new(
            family,
            name,
            multiplier,
            display_names.iter().map(|s| s.to_string()).collect(),
            synonyms
                .iter()
                .map(|set| set.iter().map(|s| s.to_string()).collect())
                .collect(),
        );
        self.config.units.add(unit)?;
        Ok(self)
    }

    /// Register an auto-conversion group of already added units.
    pub fn add_auto_group(&mut self, names: &[&str]) -> Result<&mut Self> {
        self.config.units.add_group(names)?;
        Ok(self)
    }

    /// Register an operator. A unary and a binary operator may share a symbol.
    pub fn add_operator(&mut self, operator: OperatorDef) -> &mut Self {
        let key = operator.symbol.to_lowercase();
        let table = if operator.is_unary() {
            &mut self.config.unary_operators
        } else {
            &mut self.config.binary_operators
        };
        table.insert(key, Arc::new(operator));
        self
    }

    pub fn add_function(&mut self, name: &str, operation: FunctionFn) -> &mut Self {
        self.config.functions.insert(
            name.to_lowercase(),
            Arc::new(FunctionDef {
                name: name.into(),
                operation,
            }),
        );
        self
    }

    pub fn add_aggregator(&mut self, name: &str, operation: AggregatorFn) -> &mut Self {
        self.config.aggregators.insert(
            name.to_lowercase(),
            Arc::new(AggregatorDef {
                name: name.into(),
                operation,
            }),
        );
        self
    }

    pub fn decimal_separator(&mut self, separator: char) -> &mut Self {
        self.config.number_format.decimal_separator = separator;
        self
    }

    pub fn grouping_separator(&mut self, separator: Option<char>) -> &mut Self {
        self.config.number_format.grouping_separator = separator;
        self
    }

    pub fn build(self) -> Result<Config> {
        let format = &self.config.number_format;
        let sep = format.decimal_separator;
        if sep.is_alphanumeric() || sep.is_whitespace() || "();:=#".contains(sep) {
            return Err(Error::Config(format!(
                "'{}' cannot be used as decimal separator",
                sep
            )));
        }
        if format.grouping_separator == Some(sep) {
            return Err(Error::Config(
                "grouping and decimal separator must differ".into(),
            ));
        }
        Ok(self.config)
    }
}
