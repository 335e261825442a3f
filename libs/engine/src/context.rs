//! Evaluation context handed to operators, functions and aggregators.

use crate::config::Config;
use crate::environment::Environment;
use crate::error::Result;
use crate::value::Value;
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use std::sync::Arc;
use tally_units::{Unit, UnitRegistry};

/// Read-only view of the environment and configuration during one operation.
#[derive(Clone, Copy)]
pub struct Context<'a> {
    pub environment: &'a Environment,
    pub config: &'a Config,
}

impl<'a> Context<'a> {
    pub fn new(environment: &'a Environment, config: &'a Config) -> Self {
        Self {
            environment,
            config,
        }
    }

    pub fn units(&self) -> &'a UnitRegistry {
        self.config.units()
    }

    /// Look up a configured unit by name.
    pub fn unit(&self, name: &str) -> Result<Arc<Unit>> {
        Ok(Arc::clone(self.config.units().get(name)?))
    }

    pub fn unitless(&self, value: Decimal) -> Value {
        Value::numeric(value, Arc::clone(self.config.units().unitless()))
    }

    pub fn lines(&self) -> &'a [Value] {
        self.environment.lines()
    }

    pub fn now(&self) -> NaiveDateTime {
        self.environment.now()
    }

    pub fn today(&self) -> NaiveDate {
        self.environment.today()
    }
}
