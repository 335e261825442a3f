//! Stack VM for calculator plans
//!
//! A [`Plan`] is the flat postfix opcode list produced by the parser. The
//! [`Vm`] walks it once with an operand stack and leaves the line result in
//! the environment's history.

pub mod aggregate;
pub mod math;
pub mod operators;
pub mod percent;
pub mod temporal;

use crate::config::{AggregatorDef, Config, FunctionDef, Operation, OperatorDef, OperatorKind};
use crate::context::Context;
use crate::environment::Environment;
use crate::error::{Error, Result};
use crate::value::Value;
use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use smallvec::SmallVec;
use std::fmt;
use std::sync::Arc;
use tally_units::Unit;
use tracing::debug;

/// VM opcodes
#[derive(Debug, Clone, PartialEq)]
pub enum Opcode {
    Number(Decimal),
    Date(NaiveDate),
    Time(NaiveTime),
    Operator(Arc<OperatorDef>),
    Unit(Arc<Unit>),
    /// Call with the number of arguments found between the parens
    Function { function: Arc<FunctionDef>, args: usize },
    /// Store the stack top under a name, leaving it in place
    Assign(String),
    Variable(String),
    Aggregator(Arc<AggregatorDef>),
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Opcode::Number(n) => write!(f, "{}", n.normalize()),
            Opcode::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Opcode::Time(t) => write!(f, "{}", t.format("%H:%M:%S")),
            Opcode::Operator(op) if op.is_unary() => write!(f, "unary({})", op.symbol),
            Opcode::Operator(op) => f.write_str(&op.symbol),
            Opcode::Unit(unit) => f.write_str(unit.name()),
            Opcode::Function { function, args } => write!(f, "{}/{}", function.name, args),
            Opcode::Assign(name) => write!(f, "{}:", name),
            Opcode::Variable(name) => f.write_str(name),
            Opcode::Aggregator(aggregator) => f.write_str(&aggregator.name),
        }
    }
}

/// Compiled postfix program for one line
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Plan {
    pub opcodes: Vec<Opcode>,
}

impl Plan {
    pub fn new(opcodes: Vec<Opcode>) -> Self {
        Self { opcodes }
    }

    pub fn is_empty(&self) -> bool {
        self.opcodes.is_empty()
    }

    fn operator_kinds(&self) -> impl Iterator<Item = OperatorKind> + '_ {
        self.opcodes.iter().filter_map(|op| match op {
            Opcode::Operator(def) => Some(def.kind),
            _ => None,
        })
    }

    /// Whether any arithmetic operator runs in this plan
    pub fn has_arithmetic(&self) -> bool {
        self.operator_kinds().any(|k| k == OperatorKind::Arithmetic)
    }

    /// Whether the plan converts to an explicit unit
    pub fn has_conversion(&self) -> bool {
        self.operator_kinds().any(|k| k == OperatorKind::Conversion)
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, opcode) in self.opcodes.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", opcode)?;
        }
        Ok(())
    }
}

/// Virtual machine for executing plans
pub struct Vm<'a> {
    config: &'a Config,
    environment: &'a mut Environment,
    stack: SmallVec<[Value; 8]>,
}

impl<'a> Vm<'a> {
    pub fn new(config: &'a Config, environment: &'a mut Environment) -> Self {
        Self {
            config,
            environment,
            stack: SmallVec::new(),
        }
    }

    /// Execute a plan and record its result as the next line.
    ///
    /// Evaluation errors do not escape: they become a `Value::Error` line.
    pub fn execute(&mut self, plan: &Plan) -> Value {
        let value = match self.run(plan) {
            Ok(value) => value,
            Err(err) => {
                debug!(plan = %plan, error = %err, "line evaluation failed");
                Value::error(err.message())
            }
        };
        self.environment.push_line(value.clone());
        value
    }

    /// Execute a plan without touching the line history.
    pub fn run(&mut self, plan: &Plan) -> Result<Value> {
        self.stack.clear();
        for opcode in &plan.opcodes {
            self.step(opcode)?;
        }
        self.finish()
    }

    fn step(&mut self, opcode: &Opcode) -> Result<()> {
        match opcode {
            Opcode::Number(n) => {
                let value = Value::numeric(*n, Arc::clone(self.config.units().unitless()));
                self.stack.push(value);
            }
            Opcode::Date(date) => self.stack.push(Value::date(*date)),
            Opcode::Time(time) => {
                let instant = self.environment.today().and_time(*time);
                self.stack.push(Value::datetime(instant));
            }
            Opcode::Unit(unit) => {
                // A bare number directly followed by a unit takes that unit.
                if let Some(Value::Numeric(q)) = self.stack.last_mut() {
                    if q.unit.is_unitless() {
                        q.unit = Arc::clone(unit);
                        return Ok(());
                    }
                }
                self.stack.push(Value::Unit(Arc::clone(unit)));
            }
            Opcode::Variable(name) => {
                let value = self
                    .environment
                    .variable(name)
                    .cloned()
                    .unwrap_or(Value::Empty);
                self.stack.push(value);
            }
            Opcode::Aggregator(aggregator) => {
                let ctx = Context::new(self.environment, self.config);
                let value = (aggregator.operation)(&ctx)?;
                self.stack.push(value);
            }
            Opcode::Assign(name) => {
                let value = match self.stack.last() {
                    Some(v @ (Value::Numeric(_) | Value::DateTime { .. })) => v.clone(),
                    _ => {
                        return Err(Error::EvaluationError(
                            "top of stack at assignment must be numeric".into(),
                        ))
                    }
                };
                self.environment.set_variable(name.clone(), value);
            }
            Opcode::Operator(operator) => {
                let value = match operator.operation {
                    Operation::Unary(operation) => {
                        let operand = self.pop(&operator.symbol)?;
                        let ctx = Context::new(self.environment, self.config);
                        operation(&ctx, &operand)?
                    }
                    Operation::Binary(operation) => {
                        let right = self.pop(&operator.symbol)?;
                        let left = self.pop(&operator.symbol)?;
                        let ctx = Context::new(self.environment, self.config);
                        operation(&ctx, &left, &right)?
                    }
                };
                self.stack.push(value);
            }
            Opcode::Function { function, args } => {
                let (value, precision) = match args {
                    1 => {
                        let value = self.pop(&function.name)?;
                        let zero = Value::numeric(
                            Decimal::ZERO,
                            Arc::clone(self.config.units().unitless()),
                        );
                        (value, zero)
                    }
                    2 => {
                        let precision = self.pop(&function.name)?;
                        (self.pop(&function.name)?, precision)
                    }
                    n => {
                        return Err(Error::EvaluationError(format!(
                            "'{}' expects 1 or 2 arguments, got {}",
                            function.name, n
                        )))
                    }
                };
                let ctx = Context::new(self.environment, self.config);
                let result = (function.operation)(&ctx, &value, &precision)?;
                self.stack.push(result);
            }
        }
        Ok(())
    }

    fn pop(&mut self, consumer: &str) -> Result<Value> {
        self.stack.pop().ok_or_else(|| {
            Error::EvaluationError(format!("missing operand for '{}'", consumer))
        })
    }

    fn finish(&mut self) -> Result<Value> {
        if self.stack.len() > 1 {
            return Err(Error::EvaluationError(format!(
                "expected a single result, found {} values",
                self.stack.len()
            )));
        }
        match self.stack.pop() {
            None => Ok(Value::Empty),
            Some(value @ (Value::Numeric(_) | Value::DateTime { .. } | Value::Empty)) => {
                Ok(value)
            }
            Some(other) => Err(Error::EvaluationError(format!(
                "a line cannot evaluate to a {}",
                other.kind()
            ))),
        }
    }
}
