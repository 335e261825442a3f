//! Line interpreter
//!
//! Orchestrates the pipeline for one line: Lex → Parse → Plan → Execute,
//! followed by display-unit selection and formatting.

use crate::config::Config;
use crate::environment::Environment;
use crate::error::Result;
use crate::lexer::Lexer;
use crate::parser::Parser;
use crate::value::Value;
use crate::vm::{Plan, Vm};
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, trace};

const PLAN_CACHE_CAPACITY: usize = 1000;

/// Evaluates calculator lines against an [`Environment`].
///
/// The interpreter itself holds no document state; it can be shared between
/// documents, each with its own environment. Compiled plans are cached by
/// line text.
pub struct Interpreter {
    config: Arc<Config>,
    lexer: Lexer,
    parser: Parser,
    cache: Mutex<LruCache<String, Arc<Plan>>>,
}

impl Interpreter {
    pub fn new(config: Arc<Config>) -> Result<Self> {
        let lexer = Lexer::new(&config)?;
        let parser = Parser::new(Arc::clone(&config));
        let capacity = NonZeroUsize::new(PLAN_CACHE_CAPACITY).unwrap_or(NonZeroUsize::MIN);
        Ok(Self {
            config,
            lexer,
            parser,
            cache: Mutex::new(LruCache::new(capacity)),
        })
    }

    /// Interpreter over the built-in vocabulary.
    pub fn with_default_config() -> Result<Self> {
        Self::new(Arc::new(Config::default()))
    }

    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    /// Lex and parse a line, reusing a cached plan when the same text was
    /// compiled before.
    pub fn compile(&self, line: &str) -> Result<Arc<Plan>> {
        {
            let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(plan) = cache.get(line) {
                trace!(line, "plan cache hit");
                return Ok(Arc::clone(plan));
            }
        }

        let tokens = self.lexer.lex(line)?;
        let plan = Arc::new(self.parser.parse(&tokens)?);
        trace!(line, plan = %plan, "compiled line");

        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .put(line.to_string(), Arc::clone(&plan));
        Ok(plan)
    }

    /// Evaluate one line and record its value in the environment.
    ///
    /// Lines that fail to lex or parse evaluate to `Empty`; evaluation errors
    /// evaluate to `Value::Error`.
    pub fn evaluate(&self, environment: &mut Environment, line: &str) -> Value {
        self.run(environment, line).0
    }

    /// Evaluate one line and format the result for display.
    pub fn evaluate_line(&self, environment: &mut Environment, line: &str) -> String {
        let value = match self.run(environment, line) {
            (value, Some(plan)) => self.select_unit(&plan, value),
            (value, None) => value,
        };
        self.format(&value)
    }

    /// Evaluate every line of a document in order.
    pub fn evaluate_document(&self, environment: &mut Environment, text: &str) -> Vec<String> {
        text.lines()
            .map(|line| self.evaluate_line(environment, line))
            .collect()
    }

    pub fn format(&self, value: &Value) -> String {
        self.config.number_format().format_value(value)
    }

    fn run(&self, environment: &mut Environment, line: &str) -> (Value, Option<Arc<Plan>>) {
        match self.compile(line) {
            Ok(plan) => {
                let value = Vm::new(&self.config, environment).execute(&plan);
                (value, Some(plan))
            }
            Err(err) => {
                debug!(line, error = %err, "line ignored");
                environment.push_line(Value::Empty);
                (Value::Empty, None)
            }
        }
    }

    /// Pick a display unit for the result of an arithmetic line.
    ///
    /// Only applies when no explicit conversion was requested and the unit
    /// belongs to an auto-conversion group.
    fn select_unit(&self, plan: &Plan, value: Value) -> Value {
        let Value::Numeric(quantity) = &value else {
            return value;
        };
        if quantity.unit.is_unitless() || !plan.has_arithmetic() || plan.has_conversion() {
            return value;
        }
        let precision = self.config.number_format().precision;
        match self.config.units().normalize(quantity, precision) {
            Ok(best) => Value::Numeric(best),
            Err(err) => {
                debug!(error = %err, "keeping result unit");
                value
            }
        }
    }
}
