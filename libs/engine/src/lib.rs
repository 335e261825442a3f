//! Tally engine - line-oriented calculator with units, percentages and dates
//!
//! Every line of a document is compiled and evaluated on its own:
//! 1. **Lexer** → tokens, using the configured vocabulary
//! 2. **Parser** → postfix plan (shunting-yard)
//! 3. **VM** → value, recorded in the document's [`Environment`]
//!
//! # Architecture Overview
//!
//! ```text
//! Line
//!      |
//!   Lexer -> Tokens
//!      |
//!   Parser -> Plan (postfix opcodes)
//!      |
//!   VM Execution -> Value (appended to the line history)
//!      |
//!   Unit selection + formatting -> String
//! ```
//!
//! ```
//! use tally_engine::{Environment, Interpreter};
//!
//! let interpreter = Interpreter::with_default_config().unwrap();
//! let mut env = Environment::new();
//! assert_eq!(interpreter.evaluate_line(&mut env, "100 € + 20 %"), "120 EUR");
//! ```

pub mod config;
pub mod context;
mod defaults;
pub mod engine;
pub mod environment;
pub mod error;
pub mod format;
pub mod lexer;
pub mod parser;
pub mod token;
pub mod value;
pub mod vm;

// Re-export main types
pub use config::{
    AggregatorDef, Associativity, Config, ConfigBuilder, FunctionDef, OperatorDef, OperatorKind,
};
pub use context::Context;
pub use defaults::{DURATION_FAMILY, LENGTH_FAMILY, VOLUME_FAMILY, WEIGHT_FAMILY};
pub use engine::Interpreter;
pub use environment::Environment;
pub use error::{Error, Result};
pub use format::NumberFormat;
pub use value::Value;
pub use vm::{Plan, Vm};

pub use tally_units::{Quantity, Unit, UnitRegistry};
