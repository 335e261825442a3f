//! Error types for the calculator engine

use crate::token::Token;
use crate::vm::Plan;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while lexing, parsing or evaluating a line.
///
/// Lex and parse errors keep whatever was built before the failure so callers
/// can inspect the partial token stream or postfix plan.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Lex error: {message}")]
    Lex { message: String, tokens: Vec<Token> },

    #[error("Parse error: {message}")]
    Parse { message: String, partial: Plan },

    #[error("Type error: {0}")]
    TypeError(String),

    #[error("Evaluation error: {0}")]
    EvaluationError(String),

    #[error(transparent)]
    Unit(#[from] tally_units::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// The bare message, without the error category prefix.
    pub fn message(&self) -> String {
        match self {
            Error::Lex { message, .. } | Error::Parse { message, .. } => message.clone(),
            Error::TypeError(message)
            | Error::EvaluationError(message)
            | Error::Config(message) => message.clone(),
            Error::Unit(err) => err.to_string(),
        }
    }
}
