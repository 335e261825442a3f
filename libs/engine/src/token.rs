//! Token types for the calculator lexer
//!
//! Tokens represent the lexical elements of one calculator line.

/// Token types for the calculator lexer
#[derive(Debug, PartialEq, Clone, Copy, Eq, Hash)]
pub enum TokenType {
    // Literals
    Number,
    Date, // YYYY-MM-DD
    Time, // HH:MM or HH:MM:SS

    // Names resolved against the configured vocabulary
    Operator,
    Function,
    Aggregator,
    Unit,

    // Free words (variables and natural language)
    Identifier,

    // Delimiters
    OpenParen,  // (
    CloseParen, // )
    Semicolon,  // ; separates function arguments
    Assignment, // : or =

    // A line starting with #
    Comment,
}

/// A token in a calculator line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub token_type: TokenType,
    pub value: String,
    /// Byte offset of the token in the line
    pub position: usize,
}

impl Token {
    pub fn new(token_type: TokenType, value: impl Into<String>, position: usize) -> Self {
        Self {
            token_type,
            value: value.into(),
            position,
        }
    }

    /// Whether this token is an assignment marker
    pub fn is_assignment(&self) -> bool {
        self.token_type == TokenType::Assignment
    }
}
