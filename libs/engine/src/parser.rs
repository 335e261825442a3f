//! Calculator parser - converts a token stream to a postfix plan
//!
//! Operator-precedence (shunting-yard) parser. Operators, `(` markers,
//! function-call markers and pending assignments live on a working stack;
//! operands go straight to the output plan.
//!
//! Whether `-` (or any symbol with both a prefix and an infix definition)
//! is unary or binary depends on what came before it. That decision is
//! driven by the explicit [`Expect`] state: after an operand (number, unit,
//! variable, aggregator, date, time or `)`) an infix operator is expected;
//! at the start of the line, after `(`, `;` and after any operator an
//! operand is expected.

use crate::config::{Associativity, Config, FunctionDef, OperatorDef};
use crate::error::{Error, Result};
use crate::token::{Token, TokenType};
use crate::vm::{Opcode, Plan};
use chrono::{NaiveDate, NaiveTime};
use std::sync::Arc;

/// What the next token is expected to be
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Expect {
    Operand,
    Operator,
}

/// Working stack entries
#[derive(Debug)]
enum Pending {
    Operator(Arc<OperatorDef>),
    Paren,
    Call { function: Arc<FunctionDef>, args: usize },
    Assign(String),
}

/// Parser for calculator lines
pub struct Parser {
    config: Arc<Config>,
}

impl Parser {
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }

    /// Parse a token stream into a postfix plan.
    ///
    /// Errors carry the plan built up to the failure.
    pub fn parse(&self, tokens: &[Token]) -> Result<Plan> {
        ShuntingYard::new(&self.config).run(tokens)
    }
}

/// State of one parse
struct ShuntingYard<'a> {
    config: &'a Config,
    output: Vec<Opcode>,
    stack: Vec<Pending>,
    expect: Expect,
}

impl<'a> ShuntingYard<'a> {
    fn new(config: &'a Config) -> Self {
        Self {
            config,
            output: Vec::new(),
            stack: Vec::new(),
            expect: Expect::Operand,
        }
    }

    fn run(mut self, tokens: &[Token]) -> Result<Plan> {
        let mut index = 0;
        while index < tokens.len() {
            let token = &tokens[index];
            let next = tokens.get(index + 1);
            index += 1;

            match token.token_type {
                TokenType::Comment => {}
                TokenType::Number => {
                    let value = self
                        .config
                        .number_format()
                        .parse_number(&token.value)
                        .map_err(|e| self.error(e.message()))?;
                    self.operand(Opcode::Number(value));
                }
                TokenType::Date => {
                    let date = NaiveDate::parse_from_str(&token.value, "%Y-%m-%d")
                        .map_err(|_| self.error(format!("Invalid date '{}'.", token.value)))?;
                    self.operand(Opcode::Date(date));
                }
                TokenType::Time => {
                    let time = NaiveTime::parse_from_str(&token.value, "%H:%M:%S")
                        .or_else(|_| NaiveTime::parse_from_str(&token.value, "%H:%M"))
                        .map_err(|_| self.error(format!("Invalid time '{}'.", token.value)))?;
                    self.operand(Opcode::Time(time));
                }
                TokenType::Operator => {
                    let operator = self.resolve_operator(&token.value)?;
                    self.push_operator(operator);
                }
                TokenType::Unit => {
                    let unit = self
                        .config
                        .units()
                        .lookup(&token.value)
                        .cloned()
                        .ok_or_else(|| self.error(format!("Unknown unit '{}'.", token.value)))?;
                    self.operand(Opcode::Unit(unit));
                }
                TokenType::Aggregator => {
                    let aggregator = self
                        .config
                        .aggregator(&token.value)
                        .cloned()
                        .ok_or_else(|| {
                            self.error(format!("Unknown aggregator '{}'.", token.value))
                        })?;
                    self.operand(Opcode::Aggregator(aggregator));
                }
                TokenType::Identifier => {
                    if next.is_some_and(Token::is_assignment) {
                        index += 1;
                        self.stack.push(Pending::Assign(token.value.clone()));
                        self.expect = Expect::Operand;
                    } else {
                        self.operand(Opcode::Variable(token.value.clone()));
                    }
                }
                TokenType::Assignment => {
                    return Err(self.error(format!(
                        "Unexpected assignment '{}' at position {}.",
                        token.value, token.position
                    )));
                }
                TokenType::Function => {
                    let function = self
                        .config
                        .function(&token.value)
                        .cloned()
                        .ok_or_else(|| {
                            self.error(format!("Unknown function '{}'.", token.value))
                        })?;
                    if !next.is_some_and(|t| t.token_type == TokenType::OpenParen) {
                        return Err(self.error(format!(
                            "Expected '(' after function '{}'.",
                            function.name
                        )));
                    }
                    index += 1;
                    self.stack.push(Pending::Call { function, args: 0 });
                    self.expect = Expect::Operand;
                }
                TokenType::OpenParen => {
                    self.stack.push(Pending::Paren);
                    self.expect = Expect::Operand;
                }
                TokenType::CloseParen => self.close_paren()?,
                TokenType::Semicolon => self.separator()?,
            }
        }

        self.finish()
    }

    fn operand(&mut self, opcode: Opcode) {
        self.output.push(opcode);
        self.expect = Expect::Operator;
    }

    fn resolve_operator(&self, symbol: &str) -> Result<Arc<OperatorDef>> {
        let unary = self.config.unary_operator(symbol);
        let binary = self.config.binary_operator(symbol);
        let operator = match self.expect {
            Expect::Operand => unary.or(binary),
            Expect::Operator => binary.or(unary),
        };
        operator
            .cloned()
            .ok_or_else(|| self.error(format!("Unknown operator '{}'.", symbol)))
    }

    fn push_operator(&mut self, operator: Arc<OperatorDef>) {
        // Prefix operators have no left operand to finish.
        if !operator.is_unary() {
            while let Some(Pending::Operator(top)) = self.stack.last() {
                let binds_tighter = top.precedence > operator.precedence
                    || (top.precedence == operator.precedence
                        && operator.associativity == Associativity::Left);
                if !binds_tighter {
                    break;
                }
                let top = Arc::clone(top);
                self.stack.pop();
                self.output.push(Opcode::Operator(top));
            }
        }
        self.stack.push(Pending::Operator(operator));
        self.expect = Expect::Operand;
    }

    fn close_paren(&mut self) -> Result<()> {
        loop {
            match self.stack.pop() {
                None => return Err(self.error("Unbalanced parens.")),
                Some(Pending::Paren) => break,
                Some(Pending::Call { function, args }) => {
                    let args = match self.expect {
                        Expect::Operator => args + 1,
                        Expect::Operand if args == 0 => 0,
                        Expect::Operand => {
                            return Err(self.error(format!(
                                "Missing argument in call to '{}'.",
                                function.name
                            )))
                        }
                    };
                    self.output.push(Opcode::Function { function, args });
                    break;
                }
                Some(Pending::Operator(operator)) => self.output.push(Opcode::Operator(operator)),
                Some(Pending::Assign(name)) => self.output.push(Opcode::Assign(name)),
            }
        }
        self.expect = Expect::Operator;
        Ok(())
    }

    fn separator(&mut self) -> Result<()> {
        if self.expect == Expect::Operand {
            return Err(self.error("Missing argument before ';'."));
        }
        loop {
            match self.stack.pop() {
                Some(Pending::Call { function, args }) => {
                    self.stack.push(Pending::Call {
                        function,
                        args: args + 1,
                    });
                    break;
                }
                Some(Pending::Operator(operator)) => self.output.push(Opcode::Operator(operator)),
                Some(Pending::Assign(name)) => self.output.push(Opcode::Assign(name)),
                Some(Pending::Paren) | None => {
                    return Err(self.error("Misplaced argument separator."))
                }
            }
        }
        self.expect = Expect::Operand;
        Ok(())
    }

    fn finish(mut self) -> Result<Plan> {
        while let Some(pending) = self.stack.pop() {
            match pending {
                Pending::Operator(operator) => self.output.push(Opcode::Operator(operator)),
                Pending::Assign(name) => self.output.push(Opcode::Assign(name)),
                Pending::Paren | Pending::Call { .. } => {
                    return Err(self.error("Unbalanced parens in final loop."))
                }
            }
        }
        Ok(Plan::new(self.output))
    }

    fn error(&self, message: impl Into<String>) -> Error {
        Error::Parse {
            message: message.into(),
            partial: Plan::new(self.output.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;

    fn parse(line: &str) -> Result<Plan> {
        let config = Arc::new(Config::default());
        let tokens = Lexer::new(&config).unwrap().lex(line).unwrap();
        Parser::new(config).parse(&tokens)
    }

    #[test]
    fn precedence_orders_output() {
        assert_eq!(parse("1 + 2 * 3").unwrap().to_string(), "1 2 3 * +");
        assert_eq!(parse("(1 + 2) * 3").unwrap().to_string(), "1 2 + 3 *");
        assert_eq!(parse("8 / 4 / 2").unwrap().to_string(), "8 4 / 2 /");
    }

    #[test]
    fn minus_is_unary_after_operator() {
        let plan = parse("2 * -3").unwrap();
        assert_eq!(plan.to_string(), "2 3 unary(-) *");
        let plan = parse("-2 - 3").unwrap();
        assert_eq!(plan.to_string(), "2 unary(-) 3 -");
    }

    #[test]
    fn unclosed_paren_keeps_partial_plan() {
        match parse("(1 + 2 * 3") {
            Err(Error::Parse { message, partial }) => {
                assert_eq!(message, "Unbalanced parens in final loop.");
                assert_eq!(partial.to_string(), "1 2 3 * +");
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn stray_close_paren() {
        match parse("1 + 2)") {
            Err(Error::Parse { message, partial }) => {
                assert_eq!(message, "Unbalanced parens.");
                assert_eq!(partial.to_string(), "1 2 +");
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }
}
