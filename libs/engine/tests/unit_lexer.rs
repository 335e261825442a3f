//! Unit tests for the calculator lexer module

use tally_engine::lexer::Lexer;
use tally_engine::token::{Token, TokenType};
use tally_engine::{Config, Error};

fn lexer() -> Lexer {
    Lexer::new(&Config::default()).unwrap()
}

/// Helper to tokenize input and keep only the token types
fn types(input: &str) -> Vec<TokenType> {
    lexer()
        .lex(input)
        .unwrap()
        .into_iter()
        .map(|t| t.token_type)
        .collect()
}

fn tokens(input: &str) -> Vec<Token> {
    lexer().lex(input).unwrap()
}

#[test]
fn test_numbers_and_units() {
    let tokens = crate::tokens("12.5 cm");
    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[0], Token::new(TokenType::Number, "12.5", 0));
    assert_eq!(tokens[1], Token::new(TokenType::Unit, "cm", 5));

    assert_eq!(types("5cm"), vec![TokenType::Number, TokenType::Unit]);
    assert_eq!(types(".5"), vec![TokenType::Number]);
}

#[test]
fn test_unit_names_ignore_case() {
    let tokens = crate::tokens("3 KM");
    assert_eq!(tokens[1].token_type, TokenType::Unit);
    assert_eq!(tokens[1].value, "KM");

    let tokens = crate::tokens("100 € + 20 %");
    assert_eq!(
        tokens.iter().map(|t| t.token_type).collect::<Vec<_>>(),
        vec![
            TokenType::Number,
            TokenType::Unit,
            TokenType::Operator,
            TokenType::Number,
            TokenType::Unit,
        ]
    );
    assert_eq!(tokens[1].value, "€");
}

#[test]
fn test_longest_operator_wins() {
    let tokens = crate::tokens("15 as a % on 10");
    assert_eq!(tokens[1], Token::new(TokenType::Operator, "as a % on", 3));

    let tokens = crate::tokens("20% on what is 60");
    assert_eq!(tokens[2].value, "on what is");

    let tokens = crate::tokens("10 divided by 4");
    assert_eq!(tokens[1].value, "divided by");
}

#[test]
fn test_word_boundaries() {
    // "in" is a unit, but not inside a longer word.
    assert_eq!(types("income"), vec![TokenType::Identifier]);
    assert_eq!(types("2 in"), vec![TokenType::Number, TokenType::Unit]);
    // "to" is an operator, "today" an aggregator.
    assert_eq!(types("today"), vec![TokenType::Aggregator]);
    assert_eq!(
        types("5 m to cm"),
        vec![
            TokenType::Number,
            TokenType::Unit,
            TokenType::Operator,
            TokenType::Unit,
        ]
    );
    // Symbols end a word.
    assert_eq!(
        types("price*2"),
        vec![TokenType::Identifier, TokenType::Operator, TokenType::Number]
    );
}

#[test]
fn test_functions_and_delimiters() {
    assert_eq!(
        types("round(3.14159; 2)"),
        vec![
            TokenType::Function,
            TokenType::OpenParen,
            TokenType::Number,
            TokenType::Semicolon,
            TokenType::Number,
            TokenType::CloseParen,
        ]
    );
}

#[test]
fn test_assignment() {
    assert_eq!(
        types("rent = 850 EUR"),
        vec![
            TokenType::Identifier,
            TokenType::Assignment,
            TokenType::Number,
            TokenType::Unit,
        ]
    );
    assert_eq!(
        types("rent: 850"),
        vec![TokenType::Identifier, TokenType::Assignment, TokenType::Number]
    );
}

#[test]
fn test_dates_and_times() {
    let tokens = crate::tokens("2024-03-01 + 10:30");
    assert_eq!(tokens[0], Token::new(TokenType::Date, "2024-03-01", 0));
    assert_eq!(tokens[1].token_type, TokenType::Operator);
    assert_eq!(tokens[2], Token::new(TokenType::Time, "10:30", 13));

    assert_eq!(types("9:05:30"), vec![TokenType::Time]);
    assert_eq!(
        types("days until 2024-12-24"),
        vec![TokenType::Operator, TokenType::Date]
    );
}

#[test]
fn test_comment_lines() {
    let tokens = crate::tokens("# groceries: 12 EUR");
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].token_type, TokenType::Comment);
    assert!(lexer().lex("   ").unwrap().is_empty());
}

#[test]
fn test_unrecognized_input_keeps_prefix() {
    match lexer().lex("5 + @") {
        Err(Error::Lex { message, tokens }) => {
            assert_eq!(message, "Unrecognized input: '@'");
            assert_eq!(tokens.len(), 2);
            assert_eq!(tokens[1].token_type, TokenType::Operator);
        }
        other => panic!("expected lex error, got {:?}", other),
    }
}

#[test]
fn test_configured_decimal_separator() {
    let mut builder = tally_engine::ConfigBuilder::with_defaults().unwrap();
    builder.decimal_separator(',');
    let config = builder.build().unwrap();
    let lexer = Lexer::new(&config).unwrap();

    let tokens = lexer.lex("3,25 kg").unwrap();
    assert_eq!(tokens[0], Token::new(TokenType::Number, "3,25", 0));
    assert_eq!(tokens[1].token_type, TokenType::Unit);
}
