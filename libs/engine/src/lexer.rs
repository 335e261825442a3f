//! Calculator lexer - tokenizes one input line
//!
//! The lexer is derived from a [`Config`]: operator, function, aggregator and
//! unit names come from the configured vocabulary and number literals follow
//! the configured decimal separator. Recognizers are tried in a fixed order
//! at every position and the first one that matches wins.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::token::{Token, TokenType};
use regex::Regex;

/// Configured names of one token category, longest first.
struct Vocabulary {
    token_type: TokenType,
    names: Vec<String>,
}

impl Vocabulary {
    fn new<'a>(token_type: TokenType, names: impl Iterator<Item = &'a str>) -> Self {
        let mut names: Vec<String> = names.map(str::to_lowercase).collect();
        names.sort_by(|a, b| {
            b.chars()
                .count()
                .cmp(&a.chars().count())
                .then_with(|| a.cmp(b))
        });
        names.dedup();
        Self { token_type, names }
    }
}

/// The calculator lexer
pub struct Lexer {
    vocabularies: Vec<Vocabulary>,
    separators: Vec<char>,
    date: Regex,
    time: Regex,
    number: Regex,
    identifier: Regex,
}

impl Lexer {
    /// Create a lexer for the vocabulary of `config`
    pub fn new(config: &Config) -> Result<Self> {
        let operators = config.operator_symbols();

        // Symbol operators end a word; a letter-only name must be followed
        // by one of these (or whitespace / end of input).
        let mut separators = vec!['(', ')', ';'];
        for symbol in &operators {
            for c in symbol.chars() {
                if !c.is_alphanumeric() && !c.is_whitespace() && !separators.contains(&c) {
                    separators.push(c);
                }
            }
        }

        let vocabularies = vec![
            Vocabulary::new(TokenType::Operator, operators.into_iter()),
            Vocabulary::new(TokenType::Function, config.function_names()),
            Vocabulary::new(TokenType::Aggregator, config.aggregator_names()),
            Vocabulary::new(TokenType::Unit, config.unit_names()),
        ];

        let sep = regex::escape(&config.number_format().decimal_separator.to_string());
        let number = format!(r"^(?:\d+(?:{sep}\d+)?|{sep}\d+)", sep = sep);

        Ok(Self {
            vocabularies,
            separators,
            date: compile(r"^\d{4}-\d{2}-\d{2}")?,
            time: compile(r"^\d{1,2}:\d{2}(?::\d{2})?")?,
            number: compile(&number)?,
            identifier: compile(r"^[\p{L}_]+")?,
        })
    }

    /// Tokenize one line.
    ///
    /// On failure the error carries the tokens recognized before the first
    /// position where no recognizer matched.
    pub fn lex(&self, line: &str) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        let mut position = 0;

        loop {
            let rest = &line[position..];
            let trimmed = rest.trim_start();
            position += rest.len() - trimmed.len();
            if trimmed.is_empty() {
                break;
            }

            match self.next_token(trimmed, tokens.is_empty()) {
                Some((token_type, len)) => {
                    tokens.push(Token::new(token_type, &trimmed[..len], position));
                    position += len;
                }
                None => {
                    return Err(Error::Lex {
                        message: format!("Unrecognized input: '{}'", trimmed),
                        tokens,
                    });
                }
            }
        }

        Ok(tokens)
    }

    /// Recognize the token at the start of `input`, returning its type and
    /// byte length.
    fn next_token(&self, input: &str, line_start: bool) -> Option<(TokenType, usize)> {
        let first = input.chars().next()?;

        if line_start && first == '#' {
            return Some((TokenType::Comment, input.len()));
        }

        let single = match first {
            ':' | '=' => Some(TokenType::Assignment),
            '(' => Some(TokenType::OpenParen),
            ')' => Some(TokenType::CloseParen),
            ';' => Some(TokenType::Semicolon),
            _ => None,
        };
        if let Some(token_type) = single {
            return Some((token_type, first.len_utf8()));
        }

        if let Some(m) = self.date.find(input) {
            return Some((TokenType::Date, m.end()));
        }
        if let Some(m) = self.time.find(input) {
            return Some((TokenType::Time, m.end()));
        }
        if let Some(m) = self.number.find(input) {
            return Some((TokenType::Number, m.end()));
        }

        for vocabulary in &self.vocabularies {
            if let Some(len) = self.match_vocabulary(input, vocabulary) {
                return Some((vocabulary.token_type, len));
            }
        }

        self.identifier
            .find(input)
            .map(|m| (TokenType::Identifier, m.end()))
    }

    /// Longest configured name that prefixes `input` and respects the word
    /// boundary rule.
    fn match_vocabulary(&self, input: &str, vocabulary: &Vocabulary) -> Option<usize> {
        vocabulary.names.iter().find_map(|name| {
            let len = match_prefix(input, name)?;
            let letters_only = name.chars().all(char::is_alphabetic);
            if letters_only && !self.is_boundary(&input[len..]) {
                return None;
            }
            Some(len)
        })
    }

    fn is_boundary(&self, rest: &str) -> bool {
        match rest.chars().next() {
            None => true,
            Some(c) => c.is_whitespace() || self.separators.contains(&c),
        }
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| Error::Config(format!("invalid lexer pattern: {}", e)))
}

/// Case-insensitive prefix match of a lowercase `name`; returns the byte
/// length of the matched part of `input`.
fn match_prefix(input: &str, name: &str) -> Option<usize> {
    let count = name.chars().count();
    let end = match input.char_indices().nth(count) {
        Some((idx, _)) => idx,
        None if input.chars().count() == count => input.len(),
        None => return None,
    };
    (input[..end].to_lowercase() == name).then_some(end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_match_ignores_case() {
        assert_eq!(match_prefix("CM + 1", "cm"), Some(2));
        assert_eq!(match_prefix("€5", "€"), Some('€'.len_utf8()));
        assert_eq!(match_prefix("c", "cm"), None);
        assert_eq!(match_prefix("cm", "cm"), Some(2));
    }

    #[test]
    fn symbol_operators_are_separators() {
        let lexer = Lexer::new(&Config::default()).unwrap();
        for c in ['+', '-', '*', '/', '%', '(', ')', ';'] {
            assert!(lexer.separators.contains(&c), "missing separator {:?}", c);
        }
        assert!(!lexer.separators.contains(&'a'));
    }
}
