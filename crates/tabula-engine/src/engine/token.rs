//! Expression tokenizer.
//!
//! Splits a formula string into [`Token`]s. The scan is lazy: [`tokenize`]
//! returns an iterator that holds only the input slice and a cursor, so
//! calling it again on the same string always yields the same sequence.
//!
//! Whitespace separates tokens and is never yielded. Characters that match
//! no token pattern come out as [`Token::Unrecognized`] so the syntax checker
//! can report them instead of silently dropping them.

use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// Arithmetic operators understood by the evaluator.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    pub fn from_symbol(symbol: char) -> Option<Operator> {
        match symbol {
            '+' => Some(Operator::Add),
            '-' => Some(Operator::Subtract),
            '*' => Some(Operator::Multiply),
            '/' => Some(Operator::Divide),
            _ => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Subtract => '-',
            Operator::Multiply => '*',
            Operator::Divide => '/',
        }
    }

    /// `*` and `/` bind tighter than `+` and `-`.
    pub fn is_high_level(self) -> bool {
        matches!(self, Operator::Multiply | Operator::Divide)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A single lexical element of an expression.
#[derive(Clone, Debug, PartialEq)]
pub enum Token {
    Number(f64),
    /// Variable as written in the source, before any normalization.
    Variable(String),
    Operator(Operator),
    OpenParen,
    CloseParen,
    /// Text that matches no token pattern.
    Unrecognized(String),
}

/// Payload-free classification of a [`Token`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum TokenKind {
    Number,
    Variable,
    Operator,
    OpenParen,
    CloseParen,
    Unrecognized,
}

impl Token {
    pub fn kind(&self) -> TokenKind {
        match self {
            Token::Number(_) => TokenKind::Number,
            Token::Variable(_) => TokenKind::Variable,
            Token::Operator(_) => TokenKind::Operator,
            Token::OpenParen => TokenKind::OpenParen,
            Token::CloseParen => TokenKind::CloseParen,
            Token::Unrecognized(_) => TokenKind::Unrecognized,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(n) => write!(f, "{}", n),
            Token::Variable(name) => f.write_str(name),
            Token::Operator(op) => write!(f, "{}", op),
            Token::OpenParen => f.write_str("("),
            Token::CloseParen => f.write_str(")"),
            Token::Unrecognized(text) => f.write_str(text),
        }
    }
}

/// Lazy token iterator returned by [`tokenize`].
#[derive(Clone, Debug)]
pub struct Tokens<'a> {
    rest: &'a str,
}

/// Tokenize an expression.
///
/// ```ignore
/// let tokens: Vec<String> = tokenize("(2 + 3) * 5").map(|t| t.to_string()).collect();
/// assert_eq!(tokens, ["(", "2", "+", "3", ")", "*", "5"]);
/// ```
pub fn tokenize(expression: &str) -> Tokens<'_> {
    Tokens { rest: expression }
}

impl Iterator for Tokens<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        loop {
            if self.rest.is_empty() {
                return None;
            }

            let Some(caps) = token_re().captures(self.rest) else {
                // No pattern matches here: emit one character as-is.
                let ch = self.rest.chars().next()?;
                let (text, rest) = self.rest.split_at(ch.len_utf8());
                self.rest = rest;
                return Some(Token::Unrecognized(text.to_string()));
            };

            let whole = caps.get(0)?;
            let text = whole.as_str();
            self.rest = &self.rest[whole.end()..];

            if caps.name("space").is_some() {
                continue;
            }
            if caps.name("open").is_some() {
                return Some(Token::OpenParen);
            }
            if caps.name("close").is_some() {
                return Some(Token::CloseParen);
            }
            if caps.name("op").is_some() {
                return text
                    .chars()
                    .next()
                    .and_then(Operator::from_symbol)
                    .map(Token::Operator);
            }
            if caps.name("var").is_some() {
                return Some(Token::Variable(text.to_string()));
            }
            return Some(match text.parse::<f64>() {
                Ok(n) => Token::Number(n),
                Err(_) => Token::Unrecognized(text.to_string()),
            });
        }
    }
}

fn token_re() -> &'static Regex {
    static TOKEN_RE: OnceLock<Regex> = OnceLock::new();
    TOKEN_RE.get_or_init(|| {
        Regex::new(
            r"^(?:(?<open>\()|(?<close>\))|(?<op>[+\-*/])|(?<var>[A-Za-z_][A-Za-z_0-9]*)|(?<num>(?:[0-9]+\.[0-9]*|[0-9]*\.[0-9]+|[0-9]+)(?:[eE][+\-]?[0-9]+)?)|(?<space>\s+))",
        )
        .expect("token regex must compile")
    })
}
