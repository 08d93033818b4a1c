//! Syntax checking for tokenized expressions.
//!
//! The rules are applied in a fixed order and the first violation wins:
//!
//! 1. there is at least one token;
//! 2. the first token is `(`, a number or a valid variable;
//! 3. the last token is `)`, a number or a valid variable;
//! 4. no prefix closes more parentheses than it opens;
//! 5. opening and closing parentheses balance;
//! 6. `(` and operators are followed by `(`, a number or a valid variable;
//! 7. `)`, numbers and variables are followed by `)` or an operator.
//!
//! A variable is valid when its normalized form passes the caller's
//! validator. Unrecognized text is rejected wherever it appears.

use std::collections::HashSet;

use super::error::FormulaFormatError;
use super::token::Token;

/// Output of a successful [`check_syntax`] run.
#[derive(Clone, Debug, PartialEq)]
pub struct CheckedExpression {
    /// Tokens with every variable replaced by its normalized form.
    pub tokens: Vec<Token>,
    /// Normalized variable names in order of first occurrence, without duplicates.
    pub variables: Vec<String>,
}

/// How a token participates in the grammar once variables are validated.
#[derive(Clone, Copy, Debug, PartialEq)]
enum Class {
    Operand,
    Operator,
    Open,
    Close,
}

/// Check `tokens` against the expression grammar.
pub fn check_syntax<N, V>(
    tokens: impl IntoIterator<Item = Token>,
    normalize: N,
    is_valid: V,
) -> Result<CheckedExpression, FormulaFormatError>
where
    N: Fn(&str) -> String,
    V: Fn(&str) -> bool,
{
    // Normalize variables up front; validity is judged on the normalized name.
    let tokens: Vec<(Token, Option<Class>)> = tokens
        .into_iter()
        .map(|token| match token {
            Token::Variable(raw) => {
                let name = normalize(&raw);
                let class = is_valid(&name).then_some(Class::Operand);
                (Token::Variable(name), class)
            }
            other => {
                let class = classify(&other);
                (other, class)
            }
        })
        .collect();

    let (Some(first), Some(last)) = (tokens.first(), tokens.last()) else {
        return Err(FormulaFormatError::Empty);
    };
    if !matches!(first.1, Some(Class::Open | Class::Operand)) {
        return Err(FormulaFormatError::InvalidFirstToken {
            token: first.0.to_string(),
        });
    }
    if !matches!(last.1, Some(Class::Close | Class::Operand)) {
        return Err(FormulaFormatError::InvalidLastToken {
            token: last.0.to_string(),
        });
    }

    let mut open = 0usize;
    let mut close = 0usize;
    let mut previous: Option<(&Token, Class)> = None;

    for (position, (token, class)) in tokens.iter().enumerate() {
        let Some(class) = *class else {
            return Err(reject(token));
        };

        match class {
            Class::Open => open += 1,
            Class::Close => {
                close += 1;
                if close > open {
                    return Err(FormulaFormatError::UnmatchedClose { position });
                }
            }
            Class::Operand | Class::Operator => {}
        }

        if let Some((prev, prev_class)) = previous {
            let expects_operand = matches!(prev_class, Class::Open | Class::Operator);
            if expects_operand && !matches!(class, Class::Open | Class::Operand) {
                return Err(FormulaFormatError::ExpectedOperand {
                    after: prev.to_string(),
                    found: token.to_string(),
                });
            }
            if !expects_operand && !matches!(class, Class::Close | Class::Operator) {
                return Err(FormulaFormatError::ExpectedOperator {
                    after: prev.to_string(),
                    found: token.to_string(),
                });
            }
        }
        previous = Some((token, class));
    }

    if open != close {
        return Err(FormulaFormatError::UnbalancedParens { open, close });
    }

    let mut seen = HashSet::new();
    let variables = tokens
        .iter()
        .filter_map(|(token, _)| match token {
            Token::Variable(name) if seen.insert(name.clone()) => Some(name.clone()),
            _ => None,
        })
        .collect();

    Ok(CheckedExpression {
        tokens: tokens.into_iter().map(|(token, _)| token).collect(),
        variables,
    })
}

fn classify(token: &Token) -> Option<Class> {
    match token {
        Token::Number(n) if n.is_finite() => Some(Class::Operand),
        Token::Number(_) | Token::Unrecognized(_) | Token::Variable(_) => None,
        Token::Operator(_) => Some(Class::Operator),
        Token::OpenParen => Some(Class::Open),
        Token::CloseParen => Some(Class::Close),
    }
}

/// Error for a token that has no grammatical class.
fn reject(token: &Token) -> FormulaFormatError {
    match token {
        Token::Variable(name) => FormulaFormatError::InvalidVariable { name: name.clone() },
        Token::Number(_) => FormulaFormatError::NumberOutOfRange {
            literal: token.to_string(),
        },
        other => FormulaFormatError::UnrecognizedToken {
            token: other.to_string(),
        },
    }
}
