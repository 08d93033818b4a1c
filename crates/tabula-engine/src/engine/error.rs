//! Error types for formula parsing and evaluation.

use std::fmt;
use thiserror::Error;

/// Syntax errors raised while constructing a [`Formula`](super::Formula).
#[derive(Error, Clone, Debug, PartialEq)]
pub enum FormulaFormatError {
    #[error("Formula is empty")]
    Empty,

    #[error("Unrecognized token '{token}'")]
    UnrecognizedToken { token: String },

    #[error("Number '{literal}' is out of range")]
    NumberOutOfRange { literal: String },

    #[error("Invalid variable '{name}'")]
    InvalidVariable { name: String },

    #[error("Formula cannot start with '{token}'")]
    InvalidFirstToken { token: String },

    #[error("Formula cannot end with '{token}'")]
    InvalidLastToken { token: String },

    #[error("Closing parenthesis at token {position} has no matching '('")]
    UnmatchedClose { position: usize },

    #[error("Unbalanced parentheses: {open} '(' but {close} ')'")]
    UnbalancedParens { open: usize, close: usize },

    #[error("Expected a number, variable or '(' after '{after}', found '{found}'")]
    ExpectedOperand { after: String, found: String },

    #[error("Expected an operator or ')' after '{after}', found '{found}'")]
    ExpectedOperator { after: String, found: String },
}

/// A recoverable evaluation failure.
///
/// This is a value, not a fault: cells store it like any other result so
/// dependents can observe it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FormulaError {
    pub reason: String,
}

impl FormulaError {
    pub fn new(reason: impl Into<String>) -> FormulaError {
        FormulaError {
            reason: reason.into(),
        }
    }

    pub fn division_by_zero() -> FormulaError {
        FormulaError::new("division by zero")
    }

    pub fn undefined_variable(name: &str) -> FormulaError {
        FormulaError::new(format!("undefined variable '{}'", name))
    }

    pub(crate) fn malformed() -> FormulaError {
        FormulaError::new("malformed expression")
    }
}

impl fmt::Display for FormulaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#ERR: {}", self.reason)
    }
}
