//! Error types for the Tabula command line

use thiserror::Error;

/// Errors in the command line itself, before any sheet is touched
#[derive(Error, Debug, PartialEq)]
pub enum CliError {
    #[error("{flag} requires {what}")]
    MissingValue { flag: String, what: &'static str },

    #[error("Unknown option: {0}")]
    UnknownOption(String),

    #[error("Unexpected argument: {0}")]
    UnexpectedArgument(String),

    #[error("Expected NAME=CONTENT, got {0:?}")]
    InvalidAssignment(String),
}
