//! Error types for Tabula core.

use tabula_engine::engine::FormulaFormatError;
use thiserror::Error;

type BoxedSource = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur while editing, loading or saving a spreadsheet
#[derive(Error, Debug)]
pub enum TabulaError {
    #[error("Invalid cell name: {0:?}")]
    InvalidName(String),

    #[error("Invalid formula: {0}")]
    FormulaFormat(#[from] FormulaFormatError),

    #[error("Circular dependency detected: {}", cycle.join(" -> "))]
    CircularDependency { cell: String, cycle: Vec<String> },

    #[error("Read/write error: {message}")]
    ReadWrite {
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },
}

impl TabulaError {
    pub(crate) fn read_write(message: impl Into<String>) -> TabulaError {
        TabulaError::ReadWrite {
            message: message.into(),
            source: None,
        }
    }

    pub(crate) fn read_write_caused_by(
        message: impl Into<String>,
        source: impl Into<BoxedSource>,
    ) -> TabulaError {
        TabulaError::ReadWrite {
            message: message.into(),
            source: Some(source.into()),
        }
    }
}

pub type Result<T> = std::result::Result<T, TabulaError>;
