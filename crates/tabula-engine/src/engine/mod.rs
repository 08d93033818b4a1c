//! Formula engine API.
//!
//! This module provides everything needed to parse and evaluate cell formulas
//! without knowing anything about the spreadsheet that hosts them:
//!
//! - [`tokenize`], [`Token`] - Lazy tokenizer over expression strings
//! - [`check_syntax`] - Syntax rules applied before a formula is accepted
//! - [`evaluate`] - Two-stack arithmetic evaluator
//! - [`Formula`] - Validated, normalized, immutable formula
//! - [`DependencyGraph`] - Bidirectional dependee/dependent relation
//! - [`is_cell_name`], [`is_variable`], [`cell_order_key`] - Name syntax helpers
//! - [`format_number`] - Format values for display

mod cell_name;
mod error;
mod eval;
mod format;
mod formula;
mod graph;
mod syntax;
mod token;

pub use cell_name::{cell_order_key, is_cell_name, is_variable};
pub use error::{FormulaError, FormulaFormatError};
pub use eval::evaluate;
pub use format::format_number;
pub use formula::Formula;
pub use graph::DependencyGraph;
pub use syntax::{CheckedExpression, check_syntax};
pub use token::{Operator, Token, TokenKind, Tokens, tokenize};
