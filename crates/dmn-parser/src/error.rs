//! Parser error types

use thiserror::Error;

/// Parser error
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// Invalid expression syntax
    #[error("Invalid expression syntax: {0}")]
    InvalidExpression(String),

    /// Invalid operator
    #[error("Invalid operator: {0}")]
    InvalidOperator(String),

    /// Invalid number literal
    #[error("Invalid number literal: {0}")]
    InvalidNumber(String),

    /// Invalid simple unary test
    #[error("Invalid unary test: {0}")]
    InvalidUnaryTest(String),

    /// `${` without a closing `}`
    #[error("Unterminated template expression in: {0}")]
    UnterminatedTemplate(String),
}

/// Result type for parser operations
pub type Result<T> = std::result::Result<T, ParseError>;
