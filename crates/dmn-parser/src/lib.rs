//! DMN Parser - text to AST parser for the built-in expression language
//!
//! This crate provides parsers for:
//! - simple expressions (`amount * 1.1`, `age >= 18 and member`)
//! - simple unary tests used in decision table input entries (`< 18`, `"a","b"`)
//! - templates with embedded `${...}` expressions

pub mod error;
pub mod expression_parser;
mod scan;
pub mod template_parser;
pub mod unary_test_parser;

// Re-export main parser types
pub use error::{ParseError, Result};
pub use expression_parser::ExpressionParser;
pub use template_parser::TemplateParser;
pub use unary_test_parser::UnaryTestParser;
