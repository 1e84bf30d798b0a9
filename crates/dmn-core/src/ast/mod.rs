//! Abstract Syntax Tree (AST) definitions for the built-in expression language
//!
//! This module contains the AST node definitions for:
//! - Expressions
//! - Simple unary tests
//! - Templates

pub mod expression;
pub mod operator;
pub mod template;

pub use expression::{Expression, UnaryOperator};
pub use operator::Operator;
pub use template::{Template, TemplateSegment};
pub use unary_test::{UnaryTest, UnaryTests};
