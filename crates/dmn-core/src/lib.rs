//! DMN Core - Core types and definitions for the DMN evaluation engine
//!
//! This crate provides the fundamental types used across the workspace:
//! - Value types, typed values and type definitions
//! - AST definitions for the built-in expression language
//! - Decision definitions and their compiled-form caches
//! - Error types

pub mod ast;
pub mod definition;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use definition::{
    Decision, DecisionLogic, DecisionTable, ExpressionNode, HitPolicy, InputClause,
    LiteralExpression, OutputClause, Rule,
};
pub use error::{CoreError, Result};
pub use types::{TypeDefinition, TypedValue, Value, ValueType};
