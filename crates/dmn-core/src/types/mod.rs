//! Type system for DMN values
//!
//! This module contains the runtime type system including:
//! - Value types
//! - Typed values
//! - Type definitions and coercion

pub mod type_definition;
pub mod typed_value;
pub mod value;

pub use type_definition::{TypeDefinition, ValueType, DATE_FORMAT};
pub use typed_value::TypedValue;
pub use value::Value;
